/// Composes a finalized network from track elements.
pub mod builder;
/// Positions, switch orientations and track elements.
pub mod components;
/// Errors of graph construction and queries.
pub mod error;
/// The double vertex graph.
pub mod graph;
/// Route search and reachability.
pub mod path_search;
/// Injectable reporting of route searches.
pub mod tracer;
/// The halves of double vertices.
pub mod vertex;
