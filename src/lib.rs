//! Railway networks as graphs of double vertices.
//!
//! Every connection point between two track elements is modelled by a pair of
//! vertices, one for each direction of travel. A route may only continue
//! behind a vertex through its partner, which keeps the direction of travel
//! consistent through the whole network.

/// General traits shared by all network types.
pub mod general;
/// The railway network graph and its route search.
pub mod network;

pub use general::{DefaultElementId, ElementId};
pub use network::builder::NetworkBuilder;
pub use network::components::{ElementKind, Orientation, Position, TrackElement};
pub use network::error::{GraphError, Result};
pub use network::graph::{Graph, Link};
pub use network::path_search::Route;
pub use network::tracer::{NoopTracer, PathTracer, SearchEvent, TracingTracer};
pub use network::vertex::{Mark, Vertex, VertexIndex};
