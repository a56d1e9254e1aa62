use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::general::ElementId;
use crate::network::components::{Position, TrackElement};

/// Index of a vertex inside the [`Graph`](super::graph::Graph) it belongs to.
///
/// The index remembers its graph, so other graphs (clones included) refuse it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VertexIndex {
    pub(crate) graph: usize,
    pub(crate) slot: usize,
}

impl VertexIndex {
    pub(crate) fn new(graph: usize, slot: usize) -> Self {
        VertexIndex { graph, slot }
    }

    /// Position of the vertex in the insertion order of its graph.
    pub fn index(&self) -> usize {
        self.slot
    }

    /// The same vertex after its graph was merged or cloned into graph `graph`
    /// behind `offset` other vertices.
    pub(crate) fn moved(self, graph: usize, offset: usize) -> Self {
        VertexIndex::new(graph, self.slot + offset)
    }
}

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.slot)
    }
}

/// Transient traversal state of a vertex during a path search.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mark {
    #[default]
    Unknown,
    Ok,
    NotOk,
}

/// One half of a double vertex.
#[derive(Debug, Clone)]
pub struct Vertex<Id: ElementId> {
    name: String,
    element: TrackElement<Id>,
    position: Position,
    edges: Vec<VertexIndex>,
    partner: Option<VertexIndex>,
    mark: Mark,
}

impl<Id: ElementId> Vertex<Id> {
    pub fn new(name: impl Into<String>, element: TrackElement<Id>, position: Position) -> Self {
        Vertex {
            name: name.into(),
            element,
            position,
            edges: vec![],
            partner: None,
            mark: Mark::Unknown,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The track element this vertex is part of.
    pub fn element(&self) -> &TrackElement<Id> {
        &self.element
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn partner(&self) -> Option<VertexIndex> {
        self.partner
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Adds `other` to the adjacency of this vertex only.
    /// Use [`Graph::add_edge`](super::graph::Graph::add_edge) to keep adjacency symmetric.
    pub fn add_edge(&mut self, other: VertexIndex) {
        if !self.edges.contains(&other) {
            self.edges.push(other);
        }
    }

    pub fn connected_vertices(&self) -> &[VertexIndex] {
        &self.edges
    }

    /// Returns true if the vertex is an end of the network:
    /// it has no edges but a partner.
    pub fn is_end_vertex(&self) -> bool {
        self.edges.is_empty() && self.partner.is_some()
    }

    pub(crate) fn set_partner(&mut self, partner: VertexIndex) {
        self.partner = Some(partner);
    }

    pub(crate) fn set_mark(&mut self, mark: Mark) {
        self.mark = mark;
    }

    /// Rewrites the edges and the partner after the vertex moved to another graph.
    pub(crate) fn relocate(&mut self, graph: usize, offset: usize) {
        for edge in &mut self.edges {
            *edge = edge.moved(graph, offset);
        }
        self.partner = self.partner.map(|partner| partner.moved(graph, offset));
    }
}

impl<Id: ElementId> fmt::Display for Vertex<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Vertex {}>", self.name)
    }
}
