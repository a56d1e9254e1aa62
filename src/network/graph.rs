use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use petgraph::graph::{NodeIndex, UnGraph};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::general::{DefaultElementId, ElementId};
use crate::network::components::TrackElement;
use crate::network::error::{GraphError, Result};
use crate::network::vertex::{Mark, Vertex, VertexIndex};

/// Label of an edge in the [`Graph::to_petgraph`] view.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Link {
    /// Connection inside a track element.
    Track,
    /// The two halves of a double vertex.
    Partner,
}

/// A graph with double vertices to model railway networks, as described by
/// Markus Montigel (1992).
///
/// Vertices can be added one by one with [`Graph::add_vertex`] and
/// [`Graph::add_edge`], but usually whole track elements are added with
/// [`Graph::add_element_graph`]. The boundary vertices of the elements are
/// then paired to double vertices with [`Graph::connect_vertices`], and the
/// graph is finalized with [`Graph::double_all_single_vertices`]. After that
/// routes can be searched with [`Graph::find_path`].
///
/// ```
/// use railgraph::network::components::{Orientation, TrackElement};
/// use railgraph::network::graph::Graph;
///
/// let mut graph: Graph = Graph::new();
/// graph.add_element_graph(TrackElement::track(1)).unwrap();
/// graph.add_element_graph(TrackElement::track(2)).unwrap();
/// graph.add_element_graph(TrackElement::switch(3, Orientation::UpperLeft)).unwrap();
///
/// graph.connect_vertices(
///     graph.vertex_by_name("1_B").unwrap(),
///     graph.vertex_by_name("3_A").unwrap(),
/// ).unwrap();
/// graph.connect("3_C", "2_A").unwrap();
/// graph.double_all_single_vertices().unwrap();
///
/// assert_eq!(
///     graph.find_path("1_A_*", "3_B").unwrap(),
///     vec![vec!["1_A_*", "1_A", "1_B", "3_A", "3_B"]]
/// );
/// ```
#[derive(Debug)]
pub struct Graph<Id: ElementId = DefaultElementId> {
    id: usize,
    pub(crate) vertices: Vec<Vertex<Id>>,
    names: HashMap<String, VertexIndex>,
    elements: BTreeMap<Id, TrackElement<Id>>,
}

static NEXT_GRAPH_ID: AtomicUsize = AtomicUsize::new(0);

impl<Id: ElementId> Default for Graph<Id> {
    fn default() -> Self {
        Graph::new()
    }
}

/// The clone is a graph of its own: indices of the source are not valid in it.
impl<Id: ElementId> Clone for Graph<Id> {
    fn clone(&self) -> Self {
        let mut graph = Graph::new();
        graph.elements = self.elements.clone();
        for vertex in &self.vertices {
            let mut vertex = vertex.clone();
            vertex.relocate(graph.id, 0);
            graph.push(vertex);
        }
        graph
    }
}

impl<Id: ElementId> Graph<Id> {
    pub fn new() -> Self {
        Graph {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            vertices: vec![],
            names: HashMap::new(),
            elements: BTreeMap::new(),
        }
    }

    /// Registers the vertex and the element it belongs to.
    ///
    /// Fails without touching the graph, if a vertex with the same name is already
    /// registered, if the vertex already has a partner, or if one of its edges
    /// leads to a vertex not registered in this graph.
    pub fn add_vertex(&mut self, vertex: Vertex<Id>) -> Result<VertexIndex> {
        if self.names.contains_key(vertex.name()) {
            return Err(GraphError::DuplicateVertex {
                name: vertex.name().to_string(),
            });
        }
        if vertex.partner().is_some() {
            return Err(GraphError::AlreadyPaired {
                name: vertex.name().to_string(),
            });
        }

        let index = self.next_index();
        if let Some(&foreign) = vertex
            .connected_vertices()
            .iter()
            .find(|other| other.graph != self.id || other.slot >= index.slot)
        {
            return Err(GraphError::UnknownVertex { index: foreign });
        }

        Ok(self.insert(vertex))
    }

    fn next_index(&self) -> VertexIndex {
        VertexIndex::new(self.id, self.vertices.len())
    }

    fn insert(&mut self, vertex: Vertex<Id>) -> VertexIndex {
        self.elements
            .entry(vertex.element().id().clone())
            .or_insert_with(|| vertex.element().clone());
        self.push(vertex)
    }

    fn push(&mut self, vertex: Vertex<Id>) -> VertexIndex {
        let index = self.next_index();
        trace!("add vertex {} as {}", vertex.name(), index);
        self.names.insert(vertex.name().to_string(), index);
        self.vertices.push(vertex);
        index
    }

    /// Connects both vertices with an edge in both directions.
    pub fn add_edge(&mut self, a: VertexIndex, b: VertexIndex) -> Result<()> {
        self.vertex(a)?;
        self.vertex(b)?;

        debug!(
            "add edge {}-{}",
            self.vertices[a.slot].name(),
            self.vertices[b.slot].name()
        );
        self.vertices[a.slot].add_edge(b);
        self.vertices[b.slot].add_edge(a);
        Ok(())
    }

    /// Moves all vertices of `subgraph` into this graph, keeping their edges and partners.
    ///
    /// Nothing is added if any of the names is already taken.
    pub fn add_vertices_from(&mut self, subgraph: Graph<Id>) -> Result<()> {
        if let Some(vertex) = subgraph
            .vertices
            .iter()
            .find(|vertex| self.names.contains_key(vertex.name()))
        {
            return Err(GraphError::DuplicateVertex {
                name: vertex.name().to_string(),
            });
        }

        let offset = self.vertices.len();
        for mut vertex in subgraph.vertices {
            vertex.relocate(self.id, offset);
            self.insert(vertex);
        }
        for (id, element) in subgraph.elements {
            self.elements.entry(id).or_insert(element);
        }

        Ok(())
    }

    /// Adds all vertices of the track element into this graph.
    pub fn add_element_graph(&mut self, element: TrackElement<Id>) -> Result<()> {
        debug!("add element {}", element);
        self.add_vertices_from(element.subgraph()?)
    }

    pub fn vertex_by_name(&self, name: &str) -> Result<VertexIndex> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NotFound {
                key: name.to_string(),
            })
    }

    pub fn vertex(&self, index: VertexIndex) -> Result<&Vertex<Id>> {
        self.vertices
            .get(index.slot)
            .filter(|_| index.graph == self.id)
            .ok_or(GraphError::UnknownVertex { index })
    }

    pub fn vertex_named(&self, name: &str) -> Result<&Vertex<Id>> {
        self.vertex(self.vertex_by_name(name)?)
    }

    pub fn element_by_id(&self, id: &Id) -> Result<&TrackElement<Id>> {
        self.elements.get(id).ok_or_else(|| GraphError::NotFound {
            key: id.to_string(),
        })
    }

    /// Pairs two vertices to a double vertex.
    pub fn connect_vertices(&mut self, a: VertexIndex, b: VertexIndex) -> Result<()> {
        let (vertex_a, vertex_b) = (self.vertex(a)?, self.vertex(b)?);

        if a == b {
            return Err(GraphError::SelfPairing {
                name: vertex_a.name().to_string(),
            });
        }
        if let Some(paired) = [vertex_a, vertex_b]
            .into_iter()
            .find(|vertex| vertex.partner().is_some())
        {
            return Err(GraphError::AlreadyPaired {
                name: paired.name().to_string(),
            });
        }

        debug!("pair {} with {}", vertex_a.name(), vertex_b.name());
        self.vertices[a.slot].set_partner(b);
        self.vertices[b.slot].set_partner(a);
        Ok(())
    }

    /// [`Graph::connect_vertices`] addressed by vertex names.
    pub fn connect(&mut self, a: &str, b: &str) -> Result<()> {
        let a = self.vertex_by_name(a)?;
        let b = self.vertex_by_name(b)?;
        self.connect_vertices(a, b)
    }

    /// Gives every vertex without partner an artificial partner named `"{name}_*"`.
    ///
    /// Call this once, after all elements are connected: afterwards every vertex
    /// is part of a double vertex and no further connections can be made.
    pub fn double_all_single_vertices(&mut self) -> Result<()> {
        let singles: Vec<VertexIndex> = self.single_vertices().collect();

        let twins = singles
            .iter()
            .map(|index| {
                let vertex = &self.vertices[index.slot];
                Vertex::new(
                    format!("{}_*", vertex.name()),
                    vertex.element().clone(),
                    vertex.position(),
                )
            })
            .collect::<Vec<_>>();

        if let Some(twin) = twins
            .iter()
            .find(|twin| self.names.contains_key(twin.name()))
        {
            return Err(GraphError::DuplicateVertex {
                name: twin.name().to_string(),
            });
        }

        for (single, twin) in singles.into_iter().zip(twins) {
            debug!("double end vertex {}", twin.name());
            let twin = self.add_vertex(twin)?;
            self.connect_vertices(single, twin)?;
        }

        Ok(())
    }

    /// Returns a fully independent deep copy of the graph.
    ///
    /// Vertices of the copy are looked up again by name, see [`Clone`] for [`Graph`].
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// True once every vertex is part of a double vertex.
    pub fn is_finalized(&self) -> bool {
        self.single_vertices().next().is_none()
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexIndex, &Vertex<Id>)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(slot, vertex)| (VertexIndex::new(self.id, slot), vertex))
    }

    /// All track elements of the graph, ordered by id.
    pub fn elements(&self) -> impl Iterator<Item = &TrackElement<Id>> {
        self.elements.values()
    }

    /// The vertices marking the ends of the network.
    pub fn end_vertices(&self) -> impl Iterator<Item = &Vertex<Id>> {
        self.vertices.iter().filter(|vertex| vertex.is_end_vertex())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Exports the graph for layout and rendering.
    ///
    /// Node `n` of the returned graph is the vertex with index `n`.
    pub fn to_petgraph(&self) -> UnGraph<&Vertex<Id>, Link> {
        let mut graph = UnGraph::with_capacity(self.vertices.len(), self.vertices.len() * 2);
        for vertex in &self.vertices {
            graph.add_node(vertex);
        }

        for (index, vertex) in self.vertices() {
            for other in vertex.connected_vertices() {
                if index < *other || !self.get(*other).connected_vertices().contains(&index) {
                    graph.add_edge(
                        NodeIndex::new(index.slot),
                        NodeIndex::new(other.slot),
                        Link::Track,
                    );
                }
            }
            if let Some(partner) = vertex.partner().filter(|partner| index < *partner) {
                graph.add_edge(
                    NodeIndex::new(index.slot),
                    NodeIndex::new(partner.slot),
                    Link::Partner,
                );
            }
        }

        graph
    }

    fn single_vertices(&self) -> impl Iterator<Item = VertexIndex> + '_ {
        self.vertices()
            .filter(|(_, vertex)| vertex.partner().is_none())
            .map(|(index, _)| index)
    }

    pub(crate) fn unpaired_count(&self) -> usize {
        self.single_vertices().count()
    }

    pub(crate) fn get(&self, index: VertexIndex) -> &Vertex<Id> {
        &self.vertices[index.slot]
    }

    pub(crate) fn set_mark(&mut self, index: VertexIndex, mark: Mark) {
        self.vertices[index.slot].set_mark(mark);
    }

    pub(crate) fn reset_marks(&mut self) {
        for vertex in &mut self.vertices {
            vertex.set_mark(Mark::Unknown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::components::{ElementKind, Orientation, Position};

    fn two_tracks() -> Graph {
        let mut graph = Graph::new();
        graph.add_element_graph(TrackElement::track(1)).unwrap();
        graph.add_element_graph(TrackElement::track(2)).unwrap();
        graph
    }

    #[test]
    fn duplicate_vertex_leaves_graph_unchanged() {
        let mut graph = two_tracks();
        let before = graph.vertex_count();

        let result = graph.add_vertex(Vertex::new("1_A", TrackElement::track(9), Position(0, 0)));

        assert_eq!(
            result,
            Err(GraphError::DuplicateVertex {
                name: "1_A".to_string()
            })
        );
        assert_eq!(graph.vertex_count(), before);
        assert!(graph.element_by_id(&9).is_err());
    }

    #[test]
    fn duplicate_element_is_not_merged_partially() {
        let mut graph = two_tracks();

        let result = graph.add_element_graph(TrackElement::switch(1, Orientation::UpperLeft));

        assert!(matches!(result, Err(GraphError::DuplicateVertex { .. })));
        assert_eq!(graph.vertex_count(), 4);
        assert!(graph.vertex_by_name("1_C").is_err());
        assert_eq!(graph.element_by_id(&1).unwrap().kind(), ElementKind::Track);
    }

    #[test]
    fn edges_are_symmetric() {
        let mut graph = two_tracks();
        let a = graph.vertex_by_name("1_B").unwrap();
        let b = graph.vertex_by_name("2_A").unwrap();

        graph.add_edge(a, b).unwrap();
        graph.add_edge(b, a).unwrap();

        assert_eq!(graph.vertex(a).unwrap().connected_vertices().len(), 2);
        assert!(graph.vertex(a).unwrap().connected_vertices().contains(&b));
        assert!(graph.vertex(b).unwrap().connected_vertices().contains(&a));
        assert_eq!(
            graph.add_edge(a, VertexIndex::new(graph.id, 42)),
            Err(GraphError::UnknownVertex {
                index: VertexIndex::new(graph.id, 42)
            })
        );
    }

    #[test]
    fn element_registration() {
        let mut graph = two_tracks();
        graph
            .add_element_graph(TrackElement::switch(3, Orientation::LowerRight))
            .unwrap();

        assert_eq!(graph.element_count(), 3);
        assert_eq!(
            graph.element_by_id(&3).unwrap().kind(),
            ElementKind::Switch(Orientation::LowerRight)
        );
        assert_eq!(
            graph.element_by_id(&4),
            Err(GraphError::NotFound {
                key: "4".to_string()
            })
        );
        assert_eq!(
            graph.vertex_by_name("3_D"),
            Err(GraphError::NotFound {
                key: "3_D".to_string()
            })
        );
        let ids: Vec<u32> = graph.elements().map(|element| *element.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn connect_vertices_pairs_exclusively() {
        let mut graph = two_tracks();
        let a = graph.vertex_by_name("1_B").unwrap();
        let b = graph.vertex_by_name("2_A").unwrap();
        let c = graph.vertex_by_name("2_B").unwrap();

        graph.connect_vertices(a, b).unwrap();
        assert_eq!(graph.vertex(a).unwrap().partner(), Some(b));
        assert_eq!(graph.vertex(b).unwrap().partner(), Some(a));

        assert_eq!(
            graph.connect_vertices(c, a),
            Err(GraphError::AlreadyPaired {
                name: "1_B".to_string()
            })
        );
        assert_eq!(graph.vertex(c).unwrap().partner(), None);
        assert_eq!(
            graph.connect_vertices(c, VertexIndex::new(graph.id, 17)),
            Err(GraphError::UnknownVertex {
                index: VertexIndex::new(graph.id, 17)
            })
        );
        assert_eq!(
            graph.connect_vertices(c, c),
            Err(GraphError::SelfPairing {
                name: "2_B".to_string()
            })
        );
    }

    #[test]
    fn vertex_of_other_graph_is_unknown() {
        let mut graph = two_tracks();
        let mut other: Graph = Graph::new();
        other
            .add_element_graph(TrackElement::switch(5, Orientation::UpperRight))
            .unwrap();
        let foreign = other.vertex_by_name("5_C").unwrap();
        let own = graph.vertex_by_name("1_A").unwrap();

        assert_eq!(
            graph.connect_vertices(own, foreign),
            Err(GraphError::UnknownVertex { index: foreign })
        );
        assert_eq!(
            graph.add_edge(own, foreign),
            Err(GraphError::UnknownVertex { index: foreign })
        );
        assert!(graph.vertex(foreign).is_err());
        assert!(graph.vertices().all(|(_, vertex)| vertex.partner().is_none()));
        assert_eq!(graph.vertex(own).unwrap().connected_vertices().len(), 1);
    }

    #[test]
    fn indices_of_the_source_are_unknown_in_a_copy() {
        let graph = two_tracks();
        let mut copy = graph.copy();
        copy.add_element_graph(TrackElement::track(3)).unwrap();
        let index = graph.vertex_by_name("1_B").unwrap();

        assert!(copy.vertex(index).is_err());
        let own = copy.vertex_by_name("1_B").unwrap();
        assert_eq!(own.index(), index.index());
        assert_eq!(
            copy.vertex(own).unwrap().connected_vertices(),
            &[copy.vertex_by_name("1_A").unwrap()]
        );
    }

    #[test]
    fn paired_vertex_of_other_graph_is_refused() {
        let mut source = two_tracks();
        source.double_all_single_vertices().unwrap();
        let end = source.vertex_named("2_B_*").unwrap().clone();
        let mut graph: Graph = Graph::new();

        assert_eq!(
            graph.add_vertex(end),
            Err(GraphError::AlreadyPaired {
                name: "2_B_*".to_string()
            })
        );
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.element_count(), 0);
    }

    #[test]
    fn vertex_with_foreign_edges_is_refused() {
        let mut graph = two_tracks();
        let own = graph.vertex_by_name("2_B").unwrap();
        let ahead = graph.next_index();

        let mut looped = Vertex::new("9_A", TrackElement::track(9), Position(0, 0));
        looped.add_edge(ahead);
        assert_eq!(
            graph.add_vertex(looped),
            Err(GraphError::UnknownVertex { index: ahead })
        );

        let mut other: Graph = Graph::new();
        other.add_element_graph(TrackElement::track(9)).unwrap();
        let mut stray = Vertex::new("9_B", TrackElement::track(9), Position(1, 0));
        stray.add_edge(other.vertex_by_name("9_A").unwrap());
        assert!(matches!(
            graph.add_vertex(stray),
            Err(GraphError::UnknownVertex { .. })
        ));

        let mut linked = Vertex::new("9_A", TrackElement::track(9), Position(0, 0));
        linked.add_edge(own);
        assert_eq!(graph.add_vertex(linked), Ok(ahead));
        assert_eq!(graph.vertex_count(), 5);
    }

    #[test]
    fn doubling_finalizes_the_graph() {
        let mut graph = two_tracks();
        graph.connect("1_B", "2_A").unwrap();
        assert!(!graph.is_finalized());

        graph.double_all_single_vertices().unwrap();

        assert!(graph.is_finalized());
        assert_eq!(graph.vertex_count(), 6);
        let twin = graph.vertex_named("1_A_*").unwrap();
        assert_eq!(twin.position(), Position(0, 0));
        assert_eq!(twin.element().id(), &1);
        assert!(twin.is_end_vertex());
        assert_eq!(
            twin.partner(),
            Some(graph.vertex_by_name("1_A").unwrap())
        );

        let ends: Vec<&str> = graph.end_vertices().map(Vertex::name).collect();
        assert_eq!(ends, vec!["1_A_*", "2_B_*"]);

        graph.double_all_single_vertices().unwrap();
        assert_eq!(graph.vertex_count(), 6);

        assert_eq!(
            graph.connect("1_A", "2_B"),
            Err(GraphError::AlreadyPaired {
                name: "1_A".to_string()
            })
        );
    }

    #[test]
    fn doubling_refuses_taken_names() {
        let mut graph = two_tracks();
        graph
            .add_vertex(Vertex::new("1_A_*", TrackElement::track(1), Position(0, 0)))
            .unwrap();

        assert!(matches!(
            graph.double_all_single_vertices(),
            Err(GraphError::DuplicateVertex { .. })
        ));
        assert_eq!(graph.vertex_count(), 5);
        assert!(graph.vertices().all(|(_, vertex)| vertex.partner().is_none()));
    }

    #[test]
    fn copy_is_independent() {
        let mut graph = two_tracks();
        graph.double_all_single_vertices().unwrap();
        let index = graph.vertex_by_name("1_A").unwrap();

        let mut copy = graph.copy();
        let copied = copy.vertex_by_name("1_A").unwrap();
        copy.set_mark(copied, Mark::NotOk);

        assert_eq!(copy.get(copied).mark(), Mark::NotOk);
        assert_eq!(graph.get(index).mark(), Mark::Unknown);
        assert_eq!(
            copy.vertex(copy.get(copied).partner().unwrap()).unwrap().name(),
            "1_A_*"
        );

        copy.reset_marks();
        assert_eq!(copy.get(copied).mark(), Mark::Unknown);
    }

    #[test]
    fn petgraph_view() {
        let mut graph = two_tracks();
        graph.connect("1_B", "2_A").unwrap();
        graph.double_all_single_vertices().unwrap();

        let view = graph.to_petgraph();

        assert_eq!(view.node_count(), 6);
        let links: Vec<Link> = view.edge_weights().copied().collect();
        assert_eq!(links.iter().filter(|link| **link == Link::Track).count(), 2);
        assert_eq!(links.iter().filter(|link| **link == Link::Partner).count(), 3);
        assert_eq!(petgraph::algo::connected_components(&view), 1);
    }
}
