use tracing::debug;

use crate::general::{DefaultElementId, ElementId};
use crate::network::components::{Orientation, TrackElement};
use crate::network::error::{GraphError, Result};
use crate::network::graph::Graph;

/// Composes a network element by element and finalizes it.
///
/// The first error stops the builder and is returned by [`NetworkBuilder::build`].
///
/// ```
/// use railgraph::network::builder::NetworkBuilder;
/// use railgraph::network::components::Orientation;
///
/// let mut builder: NetworkBuilder = NetworkBuilder::new();
/// builder
///     .add_tracks(&[1, 2])
///     .add_switches(&[(3, Orientation::UpperLeft)])
///     .connect(&[("1_B", "3_A"), ("3_C", "2_A")]);
/// let graph = builder.build().unwrap();
///
/// assert!(graph.is_finalized());
/// assert_eq!(graph.find_path("1_A_*", "3_B").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkBuilder<Id: ElementId = DefaultElementId> {
    graph: Graph<Id>,
    error: Option<GraphError>,
}

impl<Id: ElementId> Default for NetworkBuilder<Id> {
    fn default() -> Self {
        NetworkBuilder::new()
    }
}

impl<Id: ElementId> NetworkBuilder<Id> {
    pub fn new() -> Self {
        NetworkBuilder {
            graph: Graph::new(),
            error: None,
        }
    }

    pub fn add_element(&mut self, element: TrackElement<Id>) -> &mut Self {
        if self.error.is_none() {
            let result = self.graph.add_element_graph(element);
            self.record(result);
        }
        self
    }

    pub fn add_tracks(&mut self, ids: &[Id]) -> &mut Self {
        for id in ids {
            self.add_element(TrackElement::track(id.clone()));
        }
        self
    }

    pub fn add_switches(&mut self, switches: &[(Id, Orientation)]) -> &mut Self {
        for (id, orientation) in switches {
            self.add_element(TrackElement::switch(id.clone(), *orientation));
        }
        self
    }

    /// Pairs the named vertices to double vertices.
    pub fn connect(&mut self, pairs: &[(&str, &str)]) -> &mut Self {
        for (a, b) in pairs {
            if self.error.is_some() {
                break;
            }
            let result = self.graph.connect(a, b);
            self.record(result);
        }
        self
    }

    /// Doubles all remaining single vertices and hands out the finished graph.
    pub fn build(self) -> Result<Graph<Id>> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let mut graph = self.graph;
        graph.double_all_single_vertices()?;
        debug!(
            "built network with {} elements and {} vertices",
            graph.element_count(),
            graph.vertex_count()
        );
        Ok(graph)
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(error) = result {
            debug!("network builder stopped: {}", error);
            if self.error.is_none() {
                self.error = Some(error);
            }
        }
    }
}
