use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use tracing::Level;

use crate::general::ElementId;
use crate::network::error::{GraphError, Result};
use crate::network::graph::Graph;
use crate::network::tracer::{PathTracer, SearchEvent, TracingTracer};
use crate::network::vertex::{Mark, VertexIndex};

/// A route through the network found by [`Graph::find_routes`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route {
    hops: Vec<String>,
    vertices: Vec<String>,
}

impl Route {
    /// The vertices the search stepped on: the start and every vertex
    /// reached over an edge of an element.
    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    /// The full route, including the partner crossed after every hop.
    pub fn vertices(&self) -> &[String] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<String> {
        self.vertices
    }
}

/// State of one route search on a private copy of the graph.
struct Search<'t, Id: ElementId> {
    graph: Graph<Id>,
    end: VertexIndex,
    solutions: Vec<Vec<VertexIndex>>,
    tracer: &'t mut dyn PathTracer,
}

impl<Id: ElementId> Search<'_, Id> {
    /// Explores the last vertex of `path`.
    ///
    /// A vertex is marked `NotOk` before its successors are explored, so
    /// cycles run into a dead end. It is upgraded to `Ok` once one of its
    /// successors reached the end. Vertices marked `Ok` are explored again to
    /// enumerate every route passing them.
    fn explore(&mut self, path: &mut Vec<VertexIndex>) {
        let Some(&last) = path.last() else {
            return;
        };
        let vertex = self.graph.get(last);
        let Some(partner) = vertex.partner() else {
            return;
        };
        let partner = self.graph.get(partner);
        self.tracer.event(
            Level::TRACE,
            &SearchEvent::Visit {
                vertex: vertex.name(),
            },
        );

        if vertex.mark() == Mark::NotOk || partner.mark() != Mark::Unknown {
            self.tracer.event(
                Level::TRACE,
                &SearchEvent::Pruned {
                    vertex: vertex.name(),
                },
            );
            return;
        }

        if last == self.end {
            let hops: Vec<&str> = path.iter().map(|hop| self.graph.get(*hop).name()).collect();
            self.tracer
                .event(Level::TRACE, &SearchEvent::Solution { hops: &hops });
            self.graph.set_mark(last, Mark::Ok);
            self.solutions.push(path.clone());
            return;
        }

        let mark = vertex.mark();
        let candidates = partner.connected_vertices().to_vec();
        self.tracer.event(
            Level::TRACE,
            &SearchEvent::Expand {
                vertex: vertex.name(),
                partner: partner.name(),
                candidates: candidates.len(),
            },
        );

        if mark == Mark::Unknown {
            self.graph.set_mark(last, Mark::NotOk);
            let mut found_path = false;
            for next in candidates {
                self.descend(path, next);
                if self.graph.get(next).mark() == Mark::Ok {
                    found_path = true;
                }
            }
            if found_path {
                self.graph.set_mark(last, Mark::Ok);
            }
        } else {
            for next in candidates {
                self.descend(path, next);
            }
        }
    }

    fn descend(&mut self, path: &mut Vec<VertexIndex>, next: VertexIndex) {
        self.tracer.event(
            Level::TRACE,
            &SearchEvent::Candidate {
                vertex: self.graph.get(next).name(),
            },
        );
        path.push(next);
        self.explore(path);
        path.pop();
    }

    fn route(&self, hops: &[VertexIndex]) -> Route {
        let mut vertices = Vec::with_capacity(hops.len() * 2);
        if let Some((last, crossed)) = hops.split_last() {
            for hop in crossed {
                let vertex = self.graph.get(*hop);
                vertices.push(vertex.name().to_string());
                if let Some(partner) = vertex.partner() {
                    vertices.push(self.graph.get(partner).name().to_string());
                }
            }
            vertices.push(self.graph.get(*last).name().to_string());
        }

        Route {
            hops: hops
                .iter()
                .map(|hop| self.graph.get(*hop).name().to_string())
                .collect(),
            vertices,
        }
    }
}

impl<Id: ElementId> Graph<Id> {
    /// Finds all routes from the vertex `start` to the vertex `end`.
    ///
    /// A route may only leave a vertex through its partner, continuing with
    /// one of the partner's connected vertices. Every route is returned as
    /// the names of all vertices passed, partners included.
    ///
    /// The search runs on a copy of the graph, so the graph itself is never changed.
    /// Search events are forwarded to [`tracing`].
    pub fn find_path(&self, start: &str, end: &str) -> Result<Vec<Vec<String>>> {
        self.find_path_traced(start, end, &mut TracingTracer::default())
    }

    /// [`Graph::find_path`] reporting to the given tracer.
    pub fn find_path_traced(
        &self,
        start: &str,
        end: &str,
        tracer: &mut dyn PathTracer,
    ) -> Result<Vec<Vec<String>>> {
        Ok(self
            .find_routes(start, end, tracer)?
            .into_iter()
            .map(Route::into_vertices)
            .collect())
    }

    /// Finds all routes from `start` to `end`, see [`Graph::find_path`].
    ///
    /// Only finalized graphs can be searched.
    pub fn find_routes(
        &self,
        start: &str,
        end: &str,
        tracer: &mut dyn PathTracer,
    ) -> Result<Vec<Route>> {
        let unpaired = self.unpaired_count();
        if unpaired > 0 {
            return Err(GraphError::NotFinalized { unpaired });
        }
        self.vertex_by_name(start)?;
        self.vertex_by_name(end)?;

        let mut graph = self.copy();
        graph.reset_marks();
        let start_index = graph.vertex_by_name(start)?;
        let end_index = graph.vertex_by_name(end)?;

        tracer.event(Level::DEBUG, &SearchEvent::Started { start, end });
        let mut search = Search {
            graph,
            end: end_index,
            solutions: vec![],
            tracer,
        };
        search.explore(&mut vec![start_index]);

        let routes: Vec<Route> = search
            .solutions
            .iter()
            .map(|hops| search.route(hops))
            .collect();
        search.tracer.event(
            Level::DEBUG,
            &SearchEvent::Finished {
                solutions: routes.len(),
            },
        );

        Ok(routes)
    }

    /// Names of all vertices a train entering the network at `start` can step
    /// on, in breadth first order. Like in a route search, every step crosses
    /// the partner of a vertex and continues with one of the partner's
    /// connected vertices.
    pub fn reachable_from(&self, start: &str) -> Result<Vec<String>> {
        let start = self.vertex_by_name(start)?;
        let mut discovered = FixedBitSet::with_capacity(self.vertex_count());
        let mut queue = VecDeque::new();
        let mut reached = vec![];

        discovered.insert(start.index());
        queue.push_back(start);
        while let Some(index) = queue.pop_front() {
            let vertex = self.get(index);
            reached.push(vertex.name().to_string());
            let Some(partner) = vertex.partner() else {
                continue;
            };
            for next in self.get(partner).connected_vertices() {
                if !discovered.put(next.index()) {
                    queue.push_back(*next);
                }
            }
        }

        Ok(reached)
    }
}
