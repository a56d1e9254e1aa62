use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::general::ElementId;
use crate::network::error::{GraphError, Result};
use crate::network::graph::Graph;
use crate::network::vertex::Vertex;

/// Relative location of a vertex inside its track element.
/// 0 = x-Position
/// 1 = y-Position
///
/// Only layout consumers look at positions; they never influence connectivity.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position(pub i32, pub i32);

impl Position {
    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn y(&self) -> i32 {
        self.1
    }
}

/// Where the diverging leg of a switch points to on the railway diagram.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Orientation {
    UpperLeft = 0,
    UpperRight = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

impl From<u8> for Orientation {
    fn from(orientation: u8) -> Orientation {
        match orientation % 4 {
            0 => Orientation::UpperLeft,
            1 => Orientation::UpperRight,
            2 => Orientation::LowerLeft,
            3 => Orientation::LowerRight,
            _ => unreachable!(),
        }
    }
}

impl FromStr for Orientation {
    type Err = GraphError;

    /// Parses the short codes used on railway diagrams.
    ///
    /// ```
    /// use railgraph::network::components::Orientation;
    ///
    /// assert_eq!("ul".parse(), Ok(Orientation::UpperLeft));
    /// assert_eq!("lr".parse(), Ok(Orientation::LowerRight));
    /// assert!("up".parse::<Orientation>().is_err());
    /// ```
    fn from_str(code: &str) -> Result<Self> {
        match code {
            "ul" => Ok(Orientation::UpperLeft),
            "ur" => Ok(Orientation::UpperRight),
            "ll" => Ok(Orientation::LowerLeft),
            "lr" => Ok(Orientation::LowerRight),
            _ => Err(GraphError::InvalidOrientation {
                code: code.to_string(),
            }),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Orientation {
    pub fn code(&self) -> &'static str {
        match self {
            Orientation::UpperLeft => "ul",
            Orientation::UpperRight => "ur",
            Orientation::LowerLeft => "ll",
            Orientation::LowerRight => "lr",
        }
    }

    /// Positions of the straight leg `B` and the diverging leg `C`,
    /// relative to the throat `A` at (0, 0).
    pub fn leg_positions(&self) -> (Position, Position) {
        match self {
            Orientation::UpperLeft => (Position(1, 0), Position(1, 1)),
            Orientation::UpperRight => (Position(-1, 0), Position(-1, 1)),
            Orientation::LowerLeft => (Position(1, 0), Position(1, -1)),
            Orientation::LowerRight => (Position(-1, 0), Position(-1, -1)),
        }
    }
}

/// The named connection points of a track element.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Port {
    A,
    B,
    C,
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::A => f.write_str("A"),
            Port::B => f.write_str("B"),
            Port::C => f.write_str("C"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElementKind {
    Track,
    Switch(Orientation),
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Track => f.write_str("track"),
            ElementKind::Switch(orientation) => write!(f, "switch_{orientation}"),
        }
    }
}

impl ElementKind {
    /// The ports of this kind of element together with their layout position.
    pub fn layout(&self) -> Vec<(Port, Position)> {
        match self {
            ElementKind::Track => vec![(Port::A, Position(0, 0)), (Port::B, Position(1, 0))],
            ElementKind::Switch(orientation) => {
                let (b, c) = orientation.leg_positions();
                vec![(Port::A, Position(0, 0)), (Port::B, b), (Port::C, c)]
            }
        }
    }

    /// The edges inside the element. A switch only connects its throat with each leg.
    pub fn edges(&self) -> &'static [(Port, Port)] {
        match self {
            ElementKind::Track => &[(Port::A, Port::B)],
            ElementKind::Switch(_) => &[(Port::A, Port::B), (Port::A, Port::C)],
        }
    }
}

/// A physical piece of track, represented by a small fixed set of vertices.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackElement<Id: ElementId> {
    id: Id,
    kind: ElementKind,
}

impl<Id: ElementId> TrackElement<Id> {
    /// A simple track, consisting of two vertices connected by an edge.
    pub fn track(id: Id) -> Self {
        TrackElement {
            id,
            kind: ElementKind::Track,
        }
    }

    /// A switch, consisting of three vertices of which two are connected to the third one.
    pub fn switch(id: Id, orientation: Orientation) -> Self {
        TrackElement {
            id,
            kind: ElementKind::Switch(orientation),
        }
    }

    pub fn id(&self) -> &Id {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn vertex_name(&self, port: Port) -> String {
        format!("{}_{}", self.id, port)
    }

    pub fn vertex_names(&self) -> Vec<String> {
        self.kind
            .layout()
            .into_iter()
            .map(|(port, _)| self.vertex_name(port))
            .collect()
    }

    /// The vertex layout algorithms place first. By convention the outmost
    /// upper left vertex, called "A".
    pub fn default_vertex_name(&self) -> String {
        self.vertex_name(Port::A)
    }

    /// Builds the private subgraph of this element. It only serves as
    /// scaffold until it is merged into a composite graph.
    ///
    /// ```
    /// use railgraph::network::components::{Orientation, TrackElement};
    ///
    /// let switch = TrackElement::switch(3u32, Orientation::UpperLeft);
    /// let graph = switch.subgraph().unwrap();
    ///
    /// let throat = graph.vertex_named("3_A").unwrap();
    /// assert_eq!(throat.connected_vertices().len(), 2);
    /// assert!(graph.vertex_named("3_B").unwrap().connected_vertices().len() == 1);
    /// ```
    pub fn subgraph(&self) -> Result<Graph<Id>> {
        let mut graph = Graph::new();

        for (port, position) in self.kind.layout() {
            graph.add_vertex(Vertex::new(self.vertex_name(port), self.clone(), position))?;
        }
        for (a, b) in self.kind.edges() {
            let a = graph.vertex_by_name(&self.vertex_name(*a))?;
            let b = graph.vertex_by_name(&self.vertex_name(*b))?;
            graph.add_edge(a, b)?;
        }

        Ok(graph)
    }
}

impl<Id: ElementId> fmt::Display for TrackElement<Id> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
