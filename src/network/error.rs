use thiserror::Error;

use crate::network::vertex::VertexIndex;

/// Everything that can go wrong while building or querying a [`Graph`](super::graph::Graph).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("vertex {name} is already part of the graph")]
    DuplicateVertex { name: String },

    #[error("vertex {index} is not part of the graph")]
    UnknownVertex { index: VertexIndex },

    #[error("vertex {name} is already a double vertex")]
    AlreadyPaired { name: String },

    #[error("vertex {name} can not be paired with itself")]
    SelfPairing { name: String },

    #[error("no vertex or element registered as {key}")]
    NotFound { key: String },

    #[error("graph still contains {unpaired} single vertices")]
    NotFinalized { unpaired: usize },

    #[error("unknown switch orientation {code:?}, expected one of ul, ur, ll, lr")]
    InvalidOrientation { code: String },
}

pub type Result<T> = std::result::Result<T, GraphError>;
