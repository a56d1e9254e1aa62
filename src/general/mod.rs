use std::fmt::{Debug, Display};
use std::hash::Hash;

pub type DefaultElementId = u32;

/// Identifies a track element inside a network.
///
/// The id is rendered into the names of the element's vertices,
/// so it has to be [`Display`].
pub trait ElementId: Clone + Eq + Hash + Ord + Debug + Display + 'static {}

impl ElementId for u8 {}

impl ElementId for u16 {}

impl ElementId for u32 {}

impl ElementId for u64 {}

impl ElementId for usize {}

impl ElementId for String {}

impl ElementId for &'static str {}
