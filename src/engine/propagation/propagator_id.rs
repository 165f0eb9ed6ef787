use std::fmt::Display;
use std::fmt::Formatter;

use crate::basic_types::StorageKey;

/// An identifier assigned to a propagator when it is registered with the
/// solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropagatorId(pub(crate) u32);

impl StorageKey for PropagatorId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        PropagatorId(index as u32)
    }
}

impl Display for PropagatorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}
