use std::fmt::Display;
use std::fmt::Formatter;

/// A propagator-local index of a variable in the propagator's scope.
///
/// The i-th variable returned by [`Propagator::scope`] has local id i; the
/// watch list reports events back under this id so the propagator does not
/// have to search its scope.
///
/// [`Propagator::scope`]: super::Propagator::scope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(value: u32) -> Self {
        LocalId(value)
    }

    pub fn unpack(self) -> u32 {
        self.0
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
