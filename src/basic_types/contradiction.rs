use crate::engine::explanation::Explanation;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::VariableId;

/// Raised by a domain operation that would leave the domain empty.
///
/// The operation stores the conflict explanation with the domain store before
/// returning this marker; the scheduler turns it into a [`Contradiction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

/// A conflict raised by a propagator itself, without any domain emptying, when
/// it detects that its invariant cannot be satisfied under the current domains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    pub variable: Option<VariableId>,
    pub explanation: Explanation,
}

/// The two ways a propagation step can fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    EmptyDomain,
    Conflict(Conflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

/// The result of invoking a propagator. `Ok(())` means the propagator reached
/// a local fixpoint without detecting infeasibility.
pub type PropagationStatus = Result<(), Inconsistency>;

/// A failure of the current search node, handed to conflict-based backjumping.
///
/// Carries the offending propagator and variable when known, and the
/// (unflattened) explanation of the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contradiction {
    pub propagator: Option<PropagatorId>,
    pub variable: Option<VariableId>,
    pub explanation: Explanation,
}
