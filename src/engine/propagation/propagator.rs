use enumset::EnumSet;

use super::LocalId;
use super::PropagationContext;
use super::PropagationContextMut;
use crate::basic_types::PropagationStatus;
use crate::engine::domain_events::DomainEvent;
use crate::engine::variables::VariableId;

/// The verdict of a side-effect-free entailment check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entailment {
    /// The invariant holds under every completion of the current domains.
    True,
    /// The invariant is already violated under the current domains.
    False,
    /// Neither of the above can be concluded yet.
    Undefined,
}

/// A filtering algorithm over a fixed scope of variables.
///
/// Propagators narrow domains through the [`PropagationContextMut`] they are
/// handed, supplying with every narrowing the reason that justifies it. They
/// never fail by panicking: infeasibility is reported through the returned
/// [`PropagationStatus`].
pub trait Propagator {
    fn name(&self) -> &str;

    /// The scheduling priority; lower values are propagated first. Cheap
    /// propagators should use low values so they run before expensive ones.
    fn priority(&self) -> u32 {
        3
    }

    /// The variables this propagator watches, in local-id order.
    fn scope(&self) -> Vec<VariableId>;

    /// The domain events that wake this propagator for the variable at
    /// `local_id` in its scope.
    fn event_mask(&self, local_id: LocalId) -> EnumSet<DomainEvent>;

    /// Re-establish the propagator's invariant from the current domains.
    ///
    /// `events` is the union of events accumulated since the propagator last
    /// ran; a full resynchronisation must be safe on any mask, including the
    /// empty one. Propagation must be monotone and idempotent: re-running at a
    /// fixpoint may not change any domain.
    fn propagate(
        &mut self,
        context: &mut PropagationContextMut<'_>,
        events: EnumSet<DomainEvent>,
    ) -> PropagationStatus;

    /// Delta-driven variant used when the propagator maintains incremental
    /// state. The default falls back to a full [`Self::propagate`].
    fn propagate_incremental(
        &mut self,
        context: &mut PropagationContextMut<'_>,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) -> PropagationStatus {
        let _ = local_id;
        self.propagate(context, events)
    }

    /// Called once when the propagator is registered, before any search.
    fn initialise_at_root(&mut self, context: &mut PropagationContextMut<'_>) -> PropagationStatus {
        self.propagate(context, EnumSet::new())
    }

    /// Side-effect-free entailment check under the current domains.
    fn is_entailed(&self, context: PropagationContext<'_>) -> Entailment {
        let _ = context;
        Entailment::Undefined
    }
}
