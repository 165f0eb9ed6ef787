use enumset::EnumSet;

use super::domain_events::DomainEvent;
use crate::basic_types::KeyedVec;
use crate::engine::propagation::LocalId;
use crate::engine::propagation::Propagator;
use crate::engine::propagation::PropagatorId;
use crate::engine::variables::VariableId;

/// One subscription of a propagator to the events of a variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Watcher {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
    pub(crate) events: EnumSet<DomainEvent>,
}

/// Per-variable lists of the propagators to wake when a domain event fires.
#[derive(Debug, Default)]
pub(crate) struct WatchList {
    watchers: KeyedVec<VariableId, Vec<Watcher>>,
}

impl WatchList {
    /// One slot per variable; called when a variable is created.
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Vec::new());
    }

    /// Subscribe `propagator` to its scope, one watcher per scope variable,
    /// with the event mask the propagator reports for that position.
    pub(crate) fn add_watches(&mut self, id: PropagatorId, propagator: &dyn Propagator) {
        for (position, variable) in propagator.scope().into_iter().enumerate() {
            let local_id = LocalId::from(position as u32);
            let events = propagator.event_mask(local_id);
            if events.is_empty() {
                continue;
            }

            self.watchers[variable].push(Watcher {
                propagator: id,
                local_id,
                events,
            });
        }
    }

    pub(crate) fn watchers_for(
        &self,
        variable: VariableId,
        event: DomainEvent,
    ) -> impl Iterator<Item = &Watcher> {
        self.watchers[variable]
            .iter()
            .filter(move |watcher| watcher.events.contains(event))
    }
}
