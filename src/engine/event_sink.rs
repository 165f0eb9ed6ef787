use enumset::EnumSet;

use super::domain_events::DomainEvent;
use crate::basic_types::KeyedVec;
use crate::engine::variables::VariableId;

/// While a propagator runs, the narrowings it performs are captured as events
/// in the event sink. When the propagator finishes, the sink is drained to
/// notify the propagators that subscribe to those events.
///
/// Duplicate events for the same variable are ignored until the sink is
/// drained.
#[derive(Debug, Default)]
pub(crate) struct EventSink {
    present: KeyedVec<VariableId, EnumSet<DomainEvent>>,
    events: Vec<(DomainEvent, VariableId)>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, event: DomainEvent, variable: VariableId) {
        let present = &mut self.present[variable];

        if present.contains(event) {
            return;
        }

        let _ = present.insert(event);
        self.events.push((event, variable));
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (DomainEvent, VariableId)> + '_ {
        self.events.drain(..).inspect(|&(event, variable)| {
            let _ = self.present[variable].remove(event);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_default_sink_is_empty() {
        let mut sink = EventSink::default();

        let events = sink.drain().collect::<Vec<_>>();
        assert!(events.is_empty());
    }

    #[test]
    fn a_captured_event_is_observed_in_the_drain() {
        let mut sink = EventSink::default();
        sink.grow();
        sink.grow();

        sink.event_occurred(DomainEvent::LowerBound, VariableId::new(0));
        sink.event_occurred(DomainEvent::RemoveArc, VariableId::new(1));

        let events = sink.drain().collect::<Vec<_>>();

        assert_eq!(events.len(), 2);
        assert!(events.contains(&(DomainEvent::LowerBound, VariableId::new(0))));
        assert!(events.contains(&(DomainEvent::RemoveArc, VariableId::new(1))));
    }

    #[test]
    fn after_draining_the_event_sink_is_empty() {
        let mut sink = EventSink::default();
        sink.grow();

        sink.event_occurred(DomainEvent::LowerBound, VariableId::new(0));
        let _ = sink.drain().collect::<Vec<_>>();

        let events = sink.drain().collect::<Vec<_>>();
        assert!(events.is_empty());
    }

    #[test]
    fn duplicate_events_are_ignored() {
        let mut sink = EventSink::default();
        sink.grow();

        sink.event_occurred(DomainEvent::AddToKernel, VariableId::new(0));
        sink.event_occurred(DomainEvent::AddToKernel, VariableId::new(0));

        let events = sink.drain().collect::<Vec<_>>();

        assert_eq!(events.len(), 1);
    }

    #[test]
    fn draining_resets_deduplication() {
        let mut sink = EventSink::default();
        sink.grow();

        sink.event_occurred(DomainEvent::UpperBound, VariableId::new(0));
        let _ = sink.drain().collect::<Vec<_>>();

        sink.event_occurred(DomainEvent::UpperBound, VariableId::new(0));
        let events = sink.drain().collect::<Vec<_>>();

        assert_eq!(events.len(), 1);
    }
}
