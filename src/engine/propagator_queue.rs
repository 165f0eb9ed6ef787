use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use fnv::FnvHashSet;

use crate::engine::propagation::PropagatorId;
use crate::quince_asserts::quince_assert_moderate;

/// The pending set of the scheduler: propagator ids bucketed by priority,
/// FIFO within a bucket, lowest priority value served first.
#[derive(Debug)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    present_propagators: FnvHashSet<PropagatorId>,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl PropagatorQueue {
    pub(crate) fn new(num_priority_levels: u32) -> PropagatorQueue {
        PropagatorQueue {
            queues: vec![VecDeque::new(); num_priority_levels as usize],
            present_propagators: FnvHashSet::default(),
            present_priorities: BinaryHeap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.present_propagators.is_empty()
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: u32) {
        quince_assert_moderate!((priority as usize) < self.queues.len());

        if self.present_propagators.contains(&propagator_id) {
            return;
        }

        if self.queues[priority as usize].is_empty() {
            self.present_priorities.push(Reverse(priority));
        }
        self.queues[priority as usize].push_back(propagator_id);
        let _ = self.present_propagators.insert(propagator_id);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        quince_assert_moderate!(!self.queues[top_priority].is_empty());

        let next_propagator_id = self.queues[top_priority].pop_front()?;
        let _ = self.present_propagators.remove(&next_propagator_id);

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        Some(next_propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        for queue in self.queues.iter_mut() {
            queue.clear();
        }
        self.present_propagators.clear();
        self.present_priorities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_priority_values_are_served_first() {
        let mut queue = PropagatorQueue::new(4);

        queue.enqueue_propagator(PropagatorId(0), 3);
        queue.enqueue_propagator(PropagatorId(1), 0);
        queue.enqueue_propagator(PropagatorId(2), 1);

        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn enqueueing_an_enqueued_propagator_is_a_no_op() {
        let mut queue = PropagatorQueue::new(4);

        queue.enqueue_propagator(PropagatorId(0), 2);
        queue.enqueue_propagator(PropagatorId(0), 2);

        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert!(queue.is_empty());
    }

    #[test]
    fn clearing_empties_the_queue() {
        let mut queue = PropagatorQueue::new(4);

        queue.enqueue_propagator(PropagatorId(0), 1);
        queue.enqueue_propagator(PropagatorId(1), 3);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(None, queue.pop());
    }
}
