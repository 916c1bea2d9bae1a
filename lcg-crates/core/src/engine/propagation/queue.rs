use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use super::Priority;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::lcg_assert_moderate;

/// Propagators waiting to run: FIFO within a priority, higher priorities first. A propagator is
/// in the queue at most once.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    in_queue: KeyedVec<PropagatorId, bool>,
    /// The priorities with a non-empty queue.
    present: BinaryHeap<Reverse<u8>>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue {
            queues: vec![VecDeque::new(); Priority::COUNT],
            in_queue: KeyedVec::default(),
            present: BinaryHeap::new(),
        }
    }
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.present.is_empty()
    }

    pub(crate) fn is_enqueued(&self, propagator: PropagatorId) -> bool {
        self.in_queue.get(propagator).copied().unwrap_or_default()
    }

    pub(crate) fn enqueue(&mut self, propagator: PropagatorId, priority: Priority) {
        if self.is_enqueued(propagator) {
            return;
        }

        self.in_queue.accommodate(propagator, false);
        self.in_queue[propagator] = true;

        let queue = &mut self.queues[priority as usize];
        if queue.is_empty() {
            self.present.push(Reverse(priority as u8));
        }
        queue.push_back(propagator);
    }

    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let Reverse(priority) = *self.present.peek()?;
        let queue = &mut self.queues[priority as usize];
        lcg_assert_moderate!(!queue.is_empty());

        let propagator = queue.pop_front()?;
        if queue.is_empty() {
            let _ = self.present.pop();
        }
        self.in_queue[propagator] = false;
        Some(propagator)
    }

    pub(crate) fn clear(&mut self) {
        while let Some(Reverse(priority)) = self.present.pop() {
            for propagator in self.queues[priority as usize].drain(..) {
                self.in_queue[propagator] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue(PropagatorId(1), Priority::High);
        queue.enqueue(PropagatorId(0), Priority::Medium);
        queue.enqueue(PropagatorId(3), Priority::VeryLow);
        queue.enqueue(PropagatorId(4), Priority::Low);
        queue.enqueue(PropagatorId(2), Priority::High);

        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn a_propagator_is_queued_once() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue(PropagatorId(0), Priority::Low);
        queue.enqueue(PropagatorId(0), Priority::Low);

        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert!(queue.is_empty());
        assert!(!queue.is_enqueued(PropagatorId(0)));
    }

    #[test]
    fn clearing_resets_the_flags() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue(PropagatorId(0), Priority::Low);
        queue.enqueue(PropagatorId(1), Priority::High);

        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(None, queue.pop());
        assert!(!queue.is_enqueued(PropagatorId(1)));
        queue.enqueue(PropagatorId(1), Priority::High);
        assert_eq!(Some(PropagatorId(1)), queue.pop());
    }
}
