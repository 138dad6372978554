use std::cmp::Reverse;
use std::collections::BinaryHeap;

use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::notifications::DomainEvent;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagatorId;
use crate::trellis_assert_moderate;

/// The propagators waiting to be called, ordered by [`Priority`] and then by id.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<BinaryHeap<Reverse<PropagatorId>>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    pending: KeyedVec<PropagatorId, PendingEvents>,
    num_enqueued: usize,
    present_priorities: BinaryHeap<Reverse<usize>>,
}

/// What an enqueued propagator has to react to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PendingEvents {
    /// Set when the propagator was scheduled without specific events and has to propagate fully.
    pub(crate) full: bool,
    /// The events per variable, in the order in which the variables were first notified.
    pub(crate) events: Vec<(LocalId, EnumSet<DomainEvent>)>,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue {
            queues: vec![BinaryHeap::new(); Priority::COUNT],
            is_enqueued: KeyedVec::default(),
            pending: KeyedVec::default(),
            num_enqueued: 0,
            present_priorities: BinaryHeap::new(),
        }
    }
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.num_enqueued
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        trellis_assert_moderate!(priority.index() < self.queues.len());

        if !self.is_propagator_enqueued(propagator_id) {
            self.is_enqueued.accommodate(propagator_id, false);
            self.is_enqueued[propagator_id] = true;
            self.num_enqueued += 1;

            if self.queues[priority.index()].is_empty() {
                self.present_priorities.push(Reverse(priority.index()));
            }
            self.queues[priority.index()].push(Reverse(propagator_id));
        }
    }

    /// Enqueues the propagator for full propagation.
    pub(crate) fn enqueue_full(&mut self, propagator_id: PropagatorId, priority: Priority) {
        self.pending.accommodate(propagator_id, PendingEvents::default());
        self.pending[propagator_id].full = true;
        self.enqueue_propagator(propagator_id, priority);
    }

    /// Adds `events` on the variable `local_id` to the pending events of the propagator.
    pub(crate) fn record_events(
        &mut self,
        propagator_id: PropagatorId,
        local_id: LocalId,
        events: EnumSet<DomainEvent>,
    ) {
        self.pending.accommodate(propagator_id, PendingEvents::default());
        let pending = &mut self.pending[propagator_id].events;

        match pending.iter_mut().find(|(variable, _)| *variable == local_id) {
            Some((_, pending_events)) => pending_events.insert_all(events),
            None => pending.push((local_id, events)),
        }
    }

    /// Removes the next propagator from the queue, together with the events it has to react to.
    pub(crate) fn pop(&mut self) -> Option<(PropagatorId, PendingEvents)> {
        let Reverse(top_priority) = *self.present_priorities.peek()?;
        trellis_assert_moderate!(!self.queues[top_priority].is_empty());

        let Reverse(next_propagator_id) = self.queues[top_priority].pop()?;
        self.is_enqueued[next_propagator_id] = false;
        self.num_enqueued -= 1;

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        let pending = self
            .pending
            .get_mut(next_propagator_id)
            .map(std::mem::take)
            .unwrap_or_default();

        Some((next_propagator_id, pending))
    }

    pub(crate) fn clear(&mut self) {
        while self.pop().is_some() {}

        trellis_assert_moderate!(self.is_empty());
        trellis_assert_moderate!(self.present_priorities.is_empty());
    }

    fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    fn id(index: usize) -> PropagatorId {
        PropagatorId::create_from_index(index)
    }

    #[test]
    fn cheaper_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(id(0), Priority::VerySlow);
        queue.enqueue_propagator(id(1), Priority::Binary);
        queue.enqueue_propagator(id(2), Priority::Unary);

        let order = std::iter::from_fn(|| queue.pop())
            .map(|(propagator_id, _)| propagator_id)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![id(2), id(1), id(0)]);
    }

    #[test]
    fn ties_are_broken_by_propagator_id() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(id(3), Priority::Binary);
        queue.enqueue_propagator(id(1), Priority::Binary);
        queue.enqueue_propagator(id(2), Priority::Binary);

        let order = std::iter::from_fn(|| queue.pop())
            .map(|(propagator_id, _)| propagator_id)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn a_propagator_is_enqueued_once_with_merged_events() {
        let mut queue = PropagatorQueue::default();
        let x = LocalId::from(0);
        let y = LocalId::from(1);

        queue.record_events(id(0), x, EnumSet::only(DomainEvent::LowerBound));
        queue.enqueue_propagator(id(0), Priority::Binary);
        queue.record_events(id(0), y, EnumSet::only(DomainEvent::Assign));
        queue.enqueue_propagator(id(0), Priority::Binary);
        queue.record_events(id(0), x, EnumSet::only(DomainEvent::UpperBound));
        queue.enqueue_propagator(id(0), Priority::Binary);

        assert_eq!(queue.len(), 1);

        let (_, pending) = queue.pop().expect("a propagator was enqueued");
        assert_eq!(
            pending,
            PendingEvents {
                full: false,
                events: vec![
                    (x, DomainEvent::LowerBound | DomainEvent::UpperBound),
                    (y, EnumSet::only(DomainEvent::Assign)),
                ],
            }
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn clearing_drops_the_pending_events() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_full(id(0), Priority::Unary);
        queue.record_events(id(1), LocalId::from(0), EnumSet::only(DomainEvent::Removal));
        queue.enqueue_propagator(id(1), Priority::Unary);
        queue.clear();

        assert!(queue.is_empty());

        queue.enqueue_propagator(id(1), Priority::Unary);
        let (_, pending) = queue.pop().expect("a propagator was enqueued");
        assert_eq!(pending, PendingEvents::default());
    }
}
