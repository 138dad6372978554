//! Routing of domain events to the propagators which watch them.
mod domain_event_notification;

use enumset::EnumSet;
use log::trace;

pub use domain_event_notification::domain_events::DomainEvents;
pub use domain_event_notification::opaque_domain_event::OpaqueDomainEvent;
pub use domain_event_notification::opaque_domain_event::OpaqueDomainEvents;
pub use domain_event_notification::DomainEvent;
pub(crate) use domain_event_notification::EventSink;
pub(crate) use domain_event_notification::WatchListDomainEvents;
pub use domain_event_notification::Watchers;

use crate::basic_types::Cause;
use crate::engine::cp::PropagatorQueue;
use crate::propagation::store::PropagatorStore;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::NotificationContext;
use crate::propagation::PropagatorVarId;
use crate::variables::DomainId;

/// The dependency table `domain -> event -> [(propagator, local id)]` together with the logic to
/// turn the events of accepted reductions into propagator wake-ups.
#[derive(Debug, Default, Clone)]
pub(crate) struct NotificationEngine {
    watch_list_domain_events: WatchListDomainEvents,
    /// Buffer of the watched events per propagator variable for a single reduction.
    affected: Vec<(PropagatorVarId, EnumSet<DomainEvent>)>,
}

impl NotificationEngine {
    pub(crate) fn grow(&mut self) {
        self.watch_list_domain_events.grow();
    }

    pub(crate) fn watch_all(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        propagator_var: PropagatorVarId,
    ) {
        self.watch_list_domain_events
            .watch(domain, events, propagator_var);
    }

    pub(crate) fn num_watches(&self) -> usize {
        self.watch_list_domain_events.num_watches()
    }

    /// Drains the event sink and notifies every active propagator which watches one of the raised
    /// events. The propagators which ask to be enqueued are put on the queue together with the
    /// events they were notified of.
    ///
    /// An idempotent propagator is not notified of the reductions it performed itself.
    pub(crate) fn notify_propagators_about_domain_events(
        &mut self,
        events: &mut EventSink,
        domains: Domains<'_>,
        propagators: &mut PropagatorStore,
        propagator_queue: &mut PropagatorQueue,
    ) {
        for (domain, domain_events, cause) in events.drain() {
            self.collect_affected(domain, domain_events);

            for (propagator_var, watched_events) in self.affected.drain(..) {
                let propagator_id = propagator_var.propagator;

                if !propagators.is_active(propagator_id, domains.environment()) {
                    continue;
                }

                let propagator = &mut propagators[propagator_id];
                if cause == Cause::Propagator(propagator_id) && propagator.is_idempotent() {
                    continue;
                }

                let decision = propagator.notify(
                    NotificationContext::new(domains),
                    propagator_var.variable,
                    OpaqueDomainEvents::from(watched_events),
                );

                if decision == EnqueueDecision::Enqueue {
                    trace!(
                        "{} is enqueued by {watched_events:?} on {domain}",
                        propagator.name()
                    );
                    propagator_queue.record_events(
                        propagator_id,
                        propagator_var.variable,
                        watched_events,
                    );
                    propagator_queue.enqueue_propagator(propagator_id, propagator.priority());
                }
            }
        }
    }

    /// Fills `self.affected` with the subset of `events` each propagator variable watches on
    /// `domain`.
    fn collect_affected(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        self.affected.clear();

        for event in events {
            for &propagator_var in self
                .watch_list_domain_events
                .get_affected_propagators(event, domain)
            {
                match self
                    .affected
                    .iter_mut()
                    .find(|(watcher, _)| *watcher == propagator_var)
                {
                    Some((_, watched_events)) => watched_events.insert_all(EnumSet::only(event)),
                    None => self.affected.push((propagator_var, EnumSet::only(event))),
                }
            }
        }
    }
}
