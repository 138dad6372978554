use enumset::EnumSet;

use super::DomainEvent;
#[cfg(doc)]
use crate::engine::variables::EventPublisher;

/// A [`DomainEvent`] as it happened on an underlying domain.
///
/// Obtain the event from the perspective of a variable through [`EventPublisher::unpack_event`].
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct OpaqueDomainEvent(DomainEvent);

impl From<DomainEvent> for OpaqueDomainEvent {
    fn from(event: DomainEvent) -> Self {
        OpaqueDomainEvent(event)
    }
}

impl OpaqueDomainEvent {
    pub(crate) fn unwrap(self) -> DomainEvent {
        self.0
    }
}

/// The [`DomainEvent`]s that happened on an underlying domain and which a propagator watches.
///
/// Obtain the events from the perspective of a variable through [`EventPublisher::unpack_events`].
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct OpaqueDomainEvents(EnumSet<DomainEvent>);

impl From<EnumSet<DomainEvent>> for OpaqueDomainEvents {
    fn from(events: EnumSet<DomainEvent>) -> Self {
        OpaqueDomainEvents(events)
    }
}

impl OpaqueDomainEvents {
    pub(crate) fn unwrap(self) -> EnumSet<DomainEvent> {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the individual events.
    pub fn iter(self) -> impl Iterator<Item = OpaqueDomainEvent> {
        self.0.iter().map(OpaqueDomainEvent)
    }
}
