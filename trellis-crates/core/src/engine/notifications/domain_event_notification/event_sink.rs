use enumset::EnumSet;

use super::DomainEvent;
use crate::basic_types::Cause;
use crate::variables::DomainId;

/// While domains are reduced, the raised events are captured in the event sink. The propagation
/// engine drains the sink to notify the propagators which watch those events.
///
/// Every accepted reduction is one entry, in the order in which the reductions happened.
#[derive(Default, Clone, Debug)]
pub(crate) struct EventSink {
    events: Vec<(DomainId, EnumSet<DomainEvent>, Cause)>,
}

impl EventSink {
    pub(crate) fn event_occurred(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        cause: Cause,
    ) {
        if events.is_empty() {
            return;
        }

        self.events.push((domain, events, cause));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub(crate) fn drain(
        &mut self,
    ) -> impl Iterator<Item = (DomainId, EnumSet<DomainEvent>, Cause)> + '_ {
        self.events.drain(..)
    }
}
