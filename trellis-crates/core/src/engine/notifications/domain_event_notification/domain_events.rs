use enumset::enum_set;
use enumset::EnumSet;

use super::DomainEvent;

/// The set of [`DomainEvent`]s a propagator subscribes to for one of its variables.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Lower and upper bound tightening (but not other value removal).
    pub const BOUNDS: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::LowerBound | DomainEvent::UpperBound));
    /// Every change to an integer domain.
    pub const ANY_INT: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Assign
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));
    /// Lower bound tightening only.
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::LowerBound));
    /// Upper bound tightening only.
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::UpperBound));
    /// The domain collapsing to a single value.
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Assign));
    /// The domain collapsing to a single value, or any of its bounds moving.
    pub const ASSIGN_AND_BOUNDS: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Assign | DomainEvent::LowerBound | DomainEvent::UpperBound
    ));
    pub const ASSIGN_AND_REMOVAL: DomainEvents =
        DomainEvents::new(enum_set!(DomainEvent::Assign | DomainEvent::Removal));
}

impl DomainEvents {
    pub const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }

    pub fn union(self, other: DomainEvents) -> DomainEvents {
        DomainEvents {
            events: self.events | other.events,
        }
    }
}

impl From<EnumSet<DomainEvent>> for DomainEvents {
    fn from(events: EnumSet<DomainEvent>) -> Self {
        DomainEvents::new(events)
    }
}
