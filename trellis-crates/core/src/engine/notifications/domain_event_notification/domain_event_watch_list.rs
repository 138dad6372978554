use std::fmt::Display;

use enumset::EnumSet;
use enumset::EnumSetType;

use crate::containers::KeyedVec;
use crate::engine::notifications::NotificationEngine;
use crate::propagation::PropagatorVarId;
use crate::variables::DomainId;

/// For every domain, the propagator variables which watch each kind of event.
///
/// The lists are kept in subscription order so that notification is deterministic.
#[derive(Default, Debug, Clone)]
pub(crate) struct WatchListDomainEvents {
    watchers: KeyedVec<DomainId, Watcher>,
}

/// Used to register a propagator for notifications about events to a particular variable.
#[derive(Debug)]
pub struct Watchers<'a> {
    propagator_var: PropagatorVarId,
    notification_engine: &'a mut NotificationEngine,
}

/// A description of the kinds of events that can happen on a domain variable.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// Event where an (integer) variable domain collapses to a single value.
    Assign,
    /// Event where an (integer) variable domain tightens the lower bound.
    LowerBound,
    /// Event where an (integer) variable domain tightens the upper bound.
    UpperBound,
    /// Event where a value is removed from an (integer) variable domain through a value removal.
    Removal,
}

impl Display for DomainEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainEvent::Assign => write!(f, "[Event:Assign]"),
            DomainEvent::LowerBound => write!(f, "[Event:LB]"),
            DomainEvent::UpperBound => write!(f, "[Event:UB]"),
            DomainEvent::Removal => write!(f, "[Event:Remove]"),
        }
    }
}

impl WatchListDomainEvents {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(Watcher::default());
    }

    pub(crate) fn get_affected_propagators(
        &self,
        event: DomainEvent,
        domain: DomainId,
    ) -> &[PropagatorVarId] {
        let watcher = &self.watchers[domain];

        match event {
            DomainEvent::Assign => &watcher.assign_watchers,
            DomainEvent::LowerBound => &watcher.lower_bound_watchers,
            DomainEvent::UpperBound => &watcher.upper_bound_watchers,
            DomainEvent::Removal => &watcher.removal_watchers,
        }
    }

    pub(crate) fn watch(
        &mut self,
        domain: DomainId,
        events: EnumSet<DomainEvent>,
        propagator_var: PropagatorVarId,
    ) {
        let watcher = &mut self.watchers[domain];

        for event in events {
            let event_watchers = match event {
                DomainEvent::LowerBound => &mut watcher.lower_bound_watchers,
                DomainEvent::UpperBound => &mut watcher.upper_bound_watchers,
                DomainEvent::Assign => &mut watcher.assign_watchers,
                DomainEvent::Removal => &mut watcher.removal_watchers,
            };

            if !event_watchers.contains(&propagator_var) {
                event_watchers.push(propagator_var);
            }
        }
    }

    pub(crate) fn num_watches(&self) -> usize {
        self.watchers
            .iter()
            .map(|watcher| {
                watcher.lower_bound_watchers.len()
                    + watcher.upper_bound_watchers.len()
                    + watcher.assign_watchers.len()
                    + watcher.removal_watchers.len()
            })
            .sum()
    }
}

impl<'a> Watchers<'a> {
    pub(crate) fn new(
        propagator_var: PropagatorVarId,
        notification_engine: &'a mut NotificationEngine,
    ) -> Self {
        Watchers {
            propagator_var,
            notification_engine,
        }
    }

    /// Watch the given events on `domain`.
    pub fn watch_all(&mut self, domain: DomainId, events: EnumSet<DomainEvent>) {
        self.notification_engine
            .watch_all(domain, events, self.propagator_var);
    }
}

#[derive(Debug, Default, Clone)]
struct Watcher {
    lower_bound_watchers: Vec<PropagatorVarId>,
    upper_bound_watchers: Vec<PropagatorVarId>,
    assign_watchers: Vec<PropagatorVarId>,
    removal_watchers: Vec<PropagatorVarId>,
}
