use std::fmt::Display;

use enumset::EnumSet;

use crate::basic_types::Cause;
use crate::engine::notifications::DomainEvent;
use crate::engine::DomainMutation;
use crate::propagation::PropagatorId;
use crate::variables::DomainId;

/// The part of a domain which a deduction refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableState {
    /// The whole domain.
    Domain,
    /// The bounds of the domain.
    Bound,
    /// The values of the domain, i.e. its holes and whether it is fixed.
    Value,
}

impl VariableState {
    /// The part of a domain which is changed by a reduction raising `event`.
    pub fn of_event(event: DomainEvent) -> Self {
        match event {
            DomainEvent::LowerBound | DomainEvent::UpperBound => VariableState::Bound,
            DomainEvent::Assign | DomainEvent::Removal => VariableState::Value,
        }
    }

    /// Whether a reduction which raised `events` changed this part of a domain.
    pub fn is_affected_by(self, events: EnumSet<DomainEvent>) -> bool {
        match self {
            VariableState::Domain => !events.is_empty(),
            VariableState::Bound => !events
                .intersection(DomainEvent::LowerBound | DomainEvent::UpperBound | DomainEvent::Assign)
                .is_empty(),
            VariableState::Value => !events
                .intersection(DomainEvent::Removal | DomainEvent::Assign)
                .is_empty(),
        }
    }
}

/// A statement about the current state of part of a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Deduction {
    pub domain: DomainId,
    pub state: VariableState,
}

impl Deduction {
    pub fn new(domain: DomainId, state: VariableState) -> Self {
        Deduction { domain, state }
    }
}

impl Display for Deduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state {
            VariableState::Domain => write!(f, "dom({})", self.domain),
            VariableState::Bound => write!(f, "bounds({})", self.domain),
            VariableState::Value => write!(f, "values({})", self.domain),
        }
    }
}

/// Why a reduction happened: the propagators involved, and the deductions they relied on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Explanation {
    propagators: Vec<PropagatorId>,
    deductions: Vec<Deduction>,
}

impl Explanation {
    pub fn new() -> Self {
        Explanation::default()
    }

    /// An explanation which relies on the given deductions only.
    pub fn from_deductions(deductions: impl IntoIterator<Item = Deduction>) -> Self {
        Explanation {
            propagators: Vec::new(),
            deductions: deductions.into_iter().collect(),
        }
    }

    pub fn add_propagator(&mut self, propagator: PropagatorId) {
        if !self.propagators.contains(&propagator) {
            self.propagators.push(propagator);
        }
    }

    pub fn add_deduction(&mut self, deduction: Deduction) {
        if !self.deductions.contains(&deduction) {
            self.deductions.push(deduction);
        }
    }

    pub fn propagators(&self) -> &[PropagatorId] {
        &self.propagators
    }

    pub fn deductions(&self) -> &[Deduction] {
        &self.deductions
    }

    pub fn is_empty(&self) -> bool {
        self.propagators.is_empty() && self.deductions.is_empty()
    }
}

/// The record of one accepted domain reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reduction {
    deduction: Deduction,
    cause: Cause,
    mutation: DomainMutation,
    events: EnumSet<DomainEvent>,
}

impl Reduction {
    pub(crate) fn new(
        domain: DomainId,
        mutation: DomainMutation,
        cause: Cause,
        events: EnumSet<DomainEvent>,
    ) -> Self {
        Reduction {
            deduction: Deduction::new(domain, mutation.variable_state()),
            cause,
            mutation,
            events,
        }
    }

    /// The domain which was reduced, and the part of it which changed.
    pub fn deduction(&self) -> Deduction {
        self.deduction
    }

    pub fn domain(&self) -> DomainId {
        self.deduction.domain
    }

    pub fn cause(&self) -> Cause {
        self.cause
    }

    pub fn mutation(&self) -> DomainMutation {
        self.mutation
    }

    /// The events the reduction raised.
    pub fn events(&self) -> EnumSet<DomainEvent> {
        self.events
    }

    pub fn is_decision(&self) -> bool {
        self.cause == Cause::Decision
    }

    /// Whether this reduction changed the part of the domain `deduction` refers to.
    pub fn supports(&self, deduction: &Deduction) -> bool {
        self.deduction.domain == deduction.domain && deduction.state.is_affected_by(self.events)
    }
}

impl Display for Reduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} on {} raising {:?}",
            self.cause,
            self.mutation,
            self.deduction.domain,
            self.events
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn deductions_match_the_events_of_their_state() {
        let domain = DomainId::create_from_index(0);
        let reduction = Reduction::new(
            domain,
            DomainMutation::RemoveValue(4),
            Cause::Decision,
            EnumSet::only(DomainEvent::Removal),
        );

        assert!(reduction.supports(&Deduction::new(domain, VariableState::Domain)));
        assert!(reduction.supports(&Deduction::new(domain, VariableState::Value)));
        assert!(!reduction.supports(&Deduction::new(domain, VariableState::Bound)));
        assert!(!reduction.supports(&Deduction::new(
            DomainId::create_from_index(1),
            VariableState::Domain
        )));
    }

    #[test]
    fn an_assignment_changes_both_bounds_and_values() {
        let events = DomainEvent::Assign | DomainEvent::LowerBound;

        assert!(VariableState::Bound.is_affected_by(events));
        assert!(VariableState::Value.is_affected_by(events));
        assert!(!VariableState::Value.is_affected_by(EnumSet::only(DomainEvent::UpperBound)));
    }

    #[test]
    fn explanations_do_not_hold_duplicates() {
        let domain = DomainId::create_from_index(3);
        let mut explanation = Explanation::new();

        explanation.add_deduction(Deduction::new(domain, VariableState::Bound));
        explanation.add_deduction(Deduction::new(domain, VariableState::Bound));
        explanation.add_propagator(PropagatorId::create_from_index(1));
        explanation.add_propagator(PropagatorId::create_from_index(1));

        assert_eq!(explanation.deductions().len(), 1);
        assert_eq!(explanation.propagators().len(), 1);
    }
}
