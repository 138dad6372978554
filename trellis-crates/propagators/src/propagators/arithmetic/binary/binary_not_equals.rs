use enumset::EnumSet;
use trellis_core::explanations::Deduction;
use trellis_core::explanations::Explanation;
use trellis_core::explanations::VariableState;
use trellis_core::propagation::DomainEvent;
use trellis_core::propagation::DomainEvents;
use trellis_core::propagation::Domains;
use trellis_core::propagation::LocalId;
use trellis_core::propagation::OpaqueDomainEvents;
use trellis_core::propagation::Priority;
use trellis_core::propagation::PropagationContext;
use trellis_core::propagation::Propagator;
use trellis_core::propagation::PropagatorConstructor;
use trellis_core::propagation::PropagatorConstructorContext;
use trellis_core::propagation::ReadDomains;
use trellis_core::variables::IntegerVariable;
use trellis_core::Entailment;
use trellis_core::PropagationStatus;

const A_ID: LocalId = LocalId::from(0);
const B_ID: LocalId = LocalId::from(1);

/// The [`PropagatorConstructor`] for the [`BinaryNotEqualsPropagator`].
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagatorArgs<AVar, BVar> {
    pub a: AVar,
    pub b: BVar,
}

impl<AVar, BVar> PropagatorConstructor for BinaryNotEqualsPropagatorArgs<AVar, BVar>
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    type PropagatorImpl = BinaryNotEqualsPropagator<AVar, BVar>;

    fn create(self, mut context: PropagatorConstructorContext<'_>) -> Self::PropagatorImpl {
        let BinaryNotEqualsPropagatorArgs { a, b } = self;

        context.register(a.clone(), A_ID);
        context.register(b.clone(), B_ID);

        BinaryNotEqualsPropagator { a, b }
    }
}

/// Propagator for the constraint `a != b`.
///
/// Once one of the variables is fixed, its value is removed from the other. The propagator becomes
/// passive as soon as the bounds of the two variables no longer overlap.
#[derive(Clone, Debug)]
pub struct BinaryNotEqualsPropagator<AVar, BVar> {
    a: AVar,
    b: BVar,
}

impl<AVar, BVar> BinaryNotEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable,
    BVar: IntegerVariable,
{
    fn are_disjoint(&self, domains: Domains<'_>) -> bool {
        domains.upper_bound(&self.a) < domains.lower_bound(&self.b)
            || domains.upper_bound(&self.b) < domains.lower_bound(&self.a)
    }

    fn set_passive_if_disjoint(&self, context: &mut PropagationContext<'_>) {
        if self.are_disjoint(context.domains()) {
            context.set_passive();
        }
    }

    fn unpack_events(&self, local_id: LocalId, events: OpaqueDomainEvents) -> EnumSet<DomainEvent> {
        if local_id == A_ID {
            self.a.unpack_events(events)
        } else {
            self.b.unpack_events(events)
        }
    }
}

/// Removes the value of `fixed` from the domain of `other`, if `fixed` is fixed.
fn remove_fixed_value<Fixed: IntegerVariable, Other: IntegerVariable>(
    context: &mut PropagationContext<'_>,
    fixed: &Fixed,
    other: &Other,
) -> PropagationStatus {
    if let Some(value) = context.fixed_value(fixed) {
        let _ = context.remove_value(other, value)?;
    }

    Ok(())
}

impl<AVar, BVar> Propagator for BinaryNotEqualsPropagator<AVar, BVar>
where
    AVar: IntegerVariable + 'static,
    BVar: IntegerVariable + 'static,
{
    fn name(&self) -> &str {
        "BinaryNotEq"
    }

    fn priority(&self) -> Priority {
        Priority::Binary
    }

    fn propagation_conditions(&self, domains: Domains<'_>, local_id: LocalId) -> DomainEvents {
        let has_enumerated_domain = if local_id == A_ID {
            domains.has_enumerated_domain(&self.a)
        } else {
            domains.has_enumerated_domain(&self.b)
        };

        // A bounded domain only loses the value of the other variable once one of its bounds
        // reaches that value.
        if has_enumerated_domain {
            DomainEvents::ASSIGN
        } else {
            DomainEvents::ASSIGN_AND_BOUNDS
        }
    }

    fn propagate(&mut self, mut context: PropagationContext<'_>) -> PropagationStatus {
        remove_fixed_value(&mut context, &self.a, &self.b)?;
        remove_fixed_value(&mut context, &self.b, &self.a)?;

        self.set_passive_if_disjoint(&mut context);

        Ok(())
    }

    fn propagate_event(
        &mut self,
        mut context: PropagationContext<'_>,
        local_id: LocalId,
        events: OpaqueDomainEvents,
    ) -> PropagationStatus {
        if !self
            .unpack_events(local_id, events)
            .contains(DomainEvent::Assign)
        {
            // e.g. a = 3 with b in [1, 4] (bounded) leaves b untouched; once the upper bound of b
            // drops to 3, the value can be removed.
            return self.propagate(context);
        }

        if local_id == A_ID {
            remove_fixed_value(&mut context, &self.a, &self.b)?;
        } else {
            remove_fixed_value(&mut context, &self.b, &self.a)?;
        }

        self.set_passive_if_disjoint(&mut context);

        Ok(())
    }

    fn is_entailed(&self, domains: Domains<'_>) -> Entailment {
        if self.are_disjoint(domains) {
            return Entailment::True;
        }

        match (domains.fixed_value(&self.a), domains.fixed_value(&self.b)) {
            (Some(a), Some(b)) if a == b => Entailment::False,
            _ => Entailment::Undefined,
        }
    }

    fn explain(&self, deduction: &Deduction, _domains: Domains<'_>) -> Explanation {
        // A deduction on one of the variables only depends on the other one.
        let cause = if deduction.domain == self.a.underlying_domain() {
            self.b.explain(VariableState::Domain)
        } else {
            self.a.explain(VariableState::Domain)
        };

        Explanation::from_deductions([cause])
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::state::State;
    use trellis_core::variables::TransformableVariable;
    use trellis_core::ConstraintOperationError;

    use super::*;

    #[test]
    fn detects_conflict() {
        let mut state = State::default();
        let a = state.new_interval_variable(0, 0, None);
        let b = state.new_interval_variable(0, 0, None);

        let result = state.add_propagator(BinaryNotEqualsPropagatorArgs { a, b });

        let Err(ConstraintOperationError::InfeasiblePropagator(contradiction)) = result else {
            panic!("expected the conflict to be detected");
        };
        assert_eq!(contradiction.domain, Some(b));
    }

    #[test]
    fn propagate_when_one_is_fixed() {
        let mut state = State::default();
        let a = state.new_interval_variable(0, 0, None);
        let b = state.new_interval_variable(0, 1, None);

        let _ = state
            .add_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("Expected no conflict to be detected");

        assert_eq!(state.fixed_value(b), Some(1));
    }

    #[test]
    fn bounded_domains_are_pruned_once_a_bound_reaches_the_value() {
        let mut state = State::default();
        let a = state.new_interval_variable(1, 4, None);
        let b = state.new_interval_variable(1, 4, None);

        let handle = state
            .add_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("Expected no conflict to be detected");

        state.push();
        let _ = state.instantiate_to(a, 3).expect("3 is in the domain");
        state
            .propagate_to_fixed_point()
            .expect("Expected no conflict to be detected");
        assert_eq!((state.lower_bound(b), state.upper_bound(b)), (1, 4));

        let _ = state.update_upper_bound(b, 3).expect("non-empty domain");
        state
            .propagate_to_fixed_point()
            .expect("Expected no conflict to be detected");
        assert_eq!((state.lower_bound(b), state.upper_bound(b)), (1, 2));
        assert!(!state.is_propagator_active(handle));
    }

    #[test]
    fn non_overlapping_is_ok() {
        let mut state = State::default();
        let a = state.new_interval_variable(0, 5, None);
        let b = state.new_interval_variable(6, 10, None);

        let handle = state
            .add_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("Expected no conflict to be detected");

        assert_eq!((state.lower_bound(a), state.upper_bound(a)), (0, 5));
        assert_eq!((state.lower_bound(b), state.upper_bound(b)), (6, 10));
        assert!(!state.is_propagator_active(handle));
    }

    #[test]
    fn conditions_depend_on_the_domain_representation() {
        let mut state = State::default();
        let a = state.new_enumerated_variable(0, 5, None);
        let b = state.new_interval_variable(0, 5, None);

        let handle = state
            .add_propagator(BinaryNotEqualsPropagatorArgs { a, b })
            .expect("Expected no conflict to be detected");
        let propagator = state.get_propagator(handle).expect("the handle is valid");

        assert_eq!(
            propagator.propagation_conditions(state.domains(), A_ID),
            DomainEvents::ASSIGN
        );
        assert_eq!(
            propagator.propagation_conditions(state.domains(), B_ID),
            DomainEvents::ASSIGN_AND_BOUNDS
        );
    }

    #[test]
    fn explanations_refer_to_the_other_variable() {
        let mut state = State::default();
        let a = state.new_enumerated_variable(0, 5, None);
        let b = state.new_enumerated_variable(0, 5, None);
        let view = b.scaled(2);

        let handle = state
            .add_propagator(BinaryNotEqualsPropagatorArgs { a, b: view })
            .expect("Expected no conflict to be detected");
        let propagator = state.get_propagator(handle).expect("the handle is valid");

        assert_eq!(
            propagator
                .explain(&Deduction::new(a, VariableState::Value), state.domains())
                .deductions(),
            &[Deduction::new(b, VariableState::Domain)]
        );
        assert_eq!(
            propagator
                .explain(&Deduction::new(b, VariableState::Bound), state.domains())
                .deductions(),
            &[Deduction::new(a, VariableState::Domain)]
        );
    }
}
