#![cfg(test)]

mod helpers;

use helpers::bounds;
use helpers::checked_state;
use helpers::values;
use trellis_core::containers::ElementSet;
use trellis_core::explanations::Deduction;
use trellis_core::explanations::VariableState;
use trellis_core::state::State;
use trellis_core::variables::TransformableVariable;
use trellis_core::Cause;
use trellis_core::ConstraintOperationError;
use trellis_core::DomainMutation;
use trellis_core::Entailment;
use trellis_propagators::BinaryNotEqualsPropagatorArgs;

#[test]
fn entailment_is_three_valued() {
    let mut state = checked_state();

    let x = state.new_interval_variable(1, 5, None);
    let y = state.new_interval_variable(6, 10, None);
    let disjoint = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("disjoint domains are consistent");
    assert_eq!(state.is_entailed(disjoint), Entailment::True);

    let x = state.new_interval_variable(1, 5, None);
    let y = state.new_interval_variable(3, 7, None);
    let overlapping = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("overlapping domains are consistent");
    assert_eq!(state.is_entailed(overlapping), Entailment::Undefined);

    let x = state.new_interval_variable(3, 4, None);
    let y = state.new_interval_variable(3, 4, None);
    let equal = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("neither variable is fixed");

    state.push();
    let _ = state.instantiate_to(x, 3).expect("3 is in the domain");
    let _ = state.instantiate_to(y, 3).expect("3 is in the domain");
    assert_eq!(state.is_entailed(equal), Entailment::False);
}

#[test]
fn bound_tightening_on_an_enumerated_domain_does_not_wake_the_propagator() {
    let mut state = checked_state();
    let x = state.new_enumerated_variable(1, 5, Some("x".into()));
    let y = state.new_enumerated_variable(3, 7, Some("y".into()));
    let handle = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("overlapping domains are consistent");

    state.push();
    let _ = state.update_upper_bound(x, 2).expect("non-empty domain");
    state
        .propagate_to_fixed_point()
        .expect("x <= 2 is consistent");

    // Had it been called, the propagator would have noticed the disjoint bounds.
    assert!(state.is_propagator_active(handle));
    assert_eq!(state.is_entailed(handle), Entailment::True);

    let _ = state.instantiate_to(x, 1).expect("1 is in the domain");
    state
        .propagate_to_fixed_point()
        .expect("x = 1 is consistent");
    assert!(!state.is_propagator_active(handle));
}

#[test]
fn bound_tightening_on_a_bounded_domain_wakes_the_propagator() {
    let mut state = checked_state();
    let x = state.new_interval_variable(1, 5, None);
    let y = state.new_interval_variable(3, 7, None);
    let handle = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("overlapping domains are consistent");

    state.push();
    let _ = state.update_upper_bound(x, 2).expect("non-empty domain");
    state
        .propagate_to_fixed_point()
        .expect("x <= 2 is consistent");

    assert!(!state.is_propagator_active(handle));
}

#[test]
fn instantiations_prune_and_eventually_passivate() {
    let mut state = checked_state();
    let x = state.new_enumerated_variable(1, 3, Some("x".into()));
    let y = state.new_enumerated_variable(1, 3, Some("y".into()));
    let handle = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("no variable is fixed");

    state.push();
    let _ = state.instantiate_to(x, 2).expect("2 is in the domain");
    state
        .propagate_to_fixed_point()
        .expect("x = 2 is consistent");

    assert_eq!(values(&state, y), vec![1, 3]);
    assert!(state.is_propagator_active(handle));
    assert_eq!(state.is_entailed(handle), Entailment::Undefined);

    state.push();
    let _ = state.instantiate_to(y, 1).expect("1 is in the domain");
    state
        .propagate_to_fixed_point()
        .expect("y = 1 is consistent");

    assert_eq!(state.is_entailed(handle), Entailment::True);
    assert!(!state.is_propagator_active(handle));

    state.pop().expect("world 2 is open");
    assert!(state.is_propagator_active(handle));
    assert_eq!(values(&state, y), vec![1, 3]);

    state.pop().expect("world 1 is open");
    assert_eq!(values(&state, y), vec![1, 2, 3]);
    assert_eq!(state.fixed_value(x), None);
}

#[test]
fn propagation_through_views_reaches_the_underlying_domain() {
    let mut state = checked_state();
    let x = state.new_enumerated_variable(1, 3, None);
    let shifted = state.new_enumerated_variable(0, 2, None);
    let negated = state.new_enumerated_variable(-3, -1, None);

    let _ = state
        .add_propagator(BinaryNotEqualsPropagatorArgs {
            a: x,
            b: shifted.offset(1),
        })
        .expect("no variable is fixed");
    let _ = state
        .add_propagator(BinaryNotEqualsPropagatorArgs {
            a: x,
            b: negated.scaled(-1),
        })
        .expect("no variable is fixed");

    state.push();
    let _ = state.instantiate_to(x, 2).expect("2 is in the domain");
    state
        .propagate_to_fixed_point()
        .expect("x = 2 is consistent");

    assert_eq!(values(&state, shifted), vec![0, 2]);
    assert_eq!(values(&state, negated), vec![-3, -1]);
    assert_eq!(values(&state, negated.scaled(-1)), vec![3, 1]);
}

#[test]
fn a_contradiction_through_a_view_names_the_underlying_domain() {
    let mut state = checked_state();
    let x = state.new_interval_variable(4, 4, None);
    let y = state.new_interval_variable(2, 2, None);

    let result = state.add_propagator(BinaryNotEqualsPropagatorArgs {
        a: x,
        b: y.scaled(2),
    });

    let Err(ConstraintOperationError::InfeasiblePropagator(contradiction)) = result else {
        panic!("2 * y = 4 = x violates x != 2 * y");
    };
    assert_eq!(contradiction.domain, Some(y));
    assert!(matches!(contradiction.cause, Cause::Propagator(_)));
}

#[test]
fn the_fixed_point_is_stable() {
    let mut state = checked_state();
    let variables = (0..4)
        .map(|_| state.new_enumerated_variable(1, 4, None))
        .collect::<Vec<_>>();

    for (index, &a) in variables.iter().enumerate() {
        for &b in &variables[index + 1..] {
            let _ = state
                .add_propagator(BinaryNotEqualsPropagatorArgs { a, b })
                .expect("no variable is fixed");
        }
    }

    state.push();
    let _ = state.instantiate_to(variables[0], 1).expect("1 is in the domain");
    let _ = state.instantiate_to(variables[1], 2).expect("2 is in the domain");
    state
        .propagate_to_fixed_point()
        .expect("two values are left for two variables");

    let num_reductions = state.num_reductions();
    let domains = variables
        .iter()
        .map(|&variable| values(&state, variable))
        .collect::<Vec<_>>();

    state
        .propagate_to_fixed_point()
        .expect("nothing changed since the last fixed point");

    assert_eq!(state.num_reductions(), num_reductions);
    assert_eq!(
        variables
            .iter()
            .map(|&variable| values(&state, variable))
            .collect::<Vec<_>>(),
        domains
    );
    assert_eq!(domains[2], vec![3, 4]);
    assert_eq!(bounds(&state, variables[3]), (3, 4));
}

#[test]
fn a_contradiction_is_explained_by_the_decision_it_follows_from() {
    let mut state = checked_state();
    let x = state.new_enumerated_variable(1, 2, Some("x".into()));
    let y = state.new_enumerated_variable(1, 2, Some("y".into()));
    let z = state.new_enumerated_variable(1, 2, Some("z".into()));

    let x_y = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("no variable is fixed");
    let x_z = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: z })
        .expect("no variable is fixed");
    let y_z = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: y, b: z })
        .expect("no variable is fixed");

    state.push();
    let _ = state.instantiate_to(x, 1).expect("1 is in the domain");
    let contradiction = state
        .propagate_to_fixed_point()
        .expect_err("y and z cannot both differ from x and from each other");

    let explanation = state.explain_contradiction(&contradiction);
    let decisions = explanation
        .decisions()
        .iter()
        .map(|reduction| (reduction.domain(), reduction.mutation()))
        .collect::<Vec<_>>();
    assert_eq!(decisions, vec![(x, DomainMutation::Instantiate(1))]);

    let propagators = explanation.propagators();
    assert_eq!(propagators.len(), 3);
    for handle in [x_y, x_z, y_z] {
        assert!(propagators.contains(&handle.propagator_id()));
    }

    state.pop().expect("world 1 is open");
    state
        .propagate_to_fixed_point()
        .expect("the root world is consistent");
}

#[test]
fn a_removal_is_explained_by_the_domain_of_the_other_variable() {
    let mut state = State::default();
    let x = state.new_enumerated_variable(1, 3, None);
    let y = state.new_enumerated_variable(1, 3, None);
    let handle = state
        .add_propagator(BinaryNotEqualsPropagatorArgs { a: x, b: y })
        .expect("no variable is fixed");

    let _ = state.instantiate_to(x, 3).expect("3 is in the domain");
    state
        .propagate_to_fixed_point()
        .expect("x = 3 is consistent");

    let removal = state.reduction(1).expect("the propagator removed a value");
    assert_eq!(removal.cause(), Cause::Propagator(handle.propagator_id()));
    assert_eq!(removal.mutation(), DomainMutation::RemoveValue(3));

    let explanation = state.explain_reduction(1).expect("the reduction is recorded");
    assert_eq!(
        explanation.deductions(),
        &[Deduction::new(x, VariableState::Domain)]
    );
}
