#![cfg(test)]

mod helpers;

use trellis_core::environment::Environment;
use trellis_core::environment::EnvironmentOptions;
use trellis_core::environment::StoredValues;
use trellis_core::environment::TrailKind;
use trellis_core::EnvironmentError;

#[test]
fn every_cell_kind_round_trips_through_push_and_pop() {
    helpers::init_logging();
    let mut environment = Environment::default();

    let int = environment.make_int(1);
    let boolean = environment.make_bool(false);
    let long = environment.make_long(1 << 40);
    let double = environment.make_float(0.5);
    let ints = environment.make_int_vector(2, 7);
    let doubles = environment.make_double_vector(1, 1.5);

    environment.push();
    environment.write(int, 2);
    environment.write(boolean, true);
    let _ = environment.add_long(long, 1);
    environment.write(double, -3.25);
    environment.vector_set(ints, 0, 8);
    environment.vector_push(ints, 9);
    let _ = environment.vector_pop(doubles);

    environment.push();
    let _ = environment.add(int, 10);
    environment.vector_set(ints, 2, 10);
    assert_eq!(environment.read(int), 12);

    environment.pop().expect("world 2 is open");
    assert_eq!(environment.read(int), 2);
    assert_eq!(environment.vector_get(ints, 2), Some(9));

    environment.pop().expect("world 1 is open");
    assert_eq!(environment.read(int), 1);
    assert!(!environment.read(boolean));
    assert_eq!(environment.read(long), 1 << 40);
    assert_eq!(environment.read(double), 0.5);
    assert_eq!(environment.vector_len(ints), 2);
    assert_eq!(environment.vector_get(ints, 0), Some(7));
    assert_eq!(environment.vector_len(doubles), 1);
    assert_eq!(environment.vector_get(doubles, 0), Some(1.5));
    assert_eq!(environment.current_world(), 0);
}

#[test]
fn committed_writes_are_undone_by_popping_the_parent() {
    let mut environment = Environment::default();
    let cell = environment.make_int(0);

    environment.push();
    environment.write(cell, 1);
    environment.push();
    environment.write(cell, 2);

    environment.commit().expect("world 2 is open");
    assert_eq!(environment.current_world(), 1);
    assert_eq!(environment.read(cell), 2);

    environment.pop().expect("world 1 is open");
    assert_eq!(environment.read(cell), 0);

    assert_eq!(environment.commit(), Err(EnvironmentError::CommitAtRootWorld));
    assert_eq!(environment.pop(), Err(EnvironmentError::PopAtRootWorld));
}

#[test]
fn a_trail_kind_is_declared_once() {
    let mut environment = Environment::default();

    environment
        .set_long_trail(StoredValues::with_capacity(EnvironmentOptions {
            initial_updates: 4,
            initial_worlds: 2,
        }))
        .expect("no long cell was made yet");
    let _ = environment.make_long(3);

    let _ = environment.make_int(0);
    assert_eq!(
        environment.set_int_trail(StoredValues::default()),
        Err(EnvironmentError::TrailAlreadyDeclared(TrailKind::Int))
    );
    assert!(environment.is_declared(TrailKind::Long));
    assert!(!environment.is_declared(TrailKind::DoubleVector));
}
