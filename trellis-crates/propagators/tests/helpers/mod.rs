#![allow(dead_code, reason = "not every test binary uses every helper")]

use trellis_core::state::State;
use trellis_core::state::StateOptions;
use trellis_core::variables::IntegerVariable;

/// Routes the `log` output of the engine to the test harness; `RUST_LOG=trace` shows every
/// reduction.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A state which verifies after every propagation that the propagators are at a fixed point.
pub(crate) fn checked_state() -> State {
    init_logging();

    State::with_options(StateOptions {
        check_fixed_point: true,
        ..Default::default()
    })
}

pub(crate) fn bounds<Var: IntegerVariable>(state: &State, var: Var) -> (i32, i32) {
    (state.lower_bound(var.clone()), state.upper_bound(var))
}

pub(crate) fn values<Var: IntegerVariable>(state: &State, var: Var) -> Vec<i32> {
    state.iterate_domain(&var).collect()
}
