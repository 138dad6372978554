//! The execution core of the Trellis constraint solver.
//!
//! The core consists of four layers:
//! - the [`environment`], which owns all backtrackable memory and restores it on backtracking;
//! - the [`propagation`] engine, which runs [`Propagator`](propagation::Propagator)s to a fixed
//!   point in the order of their [`Priority`](propagation::Priority);
//! - the [`variables`], i.e. domains and the [`AffineView`](variables::AffineView)s over them;
//! - the [`explanations`], which trace contradictions back to the decisions they follow from.
//!
//! These are tied together by the [`State`](state::State).
//!
//! # Example
//! ```
//! use trellis_core::state::State;
//! use trellis_core::variables::TransformableVariable;
//!
//! let mut state = State::default();
//! let x = state.new_enumerated_variable(0, 5, Some("x".into()));
//! let minus_x = x.scaled(-1);
//!
//! state.push();
//! let _ = state
//!     .update_upper_bound(minus_x, -2)
//!     .expect("the domain is not empty");
//! assert_eq!(state.lower_bound(x), 2);
//!
//! state.pop().expect("a world was pushed");
//! assert_eq!(state.lower_bound(x), 0);
//! ```
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod math;
pub mod propagation;
pub mod statistics;
#[doc(hidden)]
pub mod trellis_asserts;

#[doc(hidden)]
pub use trellis_asserts as asserts;

pub use convert_case;

pub use crate::basic_types::Cause;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Contradiction;
pub use crate::basic_types::DomainResult;
pub use crate::basic_types::Entailment;
pub use crate::basic_types::EnvironmentError;
pub use crate::basic_types::PropagationStatus;
pub use crate::basic_types::UnsupportedMutation;
pub use crate::engine::DomainMutation;

/// The backtrackable memory model: worlds, stored cells and their trails.
pub mod environment {
    pub use crate::engine::cp::Environment;
    pub use crate::engine::cp::EnvironmentOptions;
    pub use crate::engine::cp::StoredBool;
    pub use crate::engine::cp::StoredCell;
    pub use crate::engine::cp::StoredDouble;
    pub use crate::engine::cp::StoredDoubleVector;
    pub use crate::engine::cp::StoredInt;
    pub use crate::engine::cp::StoredIntVector;
    pub use crate::engine::cp::StoredLong;
    pub use crate::engine::cp::StoredOperations;
    pub use crate::engine::cp::StoredValues;
    pub use crate::engine::cp::StoredVector;
    pub use crate::engine::cp::StoredVectors;
    pub use crate::engine::cp::TrailKind;
    pub use crate::engine::cp::UndoOperation;
}

/// Integer variables: domains, and views onto them.
pub mod variables {
    pub use crate::engine::variables::*;
    pub use crate::engine::EmptyDomain;
}

/// Explaining reductions and contradictions.
pub mod explanations {
    pub use crate::engine::explanations::*;
}

/// The [`State`] which owns the variables and the propagators.
pub mod state {
    pub use crate::engine::State;
    pub use crate::engine::StateOptions;
    pub use crate::propagation::PropagatorHandle;
}
