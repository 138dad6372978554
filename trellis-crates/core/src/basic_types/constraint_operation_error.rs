use thiserror::Error;

use super::Contradiction;
#[cfg(doc)]
use crate::state::State;

/// Errors related to adding constraints to the [`State`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    /// The initial propagation of the new propagator raised a contradiction.
    #[error("adding the propagator failed because it is infeasible: {0}")]
    InfeasiblePropagator(Contradiction),
}
