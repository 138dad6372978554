use thiserror::Error;

use crate::environment::TrailKind;

/// Illegal operations on the [`Environment`](crate::environment::Environment).
///
/// These indicate a programming error in the layer driving the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("cannot pop the root world")]
    PopAtRootWorld,
    #[error("cannot commit the root world")]
    CommitAtRootWorld,
    #[error("a trail for {0} cells has already been declared")]
    TrailAlreadyDeclared(TrailKind),
}
