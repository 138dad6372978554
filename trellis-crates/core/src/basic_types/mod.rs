mod constraint_operation_error;
mod contradiction;
mod entailment;
mod environment_error;
mod trail;
mod unsupported_mutation;

pub use constraint_operation_error::ConstraintOperationError;
pub use contradiction::*;
pub use entailment::Entailment;
pub use environment_error::EnvironmentError;
pub(crate) use trail::Trail;
pub use unsupported_mutation::UnsupportedMutation;
