pub(crate) mod cp;
pub(crate) mod explanations;
pub(crate) mod notifications;
mod state;
mod variable_names;
pub(crate) mod variables;

pub use cp::DomainMutation;
pub use cp::EmptyDomain;
pub use state::*;
pub(crate) use variable_names::VariableNames;
