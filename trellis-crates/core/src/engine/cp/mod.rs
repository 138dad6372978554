mod assignments;
mod propagator_queue;
mod trailed;

pub(crate) use assignments::Assignments;
pub use assignments::DomainMutation;
pub use assignments::EmptyDomain;
pub(crate) use propagator_queue::PendingEvents;
pub(crate) use propagator_queue::PropagatorQueue;
pub use trailed::*;
