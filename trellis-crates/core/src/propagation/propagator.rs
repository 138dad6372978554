use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::contexts::NotificationContext;
use super::Domains;
use super::PropagationContext;
use crate::basic_types::Entailment;
use crate::basic_types::PropagationStatus;
#[cfg(doc)]
use crate::create_statistics_struct;
use crate::engine::notifications::DomainEvents;
use crate::engine::notifications::OpaqueDomainEvents;
use crate::explanations::Deduction;
use crate::explanations::Explanation;
#[cfg(doc)]
use crate::propagation::DomainEvent;
#[cfg(doc)]
use crate::propagation::PropagatorConstructor;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::local_id::LocalId;
#[cfg(doc)]
use crate::state::State;
use crate::statistics::StatisticLogger;

// We need to use this to cast from `Box<dyn Propagator>` to a concrete propagator; rust inherently
// does not allow downcasting from the trait definition to its concrete type.
impl_downcast!(Propagator);

/// A propagator removes values from domains which will never be in any solution, or raises
/// explicit contradictions.
///
/// The only required functions are [`Propagator::name`], [`Propagator::propagate`] and
/// [`Propagator::explain`]; all other functions have default implementations.
///
/// See the [`crate::propagation`] documentation for more details.
pub trait Propagator: Downcast {
    /// Return the name of the propagator.
    ///
    /// This is a convenience method that is used for printing.
    fn name(&self) -> &str;

    /// Returns the [`Priority`] of the propagator, used for determining the order in which
    /// propagators are called.
    ///
    /// By default the priority is set to [`Priority::VerySlow`]. It is expected that
    /// propagator implementations would set this value to some appropriate value.
    fn priority(&self) -> Priority {
        Priority::VerySlow
    }

    /// The events on the variable with the given [`LocalId`] which should wake up the propagator.
    ///
    /// Queried once for every variable when the propagator is added to the [`State`]. By default
    /// the propagator is woken by every event.
    fn propagation_conditions(&self, _domains: Domains<'_>, _local_id: LocalId) -> DomainEvents {
        DomainEvents::ANY_INT
    }

    /// Performs full propagation.
    ///
    /// The aim of this method is to remove values from the domains of variables which cannot be
    /// part of any solution given the current domains, and to detect contradictions. It is called
    /// when the propagator is added, and whenever it is scheduled without specific events.
    ///
    /// Propagators are not required to propagate until a fixed point. It will be called again by
    /// the [`State`] until no further propagations happen.
    fn propagate(&mut self, context: PropagationContext<'_>) -> PropagationStatus;

    /// Propagation in response to `events` on the variable with the given [`LocalId`].
    ///
    /// Called once for every variable with pending events. By default this calls
    /// [`Propagator::propagate`].
    fn propagate_event(
        &mut self,
        context: PropagationContext<'_>,
        _local_id: LocalId,
        _events: OpaqueDomainEvents,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// Returns whether the propagator should be enqueued when `events` happen to the variable
    /// with the given [`LocalId`] (as registered during creation with
    /// [`PropagatorConstructorContext::register`]).
    ///
    /// This can be used to incrementally maintain data structures, and should only be used for
    /// computationally cheap logic. By default the propagator is always enqueued.
    fn notify(
        &mut self,
        _context: NotificationContext<'_>,
        _local_id: LocalId,
        _events: OpaqueDomainEvents,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after backtracking, allowing the propagator to update its internal data structures
    /// given the new variable domains.
    ///
    /// By default this function does nothing.
    fn synchronise(&mut self, _domains: Domains<'_>) {}

    /// Whether the constraint is guaranteed to hold, guaranteed to be violated, or neither.
    fn is_entailed(&self, _domains: Domains<'_>) -> Entailment {
        Entailment::Undefined
    }

    /// The deductions which justify a reduction the propagator performed. The domain of the
    /// reduced variable itself should not be part of the explanation.
    fn explain(&self, deduction: &Deduction, domains: Domains<'_>) -> Explanation;

    /// The deductions which justify a contradiction that the propagator raised through
    /// [`PropagationContext::contradiction`].
    ///
    /// By default the failure is explained by nothing.
    fn explain_failure(&self, _domains: Domains<'_>) -> Explanation {
        Explanation::new()
    }

    /// An idempotent propagator is at a fixed point after every call, so it is not woken by its
    /// own reductions.
    fn is_idempotent(&self) -> bool {
        false
    }

    /// Logs statistics of the propagator using the provided [`StatisticLogger`].
    ///
    /// It is recommended to create a struct through the [`create_statistics_struct!`] macro!
    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// Indicator of what to do when a propagator is notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The propagator should be enqueued.
    Enqueue,
    /// The propagator should not be enqueued.
    Skip,
}

/// The priority of a propagator, used for determining the order in which propagators will be
/// called.
///
/// The priority is named after the cost of one call: propagators with a lower cost are called
/// first. Propagators of the same priority are called in the order in which they were added.
#[derive(Default, Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    Unary = 0,
    Binary = 1,
    Ternary = 2,
    Linear = 3,
    Quadratic = 4,
    Cubic = 5,
    #[default]
    VerySlow = 6,
}

impl Priority {
    pub(crate) const COUNT: usize = 7;

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
