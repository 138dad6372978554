use std::fmt::Debug;

use enumset::EnumSet;

use super::DomainId;
use super::TransformableVariable;
use crate::basic_types::Cause;
use crate::basic_types::DomainResult;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::OpaqueDomainEvents;
use crate::engine::notifications::Watchers;
use crate::explanations::Deduction;
use crate::explanations::VariableState;
use crate::propagation::Domains;
use crate::propagation::DomainsMut;

/// Reading the domain of a variable.
pub trait DomainQueryable {
    /// Get the lower bound of the variable.
    fn lower_bound(&self, domains: Domains<'_>) -> i32;

    /// Get the upper bound of the variable.
    fn upper_bound(&self, domains: Domains<'_>) -> i32;

    /// The number of values in the domain.
    fn size(&self, domains: Domains<'_>) -> usize;

    /// Determine whether the value is in the domain of this variable.
    fn contains(&self, domains: Domains<'_>, value: i32) -> bool;

    fn is_fixed(&self, domains: Domains<'_>) -> bool {
        self.lower_bound(domains) == self.upper_bound(domains)
    }

    fn fixed_value(&self, domains: Domains<'_>) -> Option<i32> {
        self.is_fixed(domains).then(|| self.lower_bound(domains))
    }

    /// Whether the underlying domain tracks individual values rather than only its bounds.
    fn has_enumerated_domain(&self, domains: Domains<'_>) -> bool;

    /// Iterate over the values of the domain.
    fn iterate_domain<'a>(&'a self, domains: Domains<'a>) -> impl Iterator<Item = i32> + 'a;
}

/// Reducing the domain of a variable.
///
/// Every method returns `Ok(true)` when the domain changed and `Ok(false)` when the reduction was
/// already satisfied.
pub trait DomainMutable {
    fn remove_value(&self, domains: &mut DomainsMut<'_>, value: i32, cause: Cause)
        -> DomainResult;

    fn update_lower_bound(
        &self,
        domains: &mut DomainsMut<'_>,
        value: i32,
        cause: Cause,
    ) -> DomainResult;

    fn update_upper_bound(
        &self,
        domains: &mut DomainsMut<'_>,
        value: i32,
        cause: Cause,
    ) -> DomainResult;

    fn instantiate_to(&self, domains: &mut DomainsMut<'_>, value: i32, cause: Cause)
        -> DomainResult;
}

/// Registering interest in the events of a variable, and decoding the events delivered for it.
pub trait EventPublisher {
    /// Register a watch for this variable on the given domain events.
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>);

    /// Decode a domain event for this variable.
    fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent;

    /// Decode a set of domain events for this variable.
    fn unpack_events(&self, events: OpaqueDomainEvents) -> EnumSet<DomainEvent> {
        events.iter().map(|event| self.unpack_event(event)).collect()
    }
}

/// An integer variable as seen by propagators: either a [`DomainId`] or a view onto one.
pub trait IntegerVariable:
    DomainQueryable
    + DomainMutable
    + EventPublisher
    + TransformableVariable<Self::AffineView>
    + Clone
    + Debug
{
    type AffineView: IntegerVariable;

    /// The domain which this variable reads from and writes to.
    fn underlying_domain(&self) -> DomainId;

    /// The deduction describing `state` of this variable in terms of its underlying domain.
    fn explain(&self, state: VariableState) -> Deduction {
        Deduction::new(self.underlying_domain(), state)
    }
}
