use log::info;

use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::DomainResult;
use crate::engine::cp::Environment;
use crate::engine::cp::StoredBool;
use crate::propagation::Domains;
use crate::propagation::DomainsMut;
use crate::propagation::HasDomains;
#[cfg(doc)]
use crate::propagation::Propagator;
use crate::propagation::PropagatorId;
#[cfg(doc)]
use crate::propagation::ReadDomains;
use crate::variables::IntegerVariable;

/// Provided to the propagator when it is notified of a domain event.
///
/// Domains can be read through the implementation of [`ReadDomains`].
///
/// The difference with [`PropagationContext`] is that it is not possible to perform a propagation
/// in the notify callback.
#[derive(Clone, Copy, Debug)]
pub struct NotificationContext<'a> {
    domains: Domains<'a>,
}

impl<'a> NotificationContext<'a> {
    pub(crate) fn new(domains: Domains<'a>) -> Self {
        NotificationContext { domains }
    }

    /// Get the current domains.
    pub fn domains(&self) -> Domains<'a> {
        self.domains
    }
}

impl HasDomains for NotificationContext<'_> {
    fn current_domains(&self) -> Domains<'_> {
        self.domains
    }
}

/// Provides information about the state of the engine to a propagator.
///
/// Domains can be read through the implementation of [`ReadDomains`], and reduced through the
/// mutation methods, which attribute every reduction to the propagator.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    domains: DomainsMut<'a>,
    propagator_id: PropagatorId,
    active_flag: StoredBool,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        domains: DomainsMut<'a>,
        propagator_id: PropagatorId,
        active_flag: StoredBool,
    ) -> Self {
        PropagationContext {
            domains,
            propagator_id,
            active_flag,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Get the current domain information.
    pub fn domains(&self) -> Domains<'_> {
        self.domains.domains()
    }

    /// Access to the environment, for propagators which keep backtrackable state of their own.
    pub fn environment_mut(&mut self) -> &mut Environment {
        self.domains.environment_mut()
    }

    pub fn remove_value<Var: IntegerVariable>(&mut self, var: &Var, value: i32) -> DomainResult {
        let cause = self.cause();
        var.remove_value(&mut self.domains, value, cause)
    }

    pub fn update_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> DomainResult {
        let cause = self.cause();
        var.update_lower_bound(&mut self.domains, value, cause)
    }

    pub fn update_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: &Var,
        value: i32,
    ) -> DomainResult {
        let cause = self.cause();
        var.update_upper_bound(&mut self.domains, value, cause)
    }

    pub fn instantiate_to<Var: IntegerVariable>(&mut self, var: &Var, value: i32) -> DomainResult {
        let cause = self.cause();
        var.instantiate_to(&mut self.domains, value, cause)
    }

    /// Marks the propagator as passive: it is not woken up again until the engine backtracks past
    /// the current world.
    pub fn set_passive(&mut self) {
        info!("{} is passive", self.propagator_id);
        self.domains
            .environment_mut()
            .write(self.active_flag, false);
    }

    pub fn is_active(&self) -> bool {
        self.domains.domains().environment().read(self.active_flag)
    }

    /// A contradiction detected by the logic of the propagator rather than by a domain wipe-out.
    /// It is explained through [`Propagator::explain_failure`].
    pub fn contradiction(&self, message: impl Into<String>) -> Contradiction {
        Contradiction::propagator(self.propagator_id, message)
    }

    /// Reborrow the current context to a new value with a shorter lifetime. Should be used when
    /// passing `Self` to another function that takes ownership, but the value is still needed
    /// afterwards.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            domains: self.domains.reborrow(),
            propagator_id: self.propagator_id,
            active_flag: self.active_flag,
        }
    }

    fn cause(&self) -> Cause {
        Cause::Propagator(self.propagator_id)
    }
}

impl HasDomains for PropagationContext<'_> {
    fn current_domains(&self) -> Domains<'_> {
        self.domains.domains()
    }
}
