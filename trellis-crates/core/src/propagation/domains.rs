use log::trace;

use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::basic_types::DomainResult;
use crate::engine::cp::Assignments;
use crate::engine::cp::EmptyDomain;
use crate::engine::cp::Environment;
use crate::engine::notifications::EventSink;
use crate::engine::DomainMutation;
use crate::explanations::ExplanationStore;
use crate::explanations::Reduction;
use crate::variables::DomainId;
use crate::variables::IntegerVariable;

/// A read-only view of the current domains.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    environment: &'a Environment,
    assignments: &'a Assignments,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(environment: &'a Environment, assignments: &'a Assignments) -> Self {
        Domains {
            environment,
            assignments,
        }
    }

    pub fn environment(&self) -> &'a Environment {
        self.environment
    }

    pub(crate) fn assignments(&self) -> &'a Assignments {
        self.assignments
    }
}

/// Write access to the domains. Every accepted reduction is recorded for explanation and
/// published to the event sink.
#[derive(Debug)]
pub struct DomainsMut<'a> {
    pub(crate) environment: &'a mut Environment,
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) explanations: &'a mut ExplanationStore,
    pub(crate) events: &'a mut EventSink,
}

impl<'a> DomainsMut<'a> {
    pub(crate) fn new(
        environment: &'a mut Environment,
        assignments: &'a mut Assignments,
        explanations: &'a mut ExplanationStore,
        events: &'a mut EventSink,
    ) -> Self {
        DomainsMut {
            environment,
            assignments,
            explanations,
            events,
        }
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.environment, self.assignments)
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        self.environment
    }

    pub(crate) fn reborrow(&mut self) -> DomainsMut<'_> {
        DomainsMut {
            environment: self.environment,
            assignments: self.assignments,
            explanations: self.explanations,
            events: self.events,
        }
    }

    /// Applies `mutation` to `domain` on behalf of `cause`.
    ///
    /// Returns `Ok(false)` if the domain already satisfied the mutation, in which case nothing is
    /// recorded.
    pub(crate) fn apply(
        &mut self,
        domain: DomainId,
        mutation: DomainMutation,
        cause: Cause,
    ) -> DomainResult {
        match self.assignments.apply(self.environment, domain, mutation) {
            Err(EmptyDomain) => {
                trace!("{cause}: {mutation} empties {domain}");
                Err(Contradiction::empty_domain(cause, domain, mutation))
            }
            Ok(events) if events.is_empty() => Ok(false),
            Ok(events) => {
                let reduction = Reduction::new(domain, mutation, cause, events);
                trace!("{reduction}");

                self.explanations.push(self.environment, reduction);
                self.events.event_occurred(domain, events, cause);

                Ok(true)
            }
        }
    }
}

#[doc(hidden)]
pub trait HasDomains {
    fn current_domains(&self) -> Domains<'_>;
}

impl HasDomains for Domains<'_> {
    fn current_domains(&self) -> Domains<'_> {
        *self
    }
}

impl HasDomains for DomainsMut<'_> {
    fn current_domains(&self) -> Domains<'_> {
        self.domains()
    }
}

/// Reading the domains of variables, implemented by every context handed to a propagator.
pub trait ReadDomains: HasDomains {
    fn lower_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.lower_bound(self.current_domains())
    }

    fn upper_bound<Var: IntegerVariable>(&self, var: &Var) -> i32 {
        var.upper_bound(self.current_domains())
    }

    fn size<Var: IntegerVariable>(&self, var: &Var) -> usize {
        var.size(self.current_domains())
    }

    fn contains<Var: IntegerVariable>(&self, var: &Var, value: i32) -> bool {
        var.contains(self.current_domains(), value)
    }

    /// Returns `true` if the domain of the given variable is singleton.
    fn is_fixed<Var: IntegerVariable>(&self, var: &Var) -> bool {
        var.is_fixed(self.current_domains())
    }

    fn fixed_value<Var: IntegerVariable>(&self, var: &Var) -> Option<i32> {
        var.fixed_value(self.current_domains())
    }

    fn has_enumerated_domain<Var: IntegerVariable>(&self, var: &Var) -> bool {
        var.has_enumerated_domain(self.current_domains())
    }

    fn iterate_domain<'a, Var: IntegerVariable>(
        &'a self,
        var: &'a Var,
    ) -> impl Iterator<Item = i32> + 'a {
        var.iterate_domain(self.current_domains())
    }
}

impl<T: HasDomains> ReadDomains for T {}
