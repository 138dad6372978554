use super::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::cp::Assignments;
use crate::engine::cp::Environment;
use crate::engine::notifications::NotificationEngine;
use crate::engine::notifications::Watchers;
#[cfg(doc)]
use crate::engine::variables::AffineView;
#[cfg(doc)]
use crate::engine::variables::DomainId;
use crate::propagation::DomainEvents;
use crate::propagation::HasDomains;
#[cfg(doc)]
use crate::state::State;
use crate::variables::IntegerVariable;

/// A propagator constructor creates a fully initialized instance of a [`Propagator`].
///
/// The constructor is responsible for registering the variables of the propagator. Each
/// registered variable is subscribed to the events of
/// [`Propagator::propagation_conditions`] once the propagator has been created.
pub trait PropagatorConstructor {
    /// The propagator that is produced by this constructor.
    type PropagatorImpl: Propagator;

    /// Create the propagator instance from `Self`.
    fn create(self, context: PropagatorConstructorContext<'_>) -> Self::PropagatorImpl;
}

/// [`PropagatorConstructorContext`] is used when [`Propagator`]s are initialised after creation.
///
/// It represents a communication point between the [`State`] and the [`Propagator`].
/// Propagators use the [`PropagatorConstructorContext`] to register their variables and to
/// retrieve the current bounds of variables.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    environment: &'a mut Environment,
    assignments: &'a Assignments,
    propagator_id: PropagatorId,
    registrations: &'a mut Vec<Registration>,
}

/// A variable registered by a constructor, which is subscribed once the propagator exists.
pub(crate) struct Registration {
    pub(crate) local_id: LocalId,
    subscribe: Box<dyn Fn(&mut Watchers<'_>, DomainEvents)>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("local_id", &self.local_id)
            .finish_non_exhaustive()
    }
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        environment: &'a mut Environment,
        assignments: &'a Assignments,
        propagator_id: PropagatorId,
        registrations: &'a mut Vec<Registration>,
    ) -> Self {
        PropagatorConstructorContext {
            environment,
            assignments,
            propagator_id,
            registrations,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Get domain information.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.environment, self.assignments)
    }

    /// Access to the environment, to allocate the backtrackable state of the propagator.
    pub fn environment_mut(&mut self) -> &mut Environment {
        self.environment
    }

    /// Registers `var` as the variable with the given [`LocalId`].
    ///
    /// The events on which the propagator is woken up for this variable are determined by
    /// [`Propagator::propagation_conditions`]. Each variable *must* have a unique [`LocalId`];
    /// most often this is the index of the variable in the internal array of variables.
    ///
    /// Note that the [`LocalId`] is used to differentiate between [`DomainId`]s and
    /// [`AffineView`]s over the same domain.
    pub fn register<Var: IntegerVariable + 'static>(&mut self, var: Var, local_id: LocalId) {
        self.registrations.push(Registration {
            local_id,
            subscribe: Box::new(move |watchers: &mut Watchers<'_>, events: DomainEvents| {
                var.watch_all(watchers, events.events());
            }),
        });
    }
}

impl Registration {
    /// Subscribes the registered variable to `events` on behalf of `propagator_id`.
    pub(crate) fn subscribe(
        &self,
        notification_engine: &mut NotificationEngine,
        propagator_id: PropagatorId,
        events: DomainEvents,
    ) {
        let propagator_var = PropagatorVarId {
            propagator: propagator_id,
            variable: self.local_id,
        };

        let mut watchers = Watchers::new(propagator_var, notification_engine);
        (self.subscribe)(&mut watchers, events);
    }
}

impl HasDomains for PropagatorConstructorContext<'_> {
    fn current_domains(&self) -> Domains<'_> {
        self.domains()
    }
}
