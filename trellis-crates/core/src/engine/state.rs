use log::debug;
use log::trace;
use log::warn;

use crate::basic_types::Cause;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Contradiction;
use crate::basic_types::DomainResult;
use crate::basic_types::Entailment;
use crate::basic_types::EnvironmentError;
use crate::basic_types::PropagationStatus;
use crate::create_statistics_struct;
use crate::engine::cp::Assignments;
use crate::engine::cp::Environment;
use crate::engine::cp::EnvironmentOptions;
use crate::engine::cp::PendingEvents;
use crate::engine::cp::PropagatorQueue;
use crate::engine::notifications::EventSink;
use crate::engine::notifications::NotificationEngine;
use crate::engine::notifications::OpaqueDomainEvents;
use crate::engine::VariableNames;
use crate::explanations::ConflictExplanation;
use crate::explanations::Explanation;
use crate::explanations::ExplanationStore;
use crate::explanations::Reduction;
use crate::propagation::store::PropagatorStore;
use crate::propagation::Domains;
use crate::propagation::DomainsMut;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::propagation::Registration;
use crate::statistics::log_statistic;
use crate::statistics::StatisticLogger;
use crate::trellis_asserts::extreme_checks_enabled;
use crate::trellis_assert_eq_simple;
use crate::trellis_assert_simple;
use crate::variables::DomainId;
use crate::variables::IntegerVariable;

/// The [`State`] is the container of variables and propagators.
///
/// It owns the [`Environment`] in which all backtrackable memory lives, and runs the propagators
/// to a fixed point after the domains have been reduced from outside.
///
/// # Example
/// ```
/// use trellis_core::state::State;
///
/// let mut state = State::default();
/// let x = state.new_interval_variable(1, 10, Some("x".into()));
///
/// state.push();
/// let _ = state.update_upper_bound(x, 5).expect("the domain is not empty");
/// assert_eq!(state.upper_bound(x), 5);
///
/// state.pop().expect("a world was pushed");
/// assert_eq!(state.upper_bound(x), 10);
/// ```
#[derive(Debug)]
pub struct State {
    /// The backtrackable memory; every other structure of the state which has to be restored on
    /// backtracking keeps its cells here.
    environment: Environment,
    /// The domains of the integer variables.
    assignments: Assignments,
    /// The names of the variables in the state.
    variable_names: VariableNames,
    /// The list of propagators; propagators live here and are queried when events (domain changes)
    /// happen.
    propagators: PropagatorStore,
    /// Dictates the order in which propagators will be called to propagate.
    propagator_queue: PropagatorQueue,
    /// Routes the events of reductions to the propagators which watch them.
    notification_engine: NotificationEngine,
    /// The records of the accepted reductions, used to explain contradictions on demand.
    explanations: ExplanationStore,
    /// The events raised since the propagators were last notified.
    events: EventSink,
    /// Buffer for the variables registered by a propagator constructor.
    registrations: Vec<Registration>,
    options: StateOptions,
    statistics: StateStatistics,
}

/// Options which configure a [`State`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateOptions {
    /// The pre-sizing of the trails of the [`Environment`].
    pub environment: EnvironmentOptions,
    /// Verify after every fixed point that no active propagator can reduce a domain any further.
    ///
    /// The check always runs when the `debug-checks` feature is enabled.
    pub check_fixed_point: bool,
}

create_statistics_struct!(StateStatistics {
    num_propagator_calls: u64,
    num_contradictions: u64,
    num_worlds_pushed: u64,
    num_backtracks: u64,
    num_commits: u64,
});

impl Default for State {
    fn default() -> Self {
        State::with_options(StateOptions::default())
    }
}

impl State {
    pub fn with_options(options: StateOptions) -> Self {
        let mut environment = Environment::with_options(options.environment);
        let explanations = ExplanationStore::new(&mut environment);

        if extreme_checks_enabled() {
            warn!("debug checks are enabled, every fixed point is verified");
        }

        State {
            environment,
            assignments: Assignments::default(),
            variable_names: VariableNames::default(),
            propagators: PropagatorStore::default(),
            propagator_queue: PropagatorQueue::default(),
            notification_engine: NotificationEngine::default(),
            explanations,
            events: EventSink::default(),
            registrations: Vec::new(),
            options,
            statistics: StateStatistics::default(),
        }
    }

    pub fn log_statistics(&self, verbose: bool) {
        log_statistic("variables", self.assignments.num_domains());
        log_statistic("propagators", self.propagators.num_propagators());
        log_statistic("propagatorCalls", self.statistics.num_propagator_calls);
        log_statistic("reductions", self.explanations.len(&self.environment));
        log_statistic("contradictions", self.statistics.num_contradictions);
        log_statistic("worldsPushed", self.statistics.num_worlds_pushed);
        log_statistic("backtracks", self.statistics.num_backtracks);
        log_statistic("commits", self.statistics.num_commits);

        for (kind, size) in self.environment.trail_sizes() {
            StatisticLogger::new(["trailEntries".to_owned(), kind.to_string()]).log_statistic(size);
        }

        if verbose {
            for (index, propagator) in self.propagators.iter_propagators().enumerate() {
                propagator.log_statistics(StatisticLogger::new([
                    propagator.name(),
                    "number",
                    index.to_string().as_str(),
                ]));
            }
        }
    }
}

/// Operations to create variables.
impl State {
    /// Creates a new integer variable with the domain `[lower_bound, upper_bound]` which only
    /// tracks its bounds.
    ///
    /// Removing a value strictly between the bounds of such a variable has no effect.
    pub fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        let domain = self
            .assignments
            .grow_interval(&mut self.environment, lower_bound, upper_bound);
        self.add_domain(domain, name)
    }

    /// Creates a new integer variable with the domain `[lower_bound, upper_bound]` which tracks
    /// every individual value.
    pub fn new_enumerated_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        trellis_assert_simple!(
            lower_bound <= upper_bound,
            "the domain [{lower_bound}, {upper_bound}] is empty"
        );

        let domain = self
            .assignments
            .grow_enumerated(&mut self.environment, lower_bound..=upper_bound);
        self.add_domain(domain, name)
    }

    /// Creates a new integer variable whose domain consists of the given values.
    pub fn new_sparse_variable(
        &mut self,
        values: impl IntoIterator<Item = i32>,
        name: Option<String>,
    ) -> DomainId {
        let domain = self
            .assignments
            .grow_enumerated(&mut self.environment, values);
        self.add_domain(domain, name)
    }

    fn add_domain(&mut self, domain: DomainId, name: Option<String>) -> DomainId {
        self.notification_engine.grow();

        if let Some(name) = name {
            self.variable_names.set_name(domain, name);
        }

        domain
    }
}

/// Operations to retrieve information about values.
impl State {
    pub fn num_domains(&self) -> usize {
        self.assignments.num_domains()
    }

    /// The name given to `domain` when it was created.
    pub fn variable_name(&self, domain: DomainId) -> Option<&str> {
        self.variable_names.name(domain)
    }

    /// The domain which was created with the given name.
    pub fn domain_by_name(&self, name: &str) -> Option<DomainId> {
        self.variable_names.domain(name)
    }

    /// A read-only view of the current domains.
    pub fn domains(&self) -> Domains<'_> {
        Domains::new(&self.environment, &self.assignments)
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The depth of the current world; the root world is 0.
    pub fn current_world(&self) -> usize {
        self.environment.current_world()
    }

    pub fn lower_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        var.lower_bound(self.domains())
    }

    pub fn upper_bound<Var: IntegerVariable>(&self, var: Var) -> i32 {
        var.upper_bound(self.domains())
    }

    pub fn size<Var: IntegerVariable>(&self, var: Var) -> usize {
        var.size(self.domains())
    }

    pub fn contains<Var: IntegerVariable>(&self, var: Var, value: i32) -> bool {
        var.contains(self.domains(), value)
    }

    pub fn is_fixed<Var: IntegerVariable>(&self, var: Var) -> bool {
        var.is_fixed(self.domains())
    }

    pub fn fixed_value<Var: IntegerVariable>(&self, var: Var) -> Option<i32> {
        var.fixed_value(self.domains())
    }

    /// Iterate over the values in the domain of `var`, in the order of the variable.
    pub fn iterate_domain<'a, Var: IntegerVariable>(
        &'a self,
        var: &'a Var,
    ) -> impl Iterator<Item = i32> + 'a {
        var.iterate_domain(self.domains())
    }
}

/// Operations for adding constraints.
impl State {
    /// Add a new propagator to the [`State`] and run propagation to a fixed point.
    ///
    /// The constructor registers the variables of the propagator; each of them is subscribed to
    /// the events of [`Propagator::propagation_conditions`]. The first call to the propagator is a
    /// full [`Propagator::propagate`].
    ///
    /// If the propagation which follows the addition detects a contradiction, an
    /// [`ConstraintOperationError::InfeasiblePropagator`] is returned. The propagator is kept, and
    /// the state has to be popped before it can be used again.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let propagator_id = self.propagators.next_id();

        let mut registrations = std::mem::take(&mut self.registrations);
        let context = PropagatorConstructorContext::new(
            &mut self.environment,
            &self.assignments,
            propagator_id,
            &mut registrations,
        );
        let propagator = constructor.create(context);

        let domains = Domains::new(&self.environment, &self.assignments);
        for registration in registrations.drain(..) {
            let conditions = propagator.propagation_conditions(domains, registration.local_id);
            registration.subscribe(&mut self.notification_engine, propagator_id, conditions);
        }
        self.registrations = registrations;

        debug!("adding {} as {propagator_id}", propagator.name());
        let priority = propagator.priority();
        let stored_id = self
            .propagators
            .push(&mut self.environment, Box::new(propagator));
        trellis_assert_eq_simple!(stored_id, propagator_id);

        self.propagator_queue.enqueue_full(propagator_id, priority);
        self.propagate_to_fixed_point()
            .map_err(ConstraintOperationError::InfeasiblePropagator)?;

        Ok(PropagatorHandle::new(propagator_id))
    }
}

/// Operations for retrieving propagators.
impl State {
    /// Get a reference to the propagator identified by the given handle.
    ///
    /// For an exclusive reference, use [`State::get_propagator_mut`].
    pub fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    pub fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self.propagators.get_propagator_mut(handle)
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.num_propagators()
    }

    /// Whether the constraint of the propagator holds, is violated, or neither, under the current
    /// domains.
    pub fn is_entailed<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Entailment {
        self.propagators[handle.propagator_id()].is_entailed(self.domains())
    }

    /// A passive propagator is not called until the state backtracks past the world in which it
    /// became passive.
    pub fn is_propagator_active<P: Propagator>(&self, handle: PropagatorHandle<P>) -> bool {
        self.propagators
            .is_active(handle.propagator_id(), &self.environment)
    }
}

/// Operations for modifying the state.
///
/// The mutations are decisions: they are recorded with [`Cause::Decision`] and do not trigger
/// propagation. For that, an explicit call to [`State::propagate_to_fixed_point`] is required.
impl State {
    pub fn remove_value<Var: IntegerVariable>(&mut self, var: Var, value: i32) -> DomainResult {
        var.remove_value(&mut self.domains_mut(), value, Cause::Decision)
    }

    pub fn update_lower_bound<Var: IntegerVariable>(
        &mut self,
        var: Var,
        value: i32,
    ) -> DomainResult {
        var.update_lower_bound(&mut self.domains_mut(), value, Cause::Decision)
    }

    pub fn update_upper_bound<Var: IntegerVariable>(
        &mut self,
        var: Var,
        value: i32,
    ) -> DomainResult {
        var.update_upper_bound(&mut self.domains_mut(), value, Cause::Decision)
    }

    pub fn instantiate_to<Var: IntegerVariable>(&mut self, var: Var, value: i32) -> DomainResult {
        var.instantiate_to(&mut self.domains_mut(), value, Cause::Decision)
    }

    /// Opens a new world, which can be undone with [`State::pop`].
    ///
    /// Panics if propagation has not reached a fixed point, which includes reductions made since
    /// the last call to [`State::propagate_to_fixed_point`]. Popping the new world drops all
    /// pending propagation, so those reductions would never be propagated.
    pub fn push(&mut self) {
        trellis_assert_simple!(
            self.propagator_queue.is_empty() && self.events.is_empty(),
            "can only push a world when all propagation has occurred"
        );

        self.statistics.num_worlds_pushed += 1;
        self.environment.push();
    }

    /// Restores every domain, propagator flag and reduction record to what it was when the
    /// current world was pushed.
    ///
    /// Pending propagation is dropped, after which every propagator is synchronised with the
    /// restored domains.
    pub fn pop(&mut self) -> Result<(), EnvironmentError> {
        self.environment.pop()?;
        self.statistics.num_backtracks += 1;

        self.propagator_queue.clear();
        self.events.clear();

        let domains = Domains::new(&self.environment, &self.assignments);
        for propagator in self.propagators.iter_propagators_mut() {
            propagator.synchronise(domains);
        }

        Ok(())
    }

    /// Merges the current world into its parent; its changes are only undone when the parent is
    /// popped.
    pub fn commit(&mut self) -> Result<(), EnvironmentError> {
        self.environment.commit()?;
        self.statistics.num_commits += 1;
        Ok(())
    }

    /// Performs fixed-point propagation using the propagators defined in the [`State`].
    ///
    /// The reductions made since the last call wake up the propagators which watch their events.
    /// As propagation causes more changes to be made, more propagators are enqueued. This
    /// continues until the queue is empty.
    ///
    /// If a propagator raises a [`Contradiction`], propagation stops and the contradiction is
    /// returned. The only meaningful operations afterwards are [`State::explain_contradiction`]
    /// and [`State::pop`].
    pub fn propagate_to_fixed_point(&mut self) -> PropagationStatus {
        self.notify_propagators();

        while let Some((propagator_id, pending)) = self.propagator_queue.pop() {
            if !self.propagators.is_active(propagator_id, &self.environment) {
                continue;
            }

            if let Err(contradiction) = self.propagate(propagator_id, pending) {
                debug!("{contradiction}");
                self.statistics.num_contradictions += 1;

                self.propagator_queue.clear();
                self.events.clear();
                return Err(contradiction);
            }
        }

        if self.options.check_fixed_point || extreme_checks_enabled() {
            self.check_fixed_point();
        }

        Ok(())
    }

    /// Calls the propagator and notifies the propagators affected by its reductions.
    fn propagate(&mut self, propagator_id: PropagatorId, pending: PendingEvents) -> PropagationStatus {
        self.statistics.num_propagator_calls += 1;

        self.call_propagator(propagator_id, pending)?;
        self.notify_propagators();

        Ok(())
    }

    fn call_propagator(
        &mut self,
        propagator_id: PropagatorId,
        pending: PendingEvents,
    ) -> PropagationStatus {
        let active_flag = self.propagators.active_flag(propagator_id);
        let propagator = &mut self.propagators[propagator_id];
        trace!("propagating {} ({propagator_id})", propagator.name());

        let mut context = PropagationContext::new(
            DomainsMut::new(
                &mut self.environment,
                &mut self.assignments,
                &mut self.explanations,
                &mut self.events,
            ),
            propagator_id,
            active_flag,
        );

        if pending.full || pending.events.is_empty() {
            return propagator.propagate(context);
        }

        for (local_id, events) in pending.events {
            if !context.is_active() {
                break;
            }

            propagator.propagate_event(
                context.reborrow(),
                local_id,
                OpaqueDomainEvents::from(events),
            )?;
        }

        Ok(())
    }

    fn notify_propagators(&mut self) {
        self.notification_engine
            .notify_propagators_about_domain_events(
                &mut self.events,
                Domains::new(&self.environment, &self.assignments),
                &mut self.propagators,
                &mut self.propagator_queue,
            );
    }

    /// Re-runs every active propagator in a scratch world and asserts that none of them reduces a
    /// domain.
    fn check_fixed_point(&mut self) {
        self.environment.push();

        let propagator_ids = self.propagators.ids().collect::<Vec<_>>();
        for propagator_id in propagator_ids {
            if !self.propagators.is_active(propagator_id, &self.environment) {
                continue;
            }

            let num_reductions = self.explanations.len(&self.environment);
            let status = self.call_propagator(
                propagator_id,
                PendingEvents {
                    full: true,
                    events: Vec::new(),
                },
            );

            trellis_assert_simple!(
                status.is_ok() && self.explanations.len(&self.environment) == num_reductions,
                "{} is not at a fixed point",
                self.propagators[propagator_id].name()
            );
        }

        self.events.clear();
        let popped = self.environment.pop();
        trellis_assert_simple!(popped.is_ok());
    }

    fn domains_mut(&mut self) -> DomainsMut<'_> {
        DomainsMut::new(
            &mut self.environment,
            &mut self.assignments,
            &mut self.explanations,
            &mut self.events,
        )
    }
}

/// Operations for explaining reductions and contradictions.
impl State {
    /// The number of reductions recorded in the current branch.
    pub fn num_reductions(&self) -> usize {
        self.explanations.len(&self.environment)
    }

    /// The reduction recorded at `index`, counting from the first reduction of the root world.
    pub fn reduction(&self, index: usize) -> Option<Reduction> {
        self.explanations.get(&self.environment, index)
    }

    /// The single-step explanation of the reduction at `index`. A decision is explained by
    /// nothing.
    pub fn explain_reduction(&self, index: usize) -> Option<Explanation> {
        let domains = self.domains();
        let propagators = &self.propagators;

        self.explanations
            .explain_reduction(&self.environment, index, |propagator_id, deduction| {
                match deduction {
                    Some(deduction) => propagators[propagator_id].explain(deduction, domains),
                    None => propagators[propagator_id].explain_failure(domains),
                }
            })
    }

    /// Explains `contradiction` in terms of the decisions it follows from.
    ///
    /// Has to be called before the world in which the contradiction was raised is popped.
    pub fn explain_contradiction(&self, contradiction: &Contradiction) -> ConflictExplanation {
        let domains = self.domains();
        let propagators = &self.propagators;

        self.explanations.explain_contradiction(
            &self.environment,
            contradiction,
            |propagator_id, deduction| match deduction {
                Some(deduction) => propagators[propagator_id].explain(deduction, domains),
                None => propagators[propagator_id].explain_failure(domains),
            },
        )
    }
}
