use super::Deduction;
use super::Explanation;
use super::Reduction;
use super::VariableState;
use crate::basic_types::Cause;
use crate::basic_types::Contradiction;
use crate::containers::HashSet;
use crate::containers::ReadOnlySet;
use crate::engine::cp::Environment;
use crate::engine::cp::StoredLong;
use crate::propagation::PropagatorId;

/// The reduction records of the current branch.
///
/// The logical length of the store is a [`StoredLong`], so popping a world forgets the reductions
/// made in it. The records beyond the logical length are overwritten lazily.
#[derive(Clone, Debug)]
pub(crate) struct ExplanationStore {
    reductions: Vec<Reduction>,
    len: StoredLong,
}

impl ExplanationStore {
    pub(crate) fn new(environment: &mut Environment) -> Self {
        ExplanationStore {
            reductions: Vec::new(),
            len: environment.make_long(0),
        }
    }

    pub(crate) fn len(&self, environment: &Environment) -> usize {
        environment.read(self.len) as usize
    }

    pub(crate) fn push(&mut self, environment: &mut Environment, reduction: Reduction) {
        let len = self.len(environment);
        self.reductions.truncate(len);
        self.reductions.push(reduction);
        environment.write(self.len, (len + 1) as i64);
    }

    pub(crate) fn get(&self, environment: &Environment, index: usize) -> Option<Reduction> {
        (index < self.len(environment)).then(|| self.reductions[index])
    }

    /// The single-step explanation of the reduction at `index`, obtained from the propagator which
    /// performed it. A decision is explained by nothing.
    pub(crate) fn explain_reduction(
        &self,
        environment: &Environment,
        index: usize,
        mut explain: impl FnMut(PropagatorId, Option<&Deduction>) -> Explanation,
    ) -> Option<Explanation> {
        let reduction = self.get(environment, index)?;

        match reduction.cause() {
            Cause::Decision => Some(Explanation::new()),
            Cause::Propagator(propagator) => {
                let mut explanation = explain(propagator, Some(&reduction.deduction()));
                explanation.add_propagator(propagator);
                Some(explanation)
            }
        }
    }

    /// Walks the recorded reductions backwards from `contradiction` until only decisions remain.
    ///
    /// `explain` is asked for the deductions which justified a reduction of a propagator; it is
    /// given [`None`] when the propagator failed by its own logic rather than by emptying a domain.
    /// A deduction is only supported by reductions recorded before the reduction it explains.
    pub(crate) fn explain_contradiction(
        &self,
        environment: &Environment,
        contradiction: &Contradiction,
        mut explain: impl FnMut(PropagatorId, Option<&Deduction>) -> Explanation,
    ) -> ConflictExplanation {
        let len = self.len(environment);

        let mut propagators = HashSet::default();
        let mut worklist: Vec<(Deduction, usize)> = Vec::new();

        if let Some(domain) = contradiction.domain {
            worklist.push((Deduction::new(domain, VariableState::Domain), len));
        }

        if let Cause::Propagator(propagator) = contradiction.cause {
            let failed = contradiction.domain.map(|domain| {
                let state = contradiction
                    .event
                    .map_or(VariableState::Domain, VariableState::of_event);
                Deduction::new(domain, state)
            });

            let explanation = explain(propagator, failed.as_ref());
            let _ = propagators.insert(propagator);
            propagators.extend(explanation.propagators().iter().copied());
            worklist.extend(
                explanation
                    .deductions()
                    .iter()
                    .map(|&deduction| (deduction, len)),
            );
        }

        let mut visited: HashSet<usize> = HashSet::default();
        let mut decisions = Vec::new();

        while let Some((deduction, before)) = worklist.pop() {
            for index in (0..before).rev() {
                let reduction = self.reductions[index];
                if !reduction.supports(&deduction) || !visited.insert(index) {
                    continue;
                }

                match reduction.cause() {
                    Cause::Decision => decisions.push(index),
                    Cause::Propagator(propagator) => {
                        let explanation = explain(propagator, Some(&reduction.deduction()));
                        let _ = propagators.insert(propagator);
                        propagators.extend(explanation.propagators().iter().copied());
                        worklist.extend(
                            explanation
                                .deductions()
                                .iter()
                                .map(|&deduction| (deduction, index)),
                        );
                    }
                }
            }
        }

        decisions.sort_unstable();

        ConflictExplanation {
            decisions: decisions
                .into_iter()
                .map(|index| self.reductions[index])
                .collect(),
            propagators,
        }
    }
}

/// The explanation of a contradiction in terms of decisions.
#[derive(Clone, Debug, Default)]
pub struct ConflictExplanation {
    decisions: Vec<Reduction>,
    propagators: HashSet<PropagatorId>,
}

impl ConflictExplanation {
    /// The decisions the contradiction follows from, in the order they were made.
    pub fn decisions(&self) -> &[Reduction] {
        &self.decisions
    }

    /// The propagators which took part in deriving the contradiction.
    pub fn propagators(&self) -> ReadOnlySet<'_, HashSet<PropagatorId>> {
        ReadOnlySet::new(&self.propagators)
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::*;
    use crate::containers::ElementSet;
    use crate::containers::StorageKey;
    use crate::engine::notifications::DomainEvent;
    use crate::engine::DomainMutation;
    use crate::variables::DomainId;

    fn decision(domain: DomainId, mutation: DomainMutation) -> Reduction {
        Reduction::new(domain, mutation, Cause::Decision, EnumSet::only(mutation.event()))
    }

    #[test]
    fn popping_forgets_the_reductions_of_the_world() {
        let mut environment = Environment::default();
        let mut store = ExplanationStore::new(&mut environment);
        let x = DomainId::create_from_index(0);

        store.push(&mut environment, decision(x, DomainMutation::LowerBound(1)));
        environment.push();
        store.push(&mut environment, decision(x, DomainMutation::LowerBound(2)));
        assert_eq!(store.len(&environment), 2);

        environment.pop().expect("a world was pushed");
        assert_eq!(store.len(&environment), 1);
        assert_eq!(store.get(&environment, 1), None);

        store.push(&mut environment, decision(x, DomainMutation::UpperBound(5)));
        assert_eq!(
            store.get(&environment, 1).map(|reduction| reduction.mutation()),
            Some(DomainMutation::UpperBound(5))
        );
    }

    #[test]
    fn a_conflict_is_traced_back_to_decisions() {
        let mut environment = Environment::default();
        let mut store = ExplanationStore::new(&mut environment);
        let x = DomainId::create_from_index(0);
        let y = DomainId::create_from_index(1);
        let z = DomainId::create_from_index(2);
        let propagator = PropagatorId::create_from_index(0);

        store.push(&mut environment, decision(z, DomainMutation::LowerBound(3)));
        store.push(&mut environment, decision(x, DomainMutation::Instantiate(1)));
        store.push(
            &mut environment,
            Reduction::new(
                y,
                DomainMutation::RemoveValue(1),
                Cause::Propagator(propagator),
                EnumSet::only(DomainEvent::Removal),
            ),
        );
        store.push(&mut environment, decision(y, DomainMutation::Instantiate(2)));

        let contradiction = Contradiction::empty_domain(
            Cause::Propagator(propagator),
            x,
            DomainMutation::RemoveValue(1),
        );

        let explanation = store.explain_contradiction(&environment, &contradiction, |_, deduction| {
            match deduction.map(|deduction| deduction.domain) {
                Some(domain) if domain == x => {
                    Explanation::from_deductions([Deduction::new(y, VariableState::Domain)])
                }
                Some(domain) if domain == y => {
                    Explanation::from_deductions([Deduction::new(x, VariableState::Domain)])
                }
                _ => Explanation::new(),
            }
        });

        let decisions = explanation
            .decisions()
            .iter()
            .map(|reduction| reduction.domain())
            .collect::<Vec<_>>();
        assert_eq!(decisions, vec![x, y]);
        assert!(explanation.propagators().contains(&propagator));
        assert_eq!(explanation.propagators().len(), 1);
    }

    #[test]
    fn decisions_are_explained_by_nothing() {
        let mut environment = Environment::default();
        let mut store = ExplanationStore::new(&mut environment);
        let x = DomainId::create_from_index(0);

        store.push(&mut environment, decision(x, DomainMutation::Instantiate(1)));

        let explanation = store.explain_reduction(&environment, 0, |_, _| {
            panic!("a decision has no propagator to ask")
        });

        assert_eq!(explanation, Some(Explanation::new()));
        assert_eq!(
            store.explain_reduction(&environment, 1, |_, _| Explanation::new()),
            None
        );
    }
}
