use std::fmt::Display;

use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::containers::SparseSet;
use crate::engine::cp::Environment;
use crate::engine::cp::StoredInt;
use crate::engine::notifications::DomainEvent;
use crate::engine::variables::DomainId;
use crate::explanations::VariableState;
use crate::trellis_assert_moderate;
use crate::trellis_assert_simple;

/// The domains of all integer variables.
///
/// The bounds of every domain, and the size of an enumerated domain, live in [`StoredInt`] cells
/// of the [`Environment`]; popping a world therefore restores every domain without any work in
/// this structure.
#[derive(Clone, Debug, Default)]
pub(crate) struct Assignments {
    domains: KeyedVec<DomainId, IntegerDomain>,
}

/// Returned when a mutation would leave a domain without values. The domain is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

/// A reduction of a single domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DomainMutation {
    RemoveValue(i32),
    LowerBound(i32),
    UpperBound(i32),
    Instantiate(i32),
}

impl DomainMutation {
    /// The event which is characteristic for the mutation.
    pub fn event(self) -> DomainEvent {
        match self {
            DomainMutation::RemoveValue(_) => DomainEvent::Removal,
            DomainMutation::LowerBound(_) => DomainEvent::LowerBound,
            DomainMutation::UpperBound(_) => DomainEvent::UpperBound,
            DomainMutation::Instantiate(_) => DomainEvent::Assign,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            DomainMutation::RemoveValue(value)
            | DomainMutation::LowerBound(value)
            | DomainMutation::UpperBound(value)
            | DomainMutation::Instantiate(value) => value,
        }
    }

    /// The part of the domain the mutation changes.
    pub fn variable_state(self) -> VariableState {
        match self {
            DomainMutation::LowerBound(_) | DomainMutation::UpperBound(_) => VariableState::Bound,
            DomainMutation::RemoveValue(_) | DomainMutation::Instantiate(_) => {
                VariableState::Value
            }
        }
    }
}

impl Display for DomainMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainMutation::RemoveValue(value) => write!(f, "removing {value}"),
            DomainMutation::LowerBound(value) => write!(f, "raising the lower bound to {value}"),
            DomainMutation::UpperBound(value) => write!(f, "lowering the upper bound to {value}"),
            DomainMutation::Instantiate(value) => write!(f, "fixing to {value}"),
        }
    }
}

impl Assignments {
    pub(crate) fn num_domains(&self) -> usize {
        self.domains.len()
    }

    /// Creates a domain holding every value in `[lower_bound, upper_bound]` which only tracks its
    /// bounds. Removing a value strictly inside the bounds has no effect on such a domain.
    pub(crate) fn grow_interval(
        &mut self,
        environment: &mut Environment,
        lower_bound: i32,
        upper_bound: i32,
    ) -> DomainId {
        trellis_assert_simple!(
            lower_bound <= upper_bound,
            "the domain [{lower_bound}, {upper_bound}] is empty"
        );

        self.domains.push(IntegerDomain {
            lower_bound: environment.make_int(lower_bound),
            upper_bound: environment.make_int(upper_bound),
            values: None,
        })
    }

    /// Creates a domain which tracks every individual value. The values are deduplicated and do
    /// not need to be sorted.
    pub(crate) fn grow_enumerated(
        &mut self,
        environment: &mut Environment,
        values: impl IntoIterator<Item = i32>,
    ) -> DomainId {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_unstable();
        values.dedup();

        trellis_assert_simple!(!values.is_empty(), "an enumerated domain needs a value");

        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let universe = (i64::from(upper_bound) - i64::from(lower_bound) + 1) as usize;
        let set = SparseSet::new(
            values
                .iter()
                .map(|&value| (i64::from(value) - i64::from(lower_bound)) as usize),
            universe,
        );

        self.domains.push(IntegerDomain {
            lower_bound: environment.make_int(lower_bound),
            upper_bound: environment.make_int(upper_bound),
            values: Some(EnumeratedValues {
                offset: lower_bound,
                size: environment.make_int(values.len() as i32),
                set,
            }),
        })
    }

    pub(crate) fn lower_bound(&self, environment: &Environment, domain: DomainId) -> i32 {
        environment.read(self.domains[domain].lower_bound)
    }

    pub(crate) fn upper_bound(&self, environment: &Environment, domain: DomainId) -> i32 {
        environment.read(self.domains[domain].upper_bound)
    }

    pub(crate) fn size(&self, environment: &Environment, domain: DomainId) -> usize {
        self.domains[domain].size(environment)
    }

    pub(crate) fn contains(&self, environment: &Environment, domain: DomainId, value: i32) -> bool {
        self.domains[domain].contains(environment, value)
    }

    pub(crate) fn is_fixed(&self, environment: &Environment, domain: DomainId) -> bool {
        self.lower_bound(environment, domain) == self.upper_bound(environment, domain)
    }

    pub(crate) fn has_enumerated_domain(&self, domain: DomainId) -> bool {
        self.domains[domain].values.is_some()
    }

    /// The values of the domain in increasing order.
    pub(crate) fn iterate<'a>(
        &'a self,
        environment: &'a Environment,
        domain: DomainId,
    ) -> impl Iterator<Item = i32> + 'a {
        let integer_domain = &self.domains[domain];
        let lower_bound = environment.read(integer_domain.lower_bound);
        let upper_bound = environment.read(integer_domain.upper_bound);

        (lower_bound..=upper_bound).filter(move |&value| integer_domain.contains(environment, value))
    }

    /// Applies `mutation` to `domain` and returns the events it raised. The returned set is empty
    /// when the domain did not change.
    ///
    /// Feasibility is checked before anything is written: on [`EmptyDomain`] the domain is
    /// unchanged.
    pub(crate) fn apply(
        &mut self,
        environment: &mut Environment,
        domain: DomainId,
        mutation: DomainMutation,
    ) -> Result<EnumSet<DomainEvent>, EmptyDomain> {
        let integer_domain = &mut self.domains[domain];

        let lower_bound_before = environment.read(integer_domain.lower_bound);
        let upper_bound_before = environment.read(integer_domain.upper_bound);

        let changed = match mutation {
            DomainMutation::RemoveValue(value) => integer_domain.remove_value(environment, value)?,
            DomainMutation::LowerBound(value) => {
                integer_domain.update_lower_bound(environment, value)?
            }
            DomainMutation::UpperBound(value) => {
                integer_domain.update_upper_bound(environment, value)?
            }
            DomainMutation::Instantiate(value) => integer_domain.instantiate(environment, value)?,
        };

        if !changed {
            return Ok(EnumSet::empty());
        }

        let lower_bound = environment.read(integer_domain.lower_bound);
        let upper_bound = environment.read(integer_domain.upper_bound);

        let mut events = EnumSet::empty();
        if lower_bound != lower_bound_before {
            let _ = events.insert(DomainEvent::LowerBound);
        }
        if upper_bound != upper_bound_before {
            let _ = events.insert(DomainEvent::UpperBound);
        }
        if lower_bound == upper_bound && lower_bound_before != upper_bound_before {
            let _ = events.insert(DomainEvent::Assign);
        }
        if let DomainMutation::RemoveValue(_) = mutation {
            let _ = events.insert(DomainEvent::Removal);
        }

        trellis_assert_moderate!(integer_domain.size(environment) >= 1);

        Ok(events)
    }
}

#[derive(Clone, Debug)]
struct IntegerDomain {
    lower_bound: StoredInt,
    upper_bound: StoredInt,
    /// Present for enumerated domains; interval domains are described by their bounds alone.
    values: Option<EnumeratedValues>,
}

#[derive(Clone, Debug)]
struct EnumeratedValues {
    /// The smallest initial value; value `v` is stored as element `v - offset`.
    offset: i32,
    set: SparseSet,
    size: StoredInt,
}

impl EnumeratedValues {
    fn element(&self, value: i32) -> Option<usize> {
        usize::try_from(i64::from(value) - i64::from(self.offset)).ok()
    }

    fn len(&self, environment: &Environment) -> usize {
        environment.read(self.size) as usize
    }

    fn contains(&self, value: i32, len: usize) -> bool {
        self.element(value)
            .is_some_and(|element| self.set.contains(element, len))
    }

    /// Removes `value` if it is a member, returning the new length.
    fn remove(&mut self, value: i32, len: usize) -> usize {
        match self.element(value) {
            Some(element) if self.set.remove(element, len) => len - 1,
            _ => len,
        }
    }
}

impl IntegerDomain {
    fn size(&self, environment: &Environment) -> usize {
        match &self.values {
            Some(values) => values.len(environment),
            None => {
                let lower_bound = i64::from(environment.read(self.lower_bound));
                let upper_bound = i64::from(environment.read(self.upper_bound));
                (upper_bound - lower_bound + 1) as usize
            }
        }
    }

    fn contains(&self, environment: &Environment, value: i32) -> bool {
        if value < environment.read(self.lower_bound) || value > environment.read(self.upper_bound)
        {
            return false;
        }

        match &self.values {
            Some(values) => values.contains(value, values.len(environment)),
            None => true,
        }
    }

    fn remove_value(
        &mut self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.contains(environment, value) {
            return Ok(false);
        }

        let lower_bound = environment.read(self.lower_bound);
        let upper_bound = environment.read(self.upper_bound);
        if lower_bound == upper_bound {
            return Err(EmptyDomain);
        }

        let Some(values) = &mut self.values else {
            if value == lower_bound {
                environment.write(self.lower_bound, lower_bound + 1);
            } else if value == upper_bound {
                environment.write(self.upper_bound, upper_bound - 1);
            } else {
                return Ok(false);
            }
            return Ok(true);
        };

        let len = values.remove(value, values.len(environment));
        environment.write(values.size, len as i32);

        if value == lower_bound {
            let new_lower_bound = (lower_bound + 1..=upper_bound)
                .find(|&candidate| values.contains(candidate, len))
                .unwrap_or(upper_bound);
            environment.write(self.lower_bound, new_lower_bound);
        } else if value == upper_bound {
            let new_upper_bound = (lower_bound..upper_bound)
                .rev()
                .find(|&candidate| values.contains(candidate, len))
                .unwrap_or(lower_bound);
            environment.write(self.upper_bound, new_upper_bound);
        }

        Ok(true)
    }

    fn update_lower_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = environment.read(self.lower_bound);
        let upper_bound = environment.read(self.upper_bound);

        if value <= lower_bound {
            return Ok(false);
        }
        if value > upper_bound {
            return Err(EmptyDomain);
        }

        let Some(values) = &mut self.values else {
            environment.write(self.lower_bound, value);
            return Ok(true);
        };

        let mut len = values.len(environment);
        let new_lower_bound = (value..=upper_bound)
            .find(|&candidate| values.contains(candidate, len))
            .ok_or(EmptyDomain)?;

        for removed in lower_bound..new_lower_bound {
            len = values.remove(removed, len);
        }

        environment.write(values.size, len as i32);
        environment.write(self.lower_bound, new_lower_bound);

        Ok(true)
    }

    fn update_upper_bound(
        &mut self,
        environment: &mut Environment,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let lower_bound = environment.read(self.lower_bound);
        let upper_bound = environment.read(self.upper_bound);

        if value >= upper_bound {
            return Ok(false);
        }
        if value < lower_bound {
            return Err(EmptyDomain);
        }

        let Some(values) = &mut self.values else {
            environment.write(self.upper_bound, value);
            return Ok(true);
        };

        let mut len = values.len(environment);
        let new_upper_bound = (lower_bound..=value)
            .rev()
            .find(|&candidate| values.contains(candidate, len))
            .ok_or(EmptyDomain)?;

        for removed in new_upper_bound + 1..=upper_bound {
            len = values.remove(removed, len);
        }

        environment.write(values.size, len as i32);
        environment.write(self.upper_bound, new_upper_bound);

        Ok(true)
    }

    fn instantiate(&mut self, environment: &mut Environment, value: i32) -> Result<bool, EmptyDomain> {
        if !self.contains(environment, value) {
            return Err(EmptyDomain);
        }

        if environment.read(self.lower_bound) == environment.read(self.upper_bound) {
            return Ok(false);
        }

        if let Some(values) = &mut self.values {
            let len = values.len(environment);
            if let Some(element) = values.element(value) {
                let _ = values.set.retain_only(element, len);
            }
            environment.write(values.size, 1);
        }

        environment.write(self.lower_bound, value);
        environment.write(self.upper_bound, value);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(events: impl IntoIterator<Item = DomainEvent>) -> EnumSet<DomainEvent> {
        events.into_iter().collect()
    }

    #[test]
    fn bound_updates_on_an_interval_domain() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_interval(&mut environment, 1, 10);

        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::LowerBound(4))
            .expect("non-empty domain");
        assert_eq!(raised, events([DomainEvent::LowerBound]));

        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::LowerBound(2))
            .expect("non-empty domain");
        assert!(raised.is_empty());

        assert_eq!(assignments.lower_bound(&environment, domain), 4);
        assert_eq!(assignments.size(&environment, domain), 7);
    }

    #[test]
    fn removing_an_interior_value_from_an_interval_domain_has_no_effect() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_interval(&mut environment, 1, 10);

        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::RemoveValue(5))
            .expect("non-empty domain");

        assert!(raised.is_empty());
        assert!(assignments.contains(&environment, domain, 5));
    }

    #[test]
    fn removing_a_bound_shifts_it() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_interval(&mut environment, 1, 2);

        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::RemoveValue(1))
            .expect("non-empty domain");

        assert_eq!(
            raised,
            events([
                DomainEvent::Removal,
                DomainEvent::LowerBound,
                DomainEvent::Assign
            ])
        );
        assert_eq!(assignments.lower_bound(&environment, domain), 2);
    }

    #[test]
    fn removing_the_last_value_fails_without_changes() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_enumerated(&mut environment, [3]);

        let result = assignments.apply(&mut environment, domain, DomainMutation::RemoveValue(3));

        assert_eq!(result, Err(EmptyDomain));
        assert!(assignments.contains(&environment, domain, 3));
    }

    #[test]
    fn enumerated_domains_track_holes() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_enumerated(&mut environment, 1..=5);

        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::RemoveValue(3))
            .expect("non-empty domain");
        assert_eq!(raised, events([DomainEvent::Removal]));

        let _ = assignments
            .apply(&mut environment, domain, DomainMutation::LowerBound(2))
            .expect("non-empty domain");
        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::RemoveValue(2))
            .expect("non-empty domain");

        assert_eq!(raised, events([DomainEvent::Removal, DomainEvent::LowerBound]));
        assert_eq!(assignments.lower_bound(&environment, domain), 4);
        assert_eq!(
            assignments.iterate(&environment, domain).collect::<Vec<_>>(),
            vec![4, 5]
        );
    }

    #[test]
    fn bounds_skip_over_holes() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_enumerated(&mut environment, [1, 4, 9, 10]);

        let _ = assignments
            .apply(&mut environment, domain, DomainMutation::LowerBound(2))
            .expect("non-empty domain");
        let _ = assignments
            .apply(&mut environment, domain, DomainMutation::UpperBound(8))
            .expect("non-empty domain");

        assert_eq!(assignments.lower_bound(&environment, domain), 4);
        assert_eq!(assignments.upper_bound(&environment, domain), 4);
        assert!(assignments.is_fixed(&environment, domain));
        assert_eq!(assignments.size(&environment, domain), 1);
    }

    #[test]
    fn a_bound_beyond_the_last_member_empties_the_domain() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_enumerated(&mut environment, [1, 4]);

        assert_eq!(
            assignments.apply(&mut environment, domain, DomainMutation::LowerBound(5)),
            Err(EmptyDomain)
        );
        assert_eq!(
            assignments.apply(&mut environment, domain, DomainMutation::Instantiate(2)),
            Err(EmptyDomain)
        );
        assert_eq!(assignments.size(&environment, domain), 2);
    }

    #[test]
    fn instantiation_is_undone_by_popping() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_enumerated(&mut environment, [2, 5, 7]);

        environment.push();
        let raised = assignments
            .apply(&mut environment, domain, DomainMutation::Instantiate(5))
            .expect("non-empty domain");

        assert_eq!(
            raised,
            events([
                DomainEvent::Assign,
                DomainEvent::LowerBound,
                DomainEvent::UpperBound
            ])
        );
        assert_eq!(
            assignments.iterate(&environment, domain).collect::<Vec<_>>(),
            vec![5]
        );

        environment.pop().expect("a world was pushed");

        assert_eq!(
            assignments.iterate(&environment, domain).collect::<Vec<_>>(),
            vec![2, 5, 7]
        );
    }

    #[test]
    fn sparse_domains_contain_only_the_given_values() {
        let mut environment = Environment::default();
        let mut assignments = Assignments::default();
        let domain = assignments.grow_enumerated(&mut environment, [-3, 8, 8, 0]);

        assert!(assignments.has_enumerated_domain(domain));
        assert_eq!(assignments.size(&environment, domain), 3);
        assert!(!assignments.contains(&environment, domain, 1));
        assert_eq!(
            assignments.iterate(&environment, domain).collect::<Vec<_>>(),
            vec![-3, 0, 8]
        );
    }
}
