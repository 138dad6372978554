use enumset::EnumSet;

use super::DomainMutable;
use super::DomainQueryable;
use super::EventPublisher;
use super::TransformableVariable;
use crate::basic_types::Cause;
use crate::basic_types::DomainResult;
use crate::containers::StorageKey;
use crate::engine::notifications::DomainEvent;
use crate::engine::notifications::OpaqueDomainEvent;
use crate::engine::notifications::OpaqueDomainEvents;
use crate::engine::notifications::Watchers;
use crate::engine::variables::AffineView;
use crate::engine::variables::IntegerVariable;
use crate::engine::DomainMutation;
use crate::propagation::Domains;
use crate::propagation::DomainsMut;

/// A structure which represents the most basic [`IntegerVariable`]; it is simply the id which links
/// to a domain (hence the name).
#[derive(Clone, PartialEq, Eq, Copy, Hash, PartialOrd, Ord)]
pub struct DomainId {
    id: u32,
}

impl DomainId {
    pub fn id(self) -> u32 {
        self.id
    }
}

impl DomainQueryable for DomainId {
    fn lower_bound(&self, domains: Domains<'_>) -> i32 {
        domains
            .assignments()
            .lower_bound(domains.environment(), *self)
    }

    fn upper_bound(&self, domains: Domains<'_>) -> i32 {
        domains
            .assignments()
            .upper_bound(domains.environment(), *self)
    }

    fn size(&self, domains: Domains<'_>) -> usize {
        domains.assignments().size(domains.environment(), *self)
    }

    fn contains(&self, domains: Domains<'_>, value: i32) -> bool {
        domains
            .assignments()
            .contains(domains.environment(), *self, value)
    }

    fn has_enumerated_domain(&self, domains: Domains<'_>) -> bool {
        domains.assignments().has_enumerated_domain(*self)
    }

    fn iterate_domain<'a>(&'a self, domains: Domains<'a>) -> impl Iterator<Item = i32> + 'a {
        domains
            .assignments()
            .iterate(domains.environment(), *self)
    }
}

impl DomainMutable for DomainId {
    fn remove_value(&self, domains: &mut DomainsMut<'_>, value: i32, cause: Cause) -> DomainResult {
        domains.apply(*self, DomainMutation::RemoveValue(value), cause)
    }

    fn update_lower_bound(
        &self,
        domains: &mut DomainsMut<'_>,
        value: i32,
        cause: Cause,
    ) -> DomainResult {
        domains.apply(*self, DomainMutation::LowerBound(value), cause)
    }

    fn update_upper_bound(
        &self,
        domains: &mut DomainsMut<'_>,
        value: i32,
        cause: Cause,
    ) -> DomainResult {
        domains.apply(*self, DomainMutation::UpperBound(value), cause)
    }

    fn instantiate_to(&self, domains: &mut DomainsMut<'_>, value: i32, cause: Cause) -> DomainResult {
        domains.apply(*self, DomainMutation::Instantiate(value), cause)
    }
}

impl EventPublisher for DomainId {
    fn watch_all(&self, watchers: &mut Watchers<'_>, events: EnumSet<DomainEvent>) {
        watchers.watch_all(*self, events);
    }

    fn unpack_event(&self, event: OpaqueDomainEvent) -> DomainEvent {
        event.unwrap()
    }

    fn unpack_events(&self, events: OpaqueDomainEvents) -> EnumSet<DomainEvent> {
        events.unwrap()
    }
}

impl IntegerVariable for DomainId {
    type AffineView = AffineView<Self>;

    fn underlying_domain(&self) -> DomainId {
        *self
    }
}

impl TransformableVariable<AffineView<DomainId>> for DomainId {
    fn scaled(&self, scale: i32) -> AffineView<DomainId> {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i32) -> AffineView<DomainId> {
        AffineView::new(*self, 1, offset)
    }
}

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId { id: index as u32 }
    }
}

impl std::fmt::Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

impl std::fmt::Debug for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}
