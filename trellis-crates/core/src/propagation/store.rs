use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::engine::cp::Environment;
use crate::engine::cp::StoredBool;

/// A central store for propagators, together with their trailed active flags.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
    active: KeyedVec<PropagatorId, StoredBool>,
}

/// A typed wrapper around a [`PropagatorId`] that allows retrieving concrete propagators from the
/// [`State`](crate::state::State).
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    id: PropagatorId,
    propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub(crate) fn new(id: PropagatorId) -> Self {
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    /// Get a type-erased handle to the propagator.
    pub fn propagator_id(self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

impl PropagatorStore {
    pub(crate) fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    /// The id the next added propagator will receive.
    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_key()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = PropagatorId> {
        self.propagators.keys()
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|b| b.as_ref())
    }

    pub(crate) fn iter_propagators_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut()
    }

    /// Stores `propagator` as active.
    pub(crate) fn push(
        &mut self,
        environment: &mut Environment,
        propagator: Box<dyn Propagator>,
    ) -> PropagatorId {
        let _ = self.active.push(environment.make_bool(true));
        self.propagators.push(propagator)
    }

    pub(crate) fn is_active(&self, propagator_id: PropagatorId, environment: &Environment) -> bool {
        environment.read(self.active[propagator_id])
    }

    pub(crate) fn active_flag(&self, propagator_id: PropagatorId) -> StoredBool {
        self.active[propagator_id]
    }

    /// Get a reference to the propagator identified by the given handle.
    ///
    /// To prevent downcasting, [`PropagatorStore`] implements [`Index`] and [`IndexMut`] with
    /// [`PropagatorId`] as an index.
    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self[handle.id].downcast_ref()
    }

    /// Get an exclusive reference to the propagator identified by the given handle.
    ///
    /// For more info, see [`Self::get_propagator`].
    pub(crate) fn get_propagator_mut<P: Propagator>(
        &mut self,
        handle: PropagatorHandle<P>,
    ) -> Option<&mut P> {
        self[handle.id].downcast_mut()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}

impl Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}
