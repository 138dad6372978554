use std::fmt::Debug;

use super::EnvironmentOptions;
use super::WorldTrail;
use crate::basic_types::Trail;

/// An undo action which is run when the world in which it was saved is popped.
pub type UndoOperation = Box<dyn FnOnce()>;

/// The trail of arbitrary undo actions.
///
/// Backtrackable state which does not fit in a stored cell registers an [`UndoOperation`] through
/// [`Environment::save`](super::Environment::save). Popping a world runs the operations saved in
/// it, most recent first. Committing a world hands its operations to the parent.
#[derive(Default)]
pub struct StoredOperations {
    trail: Trail<UndoOperation>,
}

impl StoredOperations {
    /// Create a trail which is pre-sized according to the provided options.
    pub fn with_capacity(options: EnvironmentOptions) -> Self {
        StoredOperations {
            trail: Trail::with_capacity(options.initial_updates, options.initial_worlds),
        }
    }

    /// Operations saved in the root world can never be undone, so they are dropped.
    pub(crate) fn save(&mut self, operation: UndoOperation) {
        if self.trail.world() > 0 {
            self.trail.push(operation);
        }
    }
}

impl Debug for StoredOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredOperations")
            .field("world", &self.trail.world())
            .field("num_operations", &self.trail.len())
            .finish()
    }
}

impl WorldTrail for StoredOperations {
    fn world_push(&mut self) {
        self.trail.push_world();
    }

    fn world_pop(&mut self) {
        for operation in self.trail.pop_world() {
            operation();
        }
    }

    fn world_commit(&mut self, _parent_stamp: u64) {
        self.trail.commit_world(|_| true);
    }

    fn world(&self) -> usize {
        self.trail.world()
    }

    fn num_entries(&self) -> usize {
        self.trail.len()
    }

    fn reserve(&mut self, options: EnvironmentOptions) {
        self.trail
            .reserve(options.initial_updates, options.initial_worlds);
    }
}
