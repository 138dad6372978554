use super::EnvironmentOptions;

/// The operations the [`Environment`](super::Environment) performs on each of its trails.
pub(crate) trait WorldTrail {
    fn world_push(&mut self);

    /// Restores every cell which was written in the current world and leaves it.
    fn world_pop(&mut self);

    /// Merges the current world into its parent, which has the given stamp.
    fn world_commit(&mut self, parent_stamp: u64);

    fn world(&self) -> usize;

    fn num_entries(&self) -> usize;

    fn reserve(&mut self, options: EnvironmentOptions);

    /// Opens worlds until the trail is at the given world, used when a trail is declared while the
    /// environment is not at the root.
    fn align_to_world(&mut self, world: usize) {
        while self.world() < world {
            self.world_push();
        }
    }
}
