use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::trellis_assert_simple;

/// An append-only undo log which is partitioned into worlds.
///
/// Entries pushed while world `w` is the current world belong to `w`; popping `w` hands them back
/// (most recent first) so that the owner can undo them, committing `w` moves them into `w - 1`.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_world: usize,
    /// At index i is the position where world i ends (exclusive) on the trail, i.e. where world
    /// i + 1 starts.
    world_delimiter: Vec<usize>,
    entries: Vec<T>,
}

// We explicitly implement the Default and not as a macro, because we want to avoid imposing Default
// on the generic type T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_world: Default::default(),
            world_delimiter: Default::default(),
            entries: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn with_capacity(num_entries: usize, num_worlds: usize) -> Self {
        Trail {
            current_world: 0,
            world_delimiter: Vec::with_capacity(num_worlds),
            entries: Vec::with_capacity(num_entries),
        }
    }

    pub(crate) fn reserve(&mut self, num_entries: usize, num_worlds: usize) {
        self.entries.reserve(num_entries);
        self.world_delimiter.reserve(num_worlds);
    }

    pub(crate) fn push_world(&mut self) {
        self.current_world += 1;
        self.world_delimiter.push(self.entries.len());
    }

    pub(crate) fn world(&self) -> usize {
        self.current_world
    }

    #[cfg(test)]
    pub(crate) fn entries_of_world(&self, world: usize) -> &[T] {
        trellis_assert_simple!(world <= self.current_world);

        let start = if world == 0 {
            0
        } else {
            self.world_delimiter[world - 1]
        };

        let end = if world == self.current_world {
            self.entries.len()
        } else {
            self.world_delimiter[world]
        };

        &self.entries[start..end]
    }

    /// Leaves the current world and returns its entries, most recent first.
    pub(crate) fn pop_world(&mut self) -> Rev<Drain<'_, T>> {
        trellis_assert_simple!(self.current_world > 0);

        let start = self.world_delimiter.pop().unwrap_or_default();
        self.current_world -= 1;
        self.entries.drain(start..).rev()
    }

    /// Merges the current world into its parent.
    ///
    /// Every entry of the current world is passed to `keep` (which may update it); the entries for
    /// which it returns `false` are dropped, the others become entries of the parent in their
    /// original order.
    pub(crate) fn commit_world(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        trellis_assert_simple!(self.current_world > 0);

        let start = self.world_delimiter.pop().unwrap_or_default();
        self.current_world -= 1;

        let mut retained = start;
        for index in start..self.entries.len() {
            if keep(&mut self.entries[index]) {
                self.entries.swap(retained, index);
                retained += 1;
            }
        }
        self.entries.truncate(retained);
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
