use super::EnvironmentOptions;
use super::StoredCell;
use super::WorldTrail;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// The values of all cells of one kind, together with the trail recording their old values.
///
/// Next to its value, every cell remembers the stamp of the world in which it was last trailed;
/// a cell is trailed at most once per world.
#[derive(Debug, Clone)]
pub struct StoredValues<Cell: StoredCell> {
    values: KeyedVec<Cell, Cell::Value>,
    stamps: KeyedVec<Cell, u64>,
    trail: Trail<StoredChange<Cell>>,
}

#[derive(Debug, Clone, Copy)]
struct StoredChange<Cell: StoredCell> {
    cell: Cell,
    old_value: Cell::Value,
    old_stamp: u64,
}

impl<Cell: StoredCell> Default for StoredValues<Cell> {
    fn default() -> Self {
        StoredValues {
            values: KeyedVec::default(),
            stamps: KeyedVec::default(),
            trail: Trail::default(),
        }
    }
}

impl<Cell: StoredCell> StoredValues<Cell> {
    /// Create a trail which is pre-sized according to the provided options.
    pub fn with_capacity(options: EnvironmentOptions) -> Self {
        StoredValues {
            values: KeyedVec::default(),
            stamps: KeyedVec::default(),
            trail: Trail::with_capacity(options.initial_updates, options.initial_worlds),
        }
    }

    /// The number of cells stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn grow(&mut self, initial_value: Cell::Value, stamp: u64) -> Cell {
        let _ = self.stamps.push(stamp);
        self.values.push(initial_value)
    }

    pub(crate) fn read(&self, cell: Cell) -> Cell::Value {
        self.values[cell]
    }

    pub(crate) fn write(&mut self, cell: Cell, value: Cell::Value, stamp: u64) {
        let old_value = self.values[cell];
        if old_value == value {
            return;
        }

        let old_stamp = self.stamps[cell];
        if old_stamp != stamp {
            self.trail.push(StoredChange {
                cell,
                old_value,
                old_stamp,
            });
            self.stamps[cell] = stamp;
        }

        self.values[cell] = value;
    }
}

impl<Cell: StoredCell> WorldTrail for StoredValues<Cell> {
    fn world_push(&mut self) {
        self.trail.push_world();
    }

    fn world_pop(&mut self) {
        for change in self.trail.pop_world() {
            self.values[change.cell] = change.old_value;
            self.stamps[change.cell] = change.old_stamp;
        }
    }

    fn world_commit(&mut self, parent_stamp: u64) {
        let stamps = &mut self.stamps;
        self.trail.commit_world(|change| {
            stamps[change.cell] = parent_stamp;
            // The parent already holds an entry for the cell with an older value.
            change.old_stamp != parent_stamp
        });
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StoredInt;

    #[test]
    fn a_cell_is_trailed_once_per_world() {
        let mut values: StoredValues<StoredInt> = StoredValues::default();
        let cell = values.grow(0, 0);

        values.world_push();
        values.write(cell, 5, 1);
        values.write(cell, 10, 1);
        values.write(cell, 11, 1);

        assert_eq!(values.num_entries(), 1);

        values.world_pop();
        assert_eq!(values.read(cell), 0);
    }

    #[test]
    fn writing_the_current_value_is_not_trailed() {
        let mut values: StoredValues<StoredInt> = StoredValues::default();
        let cell = values.grow(3, 0);

        values.world_push();
        values.write(cell, 3, 1);

        assert_eq!(values.num_entries(), 0);
    }

    #[test]
    fn committing_drops_entries_the_parent_already_has() {
        let mut values: StoredValues<StoredInt> = StoredValues::default();
        let cell = values.grow(0, 0);

        values.world_push();
        values.write(cell, 1, 1);
        values.world_push();
        values.write(cell, 2, 2);
        values.world_commit(1);

        assert_eq!(values.num_entries(), 1);
        assert_eq!(values.read(cell), 2);

        values.world_pop();
        assert_eq!(values.read(cell), 0);
    }
}
