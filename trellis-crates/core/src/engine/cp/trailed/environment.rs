use enum_map::enum_map;
use enum_map::EnumMap;
use log::debug;
use log::trace;

use super::StoredBool;
use super::StoredCell;
use super::StoredDouble;
use super::StoredDoubleVector;
use super::StoredInt;
use super::StoredIntVector;
use super::StoredLong;
use super::StoredOperations;
use super::StoredValues;
use super::StoredVector;
use super::StoredVectors;
use super::TrailKind;
use super::UndoOperation;
use super::WorldTrail;
use crate::basic_types::EnvironmentError;

/// Options which determine how the trails of an [`Environment`] are pre-sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentOptions {
    /// The number of trail entries each trail reserves when it is declared.
    pub initial_updates: usize,
    /// The number of worlds each trail reserves when it is declared.
    pub initial_worlds: usize,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            initial_updates: 256,
            initial_worlds: 128,
        }
    }
}

/// Owner of all backtrackable memory.
///
/// The environment keeps a stack of worlds. [`Environment::push`] opens a new world,
/// [`Environment::pop`] restores every cell to the value it had when the current world was
/// opened, and [`Environment::commit`] merges the current world into its parent so that its
/// changes survive the next [`Environment::pop`] of the parent only as far as the parent's own
/// changes do.
///
/// Cells are allocated with the `make_*` methods; the trail for a cell kind is declared the first
/// time a cell of that kind is made, or explicitly through the `set_*_trail` methods. State which
/// does not fit in a cell can register an undo action with [`Environment::save`].
///
/// # Example
/// ```
/// use trellis_core::environment::Environment;
///
/// let mut environment = Environment::default();
/// let counter = environment.make_int(0);
///
/// environment.push();
/// environment.write(counter, 5);
/// assert_eq!(environment.read(counter), 5);
///
/// environment.pop().expect("world 1 is open");
/// assert_eq!(environment.read(counter), 0);
/// ```
#[derive(Debug)]
pub struct Environment {
    current_world: usize,
    /// Increased on every push and pop.
    timestamp: u64,
    /// The stamp of every open world; the root world has stamp 0.
    world_stamps: Vec<u64>,
    options: EnvironmentOptions,
    /// The declared trails, in declaration order.
    declared: Vec<TrailKind>,

    pub(crate) int_trail: StoredValues<StoredInt>,
    pub(crate) bool_trail: StoredValues<StoredBool>,
    pub(crate) long_trail: StoredValues<StoredLong>,
    pub(crate) double_trail: StoredValues<StoredDouble>,
    pub(crate) int_vector_trail: StoredVectors<StoredIntVector>,
    pub(crate) double_vector_trail: StoredVectors<StoredDoubleVector>,
    operation_trail: StoredOperations,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::with_options(EnvironmentOptions::default())
    }
}

impl Environment {
    pub fn with_options(options: EnvironmentOptions) -> Self {
        Environment {
            current_world: 0,
            timestamp: 0,
            world_stamps: vec![0],
            options,
            declared: Vec::new(),
            int_trail: StoredValues::default(),
            bool_trail: StoredValues::default(),
            long_trail: StoredValues::default(),
            double_trail: StoredValues::default(),
            int_vector_trail: StoredVectors::default(),
            double_vector_trail: StoredVectors::default(),
            operation_trail: StoredOperations::default(),
        }
    }

    /// The depth of the current world; the root world is 0.
    pub fn current_world(&self) -> usize {
        self.current_world
    }

    /// A counter which changes on every [`Environment::push`] and [`Environment::pop`].
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The number of entries currently recorded on each trail.
    pub fn trail_sizes(&self) -> EnumMap<TrailKind, usize> {
        enum_map! {
            kind => self.world_trail(kind).num_entries(),
        }
    }

    /// Returns whether a trail for the given kind has been declared.
    pub fn is_declared(&self, kind: TrailKind) -> bool {
        self.declared.contains(&kind)
    }

    pub(crate) fn current_stamp(&self) -> u64 {
        self.world_stamps.last().copied().unwrap_or_default()
    }
}

/// Operations on worlds.
impl Environment {
    /// Opens a new world.
    pub fn push(&mut self) {
        self.timestamp += 1;
        self.world_stamps.push(self.timestamp);

        for index in 0..self.declared.len() {
            let kind = self.declared[index];
            self.world_trail_mut(kind).world_push();
        }

        self.current_world += 1;
        trace!("pushed world {}", self.current_world);
    }

    /// Restores every cell written in the current world and returns to the parent world.
    ///
    /// The trails are restored in the reverse order of their declaration.
    pub fn pop(&mut self) -> Result<(), EnvironmentError> {
        if self.current_world == 0 {
            return Err(EnvironmentError::PopAtRootWorld);
        }

        self.timestamp += 1;

        for index in (0..self.declared.len()).rev() {
            let kind = self.declared[index];
            self.world_trail_mut(kind).world_pop();
        }

        let _ = self.world_stamps.pop();
        self.current_world -= 1;
        trace!("popped to world {}", self.current_world);

        Ok(())
    }

    /// Merges the current world into its parent without restoring anything.
    ///
    /// After a commit the values written in the committed world can no longer be undone
    /// separately; popping the parent undoes them together with the parent's own changes.
    pub fn commit(&mut self) -> Result<(), EnvironmentError> {
        if self.current_world == 0 {
            return Err(EnvironmentError::CommitAtRootWorld);
        }

        let _ = self.world_stamps.pop();
        self.current_world -= 1;
        let parent_stamp = self.current_stamp();

        for index in 0..self.declared.len() {
            let kind = self.declared[index];
            self.world_trail_mut(kind).world_commit(parent_stamp);
        }

        trace!("committed into world {}", self.current_world);

        Ok(())
    }
}

/// Allocation, reading and writing of scalar cells.
impl Environment {
    pub fn make_int(&mut self, initial_value: i32) -> StoredInt {
        self.make(initial_value)
    }

    pub fn make_bool(&mut self, initial_value: bool) -> StoredBool {
        self.make(initial_value)
    }

    pub fn make_long(&mut self, initial_value: i64) -> StoredLong {
        self.make(initial_value)
    }

    pub fn make_float(&mut self, initial_value: f64) -> StoredDouble {
        self.make(initial_value)
    }

    /// Allocate a cell of any kind.
    pub fn make<Cell: StoredCell>(&mut self, initial_value: Cell::Value) -> Cell {
        self.declare(Cell::KIND);
        let stamp = self.current_stamp();
        Cell::storage_mut(self).grow(initial_value, stamp)
    }

    pub fn read<Cell: StoredCell>(&self, cell: Cell) -> Cell::Value {
        Cell::storage(self).read(cell)
    }

    /// Write a value to the cell; the old value is recorded the first time the cell is written in
    /// the current world.
    pub fn write<Cell: StoredCell>(&mut self, cell: Cell, value: Cell::Value) {
        let stamp = self.current_stamp();
        Cell::storage_mut(self).write(cell, value, stamp)
    }

    /// Add `delta` to the cell and return the new value.
    ///
    /// Returns [`None`] and leaves the cell untouched if the sum overflows.
    pub fn add(&mut self, cell: StoredInt, delta: i32) -> Option<i32> {
        let value = self.read(cell).checked_add(delta)?;
        self.write(cell, value);
        Some(value)
    }

    /// Add `delta` to the cell and return the new value.
    ///
    /// Returns [`None`] and leaves the cell untouched if the sum overflows.
    pub fn add_long(&mut self, cell: StoredLong, delta: i64) -> Option<i64> {
        let value = self.read(cell).checked_add(delta)?;
        self.write(cell, value);
        Some(value)
    }
}

/// Undo actions.
impl Environment {
    /// Save an action which is run when the current world is popped.
    ///
    /// Actions are run in the reverse order in which they were saved. Committing the current world
    /// hands its actions to the parent; actions saved in the root world are never run.
    pub fn save(&mut self, operation: impl FnOnce() + 'static) {
        self.declare(TrailKind::Operation);
        self.operation_trail.save(Box::new(operation) as UndoOperation);
    }
}

/// Allocation, reading and writing of vectors.
impl Environment {
    pub fn make_int_vector(&mut self, len: usize, initial_value: i32) -> StoredIntVector {
        self.make_vector(len, initial_value)
    }

    pub fn make_double_vector(&mut self, len: usize, initial_value: f64) -> StoredDoubleVector {
        self.make_vector(len, initial_value)
    }

    /// Allocate a vector of any kind with `len` copies of `initial_value`.
    pub fn make_vector<Vector: StoredVector>(
        &mut self,
        len: usize,
        initial_value: Vector::Element,
    ) -> Vector {
        self.declare(Vector::KIND);
        let stamp = self.current_stamp();
        Vector::storage_mut(self).grow(len, initial_value, stamp)
    }

    pub fn vector_len<Vector: StoredVector>(&self, vector: Vector) -> usize {
        Vector::storage(self).vector_len(vector)
    }

    /// Returns the element at `index`, or [`None`] if the index is out of bounds.
    pub fn vector_get<Vector: StoredVector>(
        &self,
        vector: Vector,
        index: usize,
    ) -> Option<Vector::Element> {
        Vector::storage(self).get(vector, index)
    }

    /// Overwrite the element at `index`, which has to be in bounds.
    pub fn vector_set<Vector: StoredVector>(
        &mut self,
        vector: Vector,
        index: usize,
        value: Vector::Element,
    ) {
        let stamp = self.current_stamp();
        Vector::storage_mut(self).set(vector, index, value, stamp)
    }

    pub fn vector_push<Vector: StoredVector>(&mut self, vector: Vector, value: Vector::Element) {
        let stamp = self.current_stamp();
        Vector::storage_mut(self).push(vector, value, stamp)
    }

    pub fn vector_pop<Vector: StoredVector>(&mut self, vector: Vector) -> Option<Vector::Element> {
        let stamp = self.current_stamp();
        Vector::storage_mut(self).pop(vector, stamp)
    }
}

/// Explicit declaration of trails.
impl Environment {
    pub fn set_int_trail(&mut self, trail: StoredValues<StoredInt>) -> Result<(), EnvironmentError> {
        self.set_trail(trail)
    }

    pub fn set_bool_trail(
        &mut self,
        trail: StoredValues<StoredBool>,
    ) -> Result<(), EnvironmentError> {
        self.set_trail(trail)
    }

    pub fn set_long_trail(
        &mut self,
        trail: StoredValues<StoredLong>,
    ) -> Result<(), EnvironmentError> {
        self.set_trail(trail)
    }

    pub fn set_double_trail(
        &mut self,
        trail: StoredValues<StoredDouble>,
    ) -> Result<(), EnvironmentError> {
        self.set_trail(trail)
    }

    pub fn set_int_vector_trail(
        &mut self,
        trail: StoredVectors<StoredIntVector>,
    ) -> Result<(), EnvironmentError> {
        self.set_vector_trail(trail)
    }

    pub fn set_double_vector_trail(
        &mut self,
        trail: StoredVectors<StoredDoubleVector>,
    ) -> Result<(), EnvironmentError> {
        self.set_vector_trail(trail)
    }

    pub fn set_operation_trail(
        &mut self,
        trail: StoredOperations,
    ) -> Result<(), EnvironmentError> {
        if self.is_declared(TrailKind::Operation) {
            return Err(EnvironmentError::TrailAlreadyDeclared(TrailKind::Operation));
        }

        self.operation_trail = trail;
        self.register(TrailKind::Operation);
        Ok(())
    }

    /// Install the trail for the kind of `Cell`.
    ///
    /// A kind can be declared only once, either explicitly or by making the first cell of that
    /// kind.
    pub fn set_trail<Cell: StoredCell>(
        &mut self,
        trail: StoredValues<Cell>,
    ) -> Result<(), EnvironmentError> {
        if self.is_declared(Cell::KIND) {
            return Err(EnvironmentError::TrailAlreadyDeclared(Cell::KIND));
        }

        *Cell::storage_mut(self) = trail;
        self.register(Cell::KIND);
        Ok(())
    }

    /// Install the trail for the kind of `Vector`.
    pub fn set_vector_trail<Vector: StoredVector>(
        &mut self,
        trail: StoredVectors<Vector>,
    ) -> Result<(), EnvironmentError> {
        if self.is_declared(Vector::KIND) {
            return Err(EnvironmentError::TrailAlreadyDeclared(Vector::KIND));
        }

        *Vector::storage_mut(self) = trail;
        self.register(Vector::KIND);
        Ok(())
    }

    fn declare(&mut self, kind: TrailKind) {
        if self.is_declared(kind) {
            return;
        }

        let options = self.options;
        self.world_trail_mut(kind).reserve(options);
        self.register(kind);
    }

    fn register(&mut self, kind: TrailKind) {
        let world = self.current_world;
        self.world_trail_mut(kind).align_to_world(world);
        self.declared.push(kind);
        debug!("declared the {kind} trail in world {world}");
    }

    fn world_trail(&self, kind: TrailKind) -> &dyn WorldTrail {
        match kind {
            TrailKind::Int => &self.int_trail,
            TrailKind::Bool => &self.bool_trail,
            TrailKind::Long => &self.long_trail,
            TrailKind::Double => &self.double_trail,
            TrailKind::IntVector => &self.int_vector_trail,
            TrailKind::DoubleVector => &self.double_vector_trail,
            TrailKind::Operation => &self.operation_trail,
        }
    }

    fn world_trail_mut(&mut self, kind: TrailKind) -> &mut dyn WorldTrail {
        match kind {
            TrailKind::Int => &mut self.int_trail,
            TrailKind::Bool => &mut self.bool_trail,
            TrailKind::Long => &mut self.long_trail,
            TrailKind::Double => &mut self.double_trail,
            TrailKind::IntVector => &mut self.int_vector_trail,
            TrailKind::DoubleVector => &mut self.double_vector_trail,
            TrailKind::Operation => &mut self.operation_trail,
        }
    }
}
