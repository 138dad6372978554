//! The backtrackable memory model.
//!
//! All state which has to be restored on backtracking lives in cells allocated by the
//! [`Environment`]. Every cell kind has its own trail which records, per world, the values that
//! have been overwritten in that world.
mod environment;
mod stored_cells;
mod stored_operations;
mod stored_values;
mod stored_vectors;
mod trail_kind;
mod world_trail;

pub use environment::*;
pub use stored_cells::*;
pub use stored_operations::StoredOperations;
pub use stored_operations::UndoOperation;
pub use stored_values::StoredValues;
pub use stored_vectors::StoredVectors;
pub use trail_kind::TrailKind;
pub(crate) use world_trail::WorldTrail;
