use std::fmt::Debug;

use super::Environment;
use super::StoredValues;
use super::StoredVectors;
use super::TrailKind;
use crate::containers::StorageKey;

/// A handle to a backtrackable scalar cell allocated by an [`Environment`].
///
/// Reading and writing go through [`Environment::read`] and [`Environment::write`].
pub trait StoredCell: StorageKey + Copy + Debug + 'static {
    type Value: Copy + PartialEq + Debug;

    const KIND: TrailKind;

    #[doc(hidden)]
    fn storage(environment: &Environment) -> &StoredValues<Self>;

    #[doc(hidden)]
    fn storage_mut(environment: &mut Environment) -> &mut StoredValues<Self>;
}

/// A handle to a backtrackable vector allocated by an [`Environment`].
pub trait StoredVector: StorageKey + Copy + Debug + 'static {
    type Element: Copy + PartialEq + Debug;

    const KIND: TrailKind;

    #[doc(hidden)]
    fn storage(environment: &Environment) -> &StoredVectors<Self>;

    #[doc(hidden)]
    fn storage_mut(environment: &mut Environment) -> &mut StoredVectors<Self>;
}

macro_rules! stored_handle {
    ($(#[$documentation:meta])* $name:ident, $handle_trait:ident, $value_name:ident = $value:ty, $kind:expr, $storage:ty, $field:ident) => {
        $(#[$documentation])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl StorageKey for $name {
            fn index(&self) -> usize {
                self.0 as usize
            }

            fn create_from_index(index: usize) -> Self {
                $name(index as u32)
            }
        }

        impl $handle_trait for $name {
            type $value_name = $value;

            const KIND: TrailKind = $kind;

            fn storage(environment: &Environment) -> &$storage {
                &environment.$field
            }

            fn storage_mut(environment: &mut Environment) -> &mut $storage {
                &mut environment.$field
            }
        }
    };
}

stored_handle!(
    /// A backtrackable `i32`.
    StoredInt,
    StoredCell,
    Value = i32,
    TrailKind::Int,
    StoredValues<StoredInt>,
    int_trail
);

stored_handle!(
    /// A backtrackable `bool`.
    StoredBool,
    StoredCell,
    Value = bool,
    TrailKind::Bool,
    StoredValues<StoredBool>,
    bool_trail
);

stored_handle!(
    /// A backtrackable `i64`.
    StoredLong,
    StoredCell,
    Value = i64,
    TrailKind::Long,
    StoredValues<StoredLong>,
    long_trail
);

stored_handle!(
    /// A backtrackable `f64`.
    StoredDouble,
    StoredCell,
    Value = f64,
    TrailKind::Double,
    StoredValues<StoredDouble>,
    double_trail
);

stored_handle!(
    /// A backtrackable growable vector of `i32`.
    StoredIntVector,
    StoredVector,
    Element = i32,
    TrailKind::IntVector,
    StoredVectors<StoredIntVector>,
    int_vector_trail
);

stored_handle!(
    /// A backtrackable growable vector of `f64`.
    StoredDoubleVector,
    StoredVector,
    Element = f64,
    TrailKind::DoubleVector,
    StoredVectors<StoredDoubleVector>,
    double_vector_trail
);
