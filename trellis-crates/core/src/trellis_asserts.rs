//! Leveled assertions for the internal invariants of the core.
//!
//! Cheap checks run at [`TRELLIS_ASSERT_SIMPLE`]; checks that re-derive state (for example the
//! fixed-point check after propagation) only run when the `debug-checks` feature raises the level.

#[cfg(not(feature = "debug-checks"))]
pub const TRELLIS_ASSERT_LEVEL_DEFINITION: u8 = TRELLIS_ASSERT_SIMPLE;

#[cfg(feature = "debug-checks")]
pub const TRELLIS_ASSERT_LEVEL_DEFINITION: u8 = TRELLIS_ASSERT_EXTREME;

pub const TRELLIS_ASSERT_SIMPLE: u8 = 1;
pub const TRELLIS_ASSERT_MODERATE: u8 = 2;
pub const TRELLIS_ASSERT_ADVANCED: u8 = 3;
pub const TRELLIS_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TRELLIS_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TRELLIS_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TRELLIS_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TRELLIS_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! trellis_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::TRELLIS_ASSERT_LEVEL_DEFINITION >= $crate::asserts::TRELLIS_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}

/// Whether checks at the [`TRELLIS_ASSERT_EXTREME`] level are enabled.
pub(crate) const fn extreme_checks_enabled() -> bool {
    TRELLIS_ASSERT_LEVEL_DEFINITION >= TRELLIS_ASSERT_EXTREME
}
