//! Rounding divisions used when mapping bounds through affine transformations.

use num::Integer;

pub(crate) trait NumExt {
    /// Division with rounding up.
    fn div_ceil(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_floor(self, other: Self) -> Self;
}

macro_rules! impl_num_ext {
    ($($int:ty),*) => {
        $(
            impl NumExt for $int {
                fn div_ceil(self, other: Self) -> Self {
                    Integer::div_ceil(&self, &other)
                }

                fn div_floor(self, other: Self) -> Self {
                    Integer::div_floor(&self, &other)
                }
            }
        )*
    };
}

impl_num_ext!(i32, i64);

/// Narrows a value to an `i32`, saturating at the bounds of `i32`.
pub(crate) fn saturate_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
