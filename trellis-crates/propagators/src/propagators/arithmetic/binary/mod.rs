mod binary_not_equals;

pub use binary_not_equals::*;
