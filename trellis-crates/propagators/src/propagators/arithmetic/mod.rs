//! Contains a number of propagators for a variety of arithmetic constraints.
pub(crate) mod binary;

pub use binary::*;
