//! Contains propagator implementations that are used in Trellis.
//!
//! See the [`propagation`] for info on propagators.
#[cfg(doc)]
use trellis_core::propagation;

pub(crate) mod arithmetic;
pub use arithmetic::*;
