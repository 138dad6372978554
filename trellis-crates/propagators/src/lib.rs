//! Contains the propagators used by Trellis.
//!
//! If you want to implement your own propagator then we recommend following the guide in
//! [`trellis_core::propagation`].
mod propagators;
pub use propagators::*;
