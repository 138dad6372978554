//! Lazily composed explanations of domain reductions and contradictions.
//!
//! Propagation only records a [`Reduction`] per accepted domain change. When the explanation of
//! a contradiction is requested, the records are walked backwards and the propagators which
//! caused them are asked which [`Deduction`]s justified their reductions.
mod explanation;
mod explanation_store;

pub use explanation::*;
pub use explanation_store::ConflictExplanation;
pub(crate) use explanation_store::ExplanationStore;
