use thiserror::Error;

/// A mutation was attempted on a structure which only allows reading, such as a
/// [`ReadOnlySet`](crate::containers::ReadOnlySet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unsupported operation on a read-only set: {operation}")]
pub struct UnsupportedMutation {
    pub operation: &'static str,
}
