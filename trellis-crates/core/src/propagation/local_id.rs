use std::fmt::Display;

use crate::containers::StorageKey;

/// The name a propagator gives to one of its variables when registering it through
/// [`PropagatorConstructorContext::register`](super::PropagatorConstructorContext::register).
///
/// The engine hands the id back with every event on that variable, so a propagator watching the
/// same domain through two views can tell the two apart.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocalId(u32);

impl LocalId {
    pub const fn from(value: u32) -> Self {
        LocalId(value)
    }
}

impl StorageKey for LocalId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        LocalId(index as u32)
    }
}

impl Display for LocalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "local{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_index_their_variables() {
        let id = LocalId::from(3);

        assert_eq!(id.index(), 3);
        assert_eq!(LocalId::create_from_index(3), id);
        assert_eq!(id.to_string(), "local3");
    }
}
