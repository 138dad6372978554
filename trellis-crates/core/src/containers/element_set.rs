use std::hash::Hash;

use super::HashSet;
use crate::basic_types::UnsupportedMutation;

/// The operations shared by the sets handed out by the core.
///
/// Mutations return a [`Result`] so that read-only wrappers such as [`ReadOnlySet`] can refuse
/// them instead of panicking.
pub trait ElementSet<T> {
    fn contains(&self, element: &T) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a;

    /// Returns whether the element was newly inserted.
    fn insert(&mut self, element: T) -> Result<bool, UnsupportedMutation>;

    /// Returns whether the element was present.
    fn remove(&mut self, element: &T) -> Result<bool, UnsupportedMutation>;

    fn clear(&mut self) -> Result<(), UnsupportedMutation>;
}

impl<T: Eq + Hash> ElementSet<T> for HashSet<T> {
    fn contains(&self, element: &T) -> bool {
        HashSet::contains(self, element)
    }

    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        HashSet::iter(self)
    }

    fn insert(&mut self, element: T) -> Result<bool, UnsupportedMutation> {
        Ok(HashSet::insert(self, element))
    }

    fn remove(&mut self, element: &T) -> Result<bool, UnsupportedMutation> {
        Ok(HashSet::remove(self, element))
    }

    fn clear(&mut self) -> Result<(), UnsupportedMutation> {
        HashSet::clear(self);
        Ok(())
    }
}

/// A view on a set which forwards all queries and rejects all mutations with
/// [`UnsupportedMutation`].
#[derive(Debug)]
pub struct ReadOnlySet<'a, Set> {
    inner: &'a Set,
}

impl<'a, Set> ReadOnlySet<'a, Set> {
    pub fn new(inner: &'a Set) -> Self {
        ReadOnlySet { inner }
    }
}

impl<Set> Clone for ReadOnlySet<'_, Set> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Set> Copy for ReadOnlySet<'_, Set> {}

impl<T, Set: ElementSet<T>> ElementSet<T> for ReadOnlySet<'_, Set> {
    fn contains(&self, element: &T) -> bool {
        self.inner.contains(element)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        T: 'a,
    {
        self.inner.iter()
    }

    fn insert(&mut self, _element: T) -> Result<bool, UnsupportedMutation> {
        Err(UnsupportedMutation { operation: "insert" })
    }

    fn remove(&mut self, _element: &T) -> Result<bool, UnsupportedMutation> {
        Err(UnsupportedMutation { operation: "remove" })
    }

    fn clear(&mut self) -> Result<(), UnsupportedMutation> {
        Err(UnsupportedMutation { operation: "clear" })
    }
}
