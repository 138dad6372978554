//! A set over the indices `[0, universe)` which allows O(1) removals and O(|S|) traversal, in the
//! style of [\[1\]](https://hal.science/hal-01339250/document).
//!
//! The set guarantees that the first `len` entries of its dense array are the members. Removing an
//! element swaps it to position `len - 1`, after which the caller shrinks `len` by one. The length
//! is not owned by the set; the domains keep it in a backtrackable cell and restoring the cell
//! restores the set. Swaps only ever happen inside the live prefix, so the prefix of any older
//! length still holds exactly the older members.
//!
//! # Bibliography
//! \[1\] V. le C. de Saint-Marcq, P. Schaus, C. Solnon, and C. Lecoutre, ‘Sparse-sets for domain
//! implementation’, in CP workshop on Techniques foR Implementing Constraint programming Systems
//! (TRICS), 2013, pp. 1–10.

use crate::trellis_assert_moderate;

#[derive(Debug, Clone)]
pub(crate) struct SparseSet {
    /// The members live in `dense[..len]`.
    dense: Vec<usize>,
    /// For each element of the universe its position in `dense`, or [`usize::MAX`] when the
    /// element was never part of the set.
    positions: Vec<usize>,
}

impl SparseSet {
    /// Create a set containing `elements`, which must all be smaller than `universe` and be
    /// unique. The initial length of the set is the number of elements.
    pub(crate) fn new(elements: impl IntoIterator<Item = usize>, universe: usize) -> Self {
        let mut positions = vec![usize::MAX; universe];
        let mut dense = Vec::new();

        for element in elements {
            trellis_assert_moderate!(positions[element] == usize::MAX);
            positions[element] = dense.len();
            dense.push(element);
        }

        SparseSet { dense, positions }
    }

    /// The number of elements the set was created with.
    pub(crate) fn capacity(&self) -> usize {
        self.dense.len()
    }

    pub(crate) fn contains(&self, element: usize, len: usize) -> bool {
        self.positions
            .get(element)
            .is_some_and(|&position| position < len)
    }

    /// Moves `element` out of the live prefix of length `len`.
    ///
    /// Returns `true` if the element was a member; the new length is then `len - 1`.
    pub(crate) fn remove(&mut self, element: usize, len: usize) -> bool {
        if !self.contains(element, len) {
            return false;
        }

        let position = self.positions[element];
        let last = len - 1;
        let last_element = self.dense[last];

        self.dense.swap(position, last);
        self.positions[element] = last;
        self.positions[last_element] = position;

        true
    }

    /// Moves `element` to the front of the live prefix of length `len`, after which the caller
    /// shrinks the length to one.
    ///
    /// Returns `false` if the element was not a member.
    pub(crate) fn retain_only(&mut self, element: usize, len: usize) -> bool {
        if !self.contains(element, len) {
            return false;
        }

        let position = self.positions[element];
        let first_element = self.dense[0];

        self.dense.swap(position, 0);
        self.positions[element] = 0;
        self.positions[first_element] = position;

        true
    }

    pub(crate) fn iter(&self, len: usize) -> impl Iterator<Item = usize> + '_ {
        self.dense[..len].iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::SparseSet;

    #[test]
    fn removed_elements_are_no_longer_members() {
        let mut set = SparseSet::new(0..5, 5);

        assert!(set.remove(2, 5));
        assert!(!set.contains(2, 4));
        assert!(set.contains(4, 4));
        assert!(!set.remove(2, 4));
    }

    #[test]
    fn restoring_the_length_restores_the_members() {
        let mut set = SparseSet::new(0..4, 4);

        assert!(set.remove(0, 4));
        assert!(set.remove(3, 3));

        let mut members = set.iter(4).collect::<Vec<_>>();
        members.sort();
        assert_eq!(members, vec![0, 1, 2, 3]);
    }

    #[test]
    fn retaining_a_single_element_keeps_the_older_members_in_the_prefix() {
        let mut set = SparseSet::new(0..4, 4);

        assert!(set.retain_only(2, 4));
        assert_eq!(set.iter(1).collect::<Vec<_>>(), vec![2]);
        assert!(!set.contains(0, 1));

        let mut members = set.iter(4).collect::<Vec<_>>();
        members.sort();
        assert_eq!(members, vec![0, 1, 2, 3]);
    }

    #[test]
    fn elements_outside_the_initial_set_are_never_contained() {
        let set = SparseSet::new([0, 3], 4);

        assert_eq!(set.capacity(), 2);
        assert!(!set.contains(1, 2));
        assert!(!set.contains(17, 2));
    }
}
