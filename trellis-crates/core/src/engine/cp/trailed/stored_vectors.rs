use super::EnvironmentOptions;
use super::StoredVector;
use super::WorldTrail;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::trellis_assert_simple;

/// The contents of all vectors of one kind, together with the trail recording overwritten
/// elements and lengths.
///
/// Both every element slot and the length of a vector carry the stamp of the world in which they
/// were last trailed. Pushing onto a vector trails the slot it reuses, since an older world may
/// still see the element in it; only a slot that is appended to the storage for the first time is
/// not trailed, as restoring the length hides it.
#[derive(Debug, Clone)]
pub struct StoredVectors<Vector: StoredVector> {
    vectors: KeyedVec<Vector, VectorData<Vector::Element>>,
    trail: Trail<VectorChange<Vector>>,
}

#[derive(Debug, Clone)]
struct VectorData<Element> {
    elements: Vec<Element>,
    element_stamps: Vec<u64>,
    len: usize,
    len_stamp: u64,
}

#[derive(Debug, Clone, Copy)]
enum VectorChange<Vector: StoredVector> {
    Element {
        vector: Vector,
        index: usize,
        old_value: Vector::Element,
        old_stamp: u64,
    },
    Length {
        vector: Vector,
        old_len: usize,
        old_stamp: u64,
    },
}

impl<Vector: StoredVector> Default for StoredVectors<Vector> {
    fn default() -> Self {
        StoredVectors {
            vectors: KeyedVec::default(),
            trail: Trail::default(),
        }
    }
}

impl<Vector: StoredVector> StoredVectors<Vector> {
    /// Create a trail which is pre-sized according to the provided options.
    pub fn with_capacity(options: EnvironmentOptions) -> Self {
        StoredVectors {
            vectors: KeyedVec::default(),
            trail: Trail::with_capacity(options.initial_updates, options.initial_worlds),
        }
    }

    /// The number of vectors stored.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub(crate) fn grow(&mut self, len: usize, initial_value: Vector::Element, stamp: u64) -> Vector {
        self.vectors.push(VectorData {
            elements: vec![initial_value; len],
            element_stamps: vec![stamp; len],
            len,
            len_stamp: stamp,
        })
    }

    pub(crate) fn vector_len(&self, vector: Vector) -> usize {
        self.vectors[vector].len
    }

    pub(crate) fn get(&self, vector: Vector, index: usize) -> Option<Vector::Element> {
        let data = &self.vectors[vector];
        (index < data.len).then(|| data.elements[index])
    }

    pub(crate) fn set(&mut self, vector: Vector, index: usize, value: Vector::Element, stamp: u64) {
        trellis_assert_simple!(
            index < self.vectors[vector].len,
            "index {index} is out of bounds for {vector:?}"
        );
        self.write_element(vector, index, value, stamp);
    }

    pub(crate) fn push(&mut self, vector: Vector, value: Vector::Element, stamp: u64) {
        let len = self.vectors[vector].len;

        if len == self.vectors[vector].elements.len() {
            let data = &mut self.vectors[vector];
            data.elements.push(value);
            data.element_stamps.push(stamp);
        } else {
            // The slot may still be live in an older world.
            self.write_element(vector, len, value, stamp);
        }

        self.write_len(vector, len + 1, stamp);
    }

    pub(crate) fn pop(&mut self, vector: Vector, stamp: u64) -> Option<Vector::Element> {
        let len = self.vectors[vector].len;
        if len == 0 {
            return None;
        }

        let last = self.vectors[vector].elements[len - 1];
        self.write_len(vector, len - 1, stamp);
        Some(last)
    }

    fn write_element(&mut self, vector: Vector, index: usize, value: Vector::Element, stamp: u64) {
        let data = &mut self.vectors[vector];
        let old_value = data.elements[index];
        if old_value == value {
            return;
        }

        let old_stamp = data.element_stamps[index];
        if old_stamp != stamp {
            self.trail.push(VectorChange::Element {
                vector,
                index,
                old_value,
                old_stamp,
            });
            data.element_stamps[index] = stamp;
        }

        data.elements[index] = value;
    }

    fn write_len(&mut self, vector: Vector, len: usize, stamp: u64) {
        let data = &mut self.vectors[vector];
        let old_len = data.len;
        if old_len == len {
            return;
        }

        let old_stamp = data.len_stamp;
        if old_stamp != stamp {
            self.trail.push(VectorChange::Length {
                vector,
                old_len,
                old_stamp,
            });
            data.len_stamp = stamp;
        }

        data.len = len;
    }
}

impl<Vector: StoredVector> WorldTrail for StoredVectors<Vector> {
    fn world_push(&mut self) {
        self.trail.push_world();
    }

    fn world_pop(&mut self) {
        for change in self.trail.pop_world() {
            match change {
                VectorChange::Element {
                    vector,
                    index,
                    old_value,
                    old_stamp,
                } => {
                    let data = &mut self.vectors[vector];
                    data.elements[index] = old_value;
                    data.element_stamps[index] = old_stamp;
                }
                VectorChange::Length {
                    vector,
                    old_len,
                    old_stamp,
                } => {
                    let data = &mut self.vectors[vector];
                    data.len = old_len;
                    data.len_stamp = old_stamp;
                }
            }
        }
    }

    fn world_commit(&mut self, parent_stamp: u64) {
        let vectors = &mut self.vectors;
        self.trail.commit_world(|change| match change {
            VectorChange::Element {
                vector,
                index,
                old_stamp,
                ..
            } => {
                vectors[*vector].element_stamps[*index] = parent_stamp;
                *old_stamp != parent_stamp
            }
            VectorChange::Length {
                vector, old_stamp, ..
            } => {
                vectors[*vector].len_stamp = parent_stamp;
                *old_stamp != parent_stamp
            }
        });
    }

    fn world(&self) -> usize {
        self.trail.world()
    }

    fn num_entries(&self) -> usize {
        self.trail.len()
    }

    fn reserve(&mut self, options: EnvironmentOptions) {
        self.trail
            .reserve(options.initial_updates, options.initial_worlds);
    }
}
