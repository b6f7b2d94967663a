use bitvec::prelude::*;
use std::fmt;

/// Fixed-size bitset tracking which patterns or modules remain possible
///
/// Indices are 0-based catalog positions. Provides O(1) membership testing
/// and in-place set operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    bits: BitVec,
}

impl Membership {
    /// Create a set with no members
    pub fn new(capacity: usize) -> Self {
        Self {
            bits: bitvec![0; capacity],
        }
    }

    /// Create a set containing every index below `capacity`
    pub fn all(capacity: usize) -> Self {
        Self {
            bits: bitvec![1; capacity],
        }
    }

    /// Create a set from explicit members, ignoring indices out of range
    pub fn from_indices(indices: impl IntoIterator<Item = usize>, capacity: usize) -> Self {
        let mut set = Self::new(capacity);
        for index in indices {
            set.insert(index);
        }
        set
    }

    /// Number of indices the set can hold
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Add an index
    pub fn insert(&mut self, index: usize) {
        if index < self.bits.len() {
            self.bits.set(index, true);
        }
    }

    /// Remove an index, returning whether it was present
    pub fn remove(&mut self, index: usize) -> bool {
        let present = self.contains(index);
        if present {
            self.bits.set(index, false);
        }
        present
    }

    /// Test membership
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).as_deref() == Some(&true)
    }

    /// Remove every member
    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Test if no members are present
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Count members
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Iterate over members in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Collect members as a vector
    pub fn to_vec(&self) -> Vec<usize> {
        self.bits.iter_ones().collect()
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Membership({} members: {:?})", self.count(), self.to_vec())
    }
}
