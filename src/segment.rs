//! Segment identity and insertion-ordered segment sets
//!
//! A segment is an unordered pair of point indices. Its identity is the Cantor
//! pairing of the sorted endpoints, which is a bijection between unordered index
//! pairs and `u64`, so ids can be used directly as map keys and decoded back.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cantor pairing of an ordered index pair
///
/// `pair_index(a, b) = (a + b)(a + b + 1) / 2 + a`
#[inline]
pub fn pair_index(a: usize, b: usize) -> u64 {
    let (a, b) = (a as u64, b as u64);
    let sum = a + b;
    sum * (sum + 1) / 2 + a
}

/// Order-insensitive identity of a segment
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    /// Identity of the segment between points `a` and `b`, in either order
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        if a > b {
            Self(pair_index(b, a))
        } else {
            Self(pair_index(a, b))
        }
    }

    /// Raw pairing value
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Decode the endpoints as `(min, max)`
    pub fn endpoints(self) -> (usize, usize) {
        let z = self.0;
        let triangle = |w: u64| w * (w + 1) / 2;

        // Float estimate of the diagonal, corrected for rounding
        let mut w = (((8.0 * z as f64 + 1.0).sqrt() - 1.0) / 2.0) as u64;
        while triangle(w) > z {
            w -= 1;
        }
        while triangle(w + 1) <= z {
            w += 1;
        }

        let a = z - triangle(w);
        (a as usize, (w - a) as usize)
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SegmentId> for u64 {
    fn from(id: SegmentId) -> Self {
        id.0
    }
}

/// Set of segment ids iterated in insertion order
///
/// Removing an id and inserting it again moves it to the end. Used both for the
/// boundary/internal registries and as the fine-tune worklist, where popping the
/// first element while appending newly touched segments gives a deterministic
/// fixed-point iteration.
#[derive(Debug, Clone, Default)]
pub struct SegmentSet {
    order: BTreeMap<u64, SegmentId>,
    slots: HashMap<SegmentId, u64>,
    next_slot: u64,
}

impl SegmentSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end; returns false if the id was already present
    pub fn insert(&mut self, id: SegmentId) -> bool {
        if self.slots.contains_key(&id) {
            return false;
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        self.slots.insert(id, slot);
        self.order.insert(slot, id);
        true
    }

    /// Remove an id; returns false if it was absent
    pub fn remove(&mut self, id: SegmentId) -> bool {
        match self.slots.remove(&id) {
            Some(slot) => {
                self.order.remove(&slot);
                true
            }
            None => false,
        }
    }

    /// Remove and return the oldest id
    pub fn pop_first(&mut self) -> Option<SegmentId> {
        let (_, id) = self.order.pop_first()?;
        self.slots.remove(&id);
        Some(id)
    }

    #[inline]
    pub fn contains(&self, id: SegmentId) -> bool {
        self.slots.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.order.values().copied()
    }

    /// Collect into a vector in insertion order
    pub fn to_vec(&self) -> Vec<SegmentId> {
        self.iter().collect()
    }
}

impl FromIterator<SegmentId> for SegmentSet {
    fn from_iter<I: IntoIterator<Item = SegmentId>>(iter: I) -> Self {
        let mut set = SegmentSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
