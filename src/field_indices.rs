//! Sets of field indices.
//!
//! Two flavours are used by the board:
//!
//! - [`FieldIndices`] backs the board-wide indices (empty fields, legal moves
//!   per colour). It keeps a dense slot table so insert, remove and lookup are
//!   O(1), and the elements can be sampled uniformly by position. Removal
//!   swaps the last element into the freed slot.
//! - [`FieldSet`] backs per-group stone and liberty sets. These are small, so
//!   a plain vector with linear lookup beats hashing and keeps board copies
//!   cheap.

use crate::coord::Point;

const NO_SLOT: u32 = u32::MAX;

/// Set of field indices in `0..capacity` with O(1) insert/remove/contains.
#[derive(Clone, Debug)]
pub struct FieldIndices {
    items: Vec<Point>,
    slots: Vec<u32>,
}

impl FieldIndices {
    /// Create an empty set able to hold indices `0..capacity`.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: vec![NO_SLOT; capacity],
        }
    }

    /// Create a set holding every index in `0..capacity`.
    pub fn full(capacity: usize) -> Self {
        Self {
            items: (0..capacity).collect(),
            slots: (0..capacity as u32).collect(),
        }
    }

    /// Insert `p`. Returns `false` if it was already present.
    pub fn insert(&mut self, p: Point) -> bool {
        if self.slots[p] != NO_SLOT {
            return false;
        }
        self.slots[p] = self.items.len() as u32;
        self.items.push(p);
        true
    }

    /// Remove `p`. Returns `false` if it wasn't present.
    pub fn remove(&mut self, p: Point) -> bool {
        let slot = self.slots[p];
        if slot == NO_SLOT {
            return false;
        }
        self.slots[p] = NO_SLOT;
        self.items.swap_remove(slot as usize);
        if let Some(&moved) = self.items.get(slot as usize) {
            self.slots[moved] = slot;
        }
        true
    }

    /// Insert or remove `p` so that membership equals `present`.
    #[inline]
    pub fn set(&mut self, p: Point, present: bool) {
        if present {
            self.insert(p);
        } else {
            self.remove(p);
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.slots[p] != NO_SLOT
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Element stored at position `i` (`i < len()`), used for sampling.
    #[inline]
    pub fn get(&self, i: usize) -> Point {
        self.items[i]
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.items.iter().copied()
    }
}

/// Small set of unique field indices with linear lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldSet(Vec<Point>);

impl FieldSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert `p`. Returns `false` if it was already present.
    pub fn insert(&mut self, p: Point) -> bool {
        if self.0.contains(&p) {
            return false;
        }
        self.0.push(p);
        true
    }

    /// Remove `p`. Returns `false` if it wasn't present.
    pub fn remove(&mut self, p: Point) -> bool {
        match self.0.iter().position(|&q| q == p) {
            Some(i) => {
                self.0.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Union `other` into `self`, dropping duplicates.
    pub fn merge(&mut self, other: &FieldSet) {
        for &p in &other.0 {
            self.insert(p);
        }
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.0.contains(&p)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Point> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for p in iter {
            set.insert(p);
        }
        set
    }
}
