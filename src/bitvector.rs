//! A sparse bit vector supporting rank/select in `O(log k)` per query, where
//! `k` is the number of set bits.
//!
//! The upstream design stores a compressed (Elias–Fano style) bitmap; this
//! crate instead stores the sorted positions of the set bits directly and
//! answers rank/select by binary search. Asymptotically this is the same
//! `O(log k)` query cost and `O(k)` words of storage as the succinct
//! encoding it stands in for — see DESIGN.md for the tradeoff this records.
//! `CumulativeArray` and `BlockBoundaries` are both thin wrappers around this
//! type.

/// Sorted positions of the set bits of a conceptual bit vector of length
/// `universe`. `positions` is strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparseBitVector {
    positions: Vec<u64>,
    universe: u64,
}

/// Incrementally builds a `SparseBitVector` by setting bits in non-decreasing
/// order of position, mirroring `sdsl::sd_vector_builder`'s usage pattern in
/// the original `BWT::build`.
pub struct SparseBitVectorBuilder {
    positions: Vec<u64>,
    universe: u64,
    capacity: usize,
}

impl SparseBitVectorBuilder {
    pub fn new(universe: u64, capacity: usize) -> Self {
        SparseBitVectorBuilder { positions: Vec::with_capacity(capacity), universe, capacity }
    }

    /// Sets the bit at `position`. Positions must be supplied in
    /// non-decreasing order.
    pub fn set(&mut self, position: u64) {
        debug_assert!(position < self.universe, "position {position} out of universe {}", self.universe);
        debug_assert!(
            self.positions.last().map_or(true, |&last| last <= position),
            "positions must be set in non-decreasing order"
        );
        self.positions.push(position);
    }

    pub fn finish(self) -> SparseBitVector {
        debug_assert!(self.positions.len() <= self.capacity);
        SparseBitVector { positions: self.positions, universe: self.universe }
    }
}

impl SparseBitVector {
    /// An empty bit vector over a universe of size zero.
    pub fn new() -> Self {
        SparseBitVector::default()
    }

    pub fn from_positions(positions: Vec<u64>, universe: u64) -> Self {
        debug_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        SparseBitVector { positions, universe }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn universe(&self) -> u64 {
        self.universe
    }

    /// Number of set bits in `[0, i)`.
    pub fn rank(&self, i: u64) -> usize {
        self.positions.partition_point(|&p| p < i)
    }

    /// Position of the `k`-th set bit, 1-indexed. Panics if `k` is out of
    /// `[1, len()]` — callers clamp before calling, as every caller in this
    /// crate already knows `k` is in range.
    pub fn select(&self, k: usize) -> u64 {
        self.positions[k - 1]
    }

    pub fn positions(&self) -> &[u64] {
        &self.positions
    }
}
