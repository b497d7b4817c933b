//! Sparse succinct representation of a monotone integer sequence, supporting
//! prefix-sum (`sum`) and its inverse (`inverse`) in `O(log k)`.
//!
//! Grounded on `CumulativeArray` in `support.cpp`: a non-decreasing sequence
//! `C[0..k]` with total `T` is encoded as `k` set bits at positions
//! `C[i] + i` in a conceptual bit vector of length `T + k`; see
//! `bitvector::SparseBitVector` for the storage this builds on.

use crate::bitvector::{SparseBitVector, SparseBitVectorBuilder};

/// `C[0..k]` with `sum(k) == total()`, represented as described above.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CumulativeArray {
    bits: SparseBitVector,
    total: u64,
}

/// Accumulates per-bucket counts and turns them into a `CumulativeArray` in
/// one pass, without materializing `C` first. Buckets must be closed in
/// order (`close_bucket` called once per bucket, in increasing index order).
pub struct CumulativeArrayBuilder {
    builder: SparseBitVectorBuilder,
    running: u64,
    bucket: u64,
}

impl CumulativeArrayBuilder {
    /// `total` is `T` (the final `sum`), `buckets` is `k` (the number of
    /// elements, i.e. `size()` of the finished array).
    pub fn new(total: u64, buckets: usize) -> Self {
        CumulativeArrayBuilder {
            builder: SparseBitVectorBuilder::new(total + buckets as u64, buckets),
            running: 0,
            bucket: 0,
        }
    }

    /// Closes the current bucket, crediting it with `count` more elements,
    /// and advances to the next bucket.
    pub fn close_bucket(&mut self, count: u64) {
        self.builder.set(self.running + self.bucket);
        self.running += count;
        self.bucket += 1;
    }

    pub fn finish(self, total: u64) -> CumulativeArray {
        CumulativeArray { bits: self.builder.finish(), total }
    }
}

impl CumulativeArray {
    pub fn new() -> Self {
        CumulativeArray::default()
    }

    /// Builds directly from the prefix sums `C[1..=k]` (i.e. `C[0]` is
    /// implicitly zero and is not passed in).
    pub fn from_prefix_sums(prefix_sums: &[u64], total: u64) -> Self {
        let mut builder = CumulativeArrayBuilder::new(total, prefix_sums.len());
        let mut prev = 0u64;
        for &value in prefix_sums {
            builder.close_bucket(value - prev);
            prev = value;
        }
        builder.finish(total)
    }

    /// Number of buckets (`k`).
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// `T`, the grand total.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `C[i]`: the prefix sum up to (not including) bucket `i`. `i` is
    /// clamped to `[0, size()]`.
    pub fn sum(&self, i: usize) -> u64 {
        let k = self.size();
        if i >= k {
            return self.total;
        }
        // position i's set bit is C[i] + i, 1-indexed as bit (i+1).
        self.bits.select(i + 1) - i as u64
    }

    /// The unique `i` such that `C[i] <= v < C[i+1]`. Undefined (clamped to
    /// the last bucket) when `v >= total()`.
    pub fn inverse(&self, v: u64) -> usize {
        let k = self.size();
        if k == 0 {
            return 0;
        }
        // C is monotone, so binary search directly on `sum(i) <= v`.
        let mut lo = 0usize;
        let mut hi = k; // exclusive upper bound on the answer
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if self.sum(mid) <= v {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}
