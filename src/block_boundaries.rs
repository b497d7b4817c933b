//! Sparse bit vector of block-end positions, with rank/select over blocks.
//!
//! One bit is set at the last BWT position of each block; `rank(i)` gives
//! the index of the block containing position `i`, and `select(b)` gives the
//! text position of the end of block `b` (0-indexed in both cases, matching
//! `BWT::block_rank` / `BWT::block_select` in the original source).

use crate::bitvector::{SparseBitVector, SparseBitVectorBuilder};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockBoundaries {
    bits: SparseBitVector,
}

pub struct BlockBoundariesBuilder {
    builder: SparseBitVectorBuilder,
}

impl BlockBoundariesBuilder {
    /// `text_len` is `n`, `blocks` is the expected number of block ends.
    pub fn new(text_len: u64, blocks: usize) -> Self {
        BlockBoundariesBuilder { builder: SparseBitVectorBuilder::new(text_len, blocks) }
    }

    /// Marks `position` (the last BWT position covered by a block) as a
    /// block end. Must be called in increasing order of `position`.
    pub fn mark_block_end(&mut self, position: u64) {
        self.builder.set(position);
    }

    pub fn finish(self) -> BlockBoundaries {
        BlockBoundaries { bits: self.builder.finish() }
    }
}

impl BlockBoundaries {
    pub fn new() -> Self {
        BlockBoundaries::default()
    }

    pub fn block_count(&self) -> usize {
        self.bits.len()
    }

    /// Index of the block containing text position `i` (`i` clamped to the
    /// text length beforehand by the caller).
    pub fn rank(&self, i: u64) -> usize {
        self.bits.rank(i)
    }

    /// Text position of the end of block `b` (0-indexed blocks).
    pub fn select(&self, b: usize) -> u64 {
        self.bits.select(b + 1)
    }
}
