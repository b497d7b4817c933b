//! Append-only, chunked byte container addressed by a 64-bit position.
//!
//! Physically a queue of fixed-size blocks; logically a byte array that only
//! ever grows at the tail and can be trimmed at the head. Trimming is the
//! mechanism that keeps an input BWT's RLE stream from staying fully
//! resident while it is consumed by `merge` (§4.5/§9 of the design).
//!
//! Grounded on `BlockArray` in `support.cpp`, adapted from a `vector<value_type*>`
//! of raw blocks to a `VecDeque<Vec<u8>>` so trimming is a plain `pop_front`.

use std::collections::VecDeque;

/// Block size in bytes: `2^20`, as suggested by the design.
pub const BLOCK_SIZE: usize = 1 << 20;

/// Chunked, append-only byte storage with head-trimming.
#[derive(Clone, Debug, Default)]
pub struct ByteBlocks {
    blocks: VecDeque<Vec<u8>>,
    /// Index of the first block still present in `blocks`; blocks before
    /// this one have been released by `trim_to`.
    base_block: u64,
    /// Total bytes ever appended. Never decreases, even after trimming.
    len: u64,
}

impl ByteBlocks {
    pub fn new() -> Self {
        ByteBlocks::default()
    }

    /// Total number of bytes ever appended (the RLE stream length in bytes).
    pub fn bytes(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn append_byte(&mut self, byte: u8) {
        let block_index = (self.len as usize) / BLOCK_SIZE;
        if block_index as u64 == self.base_block + self.blocks.len() as u64 {
            self.blocks.push_back(Vec::with_capacity(BLOCK_SIZE));
        }
        self.blocks.back_mut().expect("block just pushed").push(byte);
        self.len += 1;
    }

    /// Reads the byte at `pos`. Reading at a position before the current
    /// trim frontier is undefined behavior (per the design); this
    /// implementation panics, which is a valid realization of "undefined".
    pub fn read_byte(&self, pos: u64) -> u8 {
        let block_index = pos / BLOCK_SIZE as u64;
        let offset = (pos % BLOCK_SIZE as u64) as usize;
        let local = (block_index - self.base_block) as usize;
        self.blocks[local][offset]
    }

    /// Releases every complete block strictly before the block that holds
    /// `pos`. Later reads at released positions are undefined.
    pub fn trim_to(&mut self, pos: u64) {
        let keep_from_block = pos / BLOCK_SIZE as u64;
        while self.base_block < keep_from_block && !self.blocks.is_empty() {
            self.blocks.pop_front();
            self.base_block += 1;
        }
    }

    /// Number of blocks still resident (for diagnostics/tests only).
    pub fn resident_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Appends a whole slice, one byte at a time.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.append_byte(byte);
        }
    }

    /// Resident blocks in order, for bulk dumping by the format writers.
    pub fn iter_blocks(&self) -> impl Iterator<Item = &[u8]> {
        self.blocks.iter().map(|block| block.as_slice())
    }
}
