//! Merge tuning knobs.
//!
//! Grounded on `MergeParameters` in `fmi.h`: the same named fields and
//! default magnitudes (an 8 MiB run buffer, a 256 MiB thread buffer, 6
//! merge buffers, one thread per available core, 4 sequence blocks per
//! thread), carried over as a plain configuration struct with a
//! `sanitize()` pass instead of the constructor-time clamping the original
//! does inline.

use std::path::PathBuf;

const MEGABYTE: usize = 1 << 20;

/// Tunable parameters for [`crate::merge::merge`]. Defaults mirror the
/// upstream constants; `sanitize()` clamps nonsensical values (zero sizes,
/// zero threads) back up to them, logging a warning for each one it
/// touches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeParameters {
    /// Directives batched per producer→consumer handoff through the
    /// [`crate::merge::RABuffer`].
    pub run_buffer_size: usize,
    /// Upper bound on resident bytes per merge thread's working set.
    pub thread_buffer_size: usize,
    /// Number of in-flight merge buffers.
    pub merge_buffers: usize,
    /// Worker threads available to a host that parallelizes across many
    /// independent merges; the core itself always uses exactly two
    /// (producer, consumer) per merge.
    pub threads: usize,
    /// Sequence blocks processed per thread by the external merge planner.
    pub sequence_blocks: usize,
    /// Scratch directory for disk-backed intermediates, if any.
    pub temp_dir: Option<PathBuf>,
}

impl Default for MergeParameters {
    fn default() -> Self {
        MergeParameters {
            run_buffer_size: 8 * MEGABYTE,
            thread_buffer_size: 256 * MEGABYTE,
            merge_buffers: 6,
            threads: std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            sequence_blocks: 4,
            temp_dir: None,
        }
    }
}

impl MergeParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamps zero/nonsensical fields up to their defaults, logging a
    /// warning for each one changed.
    pub fn sanitize(&mut self) {
        let defaults = MergeParameters::default();
        if self.run_buffer_size == 0 {
            log::warn!("run_buffer_size was 0, using default {}", defaults.run_buffer_size);
            self.run_buffer_size = defaults.run_buffer_size;
        }
        if self.thread_buffer_size == 0 {
            log::warn!("thread_buffer_size was 0, using default {}", defaults.thread_buffer_size);
            self.thread_buffer_size = defaults.thread_buffer_size;
        }
        if self.merge_buffers == 0 {
            log::warn!("merge_buffers was 0, using default {}", defaults.merge_buffers);
            self.merge_buffers = defaults.merge_buffers;
        }
        if self.threads == 0 {
            log::warn!("threads was 0, using default {}", defaults.threads);
            self.threads = defaults.threads;
        }
        if self.sequence_blocks == 0 {
            log::warn!("sequence_blocks was 0, using default {}", defaults.sequence_blocks);
            self.sequence_blocks = defaults.sequence_blocks;
        }
    }
}
