//! The streaming two-input BWT merge: a bounded producer/consumer pipeline
//! driven by an externally supplied rank array.
//!
//! Grounded on `RABuffer`, `mergeRA()` and `mergeBWT()` in `bwt.cpp`: the
//! mutex-plus-two-condvars handoff, the producer batching RA directives,
//! and the consumer's cursor-pair interleave loop.

use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use crate::alphabet::AlphabeticOrder;
use crate::bwt::BWT;
use crate::byte_blocks::ByteBlocks;
use crate::config::MergeParameters;
use crate::error::Result;
use crate::rlarray::RankArraySource;
use crate::run::{RunBuffer, RunCodec};

struct Slot {
    runs: Option<Vec<(u64, u64)>>,
    finished: bool,
}

/// Single-slot bounded handoff between the producer and consumer threads of
/// a merge. `put` blocks until the slot is empty; `take` blocks until it is
/// full. Ownership of each batch moves through the slot.
pub struct RABuffer {
    slot: Mutex<Slot>,
    slot_full: Condvar,
    slot_empty: Condvar,
}

impl RABuffer {
    pub fn new() -> Self {
        RABuffer { slot: Mutex::new(Slot { runs: None, finished: false }), slot_full: Condvar::new(), slot_empty: Condvar::new() }
    }

    /// Installs `runs` as the next batch, waiting for any previous batch to
    /// be taken first. `finished` marks this as the producer's last
    /// handoff (it may itself carry runs).
    pub fn put(&self, runs: Vec<(u64, u64)>, finished: bool) {
        let mut slot = self.slot.lock().unwrap();
        while slot.runs.is_some() {
            slot = self.slot_empty.wait(slot).unwrap();
        }
        slot.runs = Some(runs);
        slot.finished = finished;
        self.slot_full.notify_one();
    }

    /// Waits for a batch and returns it along with the producer's
    /// `finished` flag.
    pub fn take(&self) -> (Vec<(u64, u64)>, bool) {
        let mut slot = self.slot.lock().unwrap();
        while slot.runs.is_none() {
            slot = self.slot_full.wait(slot).unwrap();
        }
        let runs = slot.runs.take().unwrap();
        let finished = slot.finished;
        self.slot_empty.notify_one();
        (runs, finished)
    }
}

impl Default for RABuffer {
    fn default() -> Self {
        RABuffer::new()
    }
}

fn merge_ra<S: RankArraySource>(mut ra: S, buffer: &RABuffer, batch_size: usize) {
    ra.open();
    let mut batch = Vec::with_capacity(batch_size.max(1));
    loop {
        match ra.next() {
            Some(run) => {
                batch.push(run);
                if batch.len() >= batch_size.max(1) {
                    buffer.put(batch, false);
                    batch = Vec::with_capacity(batch_size.max(1));
                }
            }
            None => {
                buffer.put(batch, true);
                break;
            }
        }
    }
    ra.close();
}

/// A decode cursor over one input's RLE stream, tracking how many text
/// positions have been consumed so far and trimming fully-consumed blocks
/// as it goes.
struct StreamCursor {
    data: ByteBlocks,
    pos: u64,
    current: Option<(u8, u64)>,
    codec: RunCodec,
    consumed: u64,
}

impl StreamCursor {
    fn new(data: ByteBlocks, sigma: usize) -> Self {
        StreamCursor { data, pos: 0, current: None, codec: RunCodec::new(sigma), consumed: 0 }
    }

    fn consume_into(
        &mut self,
        mut amount: u64,
        out: &mut RunBuffer,
        out_codec: &RunCodec,
        out_data: &mut ByteBlocks,
        out_counts: &mut [u64],
    ) -> Result<()> {
        while amount > 0 {
            if self.current.is_none() {
                self.current = Some(self.codec.read(&self.data, &mut self.pos)?);
            }
            let (symbol, length) = self.current.take().unwrap();
            let taken = length.min(amount);
            if let Some((prev_symbol, prev_length)) = out.add(symbol, taken) {
                out_codec.write(out_data, prev_symbol, prev_length);
                out_counts[prev_symbol as usize] += prev_length;
            }
            amount -= taken;
            self.consumed += taken;
            if taken < length {
                self.current = Some((symbol, length - taken));
            } else {
                self.data.trim_to(self.pos);
            }
        }
        Ok(())
    }

    /// Drains every remaining run (used to flush the suffix of `A` once the
    /// rank array is exhausted).
    fn drain_into(
        &mut self,
        out: &mut RunBuffer,
        out_codec: &RunCodec,
        out_data: &mut ByteBlocks,
        out_counts: &mut [u64],
    ) -> Result<()> {
        loop {
            if self.current.is_none() {
                if self.pos >= self.data.bytes() {
                    break;
                }
                self.current = Some(self.codec.read(&self.data, &mut self.pos)?);
            }
            let (symbol, length) = self.current.take().unwrap();
            if let Some((prev_symbol, prev_length)) = out.add(symbol, length) {
                out_codec.write(out_data, prev_symbol, prev_length);
                out_counts[prev_symbol as usize] += prev_length;
            }
            self.consumed += length;
            self.data.trim_to(self.pos);
        }
        Ok(())
    }
}

fn merge_bwt(mut a: StreamCursor, mut b: StreamCursor, sigma: usize, buffer: &RABuffer) -> Result<(ByteBlocks, Vec<u64>)> {
    let out_codec = RunCodec::new(sigma);
    let mut out_data = ByteBlocks::new();
    let mut out_counts = vec![0u64; sigma];
    let mut out_buffer = RunBuffer::new();

    loop {
        let (runs, finished) = buffer.take();
        for (pos_a, len_b) in runs {
            let take_a = pos_a.saturating_sub(a.consumed);
            a.consume_into(take_a, &mut out_buffer, &out_codec, &mut out_data, &mut out_counts)?;
            b.consume_into(len_b, &mut out_buffer, &out_codec, &mut out_data, &mut out_counts)?;
        }
        if finished {
            break;
        }
    }
    a.drain_into(&mut out_buffer, &out_codec, &mut out_data, &mut out_counts)?;
    if let Some((symbol, length)) = out_buffer.flush() {
        out_codec.write(&mut out_data, symbol, length);
        out_counts[symbol as usize] += length;
    }
    Ok((out_data, out_counts))
}

/// Merges two BWTs into one, consuming both: their succinct indexes are
/// discarded immediately (`into_raw`) and their RLE streams are trimmed as
/// `ra` is consumed. `ra` must encode a correct interleaving of `a` and `b`
/// (§4.5); a malformed rank array is not validated and yields unspecified
/// output.
pub fn merge<S>(a: BWT, b: BWT, ra: S, params: &MergeParameters, order: AlphabeticOrder) -> Result<BWT>
where
    S: RankArraySource + Send + 'static,
{
    let sigma = a.sigma();
    debug_assert_eq!(sigma, b.sigma());
    let sequences = a.sequences() + b.sequences();
    log::debug!("merging BWTs of length {} and {} ({} sequences)", a.len(), b.len(), sequences);

    let (a_data, _) = a.into_raw();
    let (b_data, _) = b.into_raw();
    let a_cursor = StreamCursor::new(a_data, sigma);
    let b_cursor = StreamCursor::new(b_data, sigma);

    let buffer = Arc::new(RABuffer::new());
    let producer_buffer = Arc::clone(&buffer);
    // `run_buffer_size` is a byte budget; convert to a directive count so the
    // producer actually bounds memory to roughly that many bytes per batch.
    let batch_size = (params.run_buffer_size / std::mem::size_of::<(u64, u64)>()).max(1);
    let producer = thread::spawn(move || merge_ra(ra, &producer_buffer, batch_size));

    let (data, counts) = merge_bwt(a_cursor, b_cursor, sigma, &buffer)?;
    producer.join().expect("producer thread panicked");

    log::debug!("merge produced {} bytes of RLE data, counts = {:?}", data.bytes(), counts);
    BWT::build(data, &counts, sequences, order)
}
