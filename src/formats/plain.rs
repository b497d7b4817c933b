//! Plain format: one byte per symbol, no runs, no header — the bytes on the
//! wire are real characters translated through the alphabet's
//! char2comp/comp2char tables, not raw compact codes.
//!
//! Grounded on `readPlain`/`writePlain` in `formats.cpp:118-164`: a bare byte
//! stream with no header at all; `run_buffer.run.first =
//! alpha.char2comp[...]` on read (lines 135, 142) and `run.first =
//! alpha.comp2char[run.first]` on write (line 155). Fixed sigma of 6 (the
//! biological alphabet); `order` picks which table `read` builds for itself,
//! matching `createAlphabet(order())` upstream.

use std::io::{Read, Write};

use super::{Format, FormatData};
use crate::alphabet::{Alphabet, AlphabeticOrder};
use crate::byte_blocks::ByteBlocks;
use crate::bwt::BWT;
use crate::error::Result;
use crate::run::{RunBuffer, RunCodec};

const SIGMA: usize = 6;

pub struct PlainFormat {
    order: AlphabeticOrder,
}

impl PlainFormat {
    pub fn new(order: AlphabeticOrder) -> Self {
        PlainFormat { order }
    }
}

impl Format for PlainFormat {
    fn required_order(&self) -> AlphabeticOrder {
        self.order
    }

    fn read(&self, reader: &mut dyn Read) -> Result<FormatData> {
        let alpha = Alphabet::with_order(self.order);
        let mut chars = Vec::new();
        reader.read_to_end(&mut chars)?;

        let codec = RunCodec::new(SIGMA);
        let mut data = ByteBlocks::new();
        let mut counts = vec![0u64; SIGMA];
        let mut buffer = RunBuffer::new();
        for &ch in &chars {
            let symbol = alpha.char2comp(ch);
            counts[symbol as usize] += 1;
            if let Some((prev_symbol, prev_length)) = buffer.add(symbol, 1) {
                codec.write(&mut data, prev_symbol, prev_length);
            }
        }
        if let Some((symbol, length)) = buffer.flush() {
            codec.write(&mut data, symbol, length);
        }

        // No sequence count on the wire; derive it the way `BWT::setHeader`
        // does generically, as the number of endmarkers.
        let sequences = counts[0];
        Ok(FormatData { data, counts, sequences, order: self.order })
    }

    fn write(&self, writer: &mut dyn Write, bwt: &BWT, alpha: &Alphabet) -> Result<()> {
        for (symbol, length) in bwt.runs() {
            let ch = alpha.comp2char(symbol);
            for _ in 0..length {
                writer.write_all(&[ch])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_plain_bytes() {
        let codec = RunCodec::new(SIGMA);
        let mut data = ByteBlocks::new();
        codec.write(&mut data, 1, 2);
        codec.write(&mut data, 2, 1);
        codec.write(&mut data, 0, 1);
        let counts = vec![1u64, 2, 1, 0, 0, 0];
        let bwt = BWT::build(data, &counts, 1, AlphabeticOrder::Default).unwrap();
        let alpha = Alphabet::from_counts(&counts, &Alphabet::with_order(AlphabeticOrder::Default));

        let format = PlainFormat::new(AlphabeticOrder::Default);
        let mut buffer = Vec::new();
        format.write(&mut buffer, &bwt, &alpha).unwrap();
        let mut cursor = std::io::Cursor::new(buffer);
        let parsed = format.read(&mut cursor).unwrap();
        assert_eq!(parsed.counts, counts);
        assert_eq!(parsed.sequences, 1);
        let reloaded = BWT::build(parsed.data, &parsed.counts, parsed.sequences, parsed.order).unwrap();
        assert_eq!(reloaded.hash(), bwt.hash());
    }

    #[test]
    fn wire_bytes_are_real_characters_not_compact_codes() {
        // "A A C $" over the default biological alphabet ($=0 A=1 C=2 G=3 T=4 N=5).
        let codec = RunCodec::new(SIGMA);
        let mut data = ByteBlocks::new();
        codec.write(&mut data, 1, 2);
        codec.write(&mut data, 2, 1);
        codec.write(&mut data, 0, 1);
        let counts = vec![1u64, 2, 1, 0, 0, 0];
        let bwt = BWT::build(data, &counts, 1, AlphabeticOrder::Default).unwrap();
        let alpha = Alphabet::with_order(AlphabeticOrder::Default);

        let format = PlainFormat::new(AlphabeticOrder::Default);
        let mut buffer = Vec::new();
        format.write(&mut buffer, &bwt, &alpha).unwrap();
        assert_eq!(buffer, b"AAC$");
    }
}
