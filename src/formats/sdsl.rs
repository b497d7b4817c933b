//! SDSL / RFM formats: a bit-length prefix followed by an 8-bit-per-symbol
//! stream padded to 64-bit blocks. The stream holds real characters, not
//! compact codes: `SdslFormat` translates through the biological alphabet,
//! `RfmFormat` through its own fixed identity alphabet over sigma=6.
//!
//! Grounded on `SDSLData`/`RFMFormat`/`SDSLFormat` in `formats.cpp`: both
//! share the `bits2values`/`values2blocks` padding scheme (`VALUE_SIZE = 8`,
//! `BLOCK_SIZE = 8`) and the header is only the 8-byte `bits` field
//! (`SDSLData::write`, lines 226-233) — there is no `sequences` field on the
//! wire. `RFMFormat::read`/`write` hardcode `Alphabet(SDSLData::SIGMA)`
//! (`formats.cpp:266-276`), sharing SDSL's exact byte layout with a fixed
//! identity alphabet rather than carrying its own sigma on disk.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{Format, FormatData};
use crate::alphabet::{Alphabet, AlphabeticOrder};
use crate::byte_blocks::ByteBlocks;
use crate::bwt::BWT;
use crate::error::Result;
use crate::run::{RunBuffer, RunCodec};

const SIGMA: usize = 6;
const BLOCK_SIZE: usize = 8;

fn write_padded_symbols(writer: &mut dyn Write, bwt: &BWT, alpha: &Alphabet) -> Result<()> {
    let bit_len = bwt.len() * 8;
    writer.write_u64::<LittleEndian>(bit_len)?;

    let mut written = 0usize;
    for (symbol, length) in bwt.runs() {
        let ch = alpha.comp2char(symbol);
        for _ in 0..length {
            writer.write_u8(ch)?;
            written += 1;
        }
    }
    let padding = (BLOCK_SIZE - written % BLOCK_SIZE) % BLOCK_SIZE;
    for _ in 0..padding {
        writer.write_u8(0)?;
    }
    Ok(())
}

fn read_padded_symbols(reader: &mut dyn Read, sigma: usize, alpha: &Alphabet) -> Result<(ByteBlocks, Vec<u64>)> {
    let bit_len = reader.read_u64::<LittleEndian>()?;
    let byte_len = (bit_len / 8) as usize;
    let padding = (BLOCK_SIZE - byte_len % BLOCK_SIZE) % BLOCK_SIZE;

    let mut chars = vec![0u8; byte_len];
    reader.read_exact(&mut chars)?;
    if padding > 0 {
        let mut pad = vec![0u8; padding];
        reader.read_exact(&mut pad)?;
    }

    let codec = RunCodec::new(sigma);
    let mut data = ByteBlocks::new();
    let mut counts = vec![0u64; sigma];
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
    Ok((data, counts))
}

pub struct SdslFormat {
    order: AlphabeticOrder,
}

impl SdslFormat {
    pub fn new(order: AlphabeticOrder) -> Self {
        SdslFormat { order }
    }
}

impl Format for SdslFormat {
    fn required_order(&self) -> AlphabeticOrder {
        self.order
    }

    fn read(&self, reader: &mut dyn Read) -> Result<FormatData> {
        let alpha = Alphabet::with_order(self.order);
        let (data, counts) = read_padded_symbols(reader, SIGMA, &alpha)?;
        // No sequence count on the wire; derive it the way `BWT::setHeader`
        // does generically, as the number of endmarkers.
        let sequences = counts[0];
        Ok(FormatData { data, counts, sequences, order: self.order })
    }

    fn write(&self, writer: &mut dyn Write, bwt: &BWT, alpha: &Alphabet) -> Result<()> {
        write_padded_symbols(writer, bwt, alpha)
    }
}

/// Shares `SdslFormat`'s exact wire layout but always interprets the symbol
/// bytes through a fixed identity alphabet over `SIGMA`, ignoring whatever
/// alphabet the caller supplies — it never serializes its own sigma.
pub struct RfmFormat;

impl Format for RfmFormat {
    fn required_order(&self) -> AlphabeticOrder {
        AlphabeticOrder::Any
    }

    fn read(&self, reader: &mut dyn Read) -> Result<FormatData> {
        let alpha = Alphabet::identity(SIGMA);
        let (data, counts) = read_padded_symbols(reader, SIGMA, &alpha)?;
        let sequences = counts[0];
        Ok(FormatData { data, counts, sequences, order: AlphabeticOrder::Any })
    }

    fn write(&self, writer: &mut dyn Write, bwt: &BWT, _alpha: &Alphabet) -> Result<()> {
        let alpha = Alphabet::identity(SIGMA);
        write_padded_symbols(writer, bwt, &alpha)
    }
}
