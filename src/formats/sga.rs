//! SGA format: packed run bytes, top 3 bits symbol, low 5 bits length.
//!
//! Grounded on `SGAData`/`SGAFormat`/`SGAHeader` in `formats.cpp`: fixed
//! tag/flag pair validated on read, runs capped at length 31 and split
//! rather than carrying continuation bytes.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{Format, FormatData};
use crate::alphabet::{Alphabet, AlphabeticOrder};
use crate::byte_blocks::ByteBlocks;
use crate::bwt::BWT;
use crate::error::{Error, Result};
use crate::run::{RunBuffer, RunCodec};

const SGA_TAG: u64 = 0x3141_4753; // "SGA1"
const SGA_FLAG: u64 = 1;
const SIGMA: usize = 6;
const RUN_BITS: u32 = 5;
const MAX_RUN: u64 = (1 << RUN_BITS) - 1;

pub struct SgaFormat;

impl Format for SgaFormat {
    fn required_order(&self) -> AlphabeticOrder {
        AlphabeticOrder::Default
    }

    fn read(&self, reader: &mut dyn Read) -> Result<FormatData> {
        let tag = reader.read_u64::<LittleEndian>()?;
        let sequences = reader.read_u64::<LittleEndian>()?;
        let _bases = reader.read_u64::<LittleEndian>()?;
        let run_count = reader.read_u64::<LittleEndian>()?;
        let flag = reader.read_u64::<LittleEndian>()?;
        if tag != SGA_TAG || flag != SGA_FLAG {
            return Err(Error::InvalidSgaHeader { tag, flag });
        }

        let mut packed = vec![0u8; run_count as usize];
        reader.read_exact(&mut packed)?;

        let codec = RunCodec::new(SIGMA);
        let mut data = ByteBlocks::new();
        let mut counts = vec![0u64; SIGMA];
        let mut buffer = RunBuffer::new();
        for byte in packed {
            let symbol = byte >> RUN_BITS;
            let length = (byte & (MAX_RUN as u8)) as u64;
            if length == 0 {
                return Err(Error::MalformedRun { offset: 0, reason: "zero-length SGA run" });
            }
            counts[symbol as usize] += length;
            if let Some((prev_symbol, prev_length)) = buffer.add(symbol, length) {
                codec.write(&mut data, prev_symbol, prev_length);
            }
        }
        if let Some((symbol, length)) = buffer.flush() {
            codec.write(&mut data, symbol, length);
        }

        Ok(FormatData { data, counts, sequences, order: AlphabeticOrder::Default })
    }

    fn write(&self, writer: &mut dyn Write, bwt: &BWT, _alpha: &Alphabet) -> Result<()> {
        let mut packed = Vec::new();
        for (symbol, mut length) in bwt.runs() {
            while length > 0 {
                let chunk = length.min(MAX_RUN);
                packed.push((symbol << RUN_BITS) | chunk as u8);
                length -= chunk;
            }
        }

        writer.write_u64::<LittleEndian>(SGA_TAG)?;
        writer.write_u64::<LittleEndian>(bwt.sequences())?;
        writer.write_u64::<LittleEndian>(bwt.len())?;
        writer.write_u64::<LittleEndian>(packed.len() as u64)?;
        writer.write_u64::<LittleEndian>(SGA_FLAG)?;
        writer.write_all(&packed)?;
        Ok(())
    }
}
