//! Native format: fixed header, raw RLE dump, per-symbol counts.
//!
//! The upstream `NativeFormat` additionally persists the built
//! `CumulativeArray`s and `block_boundaries`; this crate rebuilds those from
//! `data` and `counts` via `BWT::build` instead of round-tripping them,
//! since they are a pure function of the two (documented in DESIGN.md).

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::{Format, FormatData};
use crate::alphabet::{Alphabet, AlphabeticOrder};
use crate::byte_blocks::ByteBlocks;
use crate::bwt::BWT;
use crate::error::{Error, Result};

const NATIVE_TAG: u64 = 0x314D_5257_544D_5742; // "BWTMRW1" little-endian

pub struct NativeFormat;

impl Format for NativeFormat {
    fn required_order(&self) -> AlphabeticOrder {
        AlphabeticOrder::Any
    }

    fn read(&self, reader: &mut dyn Read) -> Result<FormatData> {
        let tag = reader.read_u64::<LittleEndian>()?;
        if tag != NATIVE_TAG {
            return Err(Error::InvalidNativeHeader { expected: NATIVE_TAG, found: tag });
        }
        let flags = reader.read_u32::<LittleEndian>()?;
        let order = if flags & 1 == 0 { AlphabeticOrder::Default } else { AlphabeticOrder::Sorted };
        let sequences = reader.read_u64::<LittleEndian>()?;
        let _bases = reader.read_u64::<LittleEndian>()?;
        let sigma = reader.read_u64::<LittleEndian>()? as usize;
        let rle_bytes = reader.read_u64::<LittleEndian>()?;

        let mut raw = vec![0u8; rle_bytes as usize];
        reader.read_exact(&mut raw)?;
        let mut data = ByteBlocks::new();
        data.append_bytes(&raw);

        let mut counts = vec![0u64; sigma];
        for count in counts.iter_mut() {
            *count = reader.read_u64::<LittleEndian>()?;
        }

        Ok(FormatData { data, counts, sequences, order })
    }

    fn write(&self, writer: &mut dyn Write, bwt: &BWT, alpha: &Alphabet) -> Result<()> {
        let order = alpha.identify_order();
        let flags: u32 = if order == AlphabeticOrder::Sorted { 1 } else { 0 };

        writer.write_u64::<LittleEndian>(NATIVE_TAG)?;
        writer.write_u32::<LittleEndian>(flags)?;
        writer.write_u64::<LittleEndian>(bwt.sequences())?;
        writer.write_u64::<LittleEndian>(bwt.len())?;
        writer.write_u64::<LittleEndian>(bwt.sigma() as u64)?;
        writer.write_u64::<LittleEndian>(bwt.data().bytes())?;
        for block in bwt.data().iter_blocks() {
            writer.write_all(block)?;
        }
        for count in bwt.counts() {
            writer.write_u64::<LittleEndian>(count)?;
        }
        Ok(())
    }
}
