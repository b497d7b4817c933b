//! Run-length encoded BWT storage and a streaming two-way BWT merge.
//!
//! Three layers, leaves first: succinct containers (`byte_blocks`,
//! `bitvector`, `cumulative`, `block_boundaries`, `run`), the queryable
//! index (`alphabet`, `bwt`, `fmi`), and the merge pipeline (`rlarray`,
//! `merge`, `config`) plus the on-disk `formats`.

pub mod alphabet;
pub mod bitvector;
pub mod block_boundaries;
pub mod bwt;
pub mod byte_blocks;
pub mod config;
pub mod cumulative;
pub mod error;
pub mod fmi;
pub mod formats;
pub mod merge;
pub mod rlarray;
pub mod run;

pub use alphabet::{Alphabet, AlphabeticOrder};
pub use bwt::BWT;
pub use config::MergeParameters;
pub use error::{Error, Result};
pub use fmi::{Range, FMI};
pub use rlarray::{RLArray, RankArraySource};
