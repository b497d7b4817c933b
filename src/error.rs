//! Crate-wide error type.
//!
//! Mirrors the error kinds from the design: invalid headers, malformed runs and
//! unknown format tags are fatal and surface as `Err`; out-of-range queries and
//! alphabet/format mismatches are *not* errors (see `bwt::BWT` and `formats`).

use std::io;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading, decoding or merging a BWT.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid native header: expected tag {expected:#x}, found {found:#x}")]
    InvalidNativeHeader { expected: u64, found: u64 },

    #[error("invalid SGA header: tag/flag mismatch (tag={tag:#x}, flag={flag:#x})")]
    InvalidSgaHeader { tag: u64, flag: u64 },

    #[error("malformed run at byte offset {offset}: {reason}")]
    MalformedRun { offset: u64, reason: &'static str },

    #[error("unknown format tag: {0:?}")]
    UnknownFormat(String),

    #[error("rank array is not well-formed: {0}")]
    InvalidRankArray(&'static str),

    #[error(transparent)]
    Io(#[from] io::Error),
}
