use std::io;
use thiserror::Error;

/// Result type for pakforge operations
pub type Result<T> = std::result::Result<T, PakError>;

/// Unified error type for all fatal decode/encode failures.
///
/// Recoverable conditions (skipped directory records, tree clashes, rejected
/// mutations) are not represented here; they travel as warning lists or
/// [`Rejection`](crate::ops::Rejection) values instead.
#[derive(Debug, Error)]
pub enum PakError {
    #[error("invalid magic identifier in {0} header")]
    InvalidMagic(&'static str),

    #[error("archive directory is out of bounds: offset {offset} + length {length} exceeds buffer of {buffer_len} bytes")]
    DirectoryOutOfBounds {
        offset: u32,
        length: u32,
        buffer_len: usize,
    },

    #[error("unsupported sprite version: {0} (only version 2 is supported)")]
    UnsupportedVersion(i32),

    #[error("unexpected palette size: {0} (expected 256)")]
    PaletteSize(u16),

    #[error("truncated {0}: {1} bytes required past end of buffer")]
    Truncated(&'static str, usize),

    #[error("invalid compression level: {0} (expected 0-9)")]
    InvalidCompressionLevel(u32),

    #[error("container archive error: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
