//! Flat header+directory archive codec.
//!
//! Layout: a 12-byte header (4-byte magic, directory offset, directory
//! length, all u32 little-endian) followed by raw file data and a directory
//! of 64-byte records. Offsets are recomputed on every encode.

mod format;
mod reader;
mod writer;

pub use format::{DirRecord, PakHeader, DIR_RECORD_SIZE, HEADER_SIZE, MAGIC, NAME_FIELD_SIZE};
pub use reader::{read_pak, PakContents, ReadWarning};
pub use writer::write_pak;

pub(crate) use format::{read_f32, read_i32, read_u16};
