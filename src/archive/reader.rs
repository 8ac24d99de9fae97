use crate::archive::format::{DirRecord, PakHeader, DIR_RECORD_SIZE};
use crate::entry::{last_segment, Entry};
use crate::error::{PakError, Result};
use tracing::{debug, warn};

/// Recoverable condition raised while decoding an archive.
///
/// Warnings never abort the decode; they are collected alongside the
/// successfully decoded entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadWarning {
    /// A directory record pointed past the end of the buffer and was skipped.
    EntryOutOfBounds { name: String, offset: u32, size: u32 },
}

impl std::fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryOutOfBounds { name, offset, size } => write!(
                f,
                "entry \"{name}\" is out of bounds (offset {offset}, size {size}); skipped"
            ),
        }
    }
}

/// Result of a successful (possibly partial) archive decode.
#[derive(Debug, Default)]
pub struct PakContents {
    pub entries: Vec<Entry>,
    pub warnings: Vec<ReadWarning>,
}

/// Decode a flat archive from an in-memory buffer.
///
/// Fails fast on a bad magic identifier or a directory that lies outside the
/// buffer. Individual records whose data region is out of bounds are skipped
/// with a [`ReadWarning`] and the decode continues.
pub fn read_pak(buf: &[u8]) -> Result<PakContents> {
    let header = PakHeader::read_from(buf)?;

    let dir_start = header.dir_offset as usize;
    let dir_end = dir_start + header.dir_length as usize;
    if dir_end > buf.len() {
        return Err(PakError::DirectoryOutOfBounds {
            offset: header.dir_offset,
            length: header.dir_length,
            buffer_len: buf.len(),
        });
    }

    let mut contents = PakContents::default();

    for i in 0..header.record_count() {
        let record_start = dir_start + i * DIR_RECORD_SIZE;
        let record = DirRecord::read_from(&buf[record_start..record_start + DIR_RECORD_SIZE])?;

        let data_start = record.offset as usize;
        let data_end = data_start + record.size as usize;
        if data_end > buf.len() {
            warn!(
                name = %record.name,
                offset = record.offset,
                size = record.size,
                "directory record is out of bounds; skipping"
            );
            contents.warnings.push(ReadWarning::EntryOutOfBounds {
                name: record.name,
                offset: record.offset,
                size: record.size,
            });
            continue;
        }

        contents.entries.push(Entry {
            name: last_segment(&record.name).to_string(),
            path: record.name,
            offset: record.offset,
            size: record.size,
            data: buf[data_start..data_end].to_vec(),
        });
    }

    debug!(
        entries = contents.entries.len(),
        skipped = contents.warnings.len(),
        "decoded flat archive"
    );
    Ok(contents)
}
