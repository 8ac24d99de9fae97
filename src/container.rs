//! ZIP-based container codec.
//!
//! Compression itself is delegated to the `zip` crate; this module only
//! implements the entry-extraction/entry-injection contract plus synthesis of
//! placeholder entries for empty directories, which the flat entry model has
//! no other way to represent.

use crate::archive::PakContents;
use crate::entry::{Entry, PLACEHOLDER_NAME};
use crate::error::{PakError, Result};
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Decode a ZIP-based container from an in-memory buffer.
///
/// Non-directory members become entries (`offset` is not meaningful for this
/// format and stays zero). Directory members with no file underneath them are
/// kept alive as zero-size `.placeholder` entries so empty folders survive a
/// round-trip through the hierarchical model.
pub fn read_container(buf: &[u8]) -> Result<PakContents> {
    let mut archive = ZipArchive::new(Cursor::new(buf))?;

    let mut entries = Vec::new();
    let mut file_paths = Vec::new();
    let mut dir_paths = Vec::new();

    for i in 0..archive.len() {
        let mut member = archive.by_index(i)?;
        let path = member.name().to_string();

        if member.is_dir() {
            dir_paths.push(path);
            continue;
        }

        let mut data = Vec::with_capacity(member.size() as usize);
        member.read_to_end(&mut data)?;
        file_paths.push(path.clone());
        entries.push(Entry::new(&path, data));
    }

    // Directory members with no file underneath them are empty folders.
    for dir in dir_paths {
        let has_files = file_paths.iter().any(|p| p.starts_with(&dir));
        if !has_files {
            // `dir` keeps its trailing slash from the member name.
            entries.push(Entry::new(&format!("{dir}{PLACEHOLDER_NAME}"), Vec::new()));
        }
    }

    debug!(entries = entries.len(), "decoded container archive");
    Ok(PakContents {
        entries,
        warnings: Vec::new(),
    })
}

/// Encode entries into a ZIP-based container buffer.
///
/// `level` selects the compression: 0 stores members uncompressed, 1-9 use
/// deflate at that level. Zero-size placeholder markers are skipped; their
/// folders reappear implicitly from member paths on the next decode.
pub fn write_container(entries: &[Entry], level: u32) -> Result<Vec<u8>> {
    if level > 9 {
        return Err(PakError::InvalidCompressionLevel(level));
    }

    let options: FileOptions<'_, ()> = if level == 0 {
        FileOptions::default().compression_method(CompressionMethod::Stored)
    } else {
        FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(level as i64))
    };

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries.iter().filter(|e| !e.is_placeholder()) {
        zip.start_file(entry.path.clone(), options)?;
        zip.write_all(&entry.data)?;
    }

    let cursor = zip.finish()?;
    let buf = cursor.into_inner();
    debug!(bytes = buf.len(), level, "encoded container archive");
    Ok(buf)
}
