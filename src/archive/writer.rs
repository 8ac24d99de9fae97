use crate::archive::format::{DirRecord, PakHeader, DIR_RECORD_SIZE, HEADER_SIZE, MAGIC};
use crate::entry::Entry;
use crate::error::Result;
use tracing::debug;

/// Encode entries into a flat archive buffer.
///
/// Zero-size placeholder markers are dropped: the format has no directory
/// records, so empty folders cannot survive a flat-archive round-trip. File
/// data is laid out contiguously after the header in input order, followed by
/// one 64-byte directory record per entry; the header is recomputed to point
/// at the freshly written directory.
pub fn write_pak(entries: &[Entry]) -> Result<Vec<u8>> {
    let relevant: Vec<&Entry> = entries.iter().filter(|e| !e.is_placeholder()).collect();

    let data_len: usize = relevant.iter().map(|e| e.data.len()).sum();
    let dir_offset = HEADER_SIZE + data_len;
    let dir_length = relevant.len() * DIR_RECORD_SIZE;

    let mut buf = Vec::with_capacity(dir_offset + dir_length);

    let header = PakHeader {
        dir_offset: dir_offset as u32,
        dir_length: dir_length as u32,
    };
    header.write_to(&mut buf)?;
    debug_assert_eq!(buf.len(), HEADER_SIZE);
    debug_assert_eq!(&buf[..4], MAGIC);

    // Data section, recording each entry's new offset as it is appended.
    let mut records = Vec::with_capacity(relevant.len());
    for entry in &relevant {
        records.push(DirRecord {
            name: entry.path.clone(),
            offset: buf.len() as u32,
            size: entry.data.len() as u32,
        });
        buf.extend_from_slice(&entry.data);
    }

    for record in &records {
        record.write_to(&mut buf)?;
    }

    debug!(
        entries = relevant.len(),
        bytes = buf.len(),
        "encoded flat archive"
    );
    Ok(buf)
}
