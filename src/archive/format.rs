use crate::error::{PakError, Result};
use std::io::{Read, Write};

/// Magic number: ASCII "PACK"
pub const MAGIC: [u8; 4] = *b"PACK";

/// Header size in bytes: magic + directory offset + directory length
pub const HEADER_SIZE: usize = 12;

/// Directory record size in bytes
pub const DIR_RECORD_SIZE: usize = 64;

/// Name field size within a directory record (null-terminated)
pub const NAME_FIELD_SIZE: usize = 56;

/// Archive header at the beginning of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PakHeader {
    pub dir_offset: u32,
    pub dir_length: u32,
}

impl PakHeader {
    /// Write header to a writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_all(&self.dir_offset.to_le_bytes())?;
        writer.write_all(&self.dir_length.to_le_bytes())?;
        Ok(())
    }

    /// Read header from a reader
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(PakError::InvalidMagic("archive"));
        }

        let dir_offset = read_u32(&mut reader)?;
        let dir_length = read_u32(&mut reader)?;

        Ok(Self {
            dir_offset,
            dir_length,
        })
    }

    /// Number of directory records the header describes
    pub fn record_count(&self) -> usize {
        self.dir_length as usize / DIR_RECORD_SIZE
    }
}

/// One 64-byte directory record: 56-byte null-terminated name, then the file
/// offset and size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirRecord {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

impl DirRecord {
    /// Write record to a writer. Names longer than the 56-byte field are
    /// silently truncated, matching the reference encoder (see DESIGN.md).
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let name_bytes = self.name.as_bytes();
        let mut name_buf = [0u8; NAME_FIELD_SIZE];
        let len = name_bytes.len().min(NAME_FIELD_SIZE);
        name_buf[..len].copy_from_slice(&name_bytes[..len]);
        writer.write_all(&name_buf)?;

        writer.write_all(&self.offset.to_le_bytes())?;
        writer.write_all(&self.size.to_le_bytes())?;
        Ok(())
    }

    /// Read record from a reader. Backslashes in the name are normalized to
    /// forward slashes.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut name_buf = [0u8; NAME_FIELD_SIZE];
        reader.read_exact(&mut name_buf)?;

        let name_end = name_buf
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_SIZE);
        let name = String::from_utf8_lossy(&name_buf[..name_end]).replace('\\', "/");

        let offset = read_u32(&mut reader)?;
        let size = read_u32(&mut reader)?;

        Ok(Self { name, offset, size })
    }
}

// Helper functions for reading primitive types
pub(crate) fn read_u16<R: Read>(mut reader: R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub(crate) fn read_u32<R: Read>(mut reader: R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_i32<R: Read>(mut reader: R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub(crate) fn read_f32<R: Read>(mut reader: R) -> Result<f32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}
