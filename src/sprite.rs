//! Indexed-palette sprite codec.
//!
//! Layout (all integers little-endian): a 40-byte header (4-byte magic, then
//! version, type, texture format as i32, bounding radius as f32, max
//! width/height, frame count as i32, beam length as f32, sync type as i32),
//! a palette (u16 color count followed by 256 RGB triples), then per frame a
//! 20-byte record (group, origin, dimensions) and `width * height` one-byte
//! palette indices. Palette index 255 decodes as fully transparent.

use crate::archive::{read_f32, read_i32, read_u16};
use crate::error::{PakError, Result};
use std::fmt;
use std::io::Cursor;
use tracing::debug;

/// Magic number: ASCII "IDSP"
pub const SPRITE_MAGIC: [u8; 4] = *b"IDSP";

/// The only supported sprite format version
pub const SPRITE_VERSION: i32 = 2;

/// Fixed header size in bytes
pub const SPRITE_HEADER_SIZE: usize = 40;

/// Number of colors in a sprite palette
pub const PALETTE_COLORS: usize = 256;

/// Per-frame record size in bytes (group, origin x/y, width, height)
pub const FRAME_RECORD_SIZE: usize = 20;

/// Sprite orientation type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    VpParallelUpright,
    FacingUpright,
    VpParallel,
    Oriented,
    VpParallelOriented,
    Unknown,
}

impl SpriteKind {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::VpParallelUpright,
            1 => Self::FacingUpright,
            2 => Self::VpParallel,
            3 => Self::Oriented,
            4 => Self::VpParallelOriented,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VpParallelUpright => "vp_parallel_upright",
            Self::FacingUpright => "facing_upright",
            Self::VpParallel => "vp_parallel",
            Self::Oriented => "oriented",
            Self::VpParallelOriented => "vp_parallel_oriented",
            Self::Unknown => "Unknown",
        }
    }
}

/// Texture blending mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexFormat {
    Normal,
    Additive,
    IndexAlpha,
    AlphaTest,
    Unknown,
}

impl TexFormat {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Normal,
            1 => Self::Additive,
            2 => Self::IndexAlpha,
            3 => Self::AlphaTest,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Additive => "Additive",
            Self::IndexAlpha => "IndexAlpha",
            Self::AlphaTest => "AlphaTest",
            Self::Unknown => "Unknown",
        }
    }
}

/// Frame synchronization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncType {
    Sync,
    Rand,
    Unknown,
}

impl SyncType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Sync,
            1 => Self::Rand,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Rand => "rand",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SpriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standalone RGBA8 raster image decoded from one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

/// One decoded sprite frame.
#[derive(Debug, Clone)]
pub struct SpriteFrame {
    pub group: i32,
    pub origin_x: i32,
    pub origin_y: i32,
    pub width: i32,
    pub height: i32,
    pub image: RasterImage,
    pub pixel_count: usize,
}

/// A fully decoded sprite: header fields, palette, and per-frame rasters.
#[derive(Debug, Clone)]
pub struct SpriteData {
    pub version: i32,
    pub kind: SpriteKind,
    pub tex_format: TexFormat,
    pub bounding_radius: f32,
    pub max_width: i32,
    pub max_height: i32,
    pub frame_count: i32,
    pub beam_length: f32,
    pub sync_type: SyncType,
    pub palette: Vec<[u8; 3]>,
    pub frames: Vec<SpriteFrame>,
}

/// Decode a sprite from an in-memory buffer.
pub fn read_sprite(buf: &[u8]) -> Result<SpriteData> {
    if buf.len() < SPRITE_HEADER_SIZE {
        return Err(PakError::Truncated(
            "sprite header",
            SPRITE_HEADER_SIZE - buf.len(),
        ));
    }
    if buf[..4] != SPRITE_MAGIC {
        return Err(PakError::InvalidMagic("sprite"));
    }

    let mut cursor = Cursor::new(&buf[4..SPRITE_HEADER_SIZE]);
    let version = read_i32(&mut cursor)?;
    let kind = read_i32(&mut cursor)?;
    let tex_format = read_i32(&mut cursor)?;
    let bounding_radius = read_f32(&mut cursor)?;
    let max_width = read_i32(&mut cursor)?;
    let max_height = read_i32(&mut cursor)?;
    let frame_count = read_i32(&mut cursor)?;
    let beam_length = read_f32(&mut cursor)?;
    let sync_type = read_i32(&mut cursor)?;

    if version != SPRITE_VERSION {
        return Err(PakError::UnsupportedVersion(version));
    }

    // Palette: u16 color count, then 256 RGB triples.
    let palette_end = SPRITE_HEADER_SIZE + 2 + PALETTE_COLORS * 3;
    if buf.len() < palette_end {
        return Err(PakError::Truncated(
            "sprite palette",
            palette_end - buf.len(),
        ));
    }
    let color_count = read_u16(&buf[SPRITE_HEADER_SIZE..SPRITE_HEADER_SIZE + 2])?;
    if color_count as usize != PALETTE_COLORS {
        return Err(PakError::PaletteSize(color_count));
    }

    let palette_data = &buf[SPRITE_HEADER_SIZE + 2..palette_end];
    let palette: Vec<[u8; 3]> = palette_data
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    // Frames. The declared count comes from the file, so cap the
    // pre-allocation by what the remaining bytes could actually hold.
    let declared = frame_count.max(0) as usize;
    let possible = (buf.len() - palette_end) / FRAME_RECORD_SIZE;
    let mut frames = Vec::with_capacity(declared.min(possible));
    let mut pos = palette_end;

    for _ in 0..declared {
        if buf.len() < pos + FRAME_RECORD_SIZE {
            return Err(PakError::Truncated(
                "sprite frame record",
                pos + FRAME_RECORD_SIZE - buf.len(),
            ));
        }
        let mut rec = Cursor::new(&buf[pos..pos + FRAME_RECORD_SIZE]);
        let group = read_i32(&mut rec)?;
        let origin_x = read_i32(&mut rec)?;
        let origin_y = read_i32(&mut rec)?;
        let width = read_i32(&mut rec)?;
        let height = read_i32(&mut rec)?;
        pos += FRAME_RECORD_SIZE;

        if width < 0 || height < 0 {
            return Err(PakError::InvalidFormat(format!(
                "negative frame dimensions: {width}x{height}"
            )));
        }
        // Widen before multiplying; `width * height` can exceed u32 on a
        // hostile record and must fail the bounds check, not wrap.
        let pixel_count = width as u64 * height as u64;
        let remaining = (buf.len() - pos) as u64;
        if pixel_count > remaining {
            return Err(PakError::Truncated(
                "sprite frame pixels",
                (pixel_count - remaining) as usize,
            ));
        }
        let pixel_count = pixel_count as usize;
        let indices = &buf[pos..pos + pixel_count];
        pos += pixel_count;

        let mut pixels = Vec::with_capacity(pixel_count * 4);
        for &index in indices {
            let [r, g, b] = palette[index as usize];
            let alpha = if index == 255 { 0 } else { 255 };
            pixels.extend_from_slice(&[r, g, b, alpha]);
        }

        frames.push(SpriteFrame {
            group,
            origin_x,
            origin_y,
            width,
            height,
            image: RasterImage {
                width: width as u32,
                height: height as u32,
                pixels,
            },
            pixel_count,
        });
    }

    debug!(frames = frames.len(), version, "decoded sprite");
    Ok(SpriteData {
        version,
        kind: SpriteKind::from_code(kind),
        tex_format: TexFormat::from_code(tex_format),
        bounding_radius,
        max_width,
        max_height,
        frame_count,
        beam_length,
        sync_type: SyncType::from_code(sync_type),
        palette,
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite_bytes(version: i32, kind: i32, frames: &[(i32, i32, u8)]) -> Vec<u8> {
        // frames: (width, height, fill_index)
        let mut buf = Vec::new();
        buf.extend_from_slice(&SPRITE_MAGIC);
        buf.extend_from_slice(&version.to_le_bytes());
        buf.extend_from_slice(&kind.to_le_bytes()); // type
        buf.extend_from_slice(&0i32.to_le_bytes()); // tex format
        buf.extend_from_slice(&16.0f32.to_le_bytes()); // bounding radius
        buf.extend_from_slice(&2i32.to_le_bytes()); // max width
        buf.extend_from_slice(&2i32.to_le_bytes()); // max height
        buf.extend_from_slice(&(frames.len() as i32).to_le_bytes());
        buf.extend_from_slice(&0.0f32.to_le_bytes()); // beam length
        buf.extend_from_slice(&0i32.to_le_bytes()); // sync type

        buf.extend_from_slice(&(PALETTE_COLORS as u16).to_le_bytes());
        // palette[0] = red, everything else black
        buf.extend_from_slice(&[255, 0, 0]);
        buf.extend_from_slice(&[0u8; 255 * 3]);

        for &(w, h, fill) in frames {
            buf.extend_from_slice(&0i32.to_le_bytes()); // group
            buf.extend_from_slice(&0i32.to_le_bytes()); // origin x
            buf.extend_from_slice(&0i32.to_le_bytes()); // origin y
            buf.extend_from_slice(&w.to_le_bytes());
            buf.extend_from_slice(&h.to_le_bytes());
            buf.extend(std::iter::repeat(fill).take((w * h) as usize));
        }
        buf
    }

    #[test]
    fn decodes_single_red_frame() {
        let buf = sprite_bytes(2, 0, &[(2, 2, 0)]);
        let sprite = read_sprite(&buf).unwrap();

        assert_eq!(sprite.version, 2);
        assert_eq!(sprite.kind, SpriteKind::VpParallelUpright);
        assert_eq!(sprite.tex_format, TexFormat::Normal);
        assert_eq!(sprite.sync_type, SyncType::Sync);
        assert_eq!(sprite.frame_count, 1);
        assert_eq!(sprite.frames.len(), 1);

        let frame = &sprite.frames[0];
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(frame.pixel_count, 4);
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(frame.image.pixel(x, y), [255, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn index_255_is_transparent() {
        let buf = sprite_bytes(2, 0, &[(1, 1, 255)]);
        let sprite = read_sprite(&buf).unwrap();
        assert_eq!(sprite.frames[0].image.pixel(0, 0)[3], 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = sprite_bytes(2, 0, &[]);
        buf[0] = b'X';
        assert!(matches!(
            read_sprite(&buf),
            Err(PakError::InvalidMagic("sprite"))
        ));
    }

    #[test]
    fn rejects_wrong_version() {
        let buf = sprite_bytes(1, 0, &[]);
        assert!(matches!(
            read_sprite(&buf),
            Err(PakError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn rejects_wrong_palette_size() {
        let mut buf = sprite_bytes(2, 0, &[]);
        buf[SPRITE_HEADER_SIZE..SPRITE_HEADER_SIZE + 2].copy_from_slice(&128u16.to_le_bytes());
        assert!(matches!(read_sprite(&buf), Err(PakError::PaletteSize(128))));
    }

    #[test]
    fn rejects_truncated_frame_pixels() {
        let mut buf = sprite_bytes(2, 0, &[(2, 2, 0)]);
        buf.truncate(buf.len() - 2);
        assert!(matches!(
            read_sprite(&buf),
            Err(PakError::Truncated("sprite frame pixels", 2))
        ));
    }

    #[test]
    fn rejects_oversized_frame_dimensions() {
        // 65536 x 65536 overflows a u32 pixel count; the decode must fail
        // instead of wrapping past the bounds check.
        let mut buf = sprite_bytes(2, 0, &[]);
        buf[28..32].copy_from_slice(&1i32.to_le_bytes()); // frame count
        buf.extend_from_slice(&0i32.to_le_bytes()); // group
        buf.extend_from_slice(&0i32.to_le_bytes()); // origin x
        buf.extend_from_slice(&0i32.to_le_bytes()); // origin y
        buf.extend_from_slice(&65536i32.to_le_bytes());
        buf.extend_from_slice(&65536i32.to_le_bytes());

        assert!(matches!(
            read_sprite(&buf),
            Err(PakError::Truncated("sprite frame pixels", _))
        ));
    }

    #[test]
    fn huge_frame_count_fails_without_allocating() {
        let mut buf = sprite_bytes(2, 0, &[]);
        buf[28..32].copy_from_slice(&i32::MAX.to_le_bytes());
        assert!(matches!(
            read_sprite(&buf),
            Err(PakError::Truncated("sprite frame record", _))
        ));
    }

    #[test]
    fn unmapped_codes_fall_back_to_unknown() {
        let buf = sprite_bytes(2, 42, &[]);
        let sprite = read_sprite(&buf).unwrap();
        assert_eq!(sprite.kind, SpriteKind::Unknown);
        assert_eq!(sprite.kind.to_string(), "Unknown");
    }
}
