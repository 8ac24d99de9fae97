//! Preview-surface helpers: classify an entry by extension and decode text.
//!
//! Failures here are local to the preview surface; they never touch the
//! underlying entry data.

use crate::entry::Entry;
use thiserror::Error;

/// How an entry should be previewed, judged from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Text,
    Audio,
    Sprite,
    Unknown,
}

const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tga"];
const TEXT_EXTS: &[&str] = &["txt", "md", "cfg", "rc", "bat", "sh", "log"];
const AUDIO_EXTS: &[&str] = &["wav", "mp3", "ogg", "opus"];

impl PreviewKind {
    pub fn of(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
        if IMAGE_EXTS.contains(&ext.as_str()) {
            Self::Image
        } else if TEXT_EXTS.contains(&ext.as_str()) {
            Self::Text
        } else if AUDIO_EXTS.contains(&ext.as_str()) {
            Self::Audio
        } else if ext == "spr" {
            Self::Sprite
        } else {
            Self::Unknown
        }
    }
}

/// Preview decode failure. Non-fatal: only the preview surface is affected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("\"{name}\" is not valid UTF-8 text")]
    InvalidEncoding { name: String },

    #[error("no preview is available for \"{name}\"")]
    Unsupported { name: String },
}

/// Strictly decode a text entry as UTF-8.
pub fn decode_text(entry: &Entry) -> std::result::Result<String, PreviewError> {
    if PreviewKind::of(&entry.name) != PreviewKind::Text {
        return Err(PreviewError::Unsupported {
            name: entry.name.clone(),
        });
    }
    String::from_utf8(entry.data.clone()).map_err(|_| PreviewError::InvalidEncoding {
        name: entry.name.clone(),
    })
}
