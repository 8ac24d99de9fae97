//! The flat entry model shared by every codec and mutation surface.
//!
//! An [`EntryStore`] owns all entry byte buffers. Higher layers never mutate
//! entries in place: they compute a complete replacement list and swap it in
//! with [`EntryStore::replace_all`].

use sha2::{Digest, Sha256};

/// Entry name used for zero-size markers that keep otherwise-empty folders
/// alive in the flat model. The flat archive format has no native directory
/// records, so folder existence is encoded as a file.
pub const PLACEHOLDER_NAME: &str = ".placeholder";

/// Normalize path separators to forward slashes (cross-platform compatibility)
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Last path segment of a forward-slash path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// What a path names inside a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Folder,
}

/// One logical file inside an archive.
///
/// Invariants maintained by the constructors and every mutation path:
/// `name` equals the last segment of `path`, `size` equals `data.len()`, and
/// `path` is unique within its store. `offset` is only meaningful after a
/// flat-archive encode; container codecs leave it at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: String,
    pub offset: u32,
    pub size: u32,
    pub data: Vec<u8>,
}

impl Entry {
    /// Create an entry at `path`, normalizing backslashes and deriving the
    /// name and size.
    pub fn new(path: &str, data: Vec<u8>) -> Self {
        let path = normalize_path(path);
        let name = last_segment(&path).to_string();
        let size = data.len() as u32;
        Self {
            name,
            path,
            offset: 0,
            size,
            data,
        }
    }

    /// Zero-size marker that makes `folder_path` exist as an empty folder.
    pub fn placeholder(folder_path: &str) -> Self {
        let folder = normalize_path(folder_path);
        let folder = folder.trim_end_matches('/');
        Self::new(&format!("{folder}/{PLACEHOLDER_NAME}"), Vec::new())
    }

    /// True for zero-size folder markers. Markers that somehow carry data are
    /// treated as ordinary files.
    pub fn is_placeholder(&self) -> bool {
        self.name == PLACEHOLDER_NAME && self.size == 0
    }

    /// SHA-256 of the entry data as a lowercase hex string, for
    /// conflict-comparison display.
    pub fn content_hash(&self) -> String {
        sha256_hex(&self.data)
    }

    /// Rebuild this entry at a new path, recomputing the name.
    pub(crate) fn with_path(&self, path: String) -> Self {
        let name = last_segment(&path).to_string();
        Self {
            name,
            path,
            offset: self.offset,
            size: self.size,
            data: self.data.clone(),
        }
    }
}

/// SHA-256 digest of `data` as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// The canonical flat collection of archive entries.
///
/// The store is the single owner of all entry byte buffers and the sole
/// mutation surface: every operation computes a new full entry list and calls
/// [`replace_all`](Self::replace_all).
#[derive(Debug, Default, Clone)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn list(&self) -> &[Entry] {
        &self.entries
    }

    /// Atomic swap of the whole entry list.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path == path)
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// A path names a file iff an entry matches it exactly; otherwise it
    /// names a folder iff some entry lives underneath it.
    pub fn kind_of(&self, path: &str) -> Option<PathKind> {
        if self.contains(path) {
            return Some(PathKind::File);
        }
        let prefix = format!("{path}/");
        if self.entries.iter().any(|e| e.path.starts_with(&prefix)) {
            return Some(PathKind::Folder);
        }
        None
    }
}
