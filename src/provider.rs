//! Acquisition of `{bytes, relative path}` pairs from outside the archive.
//!
//! The [`EntryProvider`] trait abstracts recursive file acquisition from a
//! host file system; adding a single file, a dropped folder, or a whole
//! directory tree all flow through it identically. The filesystem
//! implementation walks with an explicit stack, so arbitrarily deep trees
//! never grow the call stack, and callers pull one file at a time.

use crate::entry::Entry;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// One file yielded by a provider: its bytes and its path relative to the
/// dropped/selected root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvidedFile {
    pub relative_path: String,
    pub data: Vec<u8>,
}

/// Pull-based source of files to add to an archive.
pub trait EntryProvider {
    /// Next file, or `None` when the source is exhausted.
    fn next_file(&mut self) -> Result<Option<ProvidedFile>>;
}

/// Walks a host directory (or single file) without recursion.
///
/// A directory root contributes its own name as the leading path segment,
/// mirroring how a dropped folder lands inside an archive. Children are
/// visited in name order for deterministic output.
pub struct FsEntryProvider {
    // Pending (absolute path, archive-relative path) pairs; pushed in reverse
    // name order so popping yields ascending order.
    stack: Vec<(PathBuf, String)>,
}

impl FsEntryProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            stack: vec![(root, name)],
        })
    }
}

impl EntryProvider for FsEntryProvider {
    fn next_file(&mut self) -> Result<Option<ProvidedFile>> {
        while let Some((path, rel)) = self.stack.pop() {
            if path.is_dir() {
                let mut children: Vec<PathBuf> = fs::read_dir(&path)?
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<_>>()?;
                children.sort();
                for child in children.into_iter().rev() {
                    let child_name = child
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    self.stack.push((child, format!("{rel}/{child_name}")));
                }
                continue;
            }

            let data = fs::read(&path)?;
            return Ok(Some(ProvidedFile {
                relative_path: rel,
                data,
            }));
        }
        Ok(None)
    }
}

/// Drain a provider into entries, optionally rooted under `dest`.
///
/// File reads may be issued eagerly here, but the result is a single list
/// for one sequential store mutation (typically
/// [`Editor::add_batch`](crate::ops::Editor::add_batch)), so partial updates
/// never interleave.
pub fn collect_files<P: EntryProvider + ?Sized>(
    provider: &mut P,
    dest: &str,
) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    while let Some(file) = provider.next_file()? {
        let path = if dest.is_empty() {
            file.relative_path
        } else {
            format!("{dest}/{}", file.relative_path)
        };
        entries.push(Entry::new(&path, file.data));
    }
    Ok(entries)
}
