//! Path-based mutation operations over an [`EntryStore`].
//!
//! The [`Editor`] is the single controller that owns the store, the one-slot
//! clipboard, and the conflict queue. Every operation computes a complete
//! replacement entry list and swaps it in atomically; rejected operations
//! leave the store untouched and report a [`Rejection`] instead of failing.

use crate::entry::{last_segment, normalize_path, Entry, EntryStore, PathKind};
use crate::resolve::{ConflictPair, ConflictResolver, Decision};
use crate::tree::{build_tree, TreeBuild};
use thiserror::Error;
use tracing::debug;

/// Why a mutation was not applied. Local, synchronous, and non-mutating;
/// these are outcomes to display, never fatal errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("cannot move \"{path}\" into itself")]
    SelfContainment { path: String },

    #[error("an item named \"{path}\" already exists at the destination")]
    DestinationExists { path: String },

    #[error("no file or folder exists at \"{path}\"")]
    NotFound { path: String },

    #[error("name must not be empty")]
    EmptyName,

    #[error("clipboard is empty")]
    EmptyClipboard,
}

/// Clipboard transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardMode {
    Copy,
    Cut,
}

/// The single clipboard slot: what was copied or cut, and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardItem {
    pub mode: ClipboardMode,
    pub kind: PathKind,
    pub path: String,
}

/// Outcome of a batch add: how many entries merged cleanly and how many were
/// queued for conflict resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub added: usize,
    pub queued_conflicts: usize,
}

/// Whether an upsert replaced an existing entry or added a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Added,
    Replaced,
}

/// Controller owning the entry store, the clipboard, and the conflict queue.
#[derive(Debug, Default)]
pub struct Editor {
    store: EntryStore,
    clipboard: Option<ClipboardItem>,
    resolver: ConflictResolver,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            store: EntryStore::from_entries(entries),
            clipboard: None,
            resolver: ConflictResolver::new(),
        }
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn entries(&self) -> &[Entry] {
        self.store.list()
    }

    pub fn clipboard(&self) -> Option<&ClipboardItem> {
        self.clipboard.as_ref()
    }

    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    /// Derive the hierarchical view of the current entries.
    pub fn tree(&self) -> TreeBuild<'_> {
        build_tree(self.store.list())
    }

    /// Move a file or folder under `dest` (empty string for the root).
    ///
    /// `source` keeps its own name; the new location is
    /// `dest + "/" + last_segment(source)`.
    pub fn move_path(&mut self, source: &str, dest: &str) -> std::result::Result<(), Rejection> {
        let kind = self
            .store
            .kind_of(source)
            .ok_or_else(|| Rejection::NotFound {
                path: source.to_string(),
            })?;

        let new_base = join_dest(dest, last_segment(source));
        if source == dest || new_base == source || descends_from(&new_base, source) {
            return Err(Rejection::SelfContainment {
                path: source.to_string(),
            });
        }
        if !dest.is_empty() && self.store.kind_of(dest) == Some(PathKind::File) {
            return Err(Rejection::DestinationExists {
                path: dest.to_string(),
            });
        }
        if self.occupied(&new_base) {
            return Err(Rejection::DestinationExists { path: new_base });
        }

        self.rewrite_prefix(source, &new_base, kind);
        debug!(source, dest = %new_base, "moved");
        Ok(())
    }

    /// Rename a file or folder in place. A no-op when the paths are equal.
    pub fn rename(&mut self, old: &str, new: &str) -> std::result::Result<(), Rejection> {
        if old == new {
            return Ok(());
        }
        let kind = self.store.kind_of(old).ok_or_else(|| Rejection::NotFound {
            path: old.to_string(),
        })?;

        let new = normalize_path(new);
        if last_segment(&new).is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.occupied(&new) {
            return Err(Rejection::DestinationExists { path: new });
        }

        self.rewrite_prefix(old, &new, kind);
        debug!(old, new = %new, "renamed");
        Ok(())
    }

    /// Delete a file, or a folder with all its descendants.
    pub fn delete(&mut self, path: &str, kind: PathKind) -> std::result::Result<(), Rejection> {
        let prefix = format!("{path}/");
        let remaining: Vec<Entry> = self
            .store
            .list()
            .iter()
            .filter(|e| match kind {
                PathKind::File => e.path != path,
                PathKind::Folder => e.path != path && !e.path.starts_with(&prefix),
            })
            .cloned()
            .collect();

        if remaining.len() == self.store.len() {
            return Err(Rejection::NotFound {
                path: path.to_string(),
            });
        }

        self.store.replace_all(remaining);
        debug!(path, "deleted");
        Ok(())
    }

    /// Put a file or folder on the clipboard for a later paste.
    pub fn copy(&mut self, path: &str) -> std::result::Result<(), Rejection> {
        self.set_clipboard(path, ClipboardMode::Copy)
    }

    /// Like [`copy`](Self::copy), but the source is removed once pasted.
    pub fn cut(&mut self, path: &str) -> std::result::Result<(), Rejection> {
        self.set_clipboard(path, ClipboardMode::Cut)
    }

    fn set_clipboard(
        &mut self,
        path: &str,
        mode: ClipboardMode,
    ) -> std::result::Result<(), Rejection> {
        let kind = self.store.kind_of(path).ok_or_else(|| Rejection::NotFound {
            path: path.to_string(),
        })?;
        self.clipboard = Some(ClipboardItem {
            mode,
            kind,
            path: path.to_string(),
        });
        Ok(())
    }

    /// Paste the clipboard item under `dest` (empty string for the root).
    ///
    /// Collisions against any current entry reject the whole paste with no
    /// mutation. A successful cut-paste clears the clipboard.
    pub fn paste(&mut self, dest: &str) -> std::result::Result<(), Rejection> {
        let item = self.clipboard.clone().ok_or(Rejection::EmptyClipboard)?;

        let new_base = join_dest(dest, last_segment(&item.path));
        if descends_from(&new_base, &item.path) {
            return Err(Rejection::SelfContainment {
                path: item.path.clone(),
            });
        }
        if !dest.is_empty() && self.store.kind_of(dest) == Some(PathKind::File) {
            return Err(Rejection::DestinationExists {
                path: dest.to_string(),
            });
        }

        let source_prefix = format!("{}/", item.path);
        let mut to_add = Vec::new();
        match item.kind {
            PathKind::Folder => {
                for entry in self.store.list() {
                    if let Some(rest) = entry.path.strip_prefix(&source_prefix) {
                        to_add.push(entry.with_path(format!("{new_base}/{rest}")));
                    }
                }
            }
            PathKind::File => {
                let entry = self
                    .store
                    .get(&item.path)
                    .ok_or_else(|| Rejection::NotFound {
                        path: item.path.clone(),
                    })?;
                to_add.push(entry.with_path(new_base.clone()));
            }
        }

        if let Some(conflict) = to_add.iter().find(|a| self.store.contains(&a.path)) {
            return Err(Rejection::DestinationExists {
                path: conflict.path.clone(),
            });
        }

        let mut updated: Vec<Entry> = match item.mode {
            ClipboardMode::Cut => self
                .store
                .list()
                .iter()
                .filter(|e| e.path != item.path && !e.path.starts_with(&source_prefix))
                .cloned()
                .collect(),
            ClipboardMode::Copy => self.store.list().to_vec(),
        };
        updated.extend(to_add);
        self.store.replace_all(updated);

        if item.mode == ClipboardMode::Cut {
            self.clipboard = None;
        }
        debug!(source = %item.path, dest = %new_base, "pasted");
        Ok(())
    }

    /// Create an empty folder by inserting a placeholder marker.
    pub fn new_folder(&mut self, path: &str) -> std::result::Result<(), Rejection> {
        let normalized = normalize_path(path);
        let normalized = normalized.trim_end_matches('/');
        if normalized.is_empty() {
            return Err(Rejection::EmptyName);
        }
        if self.occupied(normalized) {
            return Err(Rejection::DestinationExists {
                path: normalized.to_string(),
            });
        }

        let mut updated = self.store.list().to_vec();
        updated.push(Entry::placeholder(normalized));
        self.store.replace_all(updated);
        Ok(())
    }

    /// Add or replace a single entry at its own path.
    pub fn upsert(&mut self, entry: Entry) -> UpsertOutcome {
        let mut updated = self.store.list().to_vec();
        let outcome = match updated.iter_mut().find(|e| e.path == entry.path) {
            Some(existing) => {
                *existing = entry;
                UpsertOutcome::Replaced
            }
            None => {
                updated.push(entry);
                UpsertOutcome::Added
            }
        };
        self.store.replace_all(updated);
        outcome
    }

    /// Merge a batch of new entries into the store.
    ///
    /// Entries whose path is free are added in one atomic mutation; entries
    /// that collide with an existing path are queued as conflict pairs for
    /// the resolver to decide one at a time.
    pub fn add_batch(&mut self, new_entries: Vec<Entry>) -> BatchOutcome {
        let mut clean: Vec<Entry> = Vec::new();
        let mut conflicts = Vec::new();

        for incoming in new_entries {
            // A later batch entry can collide with an earlier one as well as
            // with the store; both go through the resolver.
            let existing = self
                .store
                .get(&incoming.path)
                .or_else(|| clean.iter().find(|e| e.path == incoming.path));
            match existing {
                Some(existing) => {
                    let existing = existing.clone();
                    conflicts.push(ConflictPair { incoming, existing });
                }
                None => clean.push(incoming),
            }
        }

        let outcome = BatchOutcome {
            added: clean.len(),
            queued_conflicts: conflicts.len(),
        };

        if !clean.is_empty() {
            let mut updated = self.store.list().to_vec();
            updated.extend(clean);
            self.store.replace_all(updated);
        }
        if !conflicts.is_empty() {
            self.resolver.begin(conflicts);
        }

        debug!(
            added = outcome.added,
            conflicts = outcome.queued_conflicts,
            "batch add"
        );
        outcome
    }

    /// Decide the pending conflict(s). See [`ConflictResolver::resolve`].
    pub fn resolve(&mut self, decision: Decision) {
        self.resolver.resolve(&mut self.store, decision);
    }

    fn occupied(&self, path: &str) -> bool {
        let prefix = format!("{path}/");
        self.store
            .list()
            .iter()
            .any(|e| e.path == path || e.path.starts_with(&prefix))
    }

    /// Rewrite `source` (and, for folders, every descendant) to live at
    /// `new_base`, recomputing names from the new paths.
    fn rewrite_prefix(&mut self, source: &str, new_base: &str, kind: PathKind) {
        let source_prefix = format!("{source}/");
        let updated = self
            .store
            .list()
            .iter()
            .map(|entry| match kind {
                PathKind::Folder => match entry.path.strip_prefix(&source_prefix) {
                    Some(rest) => entry.with_path(format!("{new_base}/{rest}")),
                    None => entry.clone(),
                },
                PathKind::File if entry.path == source => entry.with_path(new_base.to_string()),
                PathKind::File => entry.clone(),
            })
            .collect();
        self.store.replace_all(updated);
    }
}

fn join_dest(dest: &str, name: &str) -> String {
    if dest.is_empty() {
        name.to_string()
    } else {
        format!("{dest}/{name}")
    }
}

fn descends_from(path: &str, ancestor: &str) -> bool {
    path.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        Editor::from_entries(vec![
            Entry::new("maps/e1m1.bsp", vec![1]),
            Entry::new("maps/sub/e1m2.bsp", vec![2]),
            Entry::new("readme.txt", vec![3]),
        ])
    }

    fn paths(editor: &Editor) -> Vec<&str> {
        editor.entries().iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn move_file_to_folder() {
        let mut ed = editor();
        ed.move_path("readme.txt", "maps").unwrap();
        assert!(paths(&ed).contains(&"maps/readme.txt"));
        assert!(!paths(&ed).contains(&"readme.txt"));

        let moved = ed.store().get("maps/readme.txt").unwrap();
        assert_eq!(moved.name, "readme.txt");
    }

    #[test]
    fn move_folder_rewrites_descendants() {
        let mut ed = editor();
        ed.move_path("maps/sub", "").unwrap();
        assert!(paths(&ed).contains(&"sub/e1m2.bsp"));
        assert!(!paths(&ed).contains(&"maps/sub/e1m2.bsp"));
    }

    #[test]
    fn move_then_move_back_restores_paths() {
        let mut ed = editor();
        let before = paths(&ed)
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>();

        ed.move_path("readme.txt", "maps").unwrap();
        ed.move_path("maps/readme.txt", "").unwrap();

        let mut after = paths(&ed).into_iter().map(String::from).collect::<Vec<_>>();
        let mut expected = before;
        expected.sort();
        after.sort();
        assert_eq!(after, expected);
    }

    #[test]
    fn move_rejects_self_containment() {
        let mut ed = editor();
        let before = paths(&ed).into_iter().map(String::from).collect::<Vec<_>>();

        assert!(matches!(
            ed.move_path("maps", "maps/sub"),
            Err(Rejection::SelfContainment { .. })
        ));
        assert_eq!(paths(&ed), before);
    }

    #[test]
    fn move_rejects_destination_collision() {
        let mut ed = editor();
        ed.upsert(Entry::new("maps/sub/readme.txt", vec![9]));

        assert_eq!(
            ed.move_path("readme.txt", "maps/sub"),
            Err(Rejection::DestinationExists {
                path: "maps/sub/readme.txt".to_string()
            })
        );
    }

    #[test]
    fn rename_folder_propagates() {
        let mut ed = Editor::from_entries(vec![
            Entry::new("x/a", vec![1]),
            Entry::new("x/b/c", vec![2]),
            Entry::new("other", vec![3]),
        ]);
        ed.rename("x", "y").unwrap();

        let mut got = paths(&ed);
        got.sort();
        assert_eq!(got, ["other", "y/a", "y/b/c"]);
        assert_eq!(ed.store().get("y/b/c").unwrap().name, "c");
    }

    #[test]
    fn rename_rejects_empty_and_collision() {
        let mut ed = editor();
        assert_eq!(ed.rename("readme.txt", ""), Err(Rejection::EmptyName));
        assert!(matches!(
            ed.rename("readme.txt", "maps"),
            Err(Rejection::DestinationExists { .. })
        ));
        // Equal paths are a no-op, not a rejection.
        assert_eq!(ed.rename("readme.txt", "readme.txt"), Ok(()));
    }

    #[test]
    fn delete_folder_removes_descendants() {
        let mut ed = editor();
        ed.delete("maps", PathKind::Folder).unwrap();
        assert_eq!(paths(&ed), ["readme.txt"]);
    }

    #[test]
    fn delete_file_removes_exact_match_only() {
        let mut ed = editor();
        ed.delete("maps/e1m1.bsp", PathKind::File).unwrap();
        assert!(!paths(&ed).contains(&"maps/e1m1.bsp"));
        assert!(paths(&ed).contains(&"maps/sub/e1m2.bsp"));
    }

    #[test]
    fn copy_paste_duplicates_folder() {
        let mut ed = editor();
        ed.copy("maps/sub").unwrap();
        ed.paste("").unwrap();

        assert!(paths(&ed).contains(&"sub/e1m2.bsp"));
        assert!(paths(&ed).contains(&"maps/sub/e1m2.bsp"));
        // Copy leaves the clipboard loaded.
        assert!(ed.clipboard().is_some());
    }

    #[test]
    fn cut_paste_relocates_and_clears_clipboard() {
        let mut ed = editor();
        ed.cut("readme.txt").unwrap();
        ed.paste("maps").unwrap();

        assert!(paths(&ed).contains(&"maps/readme.txt"));
        assert!(!paths(&ed).contains(&"readme.txt"));
        assert!(ed.clipboard().is_none());
    }

    #[test]
    fn paste_collision_rejects_without_mutation() {
        let mut ed = editor();
        ed.upsert(Entry::new("maps/readme.txt", vec![9]));
        let before = paths(&ed).into_iter().map(String::from).collect::<Vec<_>>();

        ed.copy("readme.txt").unwrap();
        let rejection = ed.paste("maps").unwrap_err();
        assert_eq!(
            rejection,
            Rejection::DestinationExists {
                path: "maps/readme.txt".to_string()
            }
        );
        assert_eq!(paths(&ed), before);
    }

    #[test]
    fn new_folder_inserts_placeholder() {
        let mut ed = editor();
        ed.new_folder("sound/misc/").unwrap();
        assert!(paths(&ed).contains(&"sound/misc/.placeholder"));

        assert!(matches!(
            ed.new_folder("maps"),
            Err(Rejection::DestinationExists { .. })
        ));
    }

    #[test]
    fn add_batch_partitions_clean_and_conflicting() {
        let mut ed = editor();
        let outcome = ed.add_batch(vec![
            Entry::new("new.txt", vec![1]),
            Entry::new("readme.txt", vec![2]),
        ]);

        assert_eq!(
            outcome,
            BatchOutcome {
                added: 1,
                queued_conflicts: 1
            }
        );
        assert!(paths(&ed).contains(&"new.txt"));
        // The colliding entry is parked for resolution, not applied.
        assert_eq!(ed.store().get("readme.txt").unwrap().data, vec![3]);
        assert_eq!(ed.resolver().pending(), 1);
    }

    #[test]
    fn move_rejects_file_as_destination() {
        let mut ed = editor();
        let before = paths(&ed).into_iter().map(String::from).collect::<Vec<_>>();

        assert_eq!(
            ed.move_path("maps", "readme.txt"),
            Err(Rejection::DestinationExists {
                path: "readme.txt".to_string()
            })
        );
        assert_eq!(paths(&ed), before);
    }

    #[test]
    fn paste_rejects_file_as_destination() {
        let mut ed = editor();
        ed.copy("maps/e1m1.bsp").unwrap();
        assert_eq!(
            ed.paste("readme.txt"),
            Err(Rejection::DestinationExists {
                path: "readme.txt".to_string()
            })
        );
    }

    #[test]
    fn add_batch_queues_duplicates_within_the_batch() {
        let mut ed = editor();
        let outcome = ed.add_batch(vec![
            Entry::new("fresh.txt", vec![1]),
            Entry::new("fresh.txt", vec![2]),
        ]);

        assert_eq!(
            outcome,
            BatchOutcome {
                added: 1,
                queued_conflicts: 1
            }
        );
        // Only the first occurrence merged; the second is parked.
        assert_eq!(ed.store().get("fresh.txt").unwrap().data, vec![1]);
        assert_eq!(ed.resolver().pending(), 1);

        // Replacing resolves in favor of the later occurrence.
        ed.resolve(Decision::Replace);
        assert_eq!(ed.store().get("fresh.txt").unwrap().data, vec![2]);
    }

    #[test]
    fn name_invariant_holds_after_mutations() {
        let mut ed = editor();
        ed.move_path("readme.txt", "maps").unwrap();
        ed.rename("maps/sub", "maps/levels").unwrap();
        ed.copy("maps/e1m1.bsp").unwrap();
        ed.paste("maps/levels").unwrap();

        for entry in ed.entries() {
            assert_eq!(entry.name, last_segment(&entry.path));
        }
    }
}
