//! Hierarchical view over the flat entry model.
//!
//! Trees are derived data: built fresh from an [`EntryStore`] snapshot after
//! every mutation and never mutated in place. File nodes borrow their entry
//! from the store.
//!
//! [`EntryStore`]: crate::entry::EntryStore

use crate::entry::Entry;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::warn;

/// A node in the derived hierarchy.
#[derive(Debug)]
pub enum TreeNode<'a> {
    File {
        name: String,
        path: String,
        entry: &'a Entry,
    },
    Folder {
        name: String,
        path: String,
        children: Vec<TreeNode<'a>>,
    },
}

impl TreeNode<'_> {
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Folder { name, .. } => name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::File { path, .. } | Self::Folder { path, .. } => path,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder { .. })
    }
}

/// Recoverable condition raised while building a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeWarning {
    /// An entry needed a folder at a position already occupied by a file (or
    /// the other way around); the entry was not inserted.
    TypeClash { path: String },
}

impl std::fmt::Display for TreeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeClash { path } => {
                write!(f, "a conflicting node already exists at \"{path}\"")
            }
        }
    }
}

/// Result of a tree build: root-level nodes plus any skipped entries.
#[derive(Debug)]
pub struct TreeBuild<'a> {
    pub roots: Vec<TreeNode<'a>>,
    pub warnings: Vec<TreeWarning>,
}

#[derive(Default)]
struct FolderBuilder<'a> {
    files: BTreeMap<String, &'a Entry>,
    folders: BTreeMap<String, FolderBuilder<'a>>,
}

impl<'a> FolderBuilder<'a> {
    fn finalize(self, parent_path: &str) -> Vec<TreeNode<'a>> {
        let join = |name: &str| {
            if parent_path.is_empty() {
                name.to_string()
            } else {
                format!("{parent_path}/{name}")
            }
        };

        let mut folders: Vec<TreeNode<'a>> = self
            .folders
            .into_iter()
            .map(|(name, builder)| {
                let path = join(&name);
                let children = builder.finalize(&path);
                TreeNode::Folder {
                    name,
                    path,
                    children,
                }
            })
            .collect();
        folders.sort_by(|a, b| natural_cmp(a.name(), b.name()));

        let mut files: Vec<TreeNode<'a>> = self
            .files
            .into_iter()
            .map(|(name, entry)| TreeNode::File {
                path: join(&name),
                name,
                entry,
            })
            .collect();
        files.sort_by(|a, b| natural_cmp(a.name(), b.name()));

        folders.extend(files);
        folders
    }
}

/// Derive the hierarchical view from a flat entry list.
///
/// Entries are processed in path order. Placeholder markers create (or
/// confirm) their parent folder chain but contribute no file leaf. An entry
/// whose path clashes with an existing node of the other kind is skipped with
/// a [`TreeWarning`]; the rest of the build continues.
pub fn build_tree(entries: &[Entry]) -> TreeBuild<'_> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut root = FolderBuilder::default();
    let mut warnings = Vec::new();

    'entries: for entry in sorted {
        let segments: Vec<&str> = entry.path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };

        let mut level = &mut root;
        for (i, segment) in parents.iter().enumerate() {
            if level.files.contains_key(*segment) {
                let clash = segments[..=i].join("/");
                warn!(path = %entry.path, clash = %clash, "file blocks folder creation; skipping entry");
                warnings.push(TreeWarning::TypeClash { path: clash });
                continue 'entries;
            }
            level = level.folders.entry(segment.to_string()).or_default();
        }

        if entry.is_placeholder() {
            // Parent chain above is all the marker exists for.
            continue;
        }

        if level.folders.contains_key(*leaf) {
            warn!(path = %entry.path, "folder blocks file creation; skipping entry");
            warnings.push(TreeWarning::TypeClash {
                path: entry.path.clone(),
            });
            continue;
        }
        level.files.insert(leaf.to_string(), entry);
    }

    TreeBuild {
        roots: root.finalize(""),
        warnings,
    }
}

/// Case-insensitive, numeric-aware name ordering: digit runs compare by
/// value, so `map2` sorts before `map10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ac = a.chars().peekable();
    let mut bc = b.chars().peekable();

    loop {
        match (ac.peek().copied(), bc.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let na = take_number(&mut ac);
                let nb = take_number(&mut bc);
                match na.cmp(&nb) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                let xl = x.to_ascii_lowercase();
                let yl = y.to_ascii_lowercase();
                if xl != yl {
                    return xl.cmp(&yl);
                }
                ac.next();
                bc.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut value: u64 = 0;
    while let Some(c) = chars.peek().copied() {
        let Some(digit) = c.to_digit(10) else { break };
        value = value.saturating_mul(10).saturating_add(digit as u64);
        chars.next();
    }
    value
}
