//! Pakforge: codec and virtual-entry model for game archive containers
//!
//! This library implements the editing core of a game-archive tool:
//! - Byte-exact decode/encode of the flat "PACK" header+directory format
//! - A ZIP-based container codec (PK3) delegating compression to `zip`
//! - Decoding of the indexed-palette "IDSP" sprite format into RGBA rasters
//! - A flat entry store with hierarchical views and path-based mutations
//!   (move, rename, delete, copy/paste, batch add with conflict resolution)
//!
//! # Example
//!
//! ```
//! use pakforge::{read_pak, write_pak, Editor, Entry};
//!
//! // Assemble an archive in memory and serialize it.
//! let mut editor = Editor::from_entries(vec![
//!     Entry::new("maps/e1m1.bsp", b"level data".to_vec()),
//!     Entry::new("readme.txt", b"hello".to_vec()),
//! ]);
//! editor.move_path("readme.txt", "maps").unwrap();
//! let buf = write_pak(editor.entries())?;
//!
//! // Round-trip it.
//! let decoded = read_pak(&buf)?;
//! assert_eq!(decoded.entries.len(), 2);
//! # Ok::<(), pakforge::error::PakError>(())
//! ```

// Core modules
pub mod archive;
pub mod container;
pub mod entry;
pub mod error;
pub mod ops;
pub mod preview;
pub mod provider;
pub mod resolve;
pub mod sprite;
pub mod tree;

// Re-export commonly used types
pub use archive::{read_pak, write_pak, PakContents, ReadWarning, DIR_RECORD_SIZE, HEADER_SIZE};
pub use container::{read_container, write_container};
pub use entry::{sha256_hex, Entry, EntryStore, PathKind, PLACEHOLDER_NAME};
pub use error::{PakError, Result};
pub use ops::{BatchOutcome, ClipboardItem, ClipboardMode, Editor, Rejection, UpsertOutcome};
pub use preview::{decode_text, PreviewError, PreviewKind};
pub use provider::{collect_files, EntryProvider, FsEntryProvider, ProvidedFile};
pub use resolve::{ConflictPair, ConflictResolver, Decision, ResolverState};
pub use sprite::{read_sprite, RasterImage, SpriteData, SpriteFrame, SpriteKind, SyncType, TexFormat};
pub use tree::{build_tree, natural_cmp, TreeBuild, TreeNode, TreeWarning};
