//! Config file patching.
//!
//! # Data Flow
//! ```text
//! file on disk
//!     → file.rs (existence check, read)
//!     → document.rs (pure edit: set / set_in_section → new document)
//!     → file.rs (timestamped backup, temp file + rename)
//! ```
//!
//! # Design Decisions
//! - Edits never touch lines they do not target; order is preserved
//! - First matching key wins; later duplicates are kept as they are
//! - Unchanged documents are not rewritten and get no backup

pub mod document;
pub mod file;

pub use document::{section_pattern, ConfigDocument, Value};
pub use file::{patch_key, patch_section_key, write_atomic, PatchOutcome};
