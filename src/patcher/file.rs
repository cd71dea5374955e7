//! Committing document edits to disk: backup, then atomic replace.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use regex::Regex;
use tempfile::NamedTempFile;

use crate::error::{NodeError, NodeResult};
use crate::patcher::document::{ConfigDocument, Value};

/// What a patch call did on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Backup written before the change; `None` when nothing changed.
    pub backup: Option<PathBuf>,
    pub changed: bool,
}

/// Set `key` anywhere in the file (first match or append).
pub fn patch_key(path: &Path, key: &str, value: impl Into<Value>) -> NodeResult<PatchOutcome> {
    let value = value.into();
    apply(path, |doc| Ok(doc.set(key, value)))
}

/// Set `key` inside the first section whose header matches `section`.
pub fn patch_section_key(
    path: &Path,
    section: &Regex,
    key: &str,
    value: impl Into<Value>,
) -> NodeResult<PatchOutcome> {
    let value = value.into();
    apply(path, |doc| {
        doc.set_in_section(section, key, value)
            .ok_or_else(|| NodeError::SectionNotFound {
                pattern: section.as_str().to_string(),
                path: path.to_path_buf(),
            })
    })
}

/// Read `path`, run `edit`, and commit the result if it differs.
///
/// The original is copied to `<name>.bak.<timestamp>` before the atomic
/// replace. Two patches within the same second share a backup name, so the
/// second overwrites the first backup.
pub fn apply<F>(path: &Path, edit: F) -> NodeResult<PatchOutcome>
where
    F: FnOnce(&ConfigDocument) -> NodeResult<ConfigDocument>,
{
    if !path.is_file() {
        return Err(NodeError::ConfigFileNotFound(path.to_path_buf()));
    }

    let original = fs::read_to_string(path)?;
    let before = ConfigDocument::parse(&original);
    let after = edit(&before)?;
    let rendered = after.render();

    if rendered == original {
        tracing::debug!(path = %path.display(), "Config already up to date");
        return Ok(PatchOutcome {
            backup: None,
            changed: false,
        });
    }

    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|source| NodeError::WriteFailed {
        path: backup.clone(),
        source,
    })?;

    write_atomic(path, &rendered)?;

    tracing::info!(
        path = %path.display(),
        backup = %backup.display(),
        "Config updated"
    );

    Ok(PatchOutcome {
        backup: Some(backup),
        changed: true,
    })
}

/// Sibling path `<name>.bak.<YYYYmmdd-HHMMSS>`.
pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    path.with_file_name(format!("{}.bak.{}", name, stamp))
}

/// Write `content` to a temporary sibling and rename it over `path`.
///
/// Existing permissions are carried over. On any failure `path` is untouched
/// and the temporary file is removed.
pub fn write_atomic(path: &Path, content: &str) -> NodeResult<()> {
    let failed = |source: std::io::Error| NodeError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(failed)?;
    tmp.write_all(content.as_bytes()).map_err(failed)?;
    tmp.as_file().sync_all().map_err(failed)?;

    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(failed)?;
    }

    tmp.persist(path).map_err(|e| failed(e.error))?;
    Ok(())
}
