//! Locating external tools.
//!
//! Installers drop binaries into per-user directories (`~/.foundry/bin`,
//! `~/.bun/bin`, ...) that are not on the PATH this process inherited, so
//! lookups and child processes use PATH extended with those directories.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::settings::expand_home;
use crate::error::{NodeError, NodeResult};

/// PATH used for tool lookups and for every child process.
#[derive(Debug, Clone)]
pub struct ToolPath {
    dirs: Vec<PathBuf>,
}

impl ToolPath {
    /// Extra directories first, then the inherited PATH.
    pub fn new(extra: &[String]) -> Self {
        let mut dirs: Vec<PathBuf> = extra.iter().map(|d| expand_home(d)).collect();
        if let Some(path) = env::var_os("PATH") {
            dirs.extend(env::split_paths(&path));
        }
        Self { dirs }
    }

    /// Only the given directories; no inherited PATH.
    pub fn from_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Value for the `PATH` variable of child processes.
    pub fn joined(&self) -> OsString {
        env::join_paths(&self.dirs).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Cannot join tool PATH; using inherited PATH");
            env::var_os("PATH").unwrap_or_default()
        })
    }

    pub fn locate(&self, tool: &str) -> Option<PathBuf> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        which::which_in(tool, Some(self.joined()), cwd).ok()
    }

    pub fn is_installed(&self, tool: &str) -> bool {
        self.locate(tool).is_some()
    }

    /// Fail with `MissingDependency` unless `tool` resolves.
    pub fn require(&self, tool: &str) -> NodeResult<PathBuf> {
        let path = self.locate(tool).ok_or_else(|| NodeError::MissingDependency {
            tool: tool.to_string(),
        })?;
        tracing::debug!(tool, path = %path.display(), "Found tool");
        Ok(path)
    }
}
