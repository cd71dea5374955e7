//! Append-only per-category logs of external command output.
//!
//! Each category gets `<log_dir>/<category>.log`. Entries start with a
//! timestamped header line; output lines are prefixed with their stream.
//! Failing to write a log entry is reported but never fails the action.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::process::command::CommandOutcome;

/// Which log file an entry goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Install,
    Project,
    Build,
    Deploy,
    Trap,
    Operator,
}

impl LogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Install => "install",
            LogCategory::Project => "project",
            LogCategory::Build => "build",
            LogCategory::Deploy => "deploy",
            LogCategory::Trap => "trap",
            LogCategory::Operator => "operator",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to the log directory.
#[derive(Debug, Clone)]
pub struct ActionLog {
    dir: PathBuf,
}

impl ActionLog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: LogCategory) -> PathBuf {
        self.dir.join(format!("{}.log", category))
    }

    /// Append a finished command and its captured output.
    pub fn record(&self, category: LogCategory, outcome: &CommandOutcome) {
        let mut entry = format!(
            "[{}] $ {} (exit {})\n",
            timestamp(),
            outcome.command,
            outcome
                .status
                .map_or_else(|| "signal".to_string(), |c| c.to_string())
        );
        for line in &outcome.stdout {
            entry.push_str("stdout| ");
            entry.push_str(line);
            entry.push('\n');
        }
        for line in &outcome.stderr {
            entry.push_str("stderr| ");
            entry.push_str(line);
            entry.push('\n');
        }
        self.append_or_warn(category, &entry);
    }

    /// Append a single free-form line.
    pub fn note(&self, category: LogCategory, message: &str) {
        let entry = format!("[{}] {}\n", timestamp(), message);
        self.append_or_warn(category, &entry);
    }

    fn append_or_warn(&self, category: LogCategory, entry: &str) {
        if let Err(e) = self.append(category, entry) {
            tracing::warn!(
                path = %self.path_for(category).display(),
                error = %e,
                "Cannot write action log"
            );
        }
    }

    fn append(&self, category: LogCategory, entry: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(category))?;
        file.write_all(entry.as_bytes())
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
