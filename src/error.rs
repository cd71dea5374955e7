//! Error taxonomy shared by every subsystem.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors surfaced to the operator.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A required external tool is not on PATH.
    #[error("Required tool `{tool}` not found on PATH")]
    MissingDependency { tool: String },

    /// No credential source produced a usable key.
    #[error("No valid private key found (checked {checked})")]
    MissingCredential { checked: String },

    /// A candidate key failed the 64-hex format check.
    #[error("Private key must be 64 hex characters (optionally 0x-prefixed)")]
    InvalidCredentialFormat,

    /// Operator-supplied address is not `0x` + 40 hex characters.
    #[error("Invalid address `{0}`: expected 0x followed by 40 hex characters")]
    InvalidAddressFormat(String),

    /// Patch target does not exist.
    #[error("Config file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    /// Bounded patch found no matching section header.
    #[error("Section matching `{pattern}` not found in {}", .path.display())]
    SectionNotFound { pattern: String, path: PathBuf },

    /// Backup or atomic replace failed. The original file is left as it was.
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed with {}", describe_status(*.status))]
    SubprocessFailed { command: String, status: Option<i32> },

    /// Operator input that is neither a key nor an address failed validation.
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_status(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("exit status {}", code),
        None => "termination by signal".to_string(),
    }
}

/// Result type used across the crate.
pub type NodeResult<T> = Result<T, NodeError>;
