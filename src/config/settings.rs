//! Immutable run settings: loaded config plus command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::schema::NodeConfig;

/// Flags taken from the command line.
#[derive(Clone, Default)]
pub struct Flags {
    /// Hex key passed on the command line.
    pub private_key: Option<String>,

    /// File whose first non-empty line holds the key.
    pub private_key_file: Option<PathBuf>,

    /// Never prompt; fail instead.
    pub non_interactive: bool,

    /// Answer yes to confirmations.
    pub assume_yes: bool,
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flags")
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .field("private_key_file", &self.private_key_file)
            .field("non_interactive", &self.non_interactive)
            .field("assume_yes", &self.assume_yes)
            .finish()
    }
}

/// Everything an action needs to know about this run. Built once in `main`.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: NodeConfig,
    pub flags: Flags,
    log_dir: PathBuf,
    project_dir: PathBuf,
    operator_dir: PathBuf,
}

impl Settings {
    pub fn new(config: NodeConfig, flags: Flags) -> Self {
        Self {
            log_dir: expand_home(&config.paths.log_dir),
            project_dir: expand_home(&config.paths.project_dir),
            operator_dir: expand_home(&config.paths.operator_dir),
            config,
            flags,
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn operator_dir(&self) -> &Path {
        &self.operator_dir
    }

    /// Path of the trap project's config file.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir.join(&self.config.project.config_file)
    }

    /// Path of the operator compose file.
    pub fn compose_path(&self) -> PathBuf {
        self.operator_dir.join(&self.config.operator.compose_file)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_debug_redacts_key() {
        let flags = Flags {
            private_key: Some("ab".repeat(32)),
            ..Flags::default()
        };
        let printed = format!("{:?}", flags);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("abab"));
    }

    #[test]
    fn test_paths_resolved() {
        let mut config = NodeConfig::default();
        config.paths.project_dir = "/srv/trap".into();
        config.paths.operator_dir = "/srv/operator".into();
        let settings = Settings::new(config, Flags::default());

        assert_eq!(settings.project_config_path(), PathBuf::from("/srv/trap/drosera.toml"));
        assert_eq!(
            settings.compose_path(),
            PathBuf::from("/srv/operator/docker-compose.yaml")
        );
    }

    #[test]
    fn test_expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/var/log/trapnode"), PathBuf::from("/var/log/trapnode"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/logs"), home.join("logs"));
        }
    }
}
