//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::NodeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "trapnode.toml";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
    Override { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "IO error reading {}: {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Override { var, value } => {
                write!(f, "Invalid value `{}` in environment variable {}", value, var)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<NodeConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load configuration, apply environment overrides, then validate.
///
/// An explicit `path` must exist. Without one, `trapnode.toml` in the working
/// directory is used when present and built-in defaults otherwise.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<NodeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_config(default_path)?
            } else {
                tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                NodeConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `TRAPNODE_*` endpoint and path overrides.
///
/// Empty variables are ignored.
pub fn apply_env_overrides<F>(config: &mut NodeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let string_overrides: [(&str, &mut String); 8] = [
        ("TRAPNODE_ETH_RPC_URL", &mut config.network.eth_rpc_url),
        ("TRAPNODE_ETH_BACKUP_RPC_URL", &mut config.network.eth_backup_rpc_url),
        ("TRAPNODE_DROSERA_RPC_URL", &mut config.network.drosera_rpc_url),
        ("TRAPNODE_DROSERA_ADDRESS", &mut config.network.drosera_address),
        ("TRAPNODE_TRAP_CONFIG_ADDRESS", &mut config.project.trap_config_address),
        ("TRAPNODE_PUBLIC_IP", &mut config.operator.public_ip),
        ("TRAPNODE_PROJECT_DIR", &mut config.paths.project_dir),
        ("TRAPNODE_LOG_DIR", &mut config.paths.log_dir),
    ];

    for (var, field) in string_overrides {
        if let Some(value) = get(var) {
            tracing::debug!(var, "Applying environment override");
            *field = value;
        }
    }

    const CHAIN_ID_VAR: &str = "TRAPNODE_CHAIN_ID";
    if let Some(value) = get(CHAIN_ID_VAR) {
        config.network.chain_id = value.parse().map_err(|_| ConfigError::Override {
            var: CHAIN_ID_VAR,
            value: value.clone(),
        })?;
    }

    Ok(())
}
