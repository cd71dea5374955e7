//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate endpoint URLs, addresses and names before any action runs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: NodeConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::IpAddr;

use url::Url;

use crate::config::schema::NodeConfig;
use crate::credentials::address::parse_address;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every field that the actions later rely on.
pub fn validate_config(config: &NodeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("network.eth_rpc_url", &config.network.eth_rpc_url),
        ("network.eth_backup_rpc_url", &config.network.eth_backup_rpc_url),
        ("network.drosera_rpc_url", &config.network.drosera_rpc_url),
    ] {
        if let Err(message) = check_rpc_url(value) {
            errors.push(ValidationError::new(field, message));
        }
    }

    if config.network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }

    if parse_address(&config.network.drosera_address).is_err() {
        errors.push(ValidationError::new(
            "network.drosera_address",
            "must be 0x followed by 40 hex characters",
        ));
    }

    if !config.project.trap_config_address.is_empty()
        && parse_address(&config.project.trap_config_address).is_err()
    {
        errors.push(ValidationError::new(
            "project.trap_config_address",
            "must be 0x followed by 40 hex characters",
        ));
    }

    let name = &config.project.trap_name;
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(ValidationError::new(
            "project.trap_name",
            "must be non-empty and contain only letters, digits, '_' or '-'",
        ));
    }

    if !config.operator.public_ip.is_empty()
        && config.operator.public_ip.parse::<IpAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "operator.public_ip",
            format!("`{}` is not an IP address", config.operator.public_ip),
        ));
    }

    if config.operator.p2p_port == 0 || config.operator.server_port == 0 {
        errors.push(ValidationError::new("operator", "ports must be non-zero"));
    }

    if config.paths.log_dir.trim().is_empty() {
        errors.push(ValidationError::new("paths.log_dir", "must not be empty"));
    }

    if config.credentials.primary_env.is_empty() || config.credentials.secondary_env.is_empty() {
        errors.push(ValidationError::new(
            "credentials",
            "environment variable names must not be empty",
        ));
    }

    for toolchain in &config.tools.toolchains {
        if toolchain.binary.trim().is_empty() || toolchain.install.trim().is_empty() {
            errors.push(ValidationError::new(
                "tools.toolchains",
                format!("toolchain `{}` needs a binary and an install command", toolchain.name),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rpc_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("`{}` is not a valid URL: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" | "ws" | "wss" => Ok(()),
        other => Err(format!("unsupported scheme `{}`", other)),
    }
}
