//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the node tool.
//! All types derive Serde traits for deserialization from `trapnode.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration for the node tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct NodeConfig {
    /// Filesystem locations (logs, project, operator compose dir).
    pub paths: PathsConfig,

    /// Chain and RPC endpoints.
    pub network: NetworkConfig,

    /// Trap project settings.
    pub project: ProjectConfig,

    /// Operator stack settings.
    pub operator: OperatorConfig,

    /// External tool names and installers.
    pub tools: ToolsConfig,

    /// Credential source names.
    pub credentials: CredentialsConfig,
}

/// Filesystem locations.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for action logs and the session log.
    pub log_dir: String,

    /// Trap project directory (created by `forge init`).
    pub project_dir: String,

    /// Directory holding the operator compose file.
    pub operator_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_dir: "~/.trapnode/logs".to_string(),
            project_dir: "~/my-drosera-trap".to_string(),
            operator_dir: "~/drosera-operator".to_string(),
        }
    }
}

/// Chain and RPC endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Ethereum JSON-RPC endpoint used by the vendor CLI and the operator.
    pub eth_rpc_url: String,

    /// Backup RPC endpoint handed to the operator.
    pub eth_backup_rpc_url: String,

    /// Vendor seed-node RPC endpoint.
    pub drosera_rpc_url: String,

    /// Chain ID written to the project config.
    pub chain_id: u64,

    /// Vendor core contract address.
    pub drosera_address: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            eth_rpc_url: "https://ethereum-holesky-rpc.publicnode.com".to_string(),
            eth_backup_rpc_url: "https://1rpc.io/holesky".to_string(),
            drosera_rpc_url: "https://seed-node.testnet.drosera.io".to_string(),
            chain_id: 17000,
            drosera_address: "0xea08f7d533C2b9A62F40D5326214f39a8E3A32F8".to_string(),
        }
    }
}

/// Trap project settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Template passed to `forge init -t`.
    pub template: String,

    /// Name of the `[traps.<name>]` block patched for whitelisting.
    pub trap_name: String,

    /// Project config file name inside the project dir.
    pub config_file: String,

    /// Deployed trap config address, used by opt-in and funding.
    pub trap_config_address: String,

    /// Answer piped to `drosera apply`'s own confirmation prompt on every
    /// apply. trapnode asks its own confirmation first.
    pub apply_confirmation: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            template: "drosera-network/trap-foundry-template".to_string(),
            trap_name: "mytrap".to_string(),
            config_file: "drosera.toml".to_string(),
            trap_config_address: String::new(),
            apply_confirmation: "ofc".to_string(),
        }
    }
}

/// Operator stack settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OperatorConfig {
    /// Container image for the operator.
    pub image: String,

    /// Public IP advertised by the operator; prompted when empty.
    pub public_ip: String,

    /// Compose file name inside the operator dir.
    pub compose_file: String,

    /// P2P port exposed by the operator container.
    pub p2p_port: u16,

    /// RPC server port exposed by the operator container.
    pub server_port: u16,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            image: "ghcr.io/drosera-network/drosera-operator:latest".to_string(),
            public_ip: String::new(),
            compose_file: "docker-compose.yaml".to_string(),
            p2p_port: 31313,
            server_port: 31314,
        }
    }
}

/// One installable toolchain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ToolchainConfig {
    /// Display name.
    pub name: String,

    /// Binary whose presence on PATH means the toolchain is installed.
    pub binary: String,

    /// Shell snippet run with `sh -c` to install it.
    pub install: String,

    /// Optional follow-up command (e.g. `foundryup`) run after install.
    #[serde(default)]
    pub post_install: Option<String>,
}

/// External tool names and installers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    /// System packages installed before the toolchains.
    pub system_packages: Vec<String>,

    /// Command prefix used to install system packages.
    pub package_install: String,

    /// Toolchains, installed in order.
    pub toolchains: Vec<ToolchainConfig>,

    /// Directories prepended to PATH for lookups and child processes.
    pub extra_path: Vec<String>,

    /// Container engine binary.
    pub docker: String,

    /// Package manager binary.
    pub bun: String,

    /// Contract build toolchain binary.
    pub forge: String,

    /// Vendor CLI binary.
    pub drosera: String,

    /// Version-control client binary.
    pub git: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            system_packages: ["curl", "git", "jq", "unzip", "build-essential"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            package_install: "sudo apt-get install -y".to_string(),
            toolchains: vec![
                ToolchainConfig {
                    name: "Docker".to_string(),
                    binary: "docker".to_string(),
                    install: "curl -fsSL https://get.docker.com | sh".to_string(),
                    post_install: None,
                },
                ToolchainConfig {
                    name: "Bun".to_string(),
                    binary: "bun".to_string(),
                    install: "curl -fsSL https://bun.sh/install | bash".to_string(),
                    post_install: None,
                },
                ToolchainConfig {
                    name: "Foundry".to_string(),
                    binary: "forge".to_string(),
                    install: "curl -L https://foundry.paradigm.xyz | bash".to_string(),
                    post_install: Some("foundryup".to_string()),
                },
                ToolchainConfig {
                    name: "Drosera CLI".to_string(),
                    binary: "drosera".to_string(),
                    install: "curl -L https://app.drosera.io/install | bash".to_string(),
                    post_install: Some("droseraup".to_string()),
                },
            ],
            extra_path: ["~/.foundry/bin", "~/.bun/bin", "~/.drosera/bin"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            docker: "docker".to_string(),
            bun: "bun".to_string(),
            forge: "forge".to_string(),
            drosera: "drosera".to_string(),
            git: "git".to_string(),
        }
    }
}

/// Names of the environment variables a credential may come from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CredentialsConfig {
    /// Checked first.
    pub primary_env: String,

    /// Checked second.
    pub secondary_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            primary_env: "DROSERA_PRIVATE_KEY".to_string(),
            secondary_env: "ETH_PRIVATE_KEY".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: NodeConfig = toml::from_str("").unwrap();
        assert_eq!(config, NodeConfig::default());
        assert_eq!(config.credentials.primary_env, "DROSERA_PRIVATE_KEY");
        assert_eq!(config.tools.toolchains.len(), 4);
    }

    #[test]
    fn test_partial_section_override() {
        let config: NodeConfig = toml::from_str(
            r#"
            [project]
            trap_name = "watchdog"

            [operator]
            public_ip = "203.0.113.7"
            "#,
        )
        .unwrap();

        assert_eq!(config.project.trap_name, "watchdog");
        assert_eq!(config.project.config_file, "drosera.toml");
        assert_eq!(config.operator.public_ip, "203.0.113.7");
        assert_eq!(config.operator.p2p_port, 31313);
    }

    #[test]
    fn test_custom_toolchain_list() {
        let config: NodeConfig = toml::from_str(
            r#"
            [tools]
            toolchains = [
                { name = "Bun", binary = "bun", install = "echo bun" },
            ]
            "#,
        )
        .unwrap();

        assert_eq!(config.tools.toolchains.len(), 1);
        assert!(config.tools.toolchains[0].post_install.is_none());
        assert_eq!(config.tools.forge, "forge");
    }
}
