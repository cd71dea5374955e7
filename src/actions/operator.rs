//! Operator container stack.
//!
//! The stack is described by a compose file written once from an embedded
//! template; values that change between runs (key, IP, endpoints) reach it
//! only through the environment of `docker compose up`.

use std::fs;
use std::net::IpAddr;

use crate::actions::Session;
use crate::cli::prompt::Prompt;
use crate::config::schema::OperatorConfig;
use crate::credentials::{parse_address, Terminal};
use crate::error::{NodeError, NodeResult};
use crate::observability::LogCategory;
use crate::patcher::write_atomic;
use crate::process::{CommandRunner, CommandSpec};

const COMPOSE_TEMPLATE: &str = include_str!("../../assets/docker-compose.yaml");

/// Fill the compose template's `{{placeholders}}`.
pub fn render_compose(operator: &OperatorConfig) -> String {
    COMPOSE_TEMPLATE
        .replace("{{image}}", &operator.image)
        .replace("{{p2p_port}}", &operator.p2p_port.to_string())
        .replace("{{server_port}}", &operator.server_port.to_string())
}

/// Write the compose file if needed and start the stack.
pub async fn up<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    session.require_tool(&settings.config.tools.docker)?;

    let key = session.key()?;
    let public_ip = public_ip(session)?;

    let compose_path = settings.compose_path();
    if compose_path.is_file() {
        tracing::info!(path = %compose_path.display(), "Using existing compose file");
    } else {
        fs::create_dir_all(settings.operator_dir())?;
        write_atomic(&compose_path, &render_compose(&settings.config.operator))?;
        tracing::info!(path = %compose_path.display(), "Wrote compose file");
    }

    let network = &settings.config.network;
    let spec = compose(session, ["up", "-d"])
        .secret_env("ETH_PRIVATE_KEY", &key)
        .env("VPS_IP", public_ip.to_string())
        .env("ETH_RPC_URL", network.eth_rpc_url.as_str())
        .env("ETH_BACKUP_RPC_URL", network.eth_backup_rpc_url.as_str())
        .env("DROSERA_ADDRESS", network.drosera_address.as_str())
        .env("CHAIN_ID", network.chain_id.to_string());
    session.runner.run(&spec).await?.require()?;

    let ps = compose(session, ["ps"]);
    session.runner.run(&ps).await?.warn_on_failure();
    Ok(())
}

fn public_ip<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<IpAddr>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let configured = settings.config.operator.public_ip.as_str();
    let raw = if configured.is_empty() {
        session.ask("public IP", "Public IP address of this host", None)?
    } else {
        configured.to_string()
    };

    raw.trim().parse().map_err(|_| NodeError::InvalidInput {
        field: "public IP",
        reason: format!("`{}` is not an IP address", raw.trim()),
    })
}

/// `docker compose -f <file> <args>` in the operator dir.
fn compose<R, T, I>(session: &Session<'_, R, T>, args: I) -> CommandSpec
where
    I: IntoIterator<Item = &'static str>,
{
    let settings = session.settings;
    CommandSpec::new(LogCategory::Operator, settings.config.tools.docker.as_str())
        .arg("compose")
        .arg("-f")
        .arg(settings.compose_path().to_string_lossy())
        .args(args)
        .current_dir(settings.operator_dir())
}

fn require_compose_file<R, T>(session: &Session<'_, R, T>) -> NodeResult<()> {
    let path = session.settings.compose_path();
    if path.is_file() {
        Ok(())
    } else {
        Err(NodeError::ConfigFileNotFound(path))
    }
}

/// `docker run --rm <image> <subcommand> ...` with the key as a secret arg.
async fn operator_command<R, T>(
    session: &mut Session<'_, R, T>,
    subcommand: &str,
    extra: &[String],
) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let docker = settings.config.tools.docker.as_str();
    session.require_tool(docker)?;
    let key = session.key()?;

    let spec = CommandSpec::new(LogCategory::Operator, docker)
        .args(["run", "--rm"])
        .arg(&settings.config.operator.image)
        .arg(subcommand)
        .arg("--eth-rpc-url")
        .arg(&settings.config.network.eth_rpc_url)
        .args(extra.iter().cloned())
        .arg("--eth-private-key")
        .secret_arg(&key);

    session.runner.run(&spec).await?.require()?;
    Ok(())
}

/// Register the operator key with the network.
pub async fn register<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    operator_command(session, "register", &[]).await
}

/// Opt the operator in to the configured trap.
pub async fn opt_in<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let configured = settings.config.project.trap_config_address.as_str();
    let raw = session.ask("trap address", "Trap config address", Some(configured))?;
    let trap = parse_address(&raw)?;

    let extra = ["--trap-config-address".to_string(), trap.to_string()];
    operator_command(session, "optin", &extra).await
}

/// Best-effort `docker compose ps`.
pub async fn status<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    session.require_tool(&session.settings.config.tools.docker)?;
    require_compose_file(session)?;
    let spec = compose(session, ["ps"]);
    session.runner.run(&spec).await?.warn_on_failure();
    Ok(())
}

/// Follow the operator logs until Ctrl-C.
pub async fn logs<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    session.require_tool(&session.settings.config.tools.docker)?;
    require_compose_file(session)?;
    println!("Following operator logs; press Ctrl-C to return.");
    let spec = compose(session, ["logs", "-f", "--tail", "100"]);
    session.runner.follow(&spec).await
}

/// Stop the stack.
pub async fn down<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    session.require_tool(&session.settings.config.tools.docker)?;
    require_compose_file(session)?;
    let spec = compose(session, ["down"]);
    session.runner.run(&spec).await?.require()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_compose() {
        let operator = OperatorConfig {
            image: "example/operator:v1".to_string(),
            p2p_port: 4000,
            server_port: 4001,
            ..OperatorConfig::default()
        };
        let rendered = render_compose(&operator);

        assert!(rendered.contains("image: example/operator:v1"));
        assert!(rendered.contains("DRO__NETWORK__P2P_PORT=4000"));
        assert!(rendered.contains("DRO__SERVER__PORT=4001"));
        assert!(rendered.contains("DRO__ETH__PRIVATE_KEY=${ETH_PRIVATE_KEY}"));
        assert!(!rendered.contains("{{"));
    }
}
