//! Trap configuration: endpoints, whitelist, funding.

use std::path::Path;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;

use crate::actions::project::{self, VENDOR_KEY_ENV};
use crate::actions::Session;
use crate::cli::prompt::Prompt;
use crate::credentials::{parse_address, Terminal};
use crate::error::{NodeError, NodeResult};
use crate::observability::LogCategory;
use crate::patcher::file::apply;
use crate::patcher::{section_pattern, PatchOutcome, Value};
use crate::process::{CommandRunner, CommandSpec};

/// Write the configured endpoints into the project config's top-level keys.
pub fn configure_endpoints<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let network = &settings.config.network;
    let path = settings.project_config_path();

    let outcome = apply(&path, |doc| {
        Ok(doc
            .set_top_level("ethereum_rpc", network.eth_rpc_url.as_str())
            .set_top_level("drosera_rpc", network.drosera_rpc_url.as_str())
            .set_top_level("eth_chain_id", Value::literal(network.chain_id.to_string()))
            .set_top_level("drosera_address", network.drosera_address.as_str()))
    })?;

    report(&path, &outcome);
    Ok(())
}

/// Make the trap private and whitelist one operator address.
pub async fn whitelist<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let address = if session.confirm("Whitelist the address of your private key?", true)? {
        session.address()?
    } else {
        let raw = session.ask("operator address", "Operator address", None)?;
        parse_address(&raw)?
    };

    let settings = session.settings;
    let trap_name = &settings.config.project.trap_name;
    let section =
        section_pattern(&format!("traps.{}", trap_name)).map_err(|e| NodeError::InvalidInput {
            field: "trap name",
            reason: e.to_string(),
        })?;
    let path = settings.project_config_path();

    let outcome = apply(&path, |doc| {
        let missing = || NodeError::SectionNotFound {
            pattern: section.as_str().to_string(),
            path: path.clone(),
        };
        let doc = doc
            .set_in_section(&section, "private_trap", Value::literal("true"))
            .ok_or_else(missing)?;
        doc.set_in_section(&section, "whitelist", whitelist_value(&address))
            .ok_or_else(missing)
    })?;

    report(&path, &outcome);
    println!("Whitelisted {} in [traps.{}]", address, trap_name);

    if session.confirm("Re-apply the trap now?", true)? {
        session.require_tool(&settings.config.tools.drosera)?;
        project::apply_trap(session).await?;
    }
    Ok(())
}

fn whitelist_value(address: &Address) -> Value {
    Value::literal(format!("[\"{}\"]", address))
}

/// Send ETH to the trap through `drosera bloomboost`.
pub async fn fund<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let configured = settings.config.project.trap_config_address.as_str();
    let trap = session.ask("trap address", "Trap config address", Some(configured))?;
    let trap = parse_address(&trap)?;

    let amount = session.ask("amount", "Amount of ETH to deposit", None)?;
    validate_amount(&amount)?;

    let key = session.key()?;
    let drosera = settings.config.tools.drosera.as_str();
    session.require_tool(drosera)?;

    let spec = CommandSpec::new(LogCategory::Trap, drosera)
        .arg("bloomboost")
        .arg("--trap-address")
        .arg(trap.to_string())
        .arg("--eth-amount")
        .arg(amount.trim())
        .secret_env(VENDOR_KEY_ENV, &key)
        .current_dir(settings.project_dir());

    session.runner.run(&spec).await?.require()?;
    Ok(())
}

/// A positive decimal ETH amount with at most 18 fractional digits.
pub fn validate_amount(raw: &str) -> NodeResult<()> {
    let invalid = |reason: String| NodeError::InvalidInput {
        field: "amount",
        reason,
    };
    let raw = raw.trim();
    let decimal = !raw.is_empty()
        && raw.chars().all(|c| c.is_ascii_digit() || c == '.')
        && raw.matches('.').count() <= 1
        && raw.chars().any(|c| c.is_ascii_digit());
    if !decimal {
        return Err(invalid(format!("`{}` is not a decimal ETH amount", raw)));
    }
    let wei = parse_ether(raw).map_err(|e| invalid(e.to_string()))?;
    if wei.is_zero() {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(())
}

fn report(path: &Path, outcome: &PatchOutcome) {
    match &outcome.backup {
        Some(backup) => println!("Updated {} (backup: {})", path.display(), backup.display()),
        None => println!("{} already up to date", path.display()),
    }
}
