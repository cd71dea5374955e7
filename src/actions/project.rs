//! Trap project: scaffold, build, deploy.

use std::fs;

use crate::actions::Session;
use crate::cli::prompt::Prompt;
use crate::credentials::Terminal;
use crate::error::{NodeError, NodeResult};
use crate::observability::LogCategory;
use crate::process::{CommandRunner, CommandSpec};

/// Variable the vendor CLI reads its signing key from.
pub const VENDOR_KEY_ENV: &str = "DROSERA_PRIVATE_KEY";

/// Make sure git has an identity, then scaffold the project from the template.
///
/// A project dir that already holds the project config is left alone.
pub async fn init_project<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let config_path = settings.project_config_path();
    if config_path.is_file() {
        tracing::info!(path = %config_path.display(), "Project already initialized");
        return Ok(());
    }

    let tools = &settings.config.tools;
    session.require_tool(&tools.git)?;
    session.require_tool(&tools.forge)?;

    ensure_git_identity(session, "user.email", "Git email").await?;
    ensure_git_identity(session, "user.name", "Git username").await?;

    let dir = settings.project_dir();
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent)?;
    }

    session
        .runner
        .run(
            &CommandSpec::new(LogCategory::Project, tools.forge.as_str())
                .args(["init", "-t"])
                .arg(&settings.config.project.template)
                .arg(dir.to_string_lossy()),
        )
        .await?
        .require()?;

    Ok(())
}

async fn ensure_git_identity<R, T>(
    session: &mut Session<'_, R, T>,
    key: &str,
    prompt: &str,
) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let git = settings.config.tools.git.as_str();
    let git_config =
        || CommandSpec::new(LogCategory::Project, git).args(["config", "--global", key]);
    let current = session.runner.run(&git_config()).await?;

    if current.success() && current.first_line().is_some() {
        return Ok(());
    }

    let field = if key == "user.email" { "git email" } else { "git username" };
    let value = session.ask(field, prompt, None)?;
    session
        .runner
        .run(&git_config().arg(value))
        .await?
        .require()?;
    Ok(())
}

/// `bun install` then `forge build` in the project dir.
pub async fn build<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let dir = settings.project_dir();
    if !dir.is_dir() {
        return Err(NodeError::ConfigFileNotFound(settings.project_config_path()));
    }

    let tools = &settings.config.tools;
    session.require_tool(&tools.bun)?;
    session.require_tool(&tools.forge)?;

    session
        .runner
        .run(
            &CommandSpec::new(LogCategory::Build, tools.bun.as_str())
                .arg("install")
                .current_dir(dir),
        )
        .await?
        .require()?;
    session
        .runner
        .run(
            &CommandSpec::new(LogCategory::Build, tools.forge.as_str())
                .arg("build")
                .current_dir(dir),
        )
        .await?
        .require()?;

    Ok(())
}

/// Confirm, then `drosera apply`.
pub async fn deploy<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let config_path = session.settings.project_config_path();
    if !config_path.is_file() {
        return Err(NodeError::ConfigFileNotFound(config_path));
    }

    session.key()?;
    session.require_tool(&session.settings.config.tools.drosera)?;

    if !session.confirm("Deploy the trap with `drosera apply`?", true)? {
        tracing::info!("Deploy cancelled");
        return Ok(());
    }

    apply_trap(session).await
}

/// `drosera apply` with the key in the environment and the confirmation
/// answer piped on stdin. Callers confirm with the operator first.
pub(crate) async fn apply_trap<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let key = session.key()?;
    let settings = session.settings;
    let spec = CommandSpec::new(LogCategory::Deploy, settings.config.tools.drosera.as_str())
        .arg("apply")
        .secret_env(VENDOR_KEY_ENV, &key)
        .current_dir(settings.project_dir())
        .stdin(format!("{}\n", settings.config.project.apply_confirmation));

    session.runner.run(&spec).await?.require()?;
    Ok(())
}
