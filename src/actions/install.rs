//! Dependency installation.

use crate::actions::Session;
use crate::cli::prompt::Prompt;
use crate::config::schema::ToolchainConfig;
use crate::credentials::Terminal;
use crate::error::{NodeError, NodeResult};
use crate::observability::LogCategory;
use crate::process::{CommandRunner, CommandSpec};

/// Install system packages and every configured toolchain, then pull the
/// operator image.
///
/// Toolchains whose binary is already on PATH are skipped. Any installer
/// failure aborts.
pub async fn install<R, T>(session: &mut Session<'_, R, T>) -> NodeResult<()>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    let settings = session.settings;
    let tools = &settings.config.tools;

    if !tools.system_packages.is_empty() {
        let packages = tools.system_packages.join(" ");
        if session.confirm(&format!("Install system packages ({})?", packages), true)? {
            let script = format!("{} {}", tools.package_install, packages);
            session
                .runner
                .run(&CommandSpec::shell(LogCategory::Install, script))
                .await?
                .require()?;
        } else {
            tracing::info!("Skipping system packages");
        }
    }

    for toolchain in &tools.toolchains {
        install_toolchain(&session.runner, toolchain).await?;
    }

    let docker = tools.docker.as_str();
    session.require_tool(docker)?;
    session
        .runner
        .run(
            &CommandSpec::new(LogCategory::Install, docker)
                .arg("pull")
                .arg(&settings.config.operator.image),
        )
        .await?
        .require()?;

    Ok(())
}

async fn install_toolchain<R: CommandRunner>(
    runner: &R,
    toolchain: &ToolchainConfig,
) -> NodeResult<()> {
    if let Some(path) = runner.tools().locate(&toolchain.binary) {
        tracing::info!(
            toolchain = %toolchain.name,
            path = %path.display(),
            "Already installed"
        );
        return Ok(());
    }

    tracing::info!(toolchain = %toolchain.name, "Installing");
    runner
        .run(&CommandSpec::shell(LogCategory::Install, toolchain.install.as_str()))
        .await?
        .require()?;

    if let Some(post) = &toolchain.post_install {
        runner
            .run(&CommandSpec::shell(LogCategory::Install, post.as_str()))
            .await?
            .require()?;
    }

    if !runner.tools().is_installed(&toolchain.binary) {
        return Err(NodeError::MissingDependency {
            tool: toolchain.binary.clone(),
        });
    }
    Ok(())
}
