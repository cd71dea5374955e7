//! trapnode: provision and operate a Drosera trap node.
//!
//! # Architecture Overview
//!
//! ```text
//!     flags (clap) ──┐
//!     trapnode.toml ─┼──▶ Settings ──▶ Session ──▶ menu / --action list
//!     TRAPNODE_* ────┘                   │
//!                                        ├──▶ credentials (resolver, key, address)
//!                                        ├──▶ patcher (drosera.toml edits + backups)
//!                                        └──▶ process (docker, bun, forge, drosera)
//!                                                  │
//!                                                  ▼
//!                                        logs/<category>.log, trapnode.log
//! ```
//!
//! Exit codes: 0 on success, 1 on any error, 2 on usage errors.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;

use trapnode::actions::Session;
use trapnode::cli::{run_actions, run_menu, Cli, DialoguerTerminal};
use trapnode::config::loader::load_config;
use trapnode::config::Settings;
use trapnode::credentials::CredentialResolver;
use trapnode::error::NodeResult;
use trapnode::observability::{logging, ActionLog};
use trapnode::process::{SystemRunner, ToolPath};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_config(cli.config.as_deref(), |name| std::env::var(name).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &cli.log_dir {
        config.paths.log_dir = dir.clone();
    }

    let settings = Settings::new(config, cli.flags());
    let _guard = logging::init(settings.log_dir());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %settings.log_dir().display(),
        project_dir = %settings.project_dir().display(),
        "trapnode starting"
    );

    match run(&cli, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Aborted");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, settings: &Settings) -> NodeResult<()> {
    let tools = ToolPath::new(&settings.config.tools.extra_path);
    let runner = SystemRunner::new(ActionLog::new(settings.log_dir().to_path_buf()), tools);
    let resolver = CredentialResolver::new(settings, |name| std::env::var(name).ok());
    let mut session = Session::new(settings, runner, DialoguerTerminal::new(), resolver);

    if !cli.actions.is_empty() {
        return run_actions(&mut session, &cli.actions).await;
    }

    if settings.flags.non_interactive || !io::stdin().is_terminal() {
        return Err(trapnode::NodeError::InvalidInput {
            field: "action",
            reason: "the menu needs a terminal; pass --action instead".to_string(),
        });
    }

    run_menu(&mut session).await
}
