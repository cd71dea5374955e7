//! Top-level operator actions.
//!
//! # Data Flow
//! ```text
//! menu / --action
//!     → run_action (dispatch)
//!     → install.rs | project.rs | trap.rs | operator.rs
//!     → Session (settings, runner, prompts, credential resolved once)
//! ```
//!
//! # Design Decisions
//! - Every action completes with Ok or aborts with one error; nothing is
//!   silently swallowed except explicitly best-effort status queries
//! - Critical commands (install, build, deploy) use `require()`

pub mod install;
pub mod operator;
pub mod project;
pub mod trap;

use std::fmt;
use std::path::PathBuf;

use alloy::primitives::Address;
use clap::ValueEnum;
use zeroize::Zeroizing;

use crate::cli::prompt::Prompt;
use crate::config::Settings;
use crate::credentials::{Credential, CredentialResolver, Terminal};
use crate::error::{NodeError, NodeResult};
use crate::process::CommandRunner;

/// Everything the operator can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Action {
    Install,
    InitProject,
    Build,
    ConfigureEndpoints,
    Deploy,
    Whitelist,
    Fund,
    OperatorUp,
    OperatorRegister,
    OperatorOptin,
    OperatorStatus,
    OperatorLogs,
    OperatorDown,
    ShowAddress,
    Exit,
}

impl Action {
    /// Menu order.
    pub const MENU: [Action; 15] = [
        Action::Install,
        Action::InitProject,
        Action::Build,
        Action::ConfigureEndpoints,
        Action::Deploy,
        Action::Whitelist,
        Action::Fund,
        Action::OperatorUp,
        Action::OperatorRegister,
        Action::OperatorOptin,
        Action::OperatorStatus,
        Action::OperatorLogs,
        Action::OperatorDown,
        Action::ShowAddress,
        Action::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Action::Install => "Install dependencies",
            Action::InitProject => "Initialize trap project",
            Action::Build => "Build trap",
            Action::ConfigureEndpoints => "Configure network endpoints",
            Action::Deploy => "Deploy trap (apply)",
            Action::Whitelist => "Whitelist operator",
            Action::Fund => "Fund trap (bloomboost)",
            Action::OperatorUp => "Start operator stack",
            Action::OperatorRegister => "Register operator",
            Action::OperatorOptin => "Opt in operator to trap",
            Action::OperatorStatus => "Operator status",
            Action::OperatorLogs => "Follow operator logs",
            Action::OperatorDown => "Stop operator stack",
            Action::ShowAddress => "Show operator address",
            Action::Exit => "Exit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{:?}", self),
        }
    }
}

/// Whether the caller should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// State shared by the actions of one run.
pub struct Session<'a, R, T> {
    pub settings: &'a Settings,
    pub runner: R,
    pub terminal: T,
    resolver: CredentialResolver,
    credential: Option<Credential>,
}

impl<'a, R, T> Session<'a, R, T>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    pub fn new(
        settings: &'a Settings,
        runner: R,
        terminal: T,
        resolver: CredentialResolver,
    ) -> Self {
        Self {
            settings,
            runner,
            terminal,
            resolver,
            credential: None,
        }
    }

    /// The private key, resolved on first use and cached for the run.
    pub fn key(&mut self) -> NodeResult<Zeroizing<String>> {
        let credential = match self.credential.take() {
            Some(credential) => credential,
            None => self.resolver.resolve(&mut self.terminal)?,
        };
        let hex = Zeroizing::new(credential.expose().to_string());
        self.credential = Some(credential);
        Ok(hex)
    }

    /// Address derived from the run's private key.
    pub fn address(&mut self) -> NodeResult<Address> {
        self.key()?;
        match &self.credential {
            Some(credential) => credential.address(),
            None => Err(NodeError::InvalidCredentialFormat),
        }
    }

    /// `--yes` answers yes; `--non-interactive` takes the default.
    pub fn confirm(&mut self, prompt: &str, default: bool) -> NodeResult<bool> {
        if self.settings.flags.assume_yes {
            return Ok(true);
        }
        if self.settings.flags.non_interactive {
            return Ok(default);
        }
        self.terminal.confirm(prompt, default)
    }

    /// Ask for a value, falling back to `default` without prompting in
    /// non-interactive mode.
    pub fn ask(
        &mut self,
        field: &'static str,
        prompt: &str,
        default: Option<&str>,
    ) -> NodeResult<String> {
        if self.settings.flags.non_interactive {
            return default
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .ok_or_else(|| NodeError::InvalidInput {
                    field,
                    reason: "no value configured and prompting is disabled".to_string(),
                });
        }
        let value = self.terminal.input(prompt, default.filter(|d| !d.is_empty()))?;
        if value.is_empty() {
            return Err(NodeError::InvalidInput {
                field,
                reason: "a value is required".to_string(),
            });
        }
        Ok(value)
    }

    pub fn require_tool(&self, tool: &str) -> NodeResult<PathBuf> {
        self.runner.tools().require(tool)
    }
}

/// Run one action.
pub async fn run_action<R, T>(session: &mut Session<'_, R, T>, action: Action) -> NodeResult<Flow>
where
    R: CommandRunner,
    T: Terminal + Prompt,
{
    tracing::info!(action = %action, "Starting action");

    match action {
        Action::Install => install::install(session).await?,
        Action::InitProject => project::init_project(session).await?,
        Action::Build => project::build(session).await?,
        Action::ConfigureEndpoints => trap::configure_endpoints(session)?,
        Action::Deploy => project::deploy(session).await?,
        Action::Whitelist => trap::whitelist(session).await?,
        Action::Fund => trap::fund(session).await?,
        Action::OperatorUp => operator::up(session).await?,
        Action::OperatorRegister => operator::register(session).await?,
        Action::OperatorOptin => operator::opt_in(session).await?,
        Action::OperatorStatus => operator::status(session).await?,
        Action::OperatorLogs => operator::logs(session).await?,
        Action::OperatorDown => operator::down(session).await?,
        Action::ShowAddress => {
            let address = session.address()?;
            println!("Operator address: {}", address);
        }
        Action::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}
