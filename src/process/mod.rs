//! External command execution.
//!
//! # Data Flow
//! ```text
//! action
//!     → command.rs (CommandSpec: program, args, secret args/env, cwd, stdin)
//!     → deps.rs (PATH extended with installer dirs; MissingDependency)
//!     → runner.rs (spawn, stream + capture, scrub via redact.rs)
//!     → CommandOutcome → caller decides: require() or warn_on_failure()
//!     → action_log (<category>.log)
//! ```
//!
//! # Design Decisions
//! - No timeouts and no retries: each command runs once
//! - Failure policy lives with the caller, never at the call site

pub mod command;
pub mod deps;
pub mod redact;
pub mod runner;

pub use command::{CommandOutcome, CommandSpec};
pub use deps::ToolPath;
pub use runner::{CommandRunner, SystemRunner};
