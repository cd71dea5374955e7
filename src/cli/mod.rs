//! Operator-facing surface: flags, prompts, menu.

pub mod args;
pub mod menu;
pub mod prompt;

pub use args::Cli;
pub use menu::{run_actions, run_menu};
pub use prompt::{DialoguerTerminal, Prompt};
