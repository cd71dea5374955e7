//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::actions::Action;
use crate::config::Flags;

/// Flags are deliberately not `Debug`: `--private-key` would be printed.
#[derive(Parser)]
#[command(name = "trapnode")]
#[command(version, about = "Provision and operate a Drosera trap node", long_about = None)]
pub struct Cli {
    /// Private key as 64 hex characters (0x prefix optional)
    #[arg(long, value_name = "HEX")]
    pub private_key: Option<String>,

    /// File whose first non-empty line is the private key
    #[arg(long, value_name = "PATH")]
    pub private_key_file: Option<PathBuf>,

    /// Never prompt; fail when input is missing
    #[arg(long)]
    pub non_interactive: bool,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Config file (default: ./trapnode.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the log directory
    #[arg(long, value_name = "PATH")]
    pub log_dir: Option<String>,

    /// Run these actions in order and exit instead of showing the menu
    #[arg(short, long = "action", value_enum, value_name = "ACTION")]
    pub actions: Vec<Action>,
}

impl Cli {
    pub fn flags(&self) -> Flags {
        Flags {
            private_key: self.private_key.clone(),
            private_key_file: self.private_key_file.clone(),
            non_interactive: self.non_interactive,
            assume_yes: self.yes,
        }
    }
}
