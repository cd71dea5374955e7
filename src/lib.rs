//! Drosera trap node provisioning library.

pub mod actions;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod patcher;
pub mod process;

pub use config::schema::NodeConfig;
pub use error::{NodeError, NodeResult};
