//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! trapnode.toml (optional)
//!     → loader.rs (parse & deserialize, TRAPNODE_* env overrides)
//!     → validation.rs (semantic checks)
//!     → settings.rs (NodeConfig + CLI flags, paths resolved)
//!     → Settings passed by reference to every action
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once built; nothing mutates them at runtime
//! - All fields have defaults so the tool runs without a config file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use schema::NodeConfig;
pub use settings::{Flags, Settings};
