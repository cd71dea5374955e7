//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse flags → Load config → Init logging → Build Settings → Menu / actions
//!
//! Signals (signals.rs):
//!     SIGINT while following logs → stop the child, return to the menu
//!     SIGINT elsewhere → process exits
//! ```
//!
//! # Design Decisions
//! - Containers started by the tool outlive it; nothing is torn down on exit
//! - No rollback beyond the config backups the patcher writes

pub mod signals;
