//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (tracing events: stderr + trapnode.log)
//!
//! External commands produce:
//!     → action_log.rs (<category>.log, append-only, timestamped)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event; keys are never a field
//! - Child output is scrubbed before it reaches either sink

pub mod action_log;
pub mod logging;

pub use action_log::{ActionLog, LogCategory};
