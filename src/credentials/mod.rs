//! Credential subsystem.
//!
//! # Data Flow
//! ```text
//! env vars / --private-key / --private-key-file / piped stdin / prompt
//!     → resolver.rs (priority order, first valid candidate wins)
//!     → key.rs (normalize, validate, zeroize; derive address)
//!     → actions (subprocess env or secret-marked args only)
//!
//! Operator-typed addresses:
//!     → address.rs (strict 0x + 40 hex check)
//! ```
//!
//! # Security Constraints
//! - Keys are never written to disk by this tool
//! - Never log private keys; sources are reported by name
//! - Prompting is impossible in non-interactive mode

pub mod address;
pub mod key;
pub mod resolver;

pub use address::parse_address;
pub use key::Credential;
pub use resolver::{CredentialResolver, CredentialSource, Terminal};
