//! Private key handling.
//!
//! # Security
//! - The key is held in a zeroizing buffer and wiped on drop
//! - `Debug` never prints the value; there is no `Display`
//! - The raw hex only leaves this type through [`Credential::expose`], which
//!   callers hand to subprocess environments or secret-marked arguments

use std::fmt;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use zeroize::Zeroizing;

use crate::error::{NodeError, NodeResult};

/// Number of hex characters in a 32-byte key.
pub const KEY_HEX_LEN: usize = 64;

/// A validated 32-byte private key, stored as canonical lowercase hex.
pub struct Credential {
    hex: Zeroizing<String>,
}

impl Credential {
    /// Normalize and validate a candidate key.
    ///
    /// Whitespace and control characters are dropped anywhere in the input and
    /// a leading `0x` is stripped. What remains must be exactly 64 hex digits.
    pub fn parse(raw: &str) -> NodeResult<Self> {
        let normalized = normalize(raw);
        if normalized.len() != KEY_HEX_LEN || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NodeError::InvalidCredentialFormat);
        }
        Ok(Self {
            hex: Zeroizing::new(normalized.to_ascii_lowercase()),
        })
    }

    /// The canonical hex (no prefix). Do not log this.
    pub fn expose(&self) -> &str {
        &self.hex
    }

    /// Derive the account address for this key.
    ///
    /// Fails with `InvalidCredentialFormat` for the few 64-hex values that are
    /// not valid secp256k1 scalars (zero, or above the curve order).
    pub fn address(&self) -> NodeResult<Address> {
        let signer: PrivateKeySigner = self
            .hex
            .parse()
            .map_err(|_| NodeError::InvalidCredentialFormat)?;
        Ok(signer.address())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Strip whitespace/control characters and an optional `0x` prefix.
pub fn normalize(raw: &str) -> Zeroizing<String> {
    let compact: Zeroizing<String> = Zeroizing::new(
        raw.chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect(),
    );
    let stripped = compact
        .strip_prefix("0x")
        .or_else(|| compact.strip_prefix("0X"))
        .unwrap_or(compact.as_str());
    Zeroizing::new(stripped.to_string())
}
