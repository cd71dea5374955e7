//! Operator-supplied address validation.

use alloy::primitives::Address;

use crate::error::{NodeError, NodeResult};

/// Parse a `0x` + 40 hex address, rejecting anything looser.
///
/// `Address::from_str` also accepts unprefixed input; operator input must be
/// prefixed so it matches what the vendor tooling writes back.
pub fn parse_address(raw: &str) -> NodeResult<Address> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .ok_or_else(|| NodeError::InvalidAddressFormat(trimmed.to_string()))?;

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NodeError::InvalidAddressFormat(trimmed.to_string()));
    }

    trimmed
        .parse()
        .map_err(|_| NodeError::InvalidAddressFormat(trimmed.to_string()))
}
