//! Identity types for custody participants
//!
//! Signers, attesters, contributors and destinations are all identified by a
//! 20-byte address. Execution receipts use UUID v7 for time-sortable ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Error returned when parsing an [`Address`] from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Invalid address length: expected 20 bytes, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}

/// A 20-byte account identity.
///
/// Serializes as a `0x`-prefixed lowercase hex string. The all-zero address is
/// the null identity and is never a valid disbursement destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null identity.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, failing if it is not exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseAddressError> {
        let array: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the null identity
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseAddressError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<String> for Address {
    type Error = ParseAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

/// Unique identifier for an executed threshold action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(Uuid);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display_is_prefixed_lowercase_hex() {
        let addr = Address::from_bytes([0xAB; ADDRESS_LEN]);
        assert_eq!(addr.to_string(), format!("0x{}", "ab".repeat(ADDRESS_LEN)));
    }

    #[test]
    fn test_address_parse_with_and_without_prefix() {
        let text = "0x00000000000000000000000000000000000000ff";
        let with_prefix: Address = text.parse().unwrap();
        let without_prefix: Address = text[2..].parse().unwrap();
        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.as_bytes()[19], 0xff);
    }

    #[test]
    fn test_address_parse_wrong_length() {
        let result: Result<Address, _> = "0x1234".parse();
        assert_eq!(result, Err(ParseAddressError::InvalidLength(2)));
    }

    #[test]
    fn test_address_parse_bad_hex() {
        let result: Result<Address, _> = "0xzz".parse();
        assert!(matches!(result, Err(ParseAddressError::InvalidHex(_))));
    }

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_bytes([1; ADDRESS_LEN]).is_zero());
        assert_eq!(
            Address::ZERO.to_string(),
            format!("0x{}", "0".repeat(ADDRESS_LEN * 2))
        );
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::from_bytes([7; ADDRESS_LEN]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "07".repeat(ADDRESS_LEN)));

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_address_deserialization_rejects_garbage() {
        let result: Result<Address, _> = serde_json::from_str("\"not-an-address\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_execution_id_creation() {
        let id1 = ExecutionId::new();
        let id2 = ExecutionId::new();
        assert_ne!(id1, id2, "ExecutionIds should be unique");
    }
}
