//! Deployment configuration
//!
//! Fixes the signer set, attester identity, custody mode and attestation
//! prefix for one instance. Loaded from JSON:
//!
//! ```json
//! {
//!   "signers": ["0x01…", "0x02…"],
//!   "attester": "0x05…",
//!   "mode": "fundraiser"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use types::ids::Address;

use crate::attestation::DEFAULT_MESSAGE_PREFIX;
use crate::errors::ConfigError;
use crate::lifecycle::CustodyMode;
use crate::registry::SignerRegistry;

fn default_message_prefix() -> String {
    DEFAULT_MESSAGE_PREFIX.to_string()
}

/// Construction parameters for a custody instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyConfig {
    /// Authorized signers, in order. At least two, all distinct.
    pub signers: Vec<Address>,
    /// Identity whose signature binds deposits to off-chain identifiers.
    pub attester: Address,
    #[serde(default)]
    pub mode: CustodyMode,
    #[serde(default = "default_message_prefix")]
    pub message_prefix: String,
}

impl CustodyConfig {
    pub fn new(signers: Vec<Address>, attester: Address, mode: CustodyMode) -> Self {
        Self {
            signers,
            attester,
            mode,
            message_prefix: default_message_prefix(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Run the construction-time signer checks without building an instance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        SignerRegistry::new(self.signers.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CustodyError;

    fn hex_addr(n: u8) -> String {
        format!("0x{}", format!("{:02x}", n).repeat(20))
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let json = format!(
            r#"{{"signers": ["{}", "{}"], "attester": "{}"}}"#,
            hex_addr(1),
            hex_addr(2),
            hex_addr(5)
        );
        let config = CustodyConfig::from_json_str(&json).unwrap();
        assert_eq!(config.signers.len(), 2);
        assert_eq!(config.mode, CustodyMode::Wallet);
        assert_eq!(config.message_prefix, DEFAULT_MESSAGE_PREFIX);
    }

    #[test]
    fn test_parse_fundraiser_mode() {
        let json = format!(
            r#"{{"signers": ["{}", "{}"], "attester": "{}", "mode": "fundraiser"}}"#,
            hex_addr(1),
            hex_addr(2),
            hex_addr(5)
        );
        let config = CustodyConfig::from_json_str(&json).unwrap();
        assert_eq!(config.mode, CustodyMode::Fundraiser);
    }

    #[test]
    fn test_duplicate_signers_rejected_at_load() {
        let json = format!(
            r#"{{"signers": ["{}", "{}"], "attester": "{}"}}"#,
            hex_addr(1),
            hex_addr(1),
            hex_addr(5)
        );
        let err = CustodyConfig::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(CustodyError::DuplicateSigner { .. })
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = CustodyConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CustodyConfig::from_path("/nonexistent/custody.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = CustodyConfig::new(
            vec![Address::from_bytes([1; 20]), Address::from_bytes([2; 20])],
            Address::from_bytes([5; 20]),
            CustodyMode::Fundraiser,
        );
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CustodyConfig::from_json_str(&json).unwrap(), config);
    }
}
