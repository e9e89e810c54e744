//! Contract-specific error types
//!
//! Every failure is synchronous and leaves custody state exactly as it was
//! before the failing call.

use thiserror::Error;
use types::ids::Address;
use types::numeric::Amount;

/// Errors surfaced by the custody entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Duplicate signer {signer} at positions {first} and {second}")]
    DuplicateSigner {
        signer: Address,
        first: usize,
        second: usize,
    },

    #[error("Invalid signer count: need at least 2, got {count}")]
    InvalidSignerCount { count: usize },

    #[error("Unauthorized: {caller} is not a registered signer")]
    Unauthorized { caller: Address },

    #[error("Invalid attestation: signature does not recover to the attester")]
    InvalidAttestation,

    #[error("Implicit deposits are rejected: use the contribute entry point")]
    NoImplicitDeposit,

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error("Invalid destination: the null address cannot receive funds")]
    InvalidDestination,

    #[error("Contribution amount must be positive")]
    InvalidAmount,

    #[error("Custody is not accepting deposits or withdrawals")]
    NotAccepting,

    #[error("Action {action} is not supported in {mode} mode")]
    UnsupportedAction {
        action: &'static str,
        mode: &'static str,
    },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),
}

/// Errors from the host value-move primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Destination {destination} rejected the transfer")]
    Rejected { destination: Address },

    #[error("Destination balance overflow")]
    Overflow,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] CustodyError),
}

/// Snapshot sealing and restore errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Integrity check failed: expected {expected}, got {actual}")]
    IntegrityFailure { expected: String, actual: String },

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Proposal held by non-signer {holder}")]
    ForeignProposal { holder: Address },

    #[error("Invalid snapshot state: {0}")]
    Invalid(#[from] CustodyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_display() {
        let err = CustodyError::InsufficientFunds {
            requested: Amount::new(5),
            available: Amount::new(3),
        };
        let text = err.to_string();
        assert!(text.contains('5'));
        assert!(text.contains('3'));
    }

    #[test]
    fn test_duplicate_signer_display() {
        let err = CustodyError::DuplicateSigner {
            signer: Address::from_bytes([1; 20]),
            first: 0,
            second: 3,
        };
        assert!(err.to_string().contains("positions 0 and 3"));
    }

    #[test]
    fn test_custody_error_from_transfer() {
        let transfer_err = TransferError::Rejected {
            destination: Address::from_bytes([9; 20]),
        };
        let custody_err: CustodyError = transfer_err.into();
        assert!(matches!(custody_err, CustodyError::TransferFailed(_)));
    }

    #[test]
    fn test_config_error_from_custody() {
        let err: ConfigError = CustodyError::InvalidSignerCount { count: 1 }.into();
        assert!(err.to_string().contains("at least 2"));
    }
}
