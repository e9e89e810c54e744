//! Threshold Custody Contract Core
//!
//! Pools contributions from arbitrary parties and releases them only when two
//! distinct members of a fixed signer set independently propose the exact
//! same action.
//!
//! # Modules
//! - `errors`: Contract error taxonomy
//! - `registry`: Immutable signer set, duplicate checks
//! - `attestation`: Personal-message digests, secp256k1 signer recovery
//! - `ledger`: Custody balance and the host value-move primitive
//! - `lifecycle`: Wallet/fundraiser modes and the accept gate
//! - `proposal`: Actions and the one-proposal-per-signer book
//! - `engine`: 2-of-K matching and atomic execution
//! - `wallet`: Contract entry points
//! - `config`: JSON deployment configuration
//! - `snapshot`: Sealed state snapshots for persistence
//! - `shared`: Mutex-guarded handle for multi-threaded hosts
//!
//! # Version
//! v0.1.0

pub mod attestation;
pub mod config;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod lifecycle;
pub mod proposal;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod wallet;

pub use config::CustodyConfig;
pub use errors::CustodyError;
pub use proposal::{Action, ProposalOutcome};
pub use wallet::MultiSigWallet;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
