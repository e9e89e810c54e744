//! Snapshots: durable record of custody state
//!
//! Captures everything a host must persist before acknowledging a mutating
//! call: signer set, attester, prefix, mode, accept flag, balance and live
//! proposals. Sealed snapshots carry a SHA-256 integrity hash over their
//! canonical JSON encoding (`BTreeMap` keeps proposal order deterministic).

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::info;
use types::ids::Address;
use types::numeric::Amount;

use crate::attestation::AttestationVerifier;
use crate::errors::SnapshotError;
use crate::ledger::{CustodyLedger, ValueTransfer};
use crate::lifecycle::{CustodyMode, Lifecycle};
use crate::proposal::Action;
use crate::registry::SignerRegistry;
use crate::wallet::MultiSigWallet;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full custody state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodySnapshot {
    pub version: u32,
    pub signers: Vec<Address>,
    pub attester: Address,
    pub message_prefix: String,
    pub mode: CustodyMode,
    pub accept: bool,
    pub balance: Amount,
    pub proposals: BTreeMap<Address, Action>,
}

impl CustodySnapshot {
    /// Hex SHA-256 of the canonical JSON encoding.
    pub fn integrity_hash(&self) -> Result<String, SnapshotError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// A snapshot with its integrity hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedSnapshot {
    pub snapshot: CustodySnapshot,
    pub integrity: String,
}

impl SealedSnapshot {
    pub fn seal(snapshot: CustodySnapshot) -> Result<Self, SnapshotError> {
        let integrity = snapshot.integrity_hash()?;
        Ok(Self {
            snapshot,
            integrity,
        })
    }

    /// Check version and integrity hash.
    pub fn verify(&self) -> Result<(), SnapshotError> {
        if self.snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.snapshot.version));
        }

        let actual = self.snapshot.integrity_hash()?;
        if actual != self.integrity {
            return Err(SnapshotError::IntegrityFailure {
                expected: self.integrity.clone(),
                actual,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and verify.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let sealed: Self = serde_json::from_str(json)?;
        sealed.verify()?;
        Ok(sealed)
    }
}

impl<T: ValueTransfer> MultiSigWallet<T> {
    /// Capture the current state.
    pub fn snapshot(&self) -> CustodySnapshot {
        CustodySnapshot {
            version: SNAPSHOT_VERSION,
            signers: self.signers().to_vec(),
            attester: *self.attester(),
            message_prefix: self.message_prefix().to_string(),
            mode: self.mode(),
            accept: self.accept(),
            balance: self.balance(),
            proposals: self
                .proposals()
                .iter()
                .map(|(signer, action)| (*signer, action.clone()))
                .collect(),
        }
    }

    /// Capture and seal the current state.
    pub fn seal(&self) -> Result<SealedSnapshot, SnapshotError> {
        SealedSnapshot::seal(self.snapshot())
    }

    /// Rebuild an instance from a sealed snapshot.
    ///
    /// Re-runs the signer checks and rejects proposals held by non-signers.
    pub fn restore(sealed: &SealedSnapshot, transfers: T) -> Result<Self, SnapshotError> {
        sealed.verify()?;
        let snapshot = &sealed.snapshot;

        let registry = SignerRegistry::new(snapshot.signers.clone())?;
        if let Some(holder) = snapshot
            .proposals
            .keys()
            .find(|holder| !registry.is_signer(holder))
        {
            return Err(SnapshotError::ForeignProposal { holder: *holder });
        }

        info!(
            balance = %snapshot.balance,
            proposals = snapshot.proposals.len(),
            "custody instance restored from snapshot"
        );

        Ok(Self::from_parts(
            registry,
            AttestationVerifier::new(snapshot.attester, snapshot.message_prefix.clone()),
            CustodyLedger::with_balance(snapshot.balance),
            Lifecycle::restore(snapshot.mode, snapshot.accept),
            snapshot
                .proposals
                .iter()
                .map(|(signer, action)| (*signer, action.clone()))
                .collect(),
            transfers,
        ))
    }
}
