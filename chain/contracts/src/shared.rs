//! Shared handle for concurrent hosts
//!
//! The threshold rule assumes each call runs to completion without
//! interleaving. On a multi-threaded host every entry point takes one
//! instance-wide lock for the full read-modify-write.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use types::ids::Address;
use types::numeric::Amount;

use crate::errors::{CustodyError, SnapshotError};
use crate::ledger::{LocalTransfers, ValueTransfer};
use crate::proposal::{Action, ProposalOutcome};
use crate::snapshot::SealedSnapshot;
use crate::wallet::MultiSigWallet;

/// Cloneable, thread-safe handle to one custody instance.
#[derive(Debug)]
pub struct SharedCustody<T: ValueTransfer = LocalTransfers> {
    inner: Arc<Mutex<MultiSigWallet<T>>>,
}

impl<T: ValueTransfer> Clone for SharedCustody<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ValueTransfer> SharedCustody<T> {
    pub fn new(wallet: MultiSigWallet<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(wallet)),
        }
    }

    // A panic mid-call cannot leave partial state: every mutation is
    // validated first and rolled back on failure.
    fn lock(&self) -> MutexGuard<'_, MultiSigWallet<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contribute(
        &self,
        caller: &Address,
        identifier_hash: &[u8; 32],
        signature: &[u8],
        value: Amount,
    ) -> Result<Amount, CustodyError> {
        self.lock().contribute(caller, identifier_hash, signature, value)
    }

    pub fn receive_plain_transfer(&self, caller: &Address, value: Amount) -> Result<(), CustodyError> {
        self.lock().receive_plain_transfer(caller, value)
    }

    pub fn propose(&self, caller: &Address, action: Action) -> Result<ProposalOutcome, CustodyError> {
        self.lock().propose(caller, action)
    }

    pub fn withdraw(
        &self,
        caller: &Address,
        destination: Address,
        amount: Amount,
    ) -> Result<ProposalOutcome, CustodyError> {
        self.lock().withdraw(caller, destination, amount)
    }

    pub fn open(&self, caller: &Address) -> Result<ProposalOutcome, CustodyError> {
        self.lock().open(caller)
    }

    pub fn close(&self, caller: &Address, destination: Address) -> Result<ProposalOutcome, CustodyError> {
        self.lock().close(caller, destination)
    }

    pub fn accept(&self) -> bool {
        self.lock().accept()
    }

    pub fn balance(&self) -> Amount {
        self.lock().balance()
    }

    /// Seal the state under the same lock, so the snapshot is consistent.
    pub fn seal(&self) -> Result<SealedSnapshot, SnapshotError> {
        self.lock().seal()
    }

    /// Run `f` with exclusive access, e.g. to inspect the host transfers.
    pub fn with_wallet<R>(&self, f: impl FnOnce(&mut MultiSigWallet<T>) -> R) -> R {
        f(&mut self.lock())
    }
}
