//! Custody ledger and the host value-move primitive
//!
//! `CustodyLedger` is the single source of truth for funds held. Only the
//! attested deposit path credits it and only executed threshold actions debit
//! it. `ValueTransfer` is the seam to whatever actually moves value out.

use std::collections::{HashMap, HashSet};
use types::ids::Address;
use types::numeric::Amount;

use crate::errors::{CustodyError, TransferError};

/// Balance held in custody. Never negative, by construction of `Amount`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustodyLedger {
    balance: Amount,
}

impl CustodyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_balance(balance: Amount) -> Self {
        Self { balance }
    }

    /// Current custody balance.
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Add `amount`, returning the new balance.
    pub(crate) fn credit(&mut self, amount: Amount) -> Result<Amount, CustodyError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        Ok(self.balance)
    }

    /// Remove `amount`, returning the new balance.
    pub(crate) fn debit(&mut self, amount: Amount) -> Result<Amount, CustodyError> {
        self.ensure_covers(amount)?;
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(CustodyError::Overflow)?;
        Ok(self.balance)
    }

    /// Empty the ledger, returning everything it held.
    pub(crate) fn drain(&mut self) -> Amount {
        std::mem::take(&mut self.balance)
    }

    /// Fails with `InsufficientFunds` unless the balance covers `amount`.
    pub fn ensure_covers(&self, amount: Amount) -> Result<(), CustodyError> {
        if amount > self.balance {
            return Err(CustodyError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(())
    }
}

/// Atomic "move value to address" primitive supplied by the host.
///
/// An implementation must either move the full amount or change nothing.
pub trait ValueTransfer {
    fn transfer(&mut self, destination: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// In-memory host ledger of external accounts.
///
/// Records what each destination has received. Destinations marked with
/// `refuse` reject every incoming transfer, like a recipient that reverts.
#[derive(Debug, Clone, Default)]
pub struct LocalTransfers {
    balances: HashMap<Address, Amount>,
    refusing: HashSet<Address>,
}

impl LocalTransfers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total received by `address`.
    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    /// Make `address` reject all incoming transfers.
    pub fn refuse(&mut self, address: Address) {
        self.refusing.insert(address);
    }

    /// Let `address` receive transfers again.
    pub fn accept(&mut self, address: &Address) {
        self.refusing.remove(address);
    }
}

impl ValueTransfer for LocalTransfers {
    fn transfer(&mut self, destination: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.refusing.contains(destination) {
            return Err(TransferError::Rejected {
                destination: *destination,
            });
        }

        let current = self.balance_of(destination);
        let updated = current.checked_add(amount).ok_or(TransferError::Overflow)?;
        self.balances.insert(*destination, updated);
        Ok(())
    }
}
