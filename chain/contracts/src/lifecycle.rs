//! Open/close lifecycle gate
//!
//! In fundraiser mode every deposit and withdrawal is gated on an `accept`
//! flag that only threshold `Open`/`Close` actions can flip. Plain wallet mode
//! always accepts and has no lifecycle actions.

use serde::{Deserialize, Serialize};

use crate::errors::CustodyError;

/// Deployment flavour of the custody contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustodyMode {
    /// Always accepting; only withdrawals can be proposed.
    #[default]
    Wallet,
    /// Starts closed; signers open and close it by quorum.
    Fundraiser,
}

impl CustodyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustodyMode::Wallet => "wallet",
            CustodyMode::Fundraiser => "fundraiser",
        }
    }
}

/// Accept flag plus the mode that decides whether it can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    mode: CustodyMode,
    accept: bool,
}

impl Lifecycle {
    /// Fundraisers start closed, wallets start (and stay) open.
    pub fn new(mode: CustodyMode) -> Self {
        Self {
            mode,
            accept: mode == CustodyMode::Wallet,
        }
    }

    pub(crate) fn restore(mode: CustodyMode, accept: bool) -> Self {
        match mode {
            CustodyMode::Wallet => Self::new(mode),
            CustodyMode::Fundraiser => Self { mode, accept },
        }
    }

    pub fn mode(&self) -> CustodyMode {
        self.mode
    }

    pub fn is_accepting(&self) -> bool {
        self.accept
    }

    /// Guard for deposit and withdrawal entry points.
    pub fn ensure_accepting(&self) -> Result<(), CustodyError> {
        if !self.accept {
            return Err(CustodyError::NotAccepting);
        }
        Ok(())
    }

    /// Guard for `Open`/`Close` proposals.
    pub fn ensure_lifecycle_actions(&self, action: &'static str) -> Result<(), CustodyError> {
        if self.mode != CustodyMode::Fundraiser {
            return Err(CustodyError::UnsupportedAction {
                action,
                mode: self.mode.as_str(),
            });
        }
        Ok(())
    }

    pub(crate) fn set_accept(&mut self, accept: bool) {
        if self.mode == CustodyMode::Fundraiser {
            self.accept = accept;
        }
    }
}
