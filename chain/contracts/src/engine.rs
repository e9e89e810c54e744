//! Threshold action engine
//!
//! Implements the 2-of-K rule: each signer holds at most one live proposal;
//! when a signer proposes an action identical to another signer's live
//! proposal, the action executes once and both proposals are consumed.
//!
//! Every call is all-or-nothing. Validation runs before any mutation, and an
//! execution whose transfer fails puts the ledger and lifecycle back before
//! returning, so proposals, balance and accept flag are untouched on error.

use tracing::{debug, info, warn};
use types::ids::{Address, ExecutionId};
use types::numeric::Amount;

use crate::errors::CustodyError;
use crate::ledger::{CustodyLedger, ValueTransfer};
use crate::lifecycle::Lifecycle;
use crate::proposal::{Action, Execution, ProposalBook, ProposalOutcome};
use crate::registry::SignerRegistry;

/// Matching proposals required to execute, independent of signer count.
pub const QUORUM: usize = 2;

/// Mutable custody state an executed action may touch.
pub struct ExecutionContext<'a, T: ValueTransfer> {
    pub ledger: &'a mut CustodyLedger,
    pub lifecycle: &'a mut Lifecycle,
    pub transfers: &'a mut T,
}

/// Proposal matching and execution.
#[derive(Debug, Clone, Default)]
pub struct ThresholdEngine {
    book: ProposalBook,
}

impl ThresholdEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_book(book: ProposalBook) -> Self {
        Self { book }
    }

    /// All live proposals.
    pub fn book(&self) -> &ProposalBook {
        &self.book
    }

    /// The signer's live proposal, if any.
    pub fn pending(&self, signer: &Address) -> Option<&Action> {
        self.book.get(signer)
    }

    /// Propose `action` on behalf of `caller`.
    ///
    /// Returns `Pending` if no other signer holds an identical proposal, or
    /// `Executed` once the second distinct signer agrees.
    pub fn propose<T: ValueTransfer>(
        &mut self,
        registry: &SignerRegistry,
        caller: &Address,
        action: Action,
        ctx: ExecutionContext<'_, T>,
    ) -> Result<ProposalOutcome, CustodyError> {
        registry.ensure_signer(caller)?;
        Self::validate(&action, &ctx)?;

        // The caller's own entry is excluded from the scan, so re-proposing
        // the same action only replaces it.
        let Some(partner) = self.book.find_match(caller, &action) else {
            let replaced = self.book.record(*caller, action);
            debug!(
                %caller,
                replaced = replaced.as_ref().map(Action::kind),
                pending = self.book.len(),
                "proposal recorded"
            );
            return Ok(ProposalOutcome::Pending);
        };

        let disbursed = Self::execute(&action, ctx)?;
        self.book.consume(&partner, caller);

        let execution = Execution {
            id: ExecutionId::new(),
            action,
            signers: [partner, *caller],
            disbursed,
        };
        info!(
            id = %execution.id,
            kind = execution.action.kind(),
            first = %partner,
            second = %caller,
            %disbursed,
            "threshold action executed"
        );
        Ok(ProposalOutcome::Executed(execution))
    }

    /// Checks that must hold before an action is recorded or executed.
    fn validate<T: ValueTransfer>(
        action: &Action,
        ctx: &ExecutionContext<'_, T>,
    ) -> Result<(), CustodyError> {
        match action {
            Action::Withdraw { amount, .. } => {
                ctx.lifecycle.ensure_accepting()?;
                Self::check_destination(action)?;
                ctx.ledger.ensure_covers(*amount)
            }
            Action::Open => ctx.lifecycle.ensure_lifecycle_actions(action.kind()),
            Action::Close { .. } => {
                ctx.lifecycle.ensure_lifecycle_actions(action.kind())?;
                Self::check_destination(action)
            }
        }
    }

    fn check_destination(action: &Action) -> Result<(), CustodyError> {
        match action.destination() {
            Some(destination) if destination.is_zero() => Err(CustodyError::InvalidDestination),
            _ => Ok(()),
        }
    }

    /// Apply the action's effect. Returns the amount moved out of custody.
    fn execute<T: ValueTransfer>(
        action: &Action,
        ctx: ExecutionContext<'_, T>,
    ) -> Result<Amount, CustodyError> {
        match action {
            Action::Withdraw {
                destination,
                amount,
            } => {
                // Balance may have moved since the first proposal
                ctx.ledger.debit(*amount)?;
                Self::send_or_restore(ctx.ledger, ctx.transfers, destination, *amount)?;
                Ok(*amount)
            }
            Action::Open => {
                ctx.lifecycle.set_accept(true);
                Ok(Amount::ZERO)
            }
            Action::Close { destination } => {
                let swept = ctx.ledger.drain();
                if !swept.is_zero() {
                    Self::send_or_restore(ctx.ledger, ctx.transfers, destination, swept)?;
                }
                ctx.lifecycle.set_accept(false);
                Ok(swept)
            }
        }
    }

    /// Transfer `amount`, re-crediting the ledger if the host refuses.
    fn send_or_restore<T: ValueTransfer>(
        ledger: &mut CustodyLedger,
        transfers: &mut T,
        destination: &Address,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        if let Err(e) = transfers.transfer(destination, amount) {
            warn!(%destination, %amount, error = %e, "transfer failed, rolling back");
            ledger.credit(amount)?;
            return Err(e.into());
        }
        Ok(())
    }
}
