//! MultiSigWallet: the custody contract entry points
//!
//! Composes the signer registry, attestation verifier, custody ledger,
//! lifecycle gate and threshold engine behind the externally callable
//! operations. Every caller identity is explicit.
//!
//! All state-changing operations check, in order:
//! 1. Lifecycle gate (fundraiser mode only)
//! 2. Caller authorization (proposals only)
//! 3. Parameter and balance validation
//! 4. Effect, with rollback if the host transfer fails

use tracing::{info, warn};
use types::ids::Address;
use types::numeric::Amount;

use crate::attestation::AttestationVerifier;
use crate::config::CustodyConfig;
use crate::engine::{ExecutionContext, ThresholdEngine};
use crate::errors::CustodyError;
use crate::ledger::{CustodyLedger, LocalTransfers, ValueTransfer};
use crate::lifecycle::{CustodyMode, Lifecycle};
use crate::proposal::{Action, ProposalBook, ProposalOutcome};
use crate::registry::SignerRegistry;

/// A threshold custody instance.
///
/// `T` is the host's value-move primitive; `LocalTransfers` keeps external
/// balances in memory.
#[derive(Debug)]
pub struct MultiSigWallet<T: ValueTransfer = LocalTransfers> {
    registry: SignerRegistry,
    attestation: AttestationVerifier,
    ledger: CustodyLedger,
    lifecycle: Lifecycle,
    engine: ThresholdEngine,
    transfers: T,
}

impl<T: ValueTransfer> MultiSigWallet<T> {
    /// Construct from configuration. Fails on duplicate or too few signers.
    pub fn new(config: &CustodyConfig, transfers: T) -> Result<Self, CustodyError> {
        let registry = SignerRegistry::new(config.signers.clone())?;

        info!(
            signers = registry.len(),
            attester = %config.attester,
            mode = config.mode.as_str(),
            "custody instance constructed"
        );

        Ok(Self {
            registry,
            attestation: AttestationVerifier::new(config.attester, config.message_prefix.clone()),
            ledger: CustodyLedger::new(),
            lifecycle: Lifecycle::new(config.mode),
            engine: ThresholdEngine::new(),
            transfers,
        })
    }

    /// Reassemble an instance from already-validated parts.
    pub(crate) fn from_parts(
        registry: SignerRegistry,
        attestation: AttestationVerifier,
        ledger: CustodyLedger,
        lifecycle: Lifecycle,
        book: ProposalBook,
        transfers: T,
    ) -> Self {
        Self {
            registry,
            attestation,
            ledger,
            lifecycle,
            engine: ThresholdEngine::from_book(book),
            transfers,
        }
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Contribute `value` bound to an attested identifier.
    ///
    /// `caller` may be anyone; only the attester's signature over
    /// `identifier_hash` is checked. Returns the new custody balance.
    pub fn contribute(
        &mut self,
        caller: &Address,
        identifier_hash: &[u8; 32],
        signature: &[u8],
        value: Amount,
    ) -> Result<Amount, CustodyError> {
        self.lifecycle.ensure_accepting()?;

        if value.is_zero() {
            return Err(CustodyError::InvalidAmount);
        }

        self.attestation.verify(identifier_hash, signature)?;

        let balance = self.ledger.credit(value)?;
        info!(%caller, %value, %balance, "attested contribution accepted");
        Ok(balance)
    }

    /// Value sent without going through `contribute`. Always rejected.
    pub fn receive_plain_transfer(&self, caller: &Address, value: Amount) -> Result<(), CustodyError> {
        warn!(%caller, %value, "rejected value transfer without attestation");
        Err(CustodyError::NoImplicitDeposit)
    }

    // ───────────────────────── Threshold Actions ─────────────────────────

    /// Propose any action. See [`ThresholdEngine::propose`].
    pub fn propose(&mut self, caller: &Address, action: Action) -> Result<ProposalOutcome, CustodyError> {
        let ctx = ExecutionContext {
            ledger: &mut self.ledger,
            lifecycle: &mut self.lifecycle,
            transfers: &mut self.transfers,
        };
        self.engine.propose(&self.registry, caller, action, ctx)
    }

    /// Propose sending `amount` to `destination`.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        destination: Address,
        amount: Amount,
    ) -> Result<ProposalOutcome, CustodyError> {
        self.propose(caller, Action::Withdraw { destination, amount })
    }

    /// Propose opening for deposits (fundraiser mode).
    pub fn open(&mut self, caller: &Address) -> Result<ProposalOutcome, CustodyError> {
        self.propose(caller, Action::Open)
    }

    /// Propose closing and sweeping everything to `destination` (fundraiser mode).
    pub fn close(&mut self, caller: &Address, destination: Address) -> Result<ProposalOutcome, CustodyError> {
        self.propose(caller, Action::Close { destination })
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Whether deposits and withdrawals are currently accepted.
    pub fn accept(&self) -> bool {
        self.lifecycle.is_accepting()
    }

    /// Current custody balance.
    pub fn balance(&self) -> Amount {
        self.ledger.balance()
    }

    /// The signer's live proposal, if any.
    pub fn pending_proposal(&self, signer: &Address) -> Option<&Action> {
        self.engine.pending(signer)
    }

    pub fn is_signer(&self, identity: &Address) -> bool {
        self.registry.is_signer(identity)
    }

    pub fn signers(&self) -> &[Address] {
        self.registry.signers()
    }

    pub fn attester(&self) -> &Address {
        self.attestation.attester()
    }

    pub fn message_prefix(&self) -> &str {
        self.attestation.prefix()
    }

    pub fn mode(&self) -> CustodyMode {
        self.lifecycle.mode()
    }

    pub(crate) fn proposals(&self) -> &ProposalBook {
        self.engine.book()
    }

    /// Host transfer primitive, e.g. to inspect destination balances.
    pub fn transfers(&self) -> &T {
        &self.transfers
    }

    pub fn transfers_mut(&mut self) -> &mut T {
        &mut self.transfers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attestation::{address_of, sign_identifier, SignedIdentifier, DEFAULT_MESSAGE_PREFIX};
    use k256::ecdsa::SigningKey;

    const IDENTIFIER: &[u8] = b"idunnolikeanemail@something.com";

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    fn attester_key() -> SigningKey {
        SigningKey::from_slice(&[5u8; 32]).unwrap()
    }

    fn setup(mode: CustodyMode) -> MultiSigWallet {
        let config = CustodyConfig::new(
            vec![addr(1), addr(2), addr(3), addr(4)],
            address_of(attester_key().verifying_key()),
            mode,
        );
        MultiSigWallet::new(&config, LocalTransfers::new()).unwrap()
    }

    fn attested() -> SignedIdentifier {
        sign_identifier(&attester_key(), DEFAULT_MESSAGE_PREFIX, IDENTIFIER).unwrap()
    }

    #[test]
    fn test_contribute_from_non_signer() {
        let mut wallet = setup(CustodyMode::Wallet);
        let signed = attested();
        let balance = wallet
            .contribute(&addr(6), &signed.identifier_hash, &signed.signature, Amount::new(3))
            .unwrap();
        assert_eq!(balance, Amount::new(3));
        assert_eq!(wallet.balance(), Amount::new(3));
    }

    #[test]
    fn test_contribute_zero_rejected() {
        let mut wallet = setup(CustodyMode::Wallet);
        let signed = attested();
        let result = wallet.contribute(&addr(6), &signed.identifier_hash, &signed.signature, Amount::ZERO);
        assert_eq!(result, Err(CustodyError::InvalidAmount));
    }

    #[test]
    fn test_contribute_overflow_leaves_balance() {
        let mut wallet = setup(CustodyMode::Wallet);
        let signed = attested();
        wallet
            .contribute(&addr(6), &signed.identifier_hash, &signed.signature, Amount::new(u128::MAX))
            .unwrap();
        let result = wallet.contribute(&addr(6), &signed.identifier_hash, &signed.signature, Amount::new(1));
        assert_eq!(result, Err(CustodyError::Overflow));
        assert_eq!(wallet.balance(), Amount::new(u128::MAX));
    }

    #[test]
    fn test_plain_transfer_rejected() {
        let wallet = setup(CustodyMode::Wallet);
        assert_eq!(
            wallet.receive_plain_transfer(&addr(6), Amount::new(1)),
            Err(CustodyError::NoImplicitDeposit)
        );
        assert_eq!(wallet.balance(), Amount::ZERO);
    }

    #[test]
    fn test_fundraiser_rejects_contribution_before_open() {
        let mut wallet = setup(CustodyMode::Fundraiser);
        let signed = attested();
        assert!(!wallet.accept());
        let result = wallet.contribute(&addr(6), &signed.identifier_hash, &signed.signature, Amount::new(1));
        assert_eq!(result, Err(CustodyError::NotAccepting));
    }

    #[test]
    fn test_queries_reflect_configuration() {
        let wallet = setup(CustodyMode::Fundraiser);
        assert_eq!(wallet.signers().len(), 4);
        assert!(wallet.is_signer(&addr(2)));
        assert_eq!(wallet.attester(), &address_of(attester_key().verifying_key()));
        assert_eq!(wallet.mode(), CustodyMode::Fundraiser);
        assert_eq!(wallet.message_prefix(), DEFAULT_MESSAGE_PREFIX);
    }

    #[test]
    fn test_withdraw_helper_records_pending() {
        let mut wallet = setup(CustodyMode::Wallet);
        let signed = attested();
        wallet
            .contribute(&addr(6), &signed.identifier_hash, &signed.signature, Amount::new(1))
            .unwrap();

        let outcome = wallet.withdraw(&addr(1), addr(7), Amount::new(1)).unwrap();
        assert_eq!(outcome, ProposalOutcome::Pending);
        assert_eq!(
            wallet.pending_proposal(&addr(1)),
            Some(&Action::Withdraw {
                destination: addr(7),
                amount: Amount::new(1),
            })
        );
    }
}
