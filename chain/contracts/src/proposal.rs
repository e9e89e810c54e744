//! Proposals: one live intent per signer
//!
//! A signer's newest proposal always replaces their previous one, whatever the
//! action kind. Quorum is detected by scanning the other signers' live
//! proposals for a structurally identical action.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use types::ids::{Address, ExecutionId};
use types::numeric::Amount;

/// A disbursing or lifecycle action signers can agree on.
///
/// Two proposals match only if kind and every parameter are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Withdraw { destination: Address, amount: Amount },
    Open,
    Close { destination: Address },
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Withdraw { .. } => "withdraw",
            Action::Open => "open",
            Action::Close { .. } => "close",
        }
    }

    /// Destination funds would move to, if any.
    pub fn destination(&self) -> Option<&Address> {
        match self {
            Action::Withdraw { destination, .. } | Action::Close { destination } => Some(destination),
            Action::Open => None,
        }
    }
}

/// Result of a successful `propose` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalOutcome {
    /// Recorded as the caller's live proposal; nothing executed.
    Pending,
    /// Matched another signer's proposal and executed.
    Executed(Execution),
}

impl ProposalOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, ProposalOutcome::Executed(_))
    }
}

/// Receipt for an executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub id: ExecutionId,
    pub action: Action,
    /// Earlier proposer first, then the caller that completed the quorum.
    pub signers: [Address; 2],
    /// Value moved out of custody by this execution.
    pub disbursed: Amount,
}

/// Live proposals keyed by signer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalBook {
    live: BTreeMap<Address, Action>,
}

impl ProposalBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signer's live proposal, if any.
    pub fn get(&self, signer: &Address) -> Option<&Action> {
        self.live.get(signer)
    }

    /// Record `action` as the signer's live proposal, returning the one it replaced.
    pub fn record(&mut self, signer: Address, action: Action) -> Option<Action> {
        self.live.insert(signer, action)
    }

    /// Another signer whose live proposal equals `action`.
    ///
    /// `caller`'s own entry is skipped, so a signer can never match themself.
    pub fn find_match(&self, caller: &Address, action: &Action) -> Option<Address> {
        self.live
            .iter()
            .find(|(signer, proposed)| *signer != caller && *proposed == action)
            .map(|(signer, _)| *signer)
    }

    /// Clear both proposals that formed a quorum.
    pub fn consume(&mut self, first: &Address, second: &Address) {
        self.live.remove(first);
        self.live.remove(second);
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Action)> {
        self.live.iter()
    }
}

impl FromIterator<(Address, Action)> for ProposalBook {
    fn from_iter<I: IntoIterator<Item = (Address, Action)>>(iter: I) -> Self {
        Self {
            live: iter.into_iter().collect(),
        }
    }
}
