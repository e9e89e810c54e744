//! Signer registry
//!
//! The immutable set of identities allowed to propose threshold actions.
//! Membership is fixed at construction; there is no rotation.

use serde::{Deserialize, Serialize};
use types::ids::Address;

use crate::errors::CustodyError;

/// Minimum number of signers. A 2-signer quorum needs at least two members.
pub const MIN_SIGNERS: usize = 2;

/// Ordered, duplicate-free set of authorized signers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRegistry {
    signers: Vec<Address>,
}

impl SignerRegistry {
    /// Build a registry from candidate identities.
    ///
    /// Fails with `DuplicateSigner` on the first pair `(i, j)`, `i < j`, of equal
    /// candidates, checking every pair.
    pub fn new(candidates: Vec<Address>) -> Result<Self, CustodyError> {
        if candidates.len() < MIN_SIGNERS {
            return Err(CustodyError::InvalidSignerCount {
                count: candidates.len(),
            });
        }

        for (first, a) in candidates.iter().enumerate() {
            for (offset, b) in candidates[first + 1..].iter().enumerate() {
                if a == b {
                    return Err(CustodyError::DuplicateSigner {
                        signer: *a,
                        first,
                        second: first + 1 + offset,
                    });
                }
            }
        }

        Ok(Self {
            signers: candidates,
        })
    }

    /// Check if an identity is a registered signer.
    pub fn is_signer(&self, identity: &Address) -> bool {
        self.signers.contains(identity)
    }

    /// Like `is_signer`, but as a guard for privileged entry points.
    pub fn ensure_signer(&self, caller: &Address) -> Result<(), CustodyError> {
        if !self.is_signer(caller) {
            return Err(CustodyError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Signers in construction order.
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn test_registry_accepts_distinct_signers() {
        let registry = SignerRegistry::new(vec![addr(1), addr(2), addr(3), addr(4)]).unwrap();
        assert_eq!(registry.len(), 4);
        assert!(registry.is_signer(&addr(3)));
        assert!(!registry.is_signer(&addr(5)));
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = SignerRegistry::new(vec![addr(4), addr(1)]).unwrap();
        assert_eq!(registry.signers(), &[addr(4), addr(1)]);
    }

    #[test]
    fn test_registry_rejects_single_signer() {
        let result = SignerRegistry::new(vec![addr(1)]);
        assert_eq!(result, Err(CustodyError::InvalidSignerCount { count: 1 }));
    }

    #[test]
    fn test_registry_reports_duplicate_positions() {
        let result = SignerRegistry::new(vec![addr(1), addr(2), addr(3), addr(2)]);
        assert_eq!(
            result,
            Err(CustodyError::DuplicateSigner {
                signer: addr(2),
                first: 1,
                second: 3,
            })
        );
    }

    #[test]
    fn test_registry_rejects_every_duplicate_position_pair() {
        for i in 0..4 {
            for j in (i + 1)..4 {
                let mut candidates = vec![addr(1), addr(2), addr(3), addr(4)];
                candidates[j] = candidates[i];
                let result = SignerRegistry::new(candidates);
                assert!(
                    matches!(result, Err(CustodyError::DuplicateSigner { first, second, .. }) if first == i && second == j),
                    "duplicate at ({}, {}) not reported",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_ensure_signer_unauthorized() {
        let registry = SignerRegistry::new(vec![addr(1), addr(2)]).unwrap();
        assert!(registry.ensure_signer(&addr(1)).is_ok());
        assert_eq!(
            registry.ensure_signer(&addr(9)),
            Err(CustodyError::Unauthorized { caller: addr(9) })
        );
    }
}
