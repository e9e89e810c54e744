//! Attested deposits: digest scheme and signer recovery
//!
//! A contribution carries `identifier_hash`, the personal-message digest of an
//! off-chain identifier, and the attester's recoverable secp256k1 signature
//! over that digest:
//!
//! ```text
//! identifier_hash = keccak256(prefix || decimal(len(identifier)) || identifier)
//! signature       = r (32) || s (32) || v (1),  v in {0, 1, 27, 28}
//! ```
//!
//! The contract never sees the identifier itself and never checks who paid.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::warn;
use types::ids::{Address, ADDRESS_LEN};

use crate::errors::CustodyError;

/// Personal-message prefix. The byte length of the identifier follows it in decimal.
pub const DEFAULT_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Length of a recoverable signature: `r || s || v`.
pub const SIGNATURE_LEN: usize = 65;

/// Keccak-256 of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Canonical digest of `identifier` under the personal-message scheme.
pub fn personal_message_digest(prefix: &str, identifier: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(identifier.len().to_string().as_bytes());
    hasher.update(identifier);
    hasher.finalize().into()
}

/// Address of a public key: last 20 bytes of keccak256 over the uncompressed
/// point without its SEC1 tag byte.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut bytes = [0u8; ADDRESS_LEN];
    bytes.copy_from_slice(&hash[32 - ADDRESS_LEN..]);
    Address::from_bytes(bytes)
}

/// Recover the signer of `digest`.
///
/// Any malformed input is reported as `InvalidAttestation`.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8]) -> Result<Address, CustodyError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(CustodyError::InvalidAttestation);
    }

    let sig = Signature::from_slice(&signature[..64]).map_err(|_| CustodyError::InvalidAttestation)?;
    let v = match signature[64] {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(CustodyError::InvalidAttestation),
    };
    let recovery_id = RecoveryId::from_byte(v).ok_or(CustodyError::InvalidAttestation)?;

    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| CustodyError::InvalidAttestation)?;
    Ok(address_of(&key))
}

/// Verifies that a deposit digest was signed by the designated attester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationVerifier {
    attester: Address,
    prefix: String,
}

impl AttestationVerifier {
    pub fn new(attester: Address, prefix: impl Into<String>) -> Self {
        Self {
            attester,
            prefix: prefix.into(),
        }
    }

    /// Succeeds only if `signature` over `identifier_hash` recovers to the attester.
    pub fn verify(&self, identifier_hash: &[u8; 32], signature: &[u8]) -> Result<(), CustodyError> {
        let recovered = recover_signer(identifier_hash, signature).map_err(|e| {
            warn!("attestation signature could not be recovered");
            e
        })?;

        if recovered != self.attester {
            warn!(%recovered, attester = %self.attester, "attestation signed by wrong key");
            return Err(CustodyError::InvalidAttestation);
        }
        Ok(())
    }

    /// Digest a contributor must present for `identifier`.
    pub fn digest_for(&self, identifier: &[u8]) -> [u8; 32] {
        personal_message_digest(&self.prefix, identifier)
    }

    pub fn attester(&self) -> &Address {
        &self.attester
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Artefacts an attester hands to a contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIdentifier {
    pub identifier_hash: [u8; 32],
    pub signature: [u8; SIGNATURE_LEN],
}

/// Sign `identifier` the way a wallet's personal-sign does.
///
/// Client-side counterpart of [`AttestationVerifier::verify`].
pub fn sign_identifier(
    key: &SigningKey,
    prefix: &str,
    identifier: &[u8],
) -> Result<SignedIdentifier, k256::ecdsa::Error> {
    let identifier_hash = personal_message_digest(prefix, identifier);
    let (sig, recovery_id) = key.sign_prehash_recoverable(&identifier_hash)?;

    let mut signature = [0u8; SIGNATURE_LEN];
    signature[..64].copy_from_slice(&sig.to_bytes());
    signature[64] = 27 + recovery_id.to_byte();

    Ok(SignedIdentifier {
        identifier_hash,
        signature,
    })
}
