//! Proof verification strategies.
//!
//! The registry only decides *whether* to consult a verifier (the credential
//! must exist and be unrevoked); whether the presented proof is acceptable is
//! entirely up to the injected [`VerifierAdapter`]. Implementations must be
//! pure functions of their inputs so verification results are reproducible.

use ed25519_dalek::{Signature, VerifyingKey};
use std::collections::HashMap;

use zkcert_core::hashing::{self, Hash};
use zkcert_core::{CredentialKey, CredentialRecord, Principal, RegistryError};

/// The stored claim a proof is checked against, derived from the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialClaim {
    pub key: CredentialKey,
    pub issuer: Principal,
    pub credential_type: Option<String>,
    pub metadata: Vec<u8>,
    /// Proof supplied when the credential was issued.
    pub issuance_proof: Vec<u8>,
}

impl CredentialClaim {
    pub fn from_record(key: CredentialKey, record: &CredentialRecord) -> Self {
        Self {
            key,
            issuer: record.issuer.clone(),
            credential_type: record.credential_type.clone(),
            metadata: record.metadata.clone(),
            issuance_proof: record.proof.clone(),
        }
    }

    /// Canonical digest over the immutable part of the claim
    /// (key, issuer, type). Metadata is excluded since the issuer may update it.
    pub fn digest(&self) -> Hash {
        hashing::hash_fields(&[
            self.key.as_bytes(),
            self.issuer.as_str().as_bytes(),
            self.credential_type.as_deref().unwrap_or("").as_bytes(),
        ])
    }
}

/// Evaluates a presented proof against a stored claim.
pub trait VerifierAdapter: Send + Sync {
    /// Whether `proof` is valid evidence for `claim`.
    fn verify(&self, claim: &CredentialClaim, proof: &[u8]) -> bool;

    /// Identifier of this verifier (e.g. "proof-match").
    fn name(&self) -> &str;
}

/// Accepts every proof. Test double.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl VerifierAdapter for AcceptAll {
    fn verify(&self, _claim: &CredentialClaim, _proof: &[u8]) -> bool {
        true
    }

    fn name(&self) -> &str {
        "accept-all"
    }
}

/// Rejects every proof. Test double.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

impl VerifierAdapter for RejectAll {
    fn verify(&self, _claim: &CredentialClaim, _proof: &[u8]) -> bool {
        false
    }

    fn name(&self) -> &str {
        "reject-all"
    }
}

/// Accepts a proof iff it equals the proof supplied at issuance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofMatchVerifier;

impl VerifierAdapter for ProofMatchVerifier {
    fn verify(&self, claim: &CredentialClaim, proof: &[u8]) -> bool {
        constant_time_eq(&claim.issuance_proof, proof)
    }

    fn name(&self) -> &str {
        "proof-match"
    }
}

/// Hash-commitment verifier.
///
/// The issuance proof is a BLAKE3 commitment `H(key || nonce)`; a presented
/// proof is the 32-byte nonce that opens it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommitmentVerifier;

impl CommitmentVerifier {
    /// Build the issuance proof committing to `key` under `nonce`.
    pub fn commit(key: &CredentialKey, nonce: &[u8; 32]) -> Vec<u8> {
        hashing::create_commitment(key.as_bytes(), nonce).to_vec()
    }
}

impl VerifierAdapter for CommitmentVerifier {
    fn verify(&self, claim: &CredentialClaim, proof: &[u8]) -> bool {
        let Ok(commitment) = <Hash>::try_from(claim.issuance_proof.as_slice()) else {
            return false;
        };
        let Ok(nonce) = <[u8; 32]>::try_from(proof) else {
            return false;
        };
        hashing::verify_commitment(claim.key.as_bytes(), &nonce, &commitment)
    }

    fn name(&self) -> &str {
        "commitment"
    }
}

/// Ed25519 signature verifier.
///
/// A presented proof is a 64-byte signature over [`CredentialClaim::digest`]
/// made by the claim's issuer. Issuer keys are fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct Ed25519Verifier {
    issuer_keys: HashMap<Principal, VerifyingKey>,
}

impl Ed25519Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the verifying key of an issuer.
    pub fn with_issuer_key(mut self, issuer: Principal, key: VerifyingKey) -> Self {
        self.issuer_keys.insert(issuer, key);
        self
    }

    /// Build from `(principal, hex public key)` pairs, e.g. from configuration.
    pub fn from_hex_keys<'a>(
        keys: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Result<Self, RegistryError> {
        let mut verifier = Self::new();
        for (issuer, key_hex) in keys {
            let bytes = hex::decode(key_hex).map_err(|e| {
                RegistryError::Validation(format!("invalid public key hex for {}: {}", issuer, e))
            })?;
            let arr: [u8; 32] = bytes.try_into().map_err(|_| {
                RegistryError::Validation(format!("public key for {} must be 32 bytes", issuer))
            })?;
            let key = VerifyingKey::from_bytes(&arr).map_err(|e| {
                RegistryError::Validation(format!("invalid public key for {}: {}", issuer, e))
            })?;
            verifier = verifier.with_issuer_key(Principal::new(issuer.clone())?, key);
        }
        Ok(verifier)
    }

    /// Number of known issuer keys.
    pub fn key_count(&self) -> usize {
        self.issuer_keys.len()
    }
}

impl VerifierAdapter for Ed25519Verifier {
    fn verify(&self, claim: &CredentialClaim, proof: &[u8]) -> bool {
        let Some(key) = self.issuer_keys.get(&claim.issuer) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(proof) else {
            return false;
        };
        key.verify_strict(&claim.digest(), &signature).is_ok()
    }

    fn name(&self) -> &str {
        "ed25519"
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
