use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::credential_state::CredentialState;
use crate::error::RegistryError;
use crate::hashing;

/// Fixed-width content hash identifying one credential. Primary key of the
/// credential store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CredentialKey([u8; 32]);

impl CredentialKey {
    /// Width of a key in bytes.
    pub const LEN: usize = 32;

    /// Derive a key from credential content (e.g. subject + claim) with BLAKE3.
    pub fn from_content(content: &[u8]) -> Self {
        Self(hashing::hash(content))
    }

    /// Wrap an existing 32-byte hash.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex encoding without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialKey({})", self.to_hex())
    }
}

impl FromStr for CredentialKey {
    type Err = RegistryError;

    /// Parse 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| RegistryError::Validation(format!("invalid credential key hex: {}", e)))?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            RegistryError::Validation(format!(
                "credential key must be {} bytes, got {}",
                Self::LEN,
                b.len()
            ))
        })?;
        Ok(Self(arr))
    }
}

impl Serialize for CredentialKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CredentialKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An already-authenticated calling identity (an address or a DID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    /// Create a principal, rejecting empty or whitespace-only identities.
    pub fn new(identity: impl Into<String>) -> Result<Self, RegistryError> {
        let identity = identity.into();
        if identity.trim().is_empty() {
            return Err(RegistryError::Validation(
                "principal identity must not be empty".into(),
            ));
        }
        Ok(Self(identity))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Principal {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

impl FromStr for Principal {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A stored credential. `issuer`, `credential_type` and `proof` are fixed at
/// issuance; only `metadata` and the one-way `is_revoked` latch change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Principal that issued the credential.
    pub issuer: Principal,
    /// Optional classification label (e.g. "degree").
    pub credential_type: Option<String>,
    /// Free-form claim data.
    #[serde(with = "hex_bytes")]
    pub metadata: Vec<u8>,
    /// Evidence supplied at issuance, interpreted only by a verifier.
    #[serde(with = "hex_bytes")]
    pub proof: Vec<u8>,
    /// Revocation flag. Never returns to false once set.
    pub is_revoked: bool,
    /// Insertion order assigned by the store (1-based, 0 until stored).
    pub sequence: u64,
    /// Wall-clock issuance time, informational only.
    pub issued_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Build a fresh, unrevoked record. The store assigns `sequence` on insert.
    pub fn new(
        issuer: Principal,
        credential_type: Option<String>,
        metadata: Vec<u8>,
        proof: Vec<u8>,
    ) -> Self {
        Self {
            issuer,
            credential_type,
            metadata,
            proof,
            is_revoked: false,
            sequence: 0,
            issued_at: Utc::now(),
        }
    }

    /// Lifecycle state of a stored record.
    pub fn state(&self) -> CredentialState {
        if self.is_revoked {
            CredentialState::Revoked
        } else {
            CredentialState::Active
        }
    }
}

/// Serde adapter encoding byte payloads as lower-case hex strings.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}
