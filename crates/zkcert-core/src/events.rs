//! Lifecycle notifications emitted by the registry.
//!
//! Exactly one [`RegistryEvent`] is appended per successful mutating call and
//! none on failure. Indexers consume them either live or by replaying the
//! journal from a known sequence number.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{hex_bytes, CredentialKey, Principal};

/// A registry state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// A credential was recorded by an authorized issuer.
    CredentialIssued {
        key: CredentialKey,
        issuer: Principal,
        credential_type: Option<String>,
    },

    /// A credential was permanently revoked.
    CredentialRevoked { key: CredentialKey },

    /// A credential's metadata was replaced.
    CredentialMetadataUpdated {
        key: CredentialKey,
        #[serde(with = "hex_bytes")]
        metadata: Vec<u8>,
    },

    /// A principal was added to the issuer set.
    IssuerAuthorized { issuer: Principal },

    /// A principal was removed from the issuer set.
    IssuerDeauthorized { issuer: Principal },
}

impl RegistryEvent {
    /// The credential this event concerns, if any.
    pub fn credential_key(&self) -> Option<&CredentialKey> {
        match self {
            Self::CredentialIssued { key, .. }
            | Self::CredentialRevoked { key }
            | Self::CredentialMetadataUpdated { key, .. } => Some(key),
            Self::IssuerAuthorized { .. } | Self::IssuerDeauthorized { .. } => None,
        }
    }

    /// Short event name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CredentialIssued { .. } => "CredentialIssued",
            Self::CredentialRevoked { .. } => "CredentialRevoked",
            Self::CredentialMetadataUpdated { .. } => "CredentialMetadataUpdated",
            Self::IssuerAuthorized { .. } => "IssuerAuthorized",
            Self::IssuerDeauthorized { .. } => "IssuerDeauthorized",
        }
    }
}

/// A journaled event with its position in the global order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// 1-based, gap-free position in the event stream.
    pub sequence: u64,
    /// Unique event identifier (time-ordered UUIDv7).
    pub id: Uuid,
    /// When the event was appended.
    pub recorded_at: DateTime<Utc>,
    /// The event itself.
    pub event: RegistryEvent,
}

impl EventRecord {
    pub fn new(sequence: u64, event: RegistryEvent) -> Self {
        Self {
            sequence,
            id: Uuid::now_v7(),
            recorded_at: Utc::now(),
            event,
        }
    }
}
