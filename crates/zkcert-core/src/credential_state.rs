use std::fmt;

use crate::error::RegistryError;
use crate::types::CredentialKey;

/// The states a credential key moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CredentialState {
    /// No record has ever been stored under the key. Initial state.
    NonExistent,
    /// Record exists and is valid.
    Active,
    /// Record has been permanently revoked. Final state.
    Revoked,
}

impl CredentialState {
    /// Whether this is a final (terminal) state.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl fmt::Display for CredentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonExistent => write!(f, "NonExistent"),
            Self::Active => write!(f, "Active"),
            Self::Revoked => write!(f, "Revoked"),
        }
    }
}

/// Operations that drive a credential key through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialEvent {
    /// An authorized issuer records the credential.
    Issue,
    /// The issuer replaces the credential's metadata.
    UpdateMetadata,
    /// The issuer permanently revokes the credential.
    Revoke,
}

/// Credential lifecycle transitions.
///
/// Valid transitions:
/// - NonExistent → Active (Issue)
/// - Active → Active (UpdateMetadata)
/// - Active → Revoked (Revoke)
///
/// Every other pair is rejected with the registry error a caller sees for
/// that operation.
pub struct CredentialStateMachine;

impl CredentialStateMachine {
    /// Attempt a state transition for `key`.
    /// Returns the new state on success.
    pub fn transition(
        key: &CredentialKey,
        current: CredentialState,
        event: CredentialEvent,
    ) -> Result<CredentialState, RegistryError> {
        let new_state = match (current, event) {
            (CredentialState::NonExistent, CredentialEvent::Issue) => CredentialState::Active,
            (CredentialState::Active, CredentialEvent::UpdateMetadata) => CredentialState::Active,
            (CredentialState::Active, CredentialEvent::Revoke) => CredentialState::Revoked,

            // Keys are never re-issued, revoked or not.
            (CredentialState::Active | CredentialState::Revoked, CredentialEvent::Issue) => {
                return Err(RegistryError::AlreadyExists(*key));
            }
            (
                CredentialState::NonExistent,
                CredentialEvent::UpdateMetadata | CredentialEvent::Revoke,
            ) => {
                return Err(RegistryError::NotFound(*key));
            }
            (CredentialState::Revoked, CredentialEvent::UpdateMetadata) => {
                return Err(RegistryError::Revoked(*key));
            }
            (CredentialState::Revoked, CredentialEvent::Revoke) => {
                return Err(RegistryError::AlreadyRevoked(*key));
            }
        };

        tracing::debug!(
            %key,
            from = %current,
            to = %new_state,
            event = ?event,
            "credential state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: CredentialState, event: CredentialEvent) -> bool {
        Self::transition(&CredentialKey::from_bytes([0u8; 32]), current, event).is_ok()
    }
}
