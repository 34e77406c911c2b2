//! ZkCert Core: Fundamental types, errors, events, and configuration for the
//! ZkCert credential registry.

pub mod config;
pub mod credential_state;
pub mod error;
pub mod events;
pub mod hashing;
pub mod types;

pub use config::{AuthorizationPolicy, RegistryConfig};
pub use credential_state::{CredentialEvent, CredentialState, CredentialStateMachine};
pub use error::{ErrorKind, RegistryError};
pub use events::{EventRecord, RegistryEvent};
pub use types::{CredentialKey, CredentialRecord, Principal};
