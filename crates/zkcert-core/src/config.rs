use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::types::Principal;

/// Who may revoke or update an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationPolicy {
    /// The record's original issuer, whether or not it is still in the
    /// issuer set.
    #[default]
    RecordIssuer,
    /// The record's original issuer, and only while it remains authorized.
    RecheckRegistry,
}

/// Configuration for a registry instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Principal allowed to change the issuer set.
    #[serde(default = "default_administrator")]
    pub administrator: String,
    /// Issuers authorized when the registry starts.
    #[serde(default)]
    pub initial_issuers: Vec<String>,
    /// Authorization rule for mutations of existing records.
    #[serde(default)]
    pub authorization_policy: AuthorizationPolicy,
    /// Buffer size of the live event broadcast channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_administrator() -> String {
    "admin".into()
}
fn default_event_channel_capacity() -> usize {
    256
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            administrator: default_administrator(),
            initial_issuers: Vec::new(),
            authorization_policy: AuthorizationPolicy::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

impl RegistryConfig {
    /// Parse the administrator identity.
    pub fn administrator(&self) -> Result<Principal, RegistryError> {
        Principal::new(self.administrator.clone())
    }

    /// Parse the bootstrap issuer identities.
    pub fn initial_issuers(&self) -> Result<Vec<Principal>, RegistryError> {
        self.initial_issuers
            .iter()
            .map(|s| Principal::new(s.clone()))
            .collect()
    }
}
