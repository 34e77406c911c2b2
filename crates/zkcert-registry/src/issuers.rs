use dashmap::DashSet;

use zkcert_core::Principal;

/// The set of principals currently permitted to issue credentials.
///
/// Absence from the set means unauthorized. Changes only affect future
/// issuance checks; records already issued keep their recorded issuer.
pub struct IssuerRegistry {
    issuers: DashSet<Principal>,
}

impl IssuerRegistry {
    /// Create an empty issuer registry.
    pub fn new() -> Self {
        Self {
            issuers: DashSet::new(),
        }
    }

    /// Mark `identity` as permitted to issue. Idempotent; returns whether the
    /// identity was newly added.
    pub(crate) fn authorize(&self, identity: Principal) -> bool {
        let added = self.issuers.insert(identity.clone());
        if added {
            tracing::debug!(issuer = %identity, "issuer added to registry");
        }
        added
    }

    /// Remove `identity` from the set. Returns whether it was present.
    pub(crate) fn deauthorize(&self, identity: &Principal) -> bool {
        let removed = self.issuers.remove(identity).is_some();
        if removed {
            tracing::debug!(issuer = %identity, "issuer removed from registry");
        }
        removed
    }

    /// Check if an identity is currently authorized.
    pub fn is_authorized(&self, identity: &Principal) -> bool {
        self.issuers.contains(identity)
    }

    /// All authorized identities, sorted.
    pub fn list(&self) -> Vec<Principal> {
        let mut issuers: Vec<Principal> = self.issuers.iter().map(|e| e.key().clone()).collect();
        issuers.sort();
        issuers
    }

    /// Number of authorized issuers.
    pub fn len(&self) -> usize {
        self.issuers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issuers.is_empty()
    }
}

impl Default for IssuerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
