//! Registry service: the façade through which every credential and issuer
//! mutation flows.
//!
//! Mutations are serialized through the event journal lock, which is held from
//! the first check until the event has been appended and broadcast. A call
//! therefore either applies fully and emits exactly one event, or fails and
//! leaves both state and journal untouched. Reads go straight to the
//! concurrent maps and never wait on the journal.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use zkcert_core::{
    AuthorizationPolicy, CredentialKey, CredentialRecord, CredentialState, EventRecord,
    Principal, RegistryConfig, RegistryError, RegistryEvent,
};

use crate::issuers::IssuerRegistry;
use crate::store::CredentialStore;
use crate::verifier::{CredentialClaim, VerifierAdapter};

/// One credential in a [`RegistrySnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub key: CredentialKey,
    #[serde(flatten)]
    pub record: CredentialRecord,
}

/// Point-in-time export of the whole registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub administrator: Principal,
    pub authorization_policy: AuthorizationPolicy,
    /// Authorized issuers, sorted.
    pub issuers: Vec<Principal>,
    /// Credentials in insertion order.
    pub credentials: Vec<SnapshotEntry>,
    /// Sequence of the last journaled event (0 if none).
    pub last_event_sequence: u64,
}

/// Issues, updates, revokes and verifies credentials on behalf of an
/// explicit calling principal.
pub struct RegistryService {
    /// Principal allowed to change the issuer set.
    administrator: Principal,
    /// Rule for who may mutate an existing record.
    policy: AuthorizationPolicy,
    /// Issuer authorization set.
    issuers: Arc<IssuerRegistry>,
    /// Credential records.
    store: Arc<CredentialStore>,
    /// Proof verification strategy.
    verifier: Arc<dyn VerifierAdapter>,
    /// Append-only event journal. Its lock serializes all mutations.
    journal: Mutex<Vec<EventRecord>>,
    /// Live event feed.
    event_tx: broadcast::Sender<EventRecord>,
}

impl RegistryService {
    /// Create a service over fresh, empty state.
    pub fn new(
        config: &RegistryConfig,
        verifier: Arc<dyn VerifierAdapter>,
    ) -> Result<Self, RegistryError> {
        Self::with_state(
            config,
            Arc::new(IssuerRegistry::new()),
            Arc::new(CredentialStore::new()),
            verifier,
        )
    }

    /// Create a service over existing state handles. Configured initial
    /// issuers are authorized (and journaled) before the service is returned.
    pub fn with_state(
        config: &RegistryConfig,
        issuers: Arc<IssuerRegistry>,
        store: Arc<CredentialStore>,
        verifier: Arc<dyn VerifierAdapter>,
    ) -> Result<Self, RegistryError> {
        let administrator = config.administrator()?;
        let initial_issuers = config.initial_issuers()?;
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));

        let service = Self {
            administrator,
            policy: config.authorization_policy,
            issuers,
            store,
            verifier,
            journal: Mutex::new(Vec::new()),
            event_tx,
        };

        let admin = service.administrator.clone();
        for issuer in initial_issuers {
            service.authorize_issuer(issuer, &admin)?;
        }

        tracing::info!(
            administrator = %service.administrator,
            policy = ?service.policy,
            verifier = service.verifier.name(),
            issuers = service.issuers.len(),
            "registry service created"
        );

        Ok(service)
    }

    // --- Issuer set ---

    /// Authorize `identity` to issue. Only the administrator may call this.
    /// Returns the emitted event, or `None` if the identity was already
    /// authorized.
    pub fn authorize_issuer(
        &self,
        identity: Principal,
        actor: &Principal,
    ) -> Result<Option<EventRecord>, RegistryError> {
        let mut journal = self.journal();
        self.require_administrator(actor)?;

        if !self.issuers.authorize(identity.clone()) {
            return Ok(None);
        }
        tracing::info!(issuer = %identity, "issuer authorized");
        Ok(Some(self.emit(
            &mut journal,
            RegistryEvent::IssuerAuthorized { issuer: identity },
        )))
    }

    /// Remove `identity` from the issuer set. Only the administrator may call
    /// this. Returns `None` if the identity was not authorized.
    pub fn deauthorize_issuer(
        &self,
        identity: &Principal,
        actor: &Principal,
    ) -> Result<Option<EventRecord>, RegistryError> {
        let mut journal = self.journal();
        self.require_administrator(actor)?;

        if !self.issuers.deauthorize(identity) {
            return Ok(None);
        }
        tracing::info!(issuer = %identity, "issuer deauthorized");
        Ok(Some(self.emit(
            &mut journal,
            RegistryEvent::IssuerDeauthorized {
                issuer: identity.clone(),
            },
        )))
    }

    // --- Credential lifecycle ---

    /// Record a new credential under `key` with `actor` as its issuer.
    pub fn issue_credential(
        &self,
        key: CredentialKey,
        credential_type: Option<String>,
        metadata: Vec<u8>,
        proof: Vec<u8>,
        actor: &Principal,
    ) -> Result<EventRecord, RegistryError> {
        let mut journal = self.journal();

        if !self.issuers.is_authorized(actor) {
            return Err(rejected("issue", &key, actor, RegistryError::Unauthorized(actor.clone())));
        }

        let record = CredentialRecord::new(actor.clone(), credential_type.clone(), metadata, proof);
        let sequence = self
            .store
            .insert(key, record)
            .map_err(|e| rejected("issue", &key, actor, e))?;

        tracing::info!(
            %key,
            issuer = %actor,
            credential_type = credential_type.as_deref().unwrap_or(""),
            sequence,
            "credential issued"
        );

        Ok(self.emit(
            &mut journal,
            RegistryEvent::CredentialIssued {
                key,
                issuer: actor.clone(),
                credential_type,
            },
        ))
    }

    /// Permanently revoke the credential under `key`. Only its issuer may.
    pub fn revoke_credential(
        &self,
        key: &CredentialKey,
        actor: &Principal,
    ) -> Result<EventRecord, RegistryError> {
        let mut journal = self.journal();

        self.authorize_record_mutation(key, actor)
            .and_then(|_| self.store.set_revoked(key))
            .map_err(|e| rejected("revoke", key, actor, e))?;

        tracing::info!(%key, issuer = %actor, "credential revoked");

        Ok(self.emit(&mut journal, RegistryEvent::CredentialRevoked { key: *key }))
    }

    /// Replace the metadata of the credential under `key`. Only its issuer may.
    pub fn update_metadata(
        &self,
        key: &CredentialKey,
        metadata: Vec<u8>,
        actor: &Principal,
    ) -> Result<EventRecord, RegistryError> {
        let mut journal = self.journal();

        let updated = self
            .authorize_record_mutation(key, actor)
            .and_then(|_| self.store.set_metadata(key, metadata))
            .map_err(|e| rejected("update", key, actor, e))?;

        tracing::info!(%key, issuer = %actor, bytes = updated.metadata.len(), "credential metadata updated");

        Ok(self.emit(
            &mut journal,
            RegistryEvent::CredentialMetadataUpdated {
                key: *key,
                metadata: updated.metadata,
            },
        ))
    }

    /// Check `proof` for the credential under `key`.
    ///
    /// Fails with `NotFound` for unknown keys and `Revoked` for revoked
    /// credentials; otherwise returns the verifier's verdict. Never mutates.
    pub fn verify_credential(
        &self,
        key: &CredentialKey,
        proof: &[u8],
    ) -> Result<bool, RegistryError> {
        let record = self.store.get(key)?;
        if record.is_revoked {
            tracing::debug!(%key, "verification refused: credential revoked");
            return Err(RegistryError::Revoked(*key));
        }

        let claim = CredentialClaim::from_record(*key, &record);
        let valid = self.verifier.verify(&claim, proof);
        tracing::debug!(%key, verifier = self.verifier.name(), valid, "credential verified");
        Ok(valid)
    }

    // --- Reads ---

    pub fn get_credential(&self, key: &CredentialKey) -> Result<CredentialRecord, RegistryError> {
        self.store.get(key)
    }

    pub fn credential_state(&self, key: &CredentialKey) -> CredentialState {
        self.store.state(key)
    }

    pub fn is_authorized_issuer(&self, identity: &Principal) -> bool {
        self.issuers.is_authorized(identity)
    }

    /// Read handle on the issuer set.
    pub fn issuers(&self) -> &IssuerRegistry {
        &self.issuers
    }

    /// Read handle on the credential store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    pub fn policy(&self) -> AuthorizationPolicy {
        self.policy
    }

    pub fn verifier_name(&self) -> &str {
        self.verifier.name()
    }

    // --- Events ---

    /// Subscribe to events appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.event_tx.subscribe()
    }

    /// Journaled events with a sequence greater than `after`.
    pub fn events_since(&self, after: u64) -> Vec<EventRecord> {
        let journal = self.journal();
        let start = usize::try_from(after).unwrap_or(usize::MAX).min(journal.len());
        journal[start..].to_vec()
    }

    /// Number of journaled events.
    pub fn event_count(&self) -> u64 {
        self.journal().len() as u64
    }

    /// Consistent export of issuers, credentials and journal position.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let journal = self.journal();
        RegistrySnapshot {
            administrator: self.administrator.clone(),
            authorization_policy: self.policy,
            issuers: self.issuers.list(),
            credentials: self
                .store
                .records()
                .into_iter()
                .map(|(key, record)| SnapshotEntry { key, record })
                .collect(),
            last_event_sequence: journal.len() as u64,
        }
    }

    // --- Internals ---

    fn journal(&self) -> MutexGuard<'_, Vec<EventRecord>> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, journal: &mut Vec<EventRecord>, event: RegistryEvent) -> EventRecord {
        let record = EventRecord::new(journal.len() as u64 + 1, event);
        journal.push(record.clone());
        // No live subscribers is fine; the journal still has the event.
        let _ = self.event_tx.send(record.clone());
        tracing::debug!(sequence = record.sequence, event = record.event.name(), "event emitted");
        record
    }

    fn require_administrator(&self, actor: &Principal) -> Result<(), RegistryError> {
        if *actor != self.administrator {
            tracing::warn!(%actor, "issuer set change rejected: not administrator");
            return Err(RegistryError::NotAdministrator(actor.clone()));
        }
        Ok(())
    }

    /// Record-level authorization for revoke and update: the record must
    /// exist and `actor` must be its issuer (and, under `RecheckRegistry`,
    /// still be an authorized issuer).
    fn authorize_record_mutation(
        &self,
        key: &CredentialKey,
        actor: &Principal,
    ) -> Result<(), RegistryError> {
        let record = self.store.get(key)?;
        if record.issuer != *actor {
            return Err(RegistryError::Forbidden {
                key: *key,
                actor: actor.clone(),
            });
        }
        if self.policy == AuthorizationPolicy::RecheckRegistry && !self.issuers.is_authorized(actor)
        {
            return Err(RegistryError::Unauthorized(actor.clone()));
        }
        Ok(())
    }
}

fn rejected(
    operation: &'static str,
    key: &CredentialKey,
    actor: &Principal,
    error: RegistryError,
) -> RegistryError {
    tracing::warn!(%key, %actor, operation, kind = %error.kind(), "credential operation rejected");
    error
}
