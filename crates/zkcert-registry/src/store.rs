use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use zkcert_core::{
    CredentialEvent, CredentialKey, CredentialRecord, CredentialState, CredentialStateMachine,
    RegistryError,
};

/// Credential store: owns the key → record mapping.
///
/// Records are never deleted. Each key holds at most one record for its whole
/// lifetime, and every mutation is checked against the credential state
/// machine under the key's shard lock.
pub struct CredentialStore {
    /// Credential key → record.
    records: DashMap<CredentialKey, CredentialRecord>,
    /// Last assigned insertion sequence.
    last_sequence: AtomicU64,
}

impl CredentialStore {
    /// Create an empty credential store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            last_sequence: AtomicU64::new(0),
        }
    }

    /// Store a new record under `key`. Fails with `AlreadyExists` if the key
    /// has ever been used. Returns the assigned insertion sequence.
    pub(crate) fn insert(
        &self,
        key: CredentialKey,
        mut record: CredentialRecord,
    ) -> Result<u64, RegistryError> {
        let entry = self.records.entry(key);
        let current = match &entry {
            Entry::Occupied(e) => e.get().state(),
            Entry::Vacant(_) => CredentialState::NonExistent,
        };
        CredentialStateMachine::transition(&key, current, CredentialEvent::Issue)?;

        let Entry::Vacant(slot) = entry else {
            return Err(RegistryError::AlreadyExists(key));
        };
        let sequence = self.last_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        record.sequence = sequence;
        record.is_revoked = false;
        slot.insert(record);

        tracing::debug!(%key, sequence, "credential stored");
        Ok(sequence)
    }

    /// Get a copy of the record under `key`.
    pub fn get(&self, key: &CredentialKey) -> Result<CredentialRecord, RegistryError> {
        self.records
            .get(key)
            .map(|e| e.value().clone())
            .ok_or(RegistryError::NotFound(*key))
    }

    /// Latch the revocation flag. Fails with `NotFound` or `AlreadyRevoked`.
    pub(crate) fn set_revoked(
        &self,
        key: &CredentialKey,
    ) -> Result<CredentialRecord, RegistryError> {
        self.apply(key, CredentialEvent::Revoke, |record| {
            record.is_revoked = true;
        })
    }

    /// Replace the metadata of an active record. Fails with `NotFound` or
    /// `Revoked`.
    pub(crate) fn set_metadata(
        &self,
        key: &CredentialKey,
        metadata: Vec<u8>,
    ) -> Result<CredentialRecord, RegistryError> {
        self.apply(key, CredentialEvent::UpdateMetadata, move |record| {
            record.metadata = metadata;
        })
    }

    fn apply(
        &self,
        key: &CredentialKey,
        event: CredentialEvent,
        mutate: impl FnOnce(&mut CredentialRecord),
    ) -> Result<CredentialRecord, RegistryError> {
        let Some(mut record) = self.records.get_mut(key) else {
            CredentialStateMachine::transition(key, CredentialState::NonExistent, event)?;
            return Err(RegistryError::NotFound(*key));
        };
        let next = CredentialStateMachine::transition(key, record.state(), event)?;
        mutate(&mut record);
        debug_assert_eq!(record.state(), next);
        Ok(record.clone())
    }

    /// Lifecycle state of `key`; `NonExistent` if it was never issued.
    pub fn state(&self, key: &CredentialKey) -> CredentialState {
        self.records
            .get(key)
            .map(|e| e.state())
            .unwrap_or(CredentialState::NonExistent)
    }

    /// Check if a record exists under `key`.
    pub fn contains(&self, key: &CredentialKey) -> bool {
        self.records.contains_key(key)
    }

    /// All records in insertion order.
    pub fn records(&self) -> Vec<(CredentialKey, CredentialRecord)> {
        let mut all: Vec<(CredentialKey, CredentialRecord)> = self
            .records
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        all.sort_by_key(|(_, record)| record.sequence);
        all
    }

    /// Number of stored records, revoked ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
