//! Integration test: credential lifecycle through the registry service.
//!
//! Exercises issue → verify → update → revoke across zkcert-core and
//! zkcert-registry, including every rejection path of the lifecycle.

use std::sync::Arc;

use zkcert_core::{CredentialState, RegistryError, RegistryEvent};
use zkcert_integration_tests::{key, principal, registry, OUTSIDER, UNIVERSITY_A, UNIVERSITY_B};
use zkcert_registry::{AcceptAll, ProofMatchVerifier, RejectAll};

const PROOF: [u8; 2] = [0x12, 0x34];

// =========================================================================
// End-to-end scenarios
// =========================================================================

#[test]
fn test_degree_issue_verify_revoke() {
    let service = registry(Arc::new(AcceptAll));
    let university = principal(UNIVERSITY_A);
    let degree = key("student1");

    service
        .issue_credential(
            degree,
            Some("degree".into()),
            b"BSc Computer Science".to_vec(),
            PROOF.to_vec(),
            &university,
        )
        .expect("authorized issuance should succeed");

    assert_eq!(service.verify_credential(&degree, &PROOF), Ok(true));

    service
        .revoke_credential(&degree, &university)
        .expect("issuer may revoke");

    // Same proof the verifier accepted a moment ago
    assert_eq!(
        service.verify_credential(&degree, &PROOF),
        Err(RegistryError::Revoked(degree))
    );
    assert_eq!(service.credential_state(&degree), CredentialState::Revoked);
}

#[test]
fn test_unauthorized_then_authorized_issuance() {
    let service = registry(Arc::new(ProofMatchVerifier));
    let x = key("x");

    let err = service
        .issue_credential(x, None, vec![], PROOF.to_vec(), &principal(OUTSIDER))
        .unwrap_err();
    assert_eq!(err, RegistryError::Unauthorized(principal(OUTSIDER)));
    assert!(!service.store().contains(&x));

    service
        .issue_credential(x, None, vec![], PROOF.to_vec(), &principal(UNIVERSITY_A))
        .expect("authorized issuance succeeds");

    let again = service
        .issue_credential(x, None, vec![], PROOF.to_vec(), &principal(UNIVERSITY_A))
        .unwrap_err();
    assert_eq!(again, RegistryError::AlreadyExists(x));
    assert_eq!(service.store().len(), 1);
}

// =========================================================================
// Uniqueness and revocation
// =========================================================================

#[test]
fn test_double_issue_keeps_first_record() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("test");

    service
        .issue_credential(k, Some("degree".into()), b"first".to_vec(), PROOF.to_vec(), &principal(UNIVERSITY_A))
        .unwrap();
    let err = service
        .issue_credential(k, Some("diploma".into()), b"second".to_vec(), vec![], &principal(UNIVERSITY_B))
        .unwrap_err();
    assert_eq!(err, RegistryError::AlreadyExists(k));

    let record = service.get_credential(&k).unwrap();
    assert_eq!(record.issuer, principal(UNIVERSITY_A));
    assert_eq!(record.credential_type.as_deref(), Some("degree"));
    assert_eq!(record.metadata, b"first");
    assert_eq!(record.proof, PROOF);
}

#[test]
fn test_double_revoke_detected() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("test");
    let university = principal(UNIVERSITY_A);

    service
        .issue_credential(k, None, vec![], vec![], &university)
        .unwrap();
    let first = service.revoke_credential(&k, &university).unwrap();
    assert_eq!(first.event, RegistryEvent::CredentialRevoked { key: k });

    let events_before = service.event_count();
    assert_eq!(
        service.revoke_credential(&k, &university),
        Err(RegistryError::AlreadyRevoked(k))
    );
    assert!(service.get_credential(&k).unwrap().is_revoked);
    assert_eq!(service.event_count(), events_before);
}

#[test]
fn test_reissue_after_revocation_rejected() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("test");
    let university = principal(UNIVERSITY_A);

    service
        .issue_credential(k, None, vec![], vec![], &university)
        .unwrap();
    service.revoke_credential(&k, &university).unwrap();
    assert_eq!(
        service.issue_credential(k, None, vec![], vec![], &university),
        Err(RegistryError::AlreadyExists(k))
    );
    assert!(service.get_credential(&k).unwrap().is_revoked);
}

// =========================================================================
// Metadata
// =========================================================================

#[test]
fn test_update_metadata_by_issuer() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("test");
    let university = principal(UNIVERSITY_A);

    service
        .issue_credential(k, None, b"Test metadata".to_vec(), vec![], &university)
        .unwrap();
    let event = service
        .update_metadata(&k, b"Updated metadata".to_vec(), &university)
        .unwrap();

    assert_eq!(
        event.event,
        RegistryEvent::CredentialMetadataUpdated {
            key: k,
            metadata: b"Updated metadata".to_vec(),
        }
    );
    assert_eq!(service.get_credential(&k).unwrap().metadata, b"Updated metadata");
    assert_eq!(service.credential_state(&k), CredentialState::Active);
}

#[test]
fn test_revoked_credential_is_frozen() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("test");
    let university = principal(UNIVERSITY_A);

    service
        .issue_credential(k, None, b"frozen".to_vec(), vec![], &university)
        .unwrap();
    service.revoke_credential(&k, &university).unwrap();

    assert_eq!(
        service.update_metadata(&k, b"thawed".to_vec(), &university),
        Err(RegistryError::Revoked(k))
    );
    assert_eq!(service.get_credential(&k).unwrap().metadata, b"frozen");
}

// =========================================================================
// Record ownership
// =========================================================================

#[test]
fn test_other_issuer_is_forbidden() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("test");
    let owner = principal(UNIVERSITY_A);
    let rival = principal(UNIVERSITY_B);

    service
        .issue_credential(k, None, b"original".to_vec(), vec![], &owner)
        .unwrap();

    let forbidden = RegistryError::Forbidden {
        key: k,
        actor: rival.clone(),
    };
    assert_eq!(service.revoke_credential(&k, &rival), Err(forbidden.clone()));
    assert_eq!(
        service.update_metadata(&k, b"hijacked".to_vec(), &rival),
        Err(forbidden)
    );

    let record = service.get_credential(&k).unwrap();
    assert!(!record.is_revoked);
    assert_eq!(record.metadata, b"original");
}

// =========================================================================
// Missing keys and verifier verdicts
// =========================================================================

#[test]
fn test_missing_key_is_not_found_everywhere() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("nonexistent");
    let university = principal(UNIVERSITY_A);

    assert_eq!(service.verify_credential(&k, &PROOF), Err(RegistryError::NotFound(k)));
    assert_eq!(service.revoke_credential(&k, &university), Err(RegistryError::NotFound(k)));
    assert_eq!(
        service.update_metadata(&k, vec![], &university),
        Err(RegistryError::NotFound(k))
    );
    assert_eq!(service.get_credential(&k), Err(RegistryError::NotFound(k)));
    assert_eq!(service.event_count(), 2);
}

#[test]
fn test_verifier_verdict_is_returned_not_error() {
    let k = key("test");
    let university = principal(UNIVERSITY_A);

    let rejecting = registry(Arc::new(RejectAll));
    rejecting
        .issue_credential(k, None, vec![], PROOF.to_vec(), &university)
        .unwrap();
    assert_eq!(rejecting.verify_credential(&k, &PROOF), Ok(false));

    let matching = registry(Arc::new(ProofMatchVerifier));
    matching
        .issue_credential(k, None, vec![], PROOF.to_vec(), &university)
        .unwrap();
    assert_eq!(matching.verify_credential(&k, &PROOF), Ok(true));
    assert_eq!(matching.verify_credential(&k, &[0x12]), Ok(false));
}

#[test]
fn test_verification_never_mutates() {
    let service = registry(Arc::new(RejectAll));
    let k = key("test");
    service
        .issue_credential(k, None, b"m".to_vec(), PROOF.to_vec(), &principal(UNIVERSITY_A))
        .unwrap();

    let before = service.snapshot();
    for _ in 0..3 {
        service.verify_credential(&k, b"wrong").unwrap();
    }
    assert_eq!(service.snapshot(), before);
}
