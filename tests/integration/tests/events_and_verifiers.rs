//! Integration test: event stream guarantees, snapshots and the real
//! verifier strategies.

use std::sync::Arc;
use std::thread;

use ed25519_dalek::{Signer, SigningKey};
use zkcert_core::{CredentialKey, RegistryError, RegistryEvent};
use zkcert_integration_tests::{key, principal, registry, UNIVERSITY_A, UNIVERSITY_B};
use zkcert_registry::{
    AcceptAll, CommitmentVerifier, CredentialClaim, Ed25519Verifier, RegistryService,
};

// =========================================================================
// Event stream
// =========================================================================

#[test]
fn test_one_event_per_successful_mutation() {
    let service = registry(Arc::new(AcceptAll));
    let university = principal(UNIVERSITY_A);
    let k = key("student1");
    let baseline = service.event_count();

    service
        .issue_credential(k, Some("degree".into()), vec![], vec![], &university)
        .unwrap();
    let _ = service.issue_credential(k, None, vec![], vec![], &university);
    service
        .update_metadata(&k, b"v2".to_vec(), &university)
        .unwrap();
    let _ = service.update_metadata(&k, b"v3".to_vec(), &principal(UNIVERSITY_B));
    service.revoke_credential(&k, &university).unwrap();
    let _ = service.revoke_credential(&k, &university);
    let _ = service.update_metadata(&k, b"v4".to_vec(), &university);

    let events = service.events_since(baseline);
    let names: Vec<&str> = events.iter().map(|e| e.event.name()).collect();
    assert_eq!(
        names,
        vec![
            "CredentialIssued",
            "CredentialMetadataUpdated",
            "CredentialRevoked"
        ]
    );
    assert_eq!(
        events[0].event,
        RegistryEvent::CredentialIssued {
            key: k,
            issuer: university,
            credential_type: Some("degree".into()),
        }
    );
}

#[tokio::test]
async fn test_live_feed_matches_journal() {
    let service = registry(Arc::new(AcceptAll));
    let mut rx = service.subscribe();
    let university = principal(UNIVERSITY_A);

    for content in ["a", "b", "c"] {
        service
            .issue_credential(key(content), None, vec![], vec![], &university)
            .unwrap();
    }
    service.revoke_credential(&key("b"), &university).unwrap();

    let journal = service.events_since(2);
    assert_eq!(journal.len(), 4);
    for expected in journal {
        assert_eq!(rx.recv().await.unwrap(), expected);
    }
}

#[test]
fn test_concurrent_issuance_is_totally_ordered() {
    let service = Arc::new(registry(Arc::new(AcceptAll)));
    let contended = key("contended");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = service.clone();
            thread::spawn(move || {
                let issuer = if i % 2 == 0 { UNIVERSITY_A } else { UNIVERSITY_B };
                let own = key(&format!("cred-{}", i));
                service
                    .issue_credential(own, None, vec![], vec![], &principal(issuer))
                    .unwrap();
                service
                    .issue_credential(contended, None, vec![i as u8], vec![], &principal(issuer))
                    .is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
    assert_eq!(service.store().len(), 9);

    let events = service.events_since(0);
    assert_eq!(events.len(), 2 + 9);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.sequence, i as u64 + 1);
    }
}

#[test]
fn test_snapshot_shape() {
    let service = registry(Arc::new(AcceptAll));
    let k = key("student1");
    service
        .issue_credential(k, Some("degree".into()), b"hi".to_vec(), vec![0x12, 0x34], &principal(UNIVERSITY_A))
        .unwrap();

    let json = serde_json::to_value(service.snapshot()).unwrap();
    assert_eq!(json["issuers"].as_array().unwrap().len(), 2);
    assert_eq!(json["last_event_sequence"], 3);

    let entry = &json["credentials"][0];
    assert_eq!(entry["key"], k.to_hex());
    assert_eq!(entry["issuer"], UNIVERSITY_A);
    assert_eq!(entry["credential_type"], "degree");
    assert_eq!(entry["metadata"], "6869");
    assert_eq!(entry["proof"], "1234");
    assert_eq!(entry["is_revoked"], false);
}

// =========================================================================
// Verifier strategies
// =========================================================================

#[test]
fn test_commitment_verifier_end_to_end() {
    let service = registry(Arc::new(CommitmentVerifier));
    let k = key("student1");
    let nonce: [u8; 32] = rand::random();

    service
        .issue_credential(
            k,
            None,
            vec![],
            CommitmentVerifier::commit(&k, &nonce),
            &principal(UNIVERSITY_A),
        )
        .unwrap();

    assert_eq!(service.verify_credential(&k, &nonce), Ok(true));
    assert_eq!(service.verify_credential(&k, &[0u8; 32]), Ok(false));
}

#[test]
fn test_ed25519_verifier_end_to_end() {
    let signing = SigningKey::generate(&mut rand::rngs::OsRng);
    let university = principal(UNIVERSITY_A);
    let verifier = Ed25519Verifier::new().with_issuer_key(university.clone(), signing.verifying_key());
    let service = registry(Arc::new(verifier));
    let k = key("student1");

    service
        .issue_credential(k, Some("degree".into()), b"v1".to_vec(), vec![], &university)
        .unwrap();

    let signature = sign_claim(&service, &signing, &k);
    assert_eq!(service.verify_credential(&k, &signature), Ok(true));

    // The signature covers key, issuer and type only, so it survives a
    // metadata update
    service
        .update_metadata(&k, b"v2".to_vec(), &university)
        .unwrap();
    assert_eq!(service.verify_credential(&k, &signature), Ok(true));

    // A different issuer's key never validates
    let forged = SigningKey::generate(&mut rand::rngs::OsRng);
    let forged_signature = sign_claim(&service, &forged, &k);
    assert_eq!(service.verify_credential(&k, &forged_signature), Ok(false));

    service.revoke_credential(&k, &university).unwrap();
    assert_eq!(
        service.verify_credential(&k, &signature),
        Err(RegistryError::Revoked(k))
    );
}

fn sign_claim(service: &RegistryService, signing: &SigningKey, k: &CredentialKey) -> Vec<u8> {
    let record = service.get_credential(k).unwrap();
    let claim = CredentialClaim::from_record(*k, &record);
    signing.sign(&claim.digest()).to_bytes().to_vec()
}
