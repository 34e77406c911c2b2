//! Integration test: issuer set administration and authorization policies.

use std::sync::Arc;

use zkcert_core::{AuthorizationPolicy, RegistryError, RegistryEvent};
use zkcert_integration_tests::{
    key, principal, registry, registry_with_policy, ADMIN, OUTSIDER, UNIVERSITY_A, UNIVERSITY_B,
};
use zkcert_registry::AcceptAll;

// =========================================================================
// Issuer set
// =========================================================================

#[test]
fn test_bootstrap_authorizes_initial_issuers() {
    let service = registry(Arc::new(AcceptAll));
    assert!(service.is_authorized_issuer(&principal(UNIVERSITY_A)));
    assert!(service.is_authorized_issuer(&principal(UNIVERSITY_B)));
    assert!(!service.is_authorized_issuer(&principal(OUTSIDER)));

    let events = service.events_since(0);
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .all(|e| matches!(e.event, RegistryEvent::IssuerAuthorized { .. })));
}

#[test]
fn test_authorize_is_idempotent() {
    let service = registry(Arc::new(AcceptAll));
    let admin = principal(ADMIN);

    let first = service
        .authorize_issuer(principal(OUTSIDER), &admin)
        .unwrap();
    assert!(first.is_some());
    let second = service
        .authorize_issuer(principal(OUTSIDER), &admin)
        .unwrap();
    assert!(second.is_none());

    assert_eq!(service.issuers().len(), 3);
    assert_eq!(service.event_count(), 3);
}

#[test]
fn test_only_administrator_changes_issuer_set() {
    let service = registry(Arc::new(AcceptAll));
    let university = principal(UNIVERSITY_A);

    assert_eq!(
        service.authorize_issuer(principal(OUTSIDER), &university),
        Err(RegistryError::NotAdministrator(university.clone()))
    );
    assert_eq!(
        service.deauthorize_issuer(&principal(UNIVERSITY_B), &university),
        Err(RegistryError::NotAdministrator(university))
    );
    assert!(!service.is_authorized_issuer(&principal(OUTSIDER)));
    assert!(service.is_authorized_issuer(&principal(UNIVERSITY_B)));
}

#[test]
fn test_newly_authorized_issuer_can_issue() {
    let service = registry(Arc::new(AcceptAll));
    let newcomer = principal(OUTSIDER);

    assert!(service
        .issue_credential(key("x"), None, vec![], vec![], &newcomer)
        .is_err());
    service
        .authorize_issuer(newcomer.clone(), &principal(ADMIN))
        .unwrap();
    service
        .issue_credential(key("x"), None, vec![], vec![], &newcomer)
        .unwrap();
    assert_eq!(service.get_credential(&key("x")).unwrap().issuer, newcomer);
}

#[test]
fn test_deauthorized_issuer_cannot_issue() {
    let service = registry(Arc::new(AcceptAll));
    let university = principal(UNIVERSITY_A);

    let event = service
        .deauthorize_issuer(&university, &principal(ADMIN))
        .unwrap()
        .expect("set changed");
    assert_eq!(
        event.event,
        RegistryEvent::IssuerDeauthorized {
            issuer: university.clone()
        }
    );
    assert_eq!(
        service.issue_credential(key("x"), None, vec![], vec![], &university),
        Err(RegistryError::Unauthorized(university))
    );
}

// =========================================================================
// Policies for records created before de-authorization
// =========================================================================

#[test]
fn test_record_issuer_policy_keeps_existing_rights() {
    let service = registry_with_policy(Arc::new(AcceptAll), AuthorizationPolicy::RecordIssuer);
    let university = principal(UNIVERSITY_A);
    let k = key("student1");

    service
        .issue_credential(k, None, b"m".to_vec(), vec![], &university)
        .unwrap();
    service
        .deauthorize_issuer(&university, &principal(ADMIN))
        .unwrap();

    service
        .update_metadata(&k, b"corrected".to_vec(), &university)
        .expect("record issuer may still update");
    service
        .revoke_credential(&k, &university)
        .expect("record issuer may still revoke");
}

#[test]
fn test_recheck_registry_policy_blocks_deauthorized_issuer() {
    let service =
        registry_with_policy(Arc::new(AcceptAll), AuthorizationPolicy::RecheckRegistry);
    let university = principal(UNIVERSITY_A);
    let k = key("student1");

    service
        .issue_credential(k, None, b"m".to_vec(), vec![], &university)
        .unwrap();
    service
        .deauthorize_issuer(&university, &principal(ADMIN))
        .unwrap();

    assert_eq!(
        service.update_metadata(&k, b"corrected".to_vec(), &university),
        Err(RegistryError::Unauthorized(university.clone()))
    );
    assert_eq!(
        service.revoke_credential(&k, &university),
        Err(RegistryError::Unauthorized(university.clone()))
    );

    // Re-authorization restores the rights
    service
        .authorize_issuer(university.clone(), &principal(ADMIN))
        .unwrap();
    service.revoke_credential(&k, &university).unwrap();
}

#[test]
fn test_recheck_registry_still_reports_forbidden_first() {
    let service =
        registry_with_policy(Arc::new(AcceptAll), AuthorizationPolicy::RecheckRegistry);
    let k = key("student1");
    service
        .issue_credential(k, None, vec![], vec![], &principal(UNIVERSITY_A))
        .unwrap();

    let outsider = principal(OUTSIDER);
    assert_eq!(
        service.revoke_credential(&k, &outsider),
        Err(RegistryError::Forbidden {
            key: k,
            actor: outsider
        })
    );
}
