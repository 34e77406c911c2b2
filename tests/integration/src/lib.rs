//! Shared fixtures for the ZkCert integration tests.

use std::sync::Arc;

use zkcert_core::{AuthorizationPolicy, CredentialKey, Principal, RegistryConfig};
use zkcert_registry::{RegistryService, VerifierAdapter};

pub const ADMIN: &str = "0xowner";
pub const UNIVERSITY_A: &str = "0x1234567890123456789012345678901234567890";
pub const UNIVERSITY_B: &str = "0x0987654321098765432109876543210987654321";
pub const OUTSIDER: &str = "0xdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef";

/// Build a principal from a fixture constant.
pub fn principal(identity: &str) -> Principal {
    Principal::new(identity).expect("fixture principal is non-empty")
}

/// `H(content)` as used by the registry for credential keys.
pub fn key(content: &str) -> CredentialKey {
    CredentialKey::from_content(content.as_bytes())
}

/// A registry administered by [`ADMIN`] with both universities authorized.
pub fn registry(verifier: Arc<dyn VerifierAdapter>) -> RegistryService {
    registry_with_policy(verifier, AuthorizationPolicy::RecordIssuer)
}

pub fn registry_with_policy(
    verifier: Arc<dyn VerifierAdapter>,
    authorization_policy: AuthorizationPolicy,
) -> RegistryService {
    let config = RegistryConfig {
        administrator: ADMIN.into(),
        initial_issuers: vec![UNIVERSITY_A.into(), UNIVERSITY_B.into()],
        authorization_policy,
        ..Default::default()
    };
    RegistryService::new(&config, verifier).expect("fixture config is valid")
}
