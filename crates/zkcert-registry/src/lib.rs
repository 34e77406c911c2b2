//! ZkCert Registry: Issuer authorization, credential store, proof verifiers,
//! and the registry service that ties them together.

pub mod issuers;
pub mod service;
pub mod store;
pub mod verifier;

pub use issuers::IssuerRegistry;
pub use service::{RegistryService, RegistrySnapshot, SnapshotEntry};
pub use store::CredentialStore;
pub use verifier::{
    AcceptAll, CommitmentVerifier, CredentialClaim, Ed25519Verifier, ProofMatchVerifier,
    RejectAll, VerifierAdapter,
};
