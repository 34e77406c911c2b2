use std::fmt;

use crate::types::{CredentialKey, Principal};

/// Registry errors. Every variant is a business-rule violation: retrying the
/// same call against the same state fails identically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("not authorized to issue credentials: {0}")]
    Unauthorized(Principal),

    #[error("{actor} is not the issuer of credential {key}")]
    Forbidden {
        key: CredentialKey,
        actor: Principal,
    },

    #[error("credential already exists: {0}")]
    AlreadyExists(CredentialKey),

    #[error("credential does not exist: {0}")]
    NotFound(CredentialKey),

    #[error("credential already revoked: {0}")]
    AlreadyRevoked(CredentialKey),

    #[error("credential has been revoked: {0}")]
    Revoked(CredentialKey),

    #[error("{0} is not the registry administrator")]
    NotAdministrator(Principal),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Field-less discriminant of [`RegistryError`], for transports that map
/// error kinds onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    AlreadyExists,
    NotFound,
    AlreadyRevoked,
    Revoked,
    NotAdministrator,
    Validation,
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyRevoked(_) => ErrorKind::AlreadyRevoked,
            Self::Revoked(_) => ErrorKind::Revoked,
            Self::NotAdministrator(_) => ErrorKind::NotAdministrator,
            Self::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::AlreadyExists => "already_exists",
            Self::NotFound => "not_found",
            Self::AlreadyRevoked => "already_revoked",
            Self::Revoked => "revoked",
            Self::NotAdministrator => "not_administrator",
            Self::Validation => "validation",
        };
        f.write_str(name)
    }
}
