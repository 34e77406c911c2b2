//! Node configuration loading and management.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use zkcert_core::RegistryConfig;
use zkcert_registry::{
    AcceptAll, CommitmentVerifier, Ed25519Verifier, ProofMatchVerifier, RejectAll,
    VerifierAdapter,
};

/// Full configuration for the ZkCert node.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ZkcertConfig {
    /// API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registry settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Proof verifier settings.
    #[serde(default)]
    pub verifier: VerifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Which verifier the registry consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerifierKind {
    #[default]
    ProofMatch,
    AcceptAll,
    RejectAll,
    Commitment,
    Ed25519,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerifierConfig {
    /// Verifier implementation.
    #[serde(default)]
    pub kind: VerifierKind,
    /// Issuer principal → hex Ed25519 public key (`ed25519` only).
    #[serde(default)]
    pub issuer_keys: BTreeMap<String, String>,
}

// Default value functions
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    9101
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl VerifierConfig {
    /// Instantiate the configured verifier.
    pub fn build(&self) -> anyhow::Result<Arc<dyn VerifierAdapter>> {
        let verifier: Arc<dyn VerifierAdapter> = match self.kind {
            VerifierKind::ProofMatch => Arc::new(ProofMatchVerifier),
            VerifierKind::AcceptAll => Arc::new(AcceptAll),
            VerifierKind::RejectAll => Arc::new(RejectAll),
            VerifierKind::Commitment => Arc::new(CommitmentVerifier),
            VerifierKind::Ed25519 => Arc::new(
                Ed25519Verifier::from_hex_keys(&self.issuer_keys)
                    .context("invalid [verifier.issuer_keys]")?,
            ),
        };
        if self.kind != VerifierKind::Ed25519 && !self.issuer_keys.is_empty() {
            tracing::warn!(kind = ?self.kind, "issuer_keys ignored by this verifier");
        }
        Ok(verifier)
    }
}

impl ZkcertConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: ZkcertConfig = toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// The `host:port` the API binds to.
    pub fn api_bind_addr(&self) -> String {
        format!("{}:{}", self.api.listen_addr, self.api.port)
    }
}
