pub mod authorize;
pub mod events;
pub mod issue;
pub mod issuers;
pub mod key;
pub mod revoke;
pub mod show;
pub mod snapshot;
pub mod status;
pub mod update;
pub mod verify;

use clap::Args;
use serde::Deserialize;
use zkcert_core::CredentialKey;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9101";

/// Identifies a credential either by its hex key or by the content it hashes.
#[derive(Args, Debug)]
pub struct KeyTarget {
    /// Credential key (64 hex characters).
    #[arg(short, long, conflicts_with = "content", required_unless_present = "content")]
    pub key: Option<String>,

    /// Content whose BLAKE3 digest is the credential key.
    #[arg(long)]
    pub content: Option<String>,
}

impl KeyTarget {
    pub fn resolve(&self) -> anyhow::Result<CredentialKey> {
        match (&self.key, &self.content) {
            (Some(key), _) => Ok(key.parse()?),
            (None, Some(content)) => Ok(CredentialKey::from_content(content.as_bytes())),
            (None, None) => anyhow::bail!("either --key or --content is required"),
        }
    }
}

#[derive(Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// Turn a non-success response into an error.
pub async fn fail(action: &str, r: reqwest::Response) -> anyhow::Result<()> {
    let status = r.status();
    if let Ok(err) = r.json::<ErrorResponse>().await {
        anyhow::bail!("{} failed (HTTP {}, {}): {}", action, status, err.kind, err.error);
    } else {
        anyhow::bail!("{} failed (HTTP {})", action, status);
    }
}

pub fn unreachable(endpoint: &str, e: &reqwest::Error) {
    println!("Could not reach node at {}", endpoint);
    println!("  Error: {}", e);
    println!();
    println!("Is the node running? Start it with: zkcert-node");
}

/// Encode a metadata argument, given either as text or as `0x`-prefixed hex.
pub fn metadata_hex(raw: &str) -> anyhow::Result<String> {
    match raw.strip_prefix("0x") {
        Some(h) => {
            hex::decode(h).map_err(|e| anyhow::anyhow!("invalid metadata hex: {}", e))?;
            Ok(h.to_string())
        }
        None => Ok(hex::encode(raw.as_bytes())),
    }
}

/// Show a metadata payload as text when it is printable UTF-8.
pub fn display_bytes(hex_str: &str) -> String {
    match hex::decode(hex_str).ok().and_then(|b| String::from_utf8(b).ok()) {
        Some(text) if !text.chars().any(char::is_control) => format!("{:?}", text),
        _ => format!("0x{}", hex_str),
    }
}
