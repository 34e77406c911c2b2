//! `zkcert issue`: Issue a credential.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{KeyTarget, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct IssueArgs {
    #[command(flatten)]
    pub target: KeyTarget,

    /// Credential type label (e.g. "degree").
    #[arg(short = 't', long)]
    pub credential_type: Option<String>,

    /// Metadata as text, or `0x`-prefixed hex.
    #[arg(short, long, default_value = "")]
    pub metadata: String,

    /// Issuance proof as hex.
    #[arg(short, long, default_value = "")]
    pub proof: String,

    /// Calling principal; must be an authorized issuer.
    #[arg(short, long)]
    pub actor: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct IssueRequest<'a> {
    key: String,
    credential_type: Option<&'a str>,
    metadata: String,
    proof: &'a str,
    actor: &'a str,
}

#[derive(Deserialize)]
struct EventRecord {
    sequence: u64,
    id: String,
}

pub async fn run(args: &IssueArgs) -> anyhow::Result<()> {
    let key = args.target.resolve()?;
    let url = format!("{}/api/v1/credentials/issue", args.endpoint);
    let body = IssueRequest {
        key: key.to_hex(),
        credential_type: args.credential_type.as_deref(),
        metadata: super::metadata_hex(&args.metadata)?,
        proof: &args.proof,
        actor: &args.actor,
    };

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let event: EventRecord = r.json().await?;
            println!("Credential issued!");
            println!("  Key:     {}", key);
            println!("  Issuer:  {}", args.actor);
            if let Some(ref t) = args.credential_type {
                println!("  Type:    {}", t);
            }
            println!("  Event:   #{} ({})", event.sequence, event.id);
        }
        Ok(r) => super::fail("issuance", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
