//! `zkcert update`: Replace a credential's metadata.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{KeyTarget, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: KeyTarget,

    /// New metadata as text, or `0x`-prefixed hex.
    #[arg(short, long)]
    pub metadata: String,

    /// Calling principal; must be the credential's issuer.
    #[arg(short, long)]
    pub actor: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct UpdateMetadataRequest<'a> {
    metadata: String,
    actor: &'a str,
}

#[derive(Deserialize)]
struct EventRecord {
    sequence: u64,
}

pub async fn run(args: &UpdateArgs) -> anyhow::Result<()> {
    let key = args.target.resolve()?;
    let url = format!("{}/api/v1/credentials/{}/metadata", args.endpoint, key);
    let body = UpdateMetadataRequest {
        metadata: super::metadata_hex(&args.metadata)?,
        actor: &args.actor,
    };

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let event: EventRecord = r.json().await?;
            println!("Metadata updated.");
            println!("  Key:    {}", key);
            println!("  Event:  #{}", event.sequence);
        }
        Ok(r) => super::fail("metadata update", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
