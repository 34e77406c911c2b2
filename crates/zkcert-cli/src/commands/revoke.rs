//! `zkcert revoke`: Revoke a credential.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{KeyTarget, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct RevokeArgs {
    #[command(flatten)]
    pub target: KeyTarget,

    /// Calling principal; must be the credential's issuer.
    #[arg(short, long)]
    pub actor: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct RevokeRequest<'a> {
    actor: &'a str,
}

#[derive(Deserialize)]
struct EventRecord {
    sequence: u64,
}

pub async fn run(args: &RevokeArgs) -> anyhow::Result<()> {
    let key = args.target.resolve()?;
    let url = format!("{}/api/v1/credentials/{}/revoke", args.endpoint, key);

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&RevokeRequest { actor: &args.actor })
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let event: EventRecord = r.json().await?;
            println!("Credential revoked.");
            println!("  Key:    {}", key);
            println!("  Event:  #{}", event.sequence);
        }
        Ok(r) => super::fail("revocation", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
