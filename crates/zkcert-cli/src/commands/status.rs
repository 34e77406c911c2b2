//! `zkcert status`: Query the status of a running registry node.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct StatusResponse {
    version: String,
    administrator: String,
    verifier: String,
    authorization_policy: String,
    issuer_count: usize,
    credential_count: usize,
    event_count: u64,
    uptime_secs: u64,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/status", args.endpoint);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let status: StatusResponse = r.json().await?;
            println!("Node Status:");
            println!("  Version:        {}", status.version);
            println!("  Administrator:  {}", status.administrator);
            println!("  Verifier:       {}", status.verifier);
            println!("  Policy:         {}", status.authorization_policy);
            println!("  Issuers:        {}", status.issuer_count);
            println!("  Credentials:    {}", status.credential_count);
            println!("  Events:         {}", status.event_count);
            println!("  Uptime:         {}s", status.uptime_secs);
        }
        Ok(r) => {
            anyhow::bail!("node returned HTTP {}", r.status());
        }
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
