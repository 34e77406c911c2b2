//! `zkcert show`: Show a stored credential.

use clap::Args;
use serde::Deserialize;

use super::{KeyTarget, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub target: KeyTarget,

    /// Print the raw JSON response.
    #[arg(long)]
    pub json: bool,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct CredentialResponse {
    key: String,
    state: String,
    record: CredentialRecord,
}

#[derive(Deserialize)]
struct CredentialRecord {
    issuer: String,
    credential_type: Option<String>,
    metadata: String,
    proof: String,
    is_revoked: bool,
    sequence: u64,
    issued_at: String,
}

pub async fn run(args: &ShowArgs) -> anyhow::Result<()> {
    let key = args.target.resolve()?;
    let url = format!("{}/api/v1/credentials/{}", args.endpoint, key);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            if args.json {
                let value: serde_json::Value = r.json().await?;
                println!("{}", serde_json::to_string_pretty(&value)?);
                return Ok(());
            }
            let data: CredentialResponse = r.json().await?;
            println!("Credential {}", data.key);
            println!("  State:      {}", data.state);
            println!("  Issuer:     {}", data.record.issuer);
            println!(
                "  Type:       {}",
                data.record.credential_type.as_deref().unwrap_or("-")
            );
            println!("  Metadata:   {}", super::display_bytes(&data.record.metadata));
            println!("  Proof:      0x{}", data.record.proof);
            println!("  Revoked:    {}", data.record.is_revoked);
            println!("  Sequence:   {}", data.record.sequence);
            println!("  Issued at:  {}", data.record.issued_at);
        }
        Ok(r) => super::fail("lookup", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
