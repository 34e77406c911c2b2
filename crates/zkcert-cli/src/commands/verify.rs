//! `zkcert verify`: Verify a proof against a stored credential.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::{KeyTarget, DEFAULT_ENDPOINT};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub target: KeyTarget,

    /// Proof as hex.
    #[arg(short, long, default_value = "")]
    pub proof: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    proof: &'a str,
}

#[derive(Deserialize)]
struct VerifyResponse {
    valid: bool,
    verifier: String,
}

pub async fn run(args: &VerifyArgs) -> anyhow::Result<()> {
    let key = args.target.resolve()?;
    let url = format!("{}/api/v1/credentials/{}/verify", args.endpoint, key);

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&VerifyRequest { proof: &args.proof })
        .send()
        .await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: VerifyResponse = r.json().await?;
            if data.valid {
                println!("Proof VALID");
            } else {
                println!("Proof INVALID");
            }
            println!("  Key:       {}", key);
            println!("  Verifier:  {}", data.verifier);
        }
        Ok(r) => super::fail("verification", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
