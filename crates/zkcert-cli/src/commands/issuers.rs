//! `zkcert issuers`: List authorized issuers.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct IssuersArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct IssuersResponse {
    issuers: Vec<String>,
    count: usize,
}

pub async fn run(args: &IssuersArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/issuers", args.endpoint);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: IssuersResponse = r.json().await?;
            if data.count == 0 {
                println!("No authorized issuers.");
            } else {
                println!("Authorized issuers ({}):", data.count);
                for issuer in &data.issuers {
                    println!("  {}", issuer);
                }
            }
        }
        Ok(r) => super::fail("listing issuers", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
