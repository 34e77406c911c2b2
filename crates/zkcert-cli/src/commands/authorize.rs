//! `zkcert authorize` / `zkcert deauthorize`: Change the issuer set.

use clap::Args;
use serde::{Deserialize, Serialize};

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct AuthorizeArgs {
    /// Issuer identity.
    pub identity: String,

    /// Calling principal; must be the registry administrator.
    #[arg(short, long, default_value = "admin")]
    pub actor: String,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Serialize)]
struct IssuerChangeRequest<'a> {
    identity: &'a str,
    actor: &'a str,
}

#[derive(Deserialize)]
struct IssuerChangeResponse {
    identity: String,
    event: Option<serde_json::Value>,
}

pub async fn run(args: &AuthorizeArgs, authorize: bool) -> anyhow::Result<()> {
    let (path, action) = if authorize {
        ("authorize", "authorization")
    } else {
        ("deauthorize", "deauthorization")
    };
    let url = format!("{}/api/v1/issuers/{}", args.endpoint, path);
    let body = IssuerChangeRequest {
        identity: &args.identity,
        actor: &args.actor,
    };

    let client = reqwest::Client::new();
    let resp = client.post(&url).json(&body).send().await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: IssuerChangeResponse = r.json().await?;
            let verb = if authorize { "authorized" } else { "deauthorized" };
            match data.event.as_ref().and_then(|e| e.get("sequence")) {
                Some(sequence) => {
                    println!("Issuer {}: {}", verb, data.identity);
                    println!("  Event:  #{}", sequence);
                }
                None => println!("Issuer already {}: {} (no change)", verb, data.identity),
            }
        }
        Ok(r) => super::fail(action, r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
