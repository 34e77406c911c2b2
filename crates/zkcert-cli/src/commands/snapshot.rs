//! `zkcert snapshot`: Dump the full registry state.

use clap::Args;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Write the snapshot to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

pub async fn run(args: &SnapshotArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/snapshot", args.endpoint);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let value: serde_json::Value = r.json().await?;
            let pretty = serde_json::to_string_pretty(&value)?;
            match &args.output {
                Some(path) => {
                    std::fs::write(path, pretty)?;
                    println!("Snapshot written to {}", path.display());
                }
                None => println!("{}", pretty),
            }
        }
        Ok(r) => super::fail("snapshot", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}
