//! `zkcert events`: List registry events.

use clap::Args;
use serde::Deserialize;

use super::DEFAULT_ENDPOINT;

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Only show events with a sequence greater than this.
    #[arg(short, long, default_value_t = 0)]
    pub since: u64,

    /// API endpoint of the node.
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

#[derive(Deserialize)]
struct EventsResponse {
    events: Vec<EventRecord>,
}

#[derive(Deserialize)]
struct EventRecord {
    sequence: u64,
    recorded_at: String,
    event: serde_json::Value,
}

pub async fn run(args: &EventsArgs) -> anyhow::Result<()> {
    let url = format!("{}/api/v1/events?since={}", args.endpoint, args.since);
    let resp = reqwest::get(&url).await;

    match resp {
        Ok(r) if r.status().is_success() => {
            let data: EventsResponse = r.json().await?;
            if data.events.is_empty() {
                println!("No events.");
            }
            for record in &data.events {
                println!("#{:<5} {}  {}", record.sequence, record.recorded_at, summarize(&record.event));
            }
        }
        Ok(r) => super::fail("event listing", r).await?,
        Err(e) => super::unreachable(&args.endpoint, &e),
    }

    Ok(())
}

/// One-line rendering of an event body: its type tag followed by its fields.
fn summarize(event: &serde_json::Value) -> String {
    let kind = event.get("type").and_then(|t| t.as_str()).unwrap_or("unknown");
    let fields: Vec<String> = event
        .as_object()
        .map(|obj| {
            obj.iter()
                .filter(|(name, value)| *name != "type" && !value.is_null())
                .map(|(name, value)| match value.as_str() {
                    Some(s) => format!("{}={}", name, s),
                    None => format!("{}={}", name, value),
                })
                .collect()
        })
        .unwrap_or_default();
    format!("{} {}", kind, fields.join(" "))
}
