//! ZkCert CLI: Command-line client for the credential registry.
//!
//! Subcommands: key, status, issuers, authorize, deauthorize, issue, show,
//! update, revoke, verify, events, snapshot.

mod commands;

use clap::{Parser, Subcommand};

/// ZkCert: Credential registry client.
#[derive(Parser, Debug)]
#[command(name = "zkcert", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive a credential key from content (offline).
    Key(commands::key::KeyArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// List authorized issuers.
    Issuers(commands::issuers::IssuersArgs),
    /// Authorize an issuer (administrator only).
    Authorize(commands::authorize::AuthorizeArgs),
    /// Deauthorize an issuer (administrator only).
    Deauthorize(commands::authorize::AuthorizeArgs),
    /// Issue a credential.
    Issue(commands::issue::IssueArgs),
    /// Show a stored credential.
    Show(commands::show::ShowArgs),
    /// Replace a credential's metadata.
    Update(commands::update::UpdateArgs),
    /// Revoke a credential.
    Revoke(commands::revoke::RevokeArgs),
    /// Verify a proof against a credential.
    Verify(commands::verify::VerifyArgs),
    /// List registry events.
    Events(commands::events::EventsArgs),
    /// Dump the full registry state as JSON.
    Snapshot(commands::snapshot::SnapshotArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Key(args) => commands::key::run(args),
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Issuers(args) => commands::issuers::run(args).await,
        Commands::Authorize(args) => commands::authorize::run(args, true).await,
        Commands::Deauthorize(args) => commands::authorize::run(args, false).await,
        Commands::Issue(args) => commands::issue::run(args).await,
        Commands::Show(args) => commands::show::run(args).await,
        Commands::Update(args) => commands::update::run(args).await,
        Commands::Revoke(args) => commands::revoke::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Events(args) => commands::events::run(args).await,
        Commands::Snapshot(args) => commands::snapshot::run(args).await,
    }
}
