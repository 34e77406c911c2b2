//! `zkcert key`: Derive a credential key from content.

use clap::Args;
use zkcert_core::CredentialKey;

#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Content to hash.
    pub content: String,
}

pub fn run(args: &KeyArgs) -> anyhow::Result<()> {
    let key = CredentialKey::from_content(args.content.as_bytes());
    println!("{}", key);
    Ok(())
}
