//! Signing-env command - preflight check for mobile code-signing secrets.
//!
//! Exits non-zero when a required secret is missing so it can gate CI jobs.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use heirloom_core::SigningCheck;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Output as JSON (variable names only, never values)
    #[arg(long)]
    pub json: bool,
}

/// Required secrets that could not be resolved.
#[derive(Debug, thiserror::Error)]
#[error("Missing required signing secrets: {}", .0.join(", "))]
pub struct SecretsMissing(pub Vec<&'static str>);

#[instrument(level = "info", name = "cmd::signing_env", skip_all)]
pub fn execute(args: &Args) -> Result<()> {
    let check = SigningCheck::from_env();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        print!("{}", check.render());
    }

    if !check.is_complete() {
        return Err(SecretsMissing(check.required.missing).into());
    }
    Ok(())
}
