//! Encode command - base64 a signing file for a CI secret store.
//!
//! # Examples
//!
//! ```bash
//! heirloom encode dist.p12
//! heirloom encode profile.mobileprovision --env-var IOS_PROFILE_BASE64 --out profile.env
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use heirloom_core::encode::{encode_file, wrap_env_var};

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Certificate, provisioning profile, or API key file
    pub file: PathBuf,

    /// Emit NAME=<base64> instead of the bare value
    #[arg(long, value_name = "NAME")]
    pub env_var: Option<String>,

    /// Write to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[instrument(level = "info", name = "cmd::encode", skip_all, fields(file = %args.file.display()))]
pub fn execute(args: &Args) -> Result<()> {
    let mut encoded = encode_file(&args.file)?;
    if let Some(ref name) = args.env_var {
        encoded = wrap_env_var(name, &encoded);
    }

    match args.out {
        Some(ref dest) => {
            std::fs::write(dest, &encoded)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            println!("Wrote base64 output to {}", dest.display());
        }
        None => println!("{encoded}"),
    }
    Ok(())
}
