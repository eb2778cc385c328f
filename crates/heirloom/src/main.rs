#![deny(unsafe_code)]

mod commands;
mod exit_code;
mod output;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use heirloom_core::{CatalogError, EncodeError, RunError, SettingsError, StoreError};

use crate::commands::signing_env::SecretsMissing;
use crate::commands::{acquire, catalog, completions, encode, signing_env};

/// Historical asset acquisition with provenance tracking
#[derive(Parser)]
#[command(name = "heirloom")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # Download every catalog asset into the current project
    heirloom acquire

    # Only maps, into another project root
    heirloom acquire --project-root ../game --asset-type map

    # Check that recorded downloads are still intact
    heirloom acquire --verify-only

    # Preflight the signing secrets before a CI build
    heirloom signing-env
")]
pub(crate) struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download catalog assets and record provenance
    Acquire(acquire::Args),

    /// List catalog entries
    Catalog(catalog::Args),

    /// Check which code-signing secrets are available
    SigningEnv(signing_env::Args),

    /// Base64-encode a file for a CI secret
    Encode(encode::Args),

    /// Generate shell completions
    Completions(completions::Args),
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => {
            let code = categorize_error(&e);

            let is_quiet = std::env::args().any(|a| a == "-q" || a == "--quiet");
            if !is_quiet {
                eprintln!("Error: {e:#}");
            }

            ExitCode::from(code)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        setup_tracing(cli.verbose);
    }

    match cli.command {
        Commands::Acquire(args) => acquire::execute(&args, cli.quiet),
        Commands::Catalog(args) => catalog::execute(&args),
        Commands::SigningEnv(args) => signing_env::execute(&args),
        Commands::Encode(args) => encode::execute(&args),
        Commands::Completions(args) => completions::execute(&args),
    }
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

/// Map an error to an exit code by downcasting along its chain.
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<SecretsMissing>().is_some() {
            return exit_code::SECRETS_MISSING;
        }

        if let Some(RunError::Store(store_err)) = cause.downcast_ref::<RunError>()
            && let Some(code) = categorize_store_error(store_err)
        {
            return code;
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>()
            && let Some(code) = categorize_store_error(store_err)
        {
            return code;
        }

        if let Some(catalog_err) = cause.downcast_ref::<CatalogError>() {
            return match catalog_err {
                CatalogError::Read { source, .. } => categorize_io(source),
                _ => exit_code::CONFIG_INVALID,
            };
        }

        if let Some(settings_err) = cause.downcast_ref::<SettingsError>() {
            return match settings_err {
                SettingsError::Read { source, .. } => categorize_io(source),
                SettingsError::Parse { .. } => exit_code::CONFIG_INVALID,
            };
        }

        if let Some(encode_err) = cause.downcast_ref::<EncodeError>() {
            return match encode_err {
                EncodeError::NotFound { .. } => exit_code::NOT_FOUND,
                EncodeError::Read { source, .. } => categorize_io(source),
            };
        }

        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return categorize_io(io_err);
        }
    }

    exit_code::GENERAL_ERROR
}

fn categorize_store_error(e: &StoreError) -> Option<u8> {
    match e {
        StoreError::Corrupt { .. } => Some(exit_code::STATE_CORRUPT),
        StoreError::Read { source, .. } => Some(categorize_io(source)),
        StoreError::Persist(_) => None,
    }
}

fn categorize_io(e: &io::Error) -> u8 {
    match e.kind() {
        io::ErrorKind::NotFound => exit_code::NOT_FOUND,
        io::ErrorKind::PermissionDenied => exit_code::PERMISSION_DENIED,
        _ => exit_code::GENERAL_ERROR,
    }
}
