//! Acquire command - download catalog assets and record their provenance.
//!
//! # Examples
//!
//! ```bash
//! # Download everything into the current project
//! heirloom acquire
//!
//! # Only portraits, into another project
//! heirloom acquire --project-root ../game --asset-type portrait
//!
//! # Check recorded files without downloading
//! heirloom acquire --verify-only --rehash
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use heirloom_core::verify::verify;
use heirloom_core::{
    AcquireEvent, AcquisitionEngine, HttpFetcher, ProjectLayout, ProvenanceStore, Settings,
    VerifyOptions, run_acquisition,
};

use crate::commands::load_catalog;
use crate::output::separator;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Project root directory
    #[arg(long, env = "HEIRLOOM_PROJECT_ROOT", default_value = ".")]
    pub project_root: PathBuf,

    /// Download only assets of this type (exact match)
    #[arg(long, value_name = "TYPE")]
    pub asset_type: Option<String>,

    /// Catalog file to use instead of the bundled one
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Only verify previously downloaded assets
    #[arg(long)]
    pub verify_only: bool,

    /// Also compare file hashes during verification
    #[arg(long, requires = "verify_only")]
    pub rehash: bool,
}

#[instrument(level = "info", name = "cmd::acquire", skip_all, fields(root = %args.project_root.display()))]
pub fn execute(args: &Args, quiet: bool) -> Result<()> {
    let root = &args.project_root;
    let settings = Settings::load(root)?;
    let layout = ProjectLayout::new(root, &settings.paths);

    if args.verify_only {
        return execute_verify(&layout, args.rehash);
    }

    let catalog_path = args
        .catalog
        .clone()
        .or_else(|| settings.paths.catalog.as_ref().map(|p| layout.resolve(p)));
    let mut catalog = load_catalog(catalog_path.as_deref())?;
    if let Some(ref asset_type) = args.asset_type {
        catalog = catalog.filter_by_type(asset_type);
        if catalog.is_empty() {
            tracing::warn!("No assets of type '{}' in catalog", asset_type);
        }
    }

    let fetcher = HttpFetcher::new(settings.timeout(), settings.acquire.user_agent.clone());
    let mut engine = AcquisitionEngine::new(fetcher, layout).with_throttle(settings.throttle());

    if !quiet {
        engine = engine.with_progress(Arc::new(print_progress));
        println!("Starting historical asset download...");
        println!("Target directory: {}", root.join("assets").display());
        println!("Total assets: {}", catalog.len());
        println!("{}", separator());
    }

    let outcome = run_acquisition(&engine, &catalog).context("Acquisition run aborted")?;

    print!(
        "{}",
        outcome
            .report
            .render_summary(&outcome.report_path, &outcome.store_path)
    );
    Ok(())
}

fn execute_verify(layout: &ProjectLayout, rehash: bool) -> Result<()> {
    let store = ProvenanceStore::load(layout.provenance_path())?;

    println!("Verifying asset integrity...");
    let report = verify(&store, layout.root(), &VerifyOptions { rehash });
    print!("{}", report.render());

    Ok(())
}

fn print_progress(event: &AcquireEvent<'_>) {
    match event {
        AcquireEvent::Started { asset } => println!("Downloading {}...", asset.name),
        AcquireEvent::AlreadyPresent { asset, .. } => {
            println!("  Already exists: {}", asset.target_path);
        }
        AcquireEvent::Downloaded { asset, .. } => println!("  Downloaded: {}", asset.target_path),
        AcquireEvent::Failed { asset, error } => {
            println!("  Error downloading {}: {}", asset.name, error);
        }
    }
}
