//! Catalog command - list the assets a run would acquire.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::commands::load_catalog;
use crate::output::create_table;

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Only list assets of this type
    #[arg(long, value_name = "TYPE")]
    pub asset_type: Option<String>,

    /// Catalog file to use instead of the bundled one
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[instrument(level = "info", name = "cmd::catalog", skip_all)]
pub fn execute(args: &Args) -> Result<()> {
    let mut catalog = load_catalog(args.catalog.as_deref())?;
    if let Some(ref asset_type) = args.asset_type {
        catalog = catalog.filter_by_type(asset_type);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog.assets())?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Id", "Type", "Name", "Target", "Source"]);
    for asset in &catalog {
        table.add_row(vec![
            asset.id.as_str(),
            asset.asset_type.as_str(),
            asset.name.as_str(),
            asset.target_path.as_str(),
            asset.source_org.as_str(),
        ]);
    }
    println!("{table}");
    println!("{} assets", catalog.len());

    Ok(())
}
