use std::path::PathBuf;

use clap::Subcommand;
use serde_json::json;

use crate::catalog::{self, ImportReport};
use crate::cli::utils::output_success;
use crate::cli::{connect_store, OutputFormat};

#[derive(Subcommand)]
pub enum CatalogCommands {
    #[command(about = "Load the built-in exercise catalog")]
    Seed,

    #[command(about = "Import catalog exercises from a JSON file")]
    Import {
        #[arg(help = "Path to a JSON array of exercises")]
        file: PathBuf,
    },
}

pub async fn handle(cmd: CatalogCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let entries = match &cmd {
        CatalogCommands::Seed => catalog::builtin()?,
        CatalogCommands::Import { file } => catalog::load_file(file)?,
    };

    let (manager, store) = connect_store().await?;
    let report = catalog::import(&store, entries).await;
    manager.close().await;

    report_import(output_format, report?)
}

fn report_import(output_format: OutputFormat, report: ImportReport) -> anyhow::Result<()> {
    output_success(
        output_format,
        &format!(
            "Catalog updated: {} inserted, {} updated",
            report.inserted, report.updated
        ),
        Some(json!({
            "inserted": report.inserted,
            "updated": report.updated,
        })),
    )
}
