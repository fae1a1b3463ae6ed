pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::config;
use crate::database::{DatabaseManager, PgStore};

#[derive(Parser)]
#[command(name = "coach")]
#[command(about = "FitCoach administration - catalog, trainer accounts and migrations")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Shared exercise catalog")]
    Catalog {
        #[command(subcommand)]
        cmd: commands::catalog::CatalogCommands,
    },

    #[command(about = "Trainer account management")]
    Trainer {
        #[command(subcommand)]
        cmd: commands::trainer::TrainerCommands,
    },

    #[command(about = "Apply pending database migrations")]
    Migrate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Catalog { cmd } => commands::catalog::handle(cmd, output_format).await,
        Commands::Trainer { cmd } => commands::trainer::handle(cmd, output_format).await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
    }
}

/// Administrative commands always talk to Postgres
pub(crate) async fn connect_store() -> anyhow::Result<(DatabaseManager, PgStore)> {
    let manager = DatabaseManager::connect(&config().database).await?;
    let store = PgStore::new(manager.pool().clone());
    Ok((manager, store))
}
