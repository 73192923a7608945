//! sigcat: inspect and edit catalog models from the command line.
//!
//! Usage:
//!   sigcat --db catalog.db --model m1 import vss.json
//!   sigcat --model m1 create Vehicle.Wishlist --kind actuator --datatype boolean
//!   sigcat --model m1 flatten --origin custom

use anyhow::{Context, Result};
use clap::Parser;
use sigcat_cli::{run, Command};
use sigcat_engine::EngineConfig;
use sigcat_storage::SqliteStore;
use std::{fs, path::PathBuf, sync::Arc};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "sigcat")]
#[command(about = "Query and edit signal catalogs and their custom overlays")]
struct Cli {
    /// SQLite database holding the models
    #[arg(long, default_value = "sigcat.db")]
    db: PathBuf,

    /// Model to operate on
    #[arg(short, long, default_value = "default")]
    model: String,

    /// Engine configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            EngineConfig::from_json(&text).context("invalid engine config")?
        }
        None => EngineConfig::default(),
    };
    debug!("engine config: {config:?}");

    let store = Arc::new(SqliteStore::open(&cli.db).context("failed to open database")?);
    let output = run(store, &cli.model, config, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
