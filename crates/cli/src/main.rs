mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use photolink_core::LinkOptions;
use tracing_subscriber::EnvFilter;

/// photolink: link photos to a metadata table and geocode their locations
#[derive(Parser)]
#[command(name = "photolink", version, about)]
struct Cli {
    /// TOML file with alias and preview settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match image files against a metadata CSV and print the catalogue
    Link {
        /// Metadata table (CSV, first row is the header)
        #[arg(long)]
        csv: PathBuf,
        /// Image files or directories to scan
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Where converted TIFF previews are written
        #[arg(long)]
        preview_dir: Option<PathBuf>,
        /// Print the catalogue as JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Only show entries whose text contains this (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },
    /// Print the parsed rows of a metadata CSV
    Rows {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Resolve a place name with the built-in gazetteer
    Geocode {
        /// Free-text location, e.g. "г. Алматы"
        location: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PHOTOLINK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => LinkOptions::load(path)?,
        None => LinkOptions::default(),
    };

    match cli.command {
        Commands::Link {
            csv,
            inputs,
            preview_dir,
            json,
            search,
        } => {
            if let Some(dir) = preview_dir {
                options.preview_dir = dir;
            }
            commands::link::run(&csv, &inputs, options, json, search.as_deref()).await?
        }
        Commands::Rows { csv } => commands::rows::run(&csv)?,
        Commands::Geocode { location } => commands::geocode::run(&location)?,
    }

    Ok(())
}
