mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rentcal_core::{BookingSource, Settings, SqliteStore, Syncer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rentcal")]
#[command(about = "Import bookings from your rental platforms' calendar feeds")]
struct Cli {
    /// Extra config file layered over the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented default config file
    Init,
    /// Manage registered properties
    Property {
        #[command(subcommand)]
        command: PropertyCommand,
    },
    /// Import bookings from a property's feeds
    Sync {
        /// Property to sync
        property: Option<String>,

        /// Sync every registered property
        #[arg(long, conflicts_with = "property")]
        all: bool,

        /// Print the sync report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List imported bookings for a property
    Bookings { property: String },
    /// Parse a local .ics file and show how each event is classified
    Parse {
        file: PathBuf,

        /// Platform the feed came from (airbnb, vrbo, direct, other)
        #[arg(short, long, default_value = "other")]
        source: BookingSource,
    },
}

#[derive(Subcommand)]
pub enum PropertyCommand {
    /// Create or update a property
    Set {
        id: String,

        #[arg(long)]
        name: Option<String>,

        /// Airbnb iCal export URL ("" clears it)
        #[arg(long)]
        airbnb_url: Option<String>,

        /// VRBO iCal export URL ("" clears it)
        #[arg(long)]
        vrbo_url: Option<String>,

        /// Any other iCal feed URL ("" clears it)
        #[arg(long)]
        other_url: Option<String>,
    },
    List,
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => commands::init::run(cli.config.as_deref()),
        Commands::Parse { file, source } => {
            let settings = Settings::load(cli.config.as_deref())?;
            commands::parse::run(&file, source, &settings)
        }
        Commands::Property { command } => {
            let store = open_store(cli.config.as_deref()).await?.1;
            commands::property::run(&store, command).await
        }
        Commands::Sync {
            property,
            all,
            json,
        } => {
            let (settings, store) = open_store(cli.config.as_deref()).await?;
            let syncer = Syncer::from_settings(&settings, store)?;
            match (property, all) {
                (Some(id), false) => commands::sync::run(&syncer, &id, json).await,
                (None, true) => commands::sync::run_all(&syncer, json).await,
                _ => anyhow::bail!("Pass a property id, or --all to sync every property"),
            }
        }
        Commands::Bookings { property } => {
            let store = open_store(cli.config.as_deref()).await?.1;
            commands::bookings::run(&store, &property).await
        }
    }
}

async fn open_store(config: Option<&std::path::Path>) -> Result<(Settings, SqliteStore)> {
    let settings = Settings::load(config)?;
    let store = SqliteStore::open(&settings.database_path).await?;
    Ok((settings, store))
}
