use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentcal_core::{Settings, SqliteStore, Syncer};
use rentcal_server::{AppState, app, jobs, singleton};

#[derive(Parser)]
#[command(name = "rentcal-server")]
#[command(about = "Serve the rentcal sync API and import calendar feeds on a schedule")]
struct Args {
    /// Config file (layered over ~/.config/rentcal/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rentcal_core=info,rentcal_server=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load(args.config.as_deref())?;

    // Ensure only one instance is running per database
    let _lock = singleton::acquire_lock(&settings.database_path)?;

    let store = SqliteStore::open(&settings.database_path).await?;
    let state = AppState::new(Syncer::from_settings(&settings, store)?);

    match settings.sync.interval()? {
        Some(interval) => {
            tracing::info!(?interval, "Periodic sync enabled");
            jobs::spawn_periodic_sync(state.shared_syncer(), interval);
        }
        None => tracing::info!("Periodic sync disabled"),
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        database = %settings.database_path.display(),
        "rentcal-server listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app(state)).await?;

    Ok(())
}
