//! phishtour-history - song performance history service
//!
//! Resolves every performance of a phish.in song against the local show
//! cache (remote fallback), groups the shows by year, and prints the
//! date-sorted history.

use anyhow::Result;
use clap::Parser;
use phishtour_common::config::{resolve_database_path, TomlConfig};
use phishtour_common::db::init_database;
use phishtour_common::events::{EventBus, HistoryEvent};
use phishtour_history::history::types::HistoryByYear;
use phishtour_history::{HistoryService, PhishinClient};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "phishtour-history", version, about = "Song performance history aggregation")]
struct Args {
    /// phish.in song id or slug (e.g. "tweezer")
    song: String,

    /// Path to the SQLite database file
    #[arg(long)]
    database: Option<String>,

    /// Base URL of the phish.in API
    #[arg(long)]
    api_base: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting PhishTour history service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();

    let toml_config = TomlConfig::load();
    let db_path = resolve_database_path(args.database.as_deref(), &toml_config);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let client = match args.api_base.or(toml_config.api_base_url) {
        Some(base_url) => PhishinClient::with_base_url(base_url)?,
        None => PhishinClient::new()?,
    };

    let event_bus = EventBus::new(256);

    // Log progress events as they arrive
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let HistoryEvent::HistoryProgress { fraction, .. } = event {
                info!("History {:.0}% complete", fraction * 100.0);
            }
        }
    });

    // Ctrl-C cancels the in-flight aggregation
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Cancellation requested");
            signal_cancel.cancel();
        }
    });

    let service = HistoryService::new(pool, client, event_bus);

    match service.song_history(&args.song, &cancel).await {
        Ok((title, history)) => {
            render_history(&title, &history);
            Ok(())
        }
        Err(e) => {
            error!("History aggregation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Print the history, most recent years first
fn render_history(title: &str, history: &HistoryByYear) {
    println!("{}", title);

    if history.is_empty() {
        println!("  (never performed)");
        return;
    }

    for (year, shows) in history.iter().rev() {
        println!();
        println!("{} ({} performances)", year, shows.len());
        for show in shows {
            println!("  {:<20} {} - {}", show.date_label(), show.venue, show.city);
        }
    }
}
