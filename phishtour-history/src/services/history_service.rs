//! Song history orchestration
//!
//! Wires the phish.in client, the SQLite show cache, and the progress
//! sink together, and broadcasts lifecycle events for whoever listens.

use crate::history::aggregator::HistoryAggregator;
use crate::history::progress::EventProgress;
use crate::history::types::HistoryByYear;
use crate::services::phishin_client::PhishinClient;
use crate::services::show_store::{CachingFetcher, SqliteShowCache};
use phishtour_common::events::{EventBus, HistoryEvent};
use phishtour_common::{Error, Result};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Orchestrates one song-history aggregation end to end
pub struct HistoryService {
    db: SqlitePool,
    client: PhishinClient,
    event_bus: EventBus,
}

impl HistoryService {
    pub fn new(db: SqlitePool, client: PhishinClient, event_bus: EventBus) -> Self {
        Self {
            db,
            client,
            event_bus,
        }
    }

    /// Aggregate the full performance history of a song (id or slug).
    ///
    /// Returns the song title and its year-grouped history. Failures are
    /// all-or-nothing; a `HistoryFailed` event accompanies any error that
    /// occurs after the track list was obtained.
    pub async fn song_history(
        &self,
        song: &str,
        cancel: &CancellationToken,
    ) -> Result<(String, HistoryByYear)> {
        let song_history = self.client.fetch_song(song).await.map_err(Error::from)?;

        info!(
            song_id = song_history.id,
            title = %song_history.title,
            performances = song_history.tracks.len(),
            "Starting song history aggregation"
        );

        self.event_bus.emit_lossy(HistoryEvent::HistoryStarted {
            song_id: song_history.id,
            total_tracks: song_history.tracks.len(),
            timestamp: chrono::Utc::now(),
        });

        let cache = SqliteShowCache::new(self.db.clone());
        let fetcher = CachingFetcher::new(self.client.clone(), self.db.clone());
        let sink = EventProgress::new(self.event_bus.clone(), song_history.id);
        let aggregator = HistoryAggregator::new(cache, fetcher);

        match aggregator
            .aggregate(song_history.id, &song_history.tracks, Some(&sink), cancel)
            .await
        {
            Ok(history) => {
                self.event_bus.emit_lossy(HistoryEvent::HistoryCompleted {
                    song_id: song_history.id,
                    years: history.len(),
                    shows: history.values().map(Vec::len).sum(),
                    timestamp: chrono::Utc::now(),
                });
                Ok((song_history.title, history))
            }
            Err(e) => {
                error!(
                    song_id = song_history.id,
                    error = %e,
                    "Song history aggregation failed"
                );
                self.event_bus.emit_lossy(HistoryEvent::HistoryFailed {
                    song_id: song_history.id,
                    error: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(e)
            }
        }
    }
}
