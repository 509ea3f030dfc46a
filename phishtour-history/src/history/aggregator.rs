//! Year-grouped song history aggregation
//!
//! Resolves each track record to a show (local cache first, remote fetch
//! on a miss), groups resolved shows by year, and sorts each year's group
//! by calendar date descending. Resolution is all-or-nothing: any failed
//! record aborts the call and no partial history escapes.

use crate::history::progress::{ProgressMeter, ProgressSink};
use crate::history::types::{HistoryByYear, TrackRecord};
use phishtour_common::db::Show;
use phishtour_common::{Error, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Local show lookup by id
///
/// A pure read: a genuine miss is `Ok(None)`, never an error.
pub trait ShowCache {
    fn lookup(&self, show_id: i64) -> impl std::future::Future<Output = Result<Option<Show>>> + Send;
}

/// Remote show fetch by id
///
/// Idempotent from the aggregator's perspective; failures map onto the
/// shared error taxonomy (Network, Parse, NotFound).
pub trait ShowFetcher {
    fn fetch(&self, show_id: i64) -> impl std::future::Future<Output = Result<Show>> + Send;
}

/// Aggregates a song's track records into a year-keyed history
///
/// Collaborators are injected; the aggregator holds no ambient state and
/// every call builds its accumulator from scratch.
pub struct HistoryAggregator<C, F> {
    cache: C,
    fetcher: F,
}

impl<C: ShowCache, F: ShowFetcher> HistoryAggregator<C, F> {
    pub fn new(cache: C, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    /// Resolve `tracks` in input order and return the year-grouped history.
    ///
    /// Progress advances by one fixed increment per resolved record and is
    /// reported through `progress` when present. Raising `cancel` abandons
    /// the in-flight fetch and fails the call with `Error::Cancelled`.
    pub async fn aggregate(
        &self,
        song_id: i64,
        tracks: &[TrackRecord],
        progress: Option<&dyn ProgressSink>,
        cancel: &CancellationToken,
    ) -> Result<HistoryByYear> {
        if tracks.is_empty() {
            ProgressMeter::new(0, progress).complete();
            return Ok(HistoryByYear::new());
        }

        let mut meter = ProgressMeter::new(tracks.len(), progress);
        let mut history = HistoryByYear::new();

        for track in tracks {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let show = match self.cache.lookup(track.show_id).await? {
                Some(show) => {
                    debug!(song_id, show_id = track.show_id, "Resolved show from cache");
                    show
                }
                None => {
                    debug!(song_id, show_id = track.show_id, "Cache miss, fetching show");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        fetched = self.fetcher.fetch(track.show_id) => fetched?,
                    }
                }
            };

            merge_show(&mut history, show);
            meter.advance();
        }

        sort_year_groups(&mut history);
        drop_sentinel_year(&mut history);

        info!(
            song_id,
            years = history.len(),
            shows = history.values().map(Vec::len).sum::<usize>(),
            "Song history aggregation complete"
        );

        Ok(history)
    }
}

/// Append a resolved show to its year's group
///
/// The single merge point every resolution path goes through; ordering
/// within a group is settled later by `sort_year_groups`.
fn merge_show(history: &mut HistoryByYear, show: Show) {
    history.entry(show.year).or_default().push(show);
}

/// Sort each year's shows by (month, day) descending
///
/// Stable: records that tie on the calendar date keep their input order.
fn sort_year_groups(history: &mut HistoryByYear) {
    for shows in history.values_mut() {
        shows.sort_by(|a, b| (b.month, b.day).cmp(&(a.month, a.day)));
    }
}

/// Remove the sentinel year 0 group if resolution produced one
///
/// Year 0 never represents real data; a hit here points at a bad cache
/// row or upstream payload, so its removal is logged rather than silent.
fn drop_sentinel_year(history: &mut HistoryByYear) {
    if let Some(dropped) = history.remove(&0) {
        warn!(
            count = dropped.len(),
            "Dropped shows with unresolved year 0 from history"
        );
    }
}
