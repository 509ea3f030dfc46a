//! phish.in API client
//!
//! Covers the two endpoints the history service drives: a song's track
//! list (`/songs/{id}`) and a single show (`/shows/{id}`). Requests are
//! spaced by a client-owned rate limiter to stay polite to the public API.

use crate::history::aggregator::ShowFetcher;
use crate::history::types::TrackRecord;
use phishtour_common::db::Show;
use phishtour_common::Error;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error as ThisError;
use tokio::sync::Mutex;

const PHISHIN_BASE_URL: &str = "https://phish.in/api/v1";
const USER_AGENT: &str = "PhishTour/0.1.0";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MIN_REQUEST_INTERVAL_MS: u64 = 250;

/// phish.in client errors
#[derive(Debug, ThisError)]
pub enum PhishinError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Show not found: {0}")]
    ShowNotFound(i64),

    #[error("Song not found: {0}")]
    SongNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<PhishinError> for Error {
    fn from(err: PhishinError) -> Self {
        match err {
            PhishinError::Network(msg) => Error::Network(msg),
            PhishinError::RateLimitExceeded => Error::Network("rate limit exceeded".to_string()),
            PhishinError::Api(status, msg) => Error::Network(format!("API error {}: {}", status, msg)),
            PhishinError::Parse(msg) => Error::Parse(msg),
            PhishinError::ShowNotFound(id) => Error::NotFound(format!("show {}", id)),
            PhishinError::SongNotFound(song) => Error::NotFound(format!("song {}", song)),
        }
    }
}

/// Response envelope: every phish.in v1 payload sits under "data"
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Clone, Deserialize)]
struct ShowPayload {
    id: i64,
    date: String,
    #[serde(default)]
    venue: Option<VenuePayload>,
    #[serde(default)]
    venue_name: Option<String>,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct VenuePayload {
    name: String,
    #[serde(default)]
    location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SongPayload {
    id: i64,
    title: String,
    #[serde(default)]
    tracks: Vec<TrackPayload>,
}

#[derive(Debug, Clone, Deserialize)]
struct TrackPayload {
    show_id: i64,
    show_date: String,
}

/// A song with its full performance history, one track per performance
#[derive(Debug, Clone)]
pub struct SongHistory {
    pub id: i64,
    pub title: String,
    pub tracks: Vec<TrackRecord>,
}

/// Spaces consecutive requests by a minimum interval
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// phish.in API client
#[derive(Clone)]
pub struct PhishinClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter>,
}

impl PhishinClient {
    pub fn new() -> Result<Self, PhishinError> {
        Self::with_base_url(PHISHIN_BASE_URL)
    }

    /// Client against a non-default base URL (tests, mirrors)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, PhishinError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| PhishinError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::new(Duration::from_millis(
                MIN_REQUEST_INTERVAL_MS,
            ))),
        })
    }

    /// Fetch a single show by id
    pub async fn fetch_show(&self, show_id: i64) -> Result<Show, PhishinError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/shows/{}", self.base_url, show_id);
        tracing::debug!(show_id, url = %url, "Querying phish.in API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PhishinError::Network(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(PhishinError::ShowNotFound(show_id));
        }

        if status == 429 {
            return Err(PhishinError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PhishinError::Api(status.as_u16(), error_text));
        }

        let envelope: Envelope<ShowPayload> = response
            .json()
            .await
            .map_err(|e| PhishinError::Parse(e.to_string()))?;

        let show = show_from_payload(envelope.data)?;

        tracing::info!(
            show_id,
            date = %show.date,
            venue = %show.venue,
            "Retrieved show from phish.in"
        );

        Ok(show)
    }

    /// Fetch a song (by numeric id or slug) with its track records
    ///
    /// Track order is the API's; the aggregator does not rely on it.
    pub async fn fetch_song(&self, song: &str) -> Result<SongHistory, PhishinError> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/songs/{}", self.base_url, song);
        tracing::debug!(song = %song, url = %url, "Querying phish.in API");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PhishinError::Network(e.to_string()))?;

        let status = response.status();

        if status == 404 {
            return Err(PhishinError::SongNotFound(song.to_string()));
        }

        if status == 429 {
            return Err(PhishinError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PhishinError::Api(status.as_u16(), error_text));
        }

        let envelope: Envelope<SongPayload> = response
            .json()
            .await
            .map_err(|e| PhishinError::Parse(e.to_string()))?;

        let payload = envelope.data;
        let tracks = payload
            .tracks
            .into_iter()
            .map(|t| TrackRecord {
                show_id: t.show_id,
                show_date: t.show_date,
            })
            .collect::<Vec<_>>();

        tracing::info!(
            song_id = payload.id,
            title = %payload.title,
            performances = tracks.len(),
            "Retrieved song history from phish.in"
        );

        Ok(SongHistory {
            id: payload.id,
            title: payload.title,
            tracks,
        })
    }
}

impl ShowFetcher for PhishinClient {
    async fn fetch(&self, show_id: i64) -> phishtour_common::Result<Show> {
        self.fetch_show(show_id).await.map_err(Error::from)
    }
}

fn show_from_payload(payload: ShowPayload) -> Result<Show, PhishinError> {
    // Older payload shapes carry a flat venue_name/location pair instead
    // of a nested venue object
    let (venue, city) = match payload.venue {
        Some(v) => {
            let city = v.location.or(payload.location).unwrap_or_default();
            (v.name, city)
        }
        None => (
            payload.venue_name.unwrap_or_default(),
            payload.location.unwrap_or_default(),
        ),
    };

    Show::from_date(payload.id, &payload.date, venue, city)
        .map_err(|e| PhishinError::Parse(e.to_string()))
}
