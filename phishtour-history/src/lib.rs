//! phishtour-history library interface
//!
//! Exposes the song-history aggregation core and its collaborators for
//! integration testing and embedding.

pub mod history;
pub mod services;

pub use history::aggregator::{HistoryAggregator, ShowCache, ShowFetcher};
pub use history::progress::{EventProgress, ProgressSink};
pub use history::types::{HistoryByYear, TrackRecord};
pub use services::history_service::HistoryService;
pub use services::phishin_client::{PhishinClient, PhishinError, SongHistory};
pub use services::show_store::{CachingFetcher, SqliteShowCache};
