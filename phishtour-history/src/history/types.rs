//! Input and output types for history aggregation

use phishtour_common::db::Show;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One API-reported instance of a song being performed at a show
///
/// Records arrive in API order, which is not guaranteed sorted.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TrackRecord {
    pub show_id: i64,
    /// Show date as reported by the API, YYYY-MM-DD
    pub show_date: String,
}

/// Year-keyed history: each year's shows sorted by (month, day) descending
///
/// Never contains the sentinel year 0.
pub type HistoryByYear = BTreeMap<i32, Vec<Show>>;
