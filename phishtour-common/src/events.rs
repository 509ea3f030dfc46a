//! Event types for the PhishTour event system
//!
//! Provides shared event definitions and the EventBus used by services to
//! broadcast history-aggregation lifecycle and progress updates.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// PhishTour event types
///
/// Events are broadcast via EventBus; the serde tag keeps them ready for
/// wire transmission should a streaming surface ever subscribe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryEvent {
    /// A song history aggregation started
    HistoryStarted {
        /// phish.in song identifier
        song_id: i64,
        /// Number of track records to resolve
        total_tracks: usize,
        /// When aggregation started
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Fractional progress of an in-flight aggregation
    ///
    /// Fractions are monotonically non-decreasing within one aggregation
    /// and end at 1.0 on success.
    HistoryProgress {
        /// phish.in song identifier
        song_id: i64,
        /// Completed fraction in [0, 1]
        fraction: f64,
    },

    /// A song history aggregation completed successfully
    HistoryCompleted {
        /// phish.in song identifier
        song_id: i64,
        /// Distinct years in the resulting history
        years: usize,
        /// Total resolved shows across all years
        shows: usize,
        /// When aggregation completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A song history aggregation failed
    ///
    /// Failures are all-or-nothing: no partial history accompanies this
    /// event.
    HistoryFailed {
        /// phish.in song identifier
        song_id: i64,
        /// Human-readable failure description
        error: String,
        /// When aggregation failed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl HistoryEvent {
    /// Event type name, matching the serde tag
    pub fn event_type(&self) -> &'static str {
        match self {
            HistoryEvent::HistoryStarted { .. } => "HistoryStarted",
            HistoryEvent::HistoryProgress { .. } => "HistoryProgress",
            HistoryEvent::HistoryCompleted { .. } => "HistoryCompleted",
            HistoryEvent::HistoryFailed { .. } => "HistoryFailed",
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<HistoryEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: HistoryEvent,
    ) -> std::result::Result<usize, broadcast::error::SendError<HistoryEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: HistoryEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("No subscribers for event (dropped)");
        }
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently attached subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
