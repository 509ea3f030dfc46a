//! Progress reporting for in-flight aggregations
//!
//! Progress is owned by a single meter per aggregation call. Sinks only
//! ever observe the meter's current value, so reported fractions are
//! monotonically non-decreasing regardless of who is listening.

use phishtour_common::events::{EventBus, HistoryEvent};

/// Receives fractional progress in [0, 1]
///
/// Fire-and-forget: implementations must tolerate being invoked from
/// whatever task the aggregation runs on. Absence of a sink is a valid
/// configuration and only affects observability.
pub trait ProgressSink: Send + Sync {
    fn report(&self, fraction: f64);
}

/// ProgressSink that forwards fractions onto the event bus
pub struct EventProgress {
    bus: EventBus,
    song_id: i64,
}

impl EventProgress {
    pub fn new(bus: EventBus, song_id: i64) -> Self {
        Self { bus, song_id }
    }
}

impl ProgressSink for EventProgress {
    fn report(&self, fraction: f64) {
        self.bus.emit_lossy(HistoryEvent::HistoryProgress {
            song_id: self.song_id,
            fraction,
        });
    }
}

/// Owned, monotonic progress counter for one aggregation call
///
/// Advances by one fixed per-record increment (1 / total) per resolved
/// record. The final report on a fully advanced meter is exactly 1.0,
/// with no float-accumulation drift.
pub(crate) struct ProgressMeter<'a> {
    total: usize,
    done: usize,
    last_reported: f64,
    sink: Option<&'a dyn ProgressSink>,
}

impl<'a> ProgressMeter<'a> {
    pub(crate) fn new(total: usize, sink: Option<&'a dyn ProgressSink>) -> Self {
        Self {
            total,
            done: 0,
            last_reported: 0.0,
            sink,
        }
    }

    /// Record one resolved record and report the new fraction
    pub(crate) fn advance(&mut self) {
        self.done = (self.done + 1).min(self.total);
        let fraction = self.done as f64 / self.total as f64;
        self.emit(fraction);
    }

    /// Report completion outright (empty-input case)
    pub(crate) fn complete(&mut self) {
        self.done = self.total;
        self.emit(1.0);
    }

    fn emit(&mut self, fraction: f64) {
        // Never report backwards
        let fraction = fraction.clamp(self.last_reported, 1.0);
        self.last_reported = fraction;
        if let Some(sink) = self.sink {
            sink.report(fraction);
        }
    }
}
