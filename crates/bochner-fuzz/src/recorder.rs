//! Event recording and export.

use crate::config::SerializableConfig;
use crate::runner::FuzzResult;
use crate::validator::ValidationFailure;
use bochner_inspector::{EvaluationTrace, EventSink, ExtensionEvent, Outcome};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Event recorder with timestamps.
pub struct FuzzEventRecorder {
    events: Mutex<Vec<TimestampedEvent>>,
    start_time: Instant,
}

impl FuzzEventRecorder {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            start_time: Instant::now(),
        }
    }

    /// Get all recorded events.
    pub fn events(&self) -> Vec<TimestampedEvent> {
        self.events.lock().clone()
    }

    /// Get events as an EvaluationTrace.
    pub fn trace(&self) -> EvaluationTrace {
        EvaluationTrace {
            events: self.events.lock().iter().map(|e| e.event.clone()).collect(),
        }
    }

    /// Take and clear all events.
    pub fn take(&self) -> Vec<TimestampedEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Clear all events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }

    /// Get the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Check if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Export events to a JSON file.
    pub fn export_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.events())?;
        std::fs::write(path, json)
    }
}

impl Default for FuzzEventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for FuzzEventRecorder {
    fn emit(&self, event: ExtensionEvent) {
        let timestamp_us = self.start_time.elapsed().as_micros() as u64;
        self.events.lock().push(TimestampedEvent {
            timestamp_us,
            event,
        });
    }
}

/// Event with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedEvent {
    /// Microseconds since the recorder was created.
    pub timestamp_us: u64,
    /// The actual event.
    pub event: ExtensionEvent,
}

/// Complete run record for export.
#[derive(Debug, Serialize, Deserialize)]
pub struct FuzzRunRecord {
    /// Configuration used.
    pub config: SerializableConfig,
    /// Seed used (for reproducibility).
    pub seed: u64,
    /// All timestamped events.
    pub events: Vec<TimestampedEvent>,
    /// Law violations found.
    pub failures: Vec<ValidationFailure>,
    /// Summary statistics.
    pub stats: RunStats,
    /// Metadata.
    pub metadata: RunMetadata,
}

impl FuzzRunRecord {
    /// Export to a JSON file.
    pub fn export_to_file(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}

/// Summary statistics for a run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RunStats {
    pub evaluations: u64,
    pub exact: u64,
    pub approximate: u64,
    pub fallbacks: u64,
    pub pieces_summed: u64,
    pub max_depth: u32,
    pub max_error_bound: f64,
    pub total_eval_time_us: u64,
    pub validation_passes: u64,
    pub validation_failures: u64,
    pub construction_errors: u64,
}

impl RunStats {
    /// Compute stats from events and result.
    pub fn from_events(events: &[TimestampedEvent], result: &FuzzResult) -> Self {
        let mut stats = RunStats::default();

        for event in events {
            match &event.event {
                ExtensionEvent::EvalEnd {
                    outcome, duration, ..
                } => {
                    stats.evaluations += 1;
                    stats.total_eval_time_us += duration.as_micros() as u64;
                    match outcome {
                        Outcome::Exact => stats.exact += 1,
                        Outcome::Approximate { .. } => stats.approximate += 1,
                        Outcome::Fallback => stats.fallbacks += 1,
                    }
                }
                ExtensionEvent::SimpleSum { pieces, .. } => {
                    stats.pieces_summed += *pieces as u64;
                }
                ExtensionEvent::LimitCutoff {
                    depth, error_bound, ..
                } => {
                    stats.max_depth = stats.max_depth.max(*depth);
                    stats.max_error_bound = stats.max_error_bound.max(*error_bound);
                }
                _ => {}
            }
        }

        stats.validation_passes = result.validation_successes as u64;
        stats.validation_failures = result.validation_failures.len() as u64;
        stats.construction_errors = result.construction_errors.len() as u64;

        stats
    }
}

/// Metadata for a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub timestamp: String,
    pub duration_ms: u64,
    pub platform: String,
}

impl RunMetadata {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            timestamp: unix_timestamp(),
            duration_ms,
            platform: std::env::consts::OS.to_string(),
        }
    }
}

/// Seconds since the Unix epoch.
fn unix_timestamp() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", duration.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bochner_inspector::{EvalKind, SpanId};
    use std::time::Duration;

    #[test]
    fn test_stats_from_events() {
        let recorder = FuzzEventRecorder::new();
        let span_id = SpanId(1);
        recorder.emit(ExtensionEvent::SimpleSum { span_id, pieces: 3 });
        recorder.emit(ExtensionEvent::LimitCutoff {
            span_id,
            depth: 9,
            error_bound: 0.002,
        });
        recorder.emit(ExtensionEvent::EvalEnd {
            span_id,
            kind: EvalKind::Function,
            outcome: Outcome::Fallback,
            duration: Duration::from_micros(5),
        });

        let stats = RunStats::from_events(&recorder.events(), &FuzzResult::default());
        assert_eq!(stats.evaluations, 1);
        assert_eq!(stats.fallbacks, 1);
        assert_eq!(stats.pieces_summed, 3);
        assert_eq!(stats.max_depth, 9);
        assert_eq!(stats.total_eval_time_us, 5);
        assert_eq!(recorder.trace().events.len(), 3);
    }

    #[test]
    fn test_take_clears() {
        let recorder = FuzzEventRecorder::new();
        recorder.emit(ExtensionEvent::EvalStart {
            span_id: SpanId(1),
            kind: EvalKind::Simple,
        });
        assert_eq!(recorder.take().len(), 1);
        assert!(recorder.is_empty());
    }
}
