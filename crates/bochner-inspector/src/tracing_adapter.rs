//! Bridge from extension events to the `tracing` crate.

use tracing::{debug, trace, warn};

use crate::events::{ClassificationResult, ExtensionEvent, Outcome};
use crate::sink::EventSink;

/// A sink that logs every event through `tracing`.
///
/// Lifecycle and cutoff events are logged at `debug`, piece counts at
/// `trace`, and non-integrable classifications at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAdapter;

impl TracingAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingAdapter {
    fn emit(&self, event: ExtensionEvent) {
        match event {
            ExtensionEvent::EvalStart { span_id, kind } => {
                debug!(span = span_id.0, kind = ?kind, "evaluation started");
            }
            ExtensionEvent::Classified { span_id, result } => match result {
                ClassificationResult::Integrable { embedded } => {
                    debug!(span = span_id.0, embedded, "integrand is integrable");
                }
                ClassificationResult::NotIntegrable { reason } => {
                    warn!(span = span_id.0, reason = %reason, "integrand is not integrable, using zero");
                }
            },
            ExtensionEvent::SimpleSum { span_id, pieces } => {
                trace!(span = span_id.0, pieces, "summing simple function");
            }
            ExtensionEvent::LimitCutoff {
                span_id,
                depth,
                error_bound,
            } => {
                debug!(span = span_id.0, depth, error_bound, "limit cut off");
            }
            ExtensionEvent::EvalEnd {
                span_id,
                kind,
                outcome,
                duration,
            } => {
                let outcome = match outcome {
                    Outcome::Exact => "exact",
                    Outcome::Approximate { .. } => "approximate",
                    Outcome::Fallback => "fallback",
                };
                debug!(
                    span = span_id.0,
                    kind = ?kind,
                    outcome,
                    duration_us = duration.as_micros() as u64,
                    "evaluation finished"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EvalKind, SpanId};

    #[test]
    fn test_emits_without_subscriber() {
        let adapter = TracingAdapter::new();
        adapter.emit(ExtensionEvent::EvalStart {
            span_id: SpanId(1),
            kind: EvalKind::L1,
        });
        adapter.emit(ExtensionEvent::Classified {
            span_id: SpanId(1),
            result: ClassificationResult::NotIntegrable {
                reason: "function has infinite integral".to_string(),
            },
        });
    }
}
