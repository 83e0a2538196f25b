//! EventSinkTracer - Bridge between the bochner Tracer and EventSink.
//!
//! This module provides `EventSinkTracer`, which implements the `Tracer` trait
//! from bochner and forwards hooks to an `EventSink` as `ExtensionEvent` instances.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bochner::tracer::{Classification, EvalKind, EvalOutcome, SpanId, Tracer};
use parking_lot::Mutex;

use crate::events::ExtensionEvent;
use crate::sink::EventSink;

/// Global span ID counter for EventSinkTracer.
static SPAN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A `Tracer` implementation that forwards events to an `EventSink`.
///
/// Durations in [`ExtensionEvent::EvalEnd`] are measured from the matching
/// [`Tracer::on_eval_start`] call.
///
/// # Example
///
/// ```ignore
/// use bochner::{ExtensionConfig, SetToFun};
/// use bochner_inspector::{EventCollector, EventSinkTracer};
/// use std::sync::Arc;
///
/// let collector = Arc::new(EventCollector::new());
/// let tracer = EventSinkTracer::new(collector.clone());
/// let ext = SetToFun::with_tracer(set_fn, ExtensionConfig::default(), tracer)?;
///
/// ext.set_to_fun(&f);
/// let trace = collector.trace();
/// ```
pub struct EventSinkTracer {
    sink: Arc<dyn EventSink>,
    start_times: Mutex<HashMap<SpanId, Instant>>,
}

impl EventSinkTracer {
    /// Create a new EventSinkTracer wrapping the given sink.
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            start_times: Mutex::new(HashMap::new()),
        }
    }

    /// The sink receiving the events.
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }
}

impl Tracer for EventSinkTracer {
    #[inline]
    fn new_span_id(&self) -> SpanId {
        SpanId(SPAN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    fn on_eval_start(&self, span_id: SpanId, kind: EvalKind) {
        self.start_times.lock().insert(span_id, Instant::now());
        self.sink.emit(ExtensionEvent::EvalStart { span_id, kind });
    }

    #[inline]
    fn on_classified(&self, span_id: SpanId, classification: &Classification) {
        self.sink.emit(ExtensionEvent::Classified {
            span_id,
            result: classification.into(),
        });
    }

    #[inline]
    fn on_simple_sum(&self, span_id: SpanId, pieces: usize) {
        self.sink.emit(ExtensionEvent::SimpleSum { span_id, pieces });
    }

    #[inline]
    fn on_limit_cutoff(&self, span_id: SpanId, depth: u32, error_bound: f64) {
        self.sink.emit(ExtensionEvent::LimitCutoff {
            span_id,
            depth,
            error_bound,
        });
    }

    #[inline]
    fn on_eval_end(&self, span_id: SpanId, kind: EvalKind, outcome: &EvalOutcome) {
        let duration = self
            .start_times
            .lock()
            .remove(&span_id)
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO);
        self.sink.emit(ExtensionEvent::EvalEnd {
            span_id,
            kind,
            outcome: outcome.into(),
            duration,
        });
        self.sink.flush();
    }
}
