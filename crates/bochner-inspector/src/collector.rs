//! In-memory event storage.

use parking_lot::Mutex;

use crate::events::{EvaluationTrace, ExtensionEvent, Outcome};
use crate::sink::EventSink;

/// Keeps every event it receives, in order.
///
/// Besides the raw stream it answers the questions usually asked of a run:
/// how deep limits were evaluated, how large the reported errors were, and
/// how often an integrand fell back to zero.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Mutex<Vec<ExtensionEvent>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The events so far as a trace.
    pub fn trace(&self) -> EvaluationTrace {
        EvaluationTrace {
            events: self.events(),
        }
    }

    /// The events so far.
    pub fn events(&self) -> Vec<ExtensionEvent> {
        self.events.lock().clone()
    }

    /// Remove and return the events so far.
    pub fn take(&self) -> Vec<ExtensionEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// `(depth, error_bound)` of every limit cutoff.
    pub fn cutoffs(&self) -> Vec<(u32, f64)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ExtensionEvent::LimitCutoff {
                    depth, error_bound, ..
                } => Some((*depth, *error_bound)),
                _ => None,
            })
            .collect()
    }

    /// Largest error bound reported by a finished evaluation, `None` if
    /// every evaluation was exact.
    pub fn worst_error_bound(&self) -> Option<f64> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ExtensionEvent::EvalEnd {
                    outcome: Outcome::Approximate { error_bound, .. },
                    ..
                } => Some(*error_bound),
                _ => None,
            })
            .reduce(f64::max)
    }

    /// Number of evaluations that returned zero for a non-integrable input.
    pub fn fallbacks(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ExtensionEvent::EvalEnd {
                        outcome: Outcome::Fallback,
                        ..
                    }
                )
            })
            .count()
    }
}

impl EventSink for EventCollector {
    fn emit(&self, event: ExtensionEvent) {
        self.events.lock().push(event);
    }
}
