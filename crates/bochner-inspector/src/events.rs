//! Event types for extension tracing.
//!
//! This module defines all events that can be emitted while a set function
//! extension evaluates its argument: evaluation lifecycle, classification of
//! integrands, finite sums and cutoffs of Cauchy sequences.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// Re-export span types from bochner
pub use bochner::tracer::{EvalKind, SpanId};

// Import tracer types for From impls
use bochner::tracer::{Classification as TracerClassification, EvalOutcome};

/// Result of classifying an integrand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationResult {
    /// Integrable; `embedded` is `true` if the class is a simple function.
    Integrable { embedded: bool },
    /// Not integrable, with the reason rendered as text.
    NotIntegrable { reason: String },
}

impl From<&TracerClassification> for ClassificationResult {
    fn from(classification: &TracerClassification) -> Self {
        match classification {
            TracerClassification::Integrable { embedded } => ClassificationResult::Integrable {
                embedded: *embedded,
            },
            TracerClassification::NotIntegrable { reason } => {
                ClassificationResult::NotIntegrable {
                    reason: reason.to_string(),
                }
            }
        }
    }
}

/// How the value of an evaluation was obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    /// Computed exactly as a finite sum.
    Exact,
    /// Computed from a term of a Cauchy sequence.
    Approximate { depth: u32, error_bound: f64 },
    /// The integrand was not integrable and the value is zero.
    Fallback,
}

impl From<&EvalOutcome> for Outcome {
    fn from(outcome: &EvalOutcome) -> Self {
        match outcome {
            EvalOutcome::Exact => Outcome::Exact,
            EvalOutcome::Approximate { depth, error_bound } => Outcome::Approximate {
                depth: *depth,
                error_bound: *error_bound,
            },
            EvalOutcome::Fallback => Outcome::Fallback,
        }
    }
}

/// Events emitted while evaluating an extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtensionEvent {
    // === Evaluation Lifecycle ===
    /// Evaluation started.
    EvalStart { span_id: SpanId, kind: EvalKind },

    /// Evaluation completed.
    EvalEnd {
        span_id: SpanId,
        kind: EvalKind,
        outcome: Outcome,
        /// Duration of the evaluation.
        duration: Duration,
    },

    // === Integrability ===
    /// An integrand was classified against the measure.
    Classified {
        span_id: SpanId,
        result: ClassificationResult,
    },

    // === Evaluation Steps ===
    /// A simple function was summed piece by piece.
    SimpleSum {
        span_id: SpanId,
        /// Number of pieces in the partition.
        pieces: usize,
    },

    /// A limit was evaluated at a term of its Cauchy sequence.
    LimitCutoff {
        span_id: SpanId,
        depth: u32,
        /// Upper bound on the error of the value.
        error_bound: f64,
    },
}

impl ExtensionEvent {
    /// The span this event belongs to.
    pub fn span_id(&self) -> SpanId {
        match self {
            ExtensionEvent::EvalStart { span_id, .. }
            | ExtensionEvent::EvalEnd { span_id, .. }
            | ExtensionEvent::Classified { span_id, .. }
            | ExtensionEvent::SimpleSum { span_id, .. }
            | ExtensionEvent::LimitCutoff { span_id, .. } => *span_id,
        }
    }
}

/// A complete trace of events for a sequence of evaluations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationTrace {
    pub events: Vec<ExtensionEvent>,
}

/// Event kind for comparison (without span_id/duration/error bounds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    EvalStart { kind: EvalKind },
    EvalEnd { kind: EvalKind, outcome: OutcomeKind },
    Classified { result: ClassificationResult },
    SimpleSum { pieces: usize },
    LimitCutoff { depth: u32 },
}

/// [`Outcome`] without its error bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Exact,
    Approximate { depth: u32 },
    Fallback,
}

impl From<&Outcome> for OutcomeKind {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Exact => OutcomeKind::Exact,
            Outcome::Approximate { depth, .. } => OutcomeKind::Approximate { depth: *depth },
            Outcome::Fallback => OutcomeKind::Fallback,
        }
    }
}

impl From<&ExtensionEvent> for EventKind {
    fn from(event: &ExtensionEvent) -> Self {
        match event {
            ExtensionEvent::EvalStart { kind, .. } => EventKind::EvalStart { kind: *kind },
            ExtensionEvent::EvalEnd { kind, outcome, .. } => EventKind::EvalEnd {
                kind: *kind,
                outcome: outcome.into(),
            },
            ExtensionEvent::Classified { result, .. } => EventKind::Classified {
                result: result.clone(),
            },
            ExtensionEvent::SimpleSum { pieces, .. } => EventKind::SimpleSum { pieces: *pieces },
            ExtensionEvent::LimitCutoff { depth, .. } => EventKind::LimitCutoff { depth: *depth },
        }
    }
}

/// Convert a trace to a list of event kinds for comparison.
pub fn to_kinds(trace: &EvaluationTrace) -> Vec<EventKind> {
    trace.events.iter().map(EventKind::from).collect()
}

impl EvaluationTrace {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: ExtensionEvent) {
        self.events.push(event);
    }

    /// Filter events for a specific evaluation.
    pub fn events_for_span(&self, span_id: SpanId) -> Vec<&ExtensionEvent> {
        self.events
            .iter()
            .filter(|e| e.span_id() == span_id)
            .collect()
    }

    /// Get all evaluation end events.
    pub fn eval_ends(&self) -> impl Iterator<Item = (&SpanId, &EvalKind, &Outcome, &Duration)> {
        self.events.iter().filter_map(|e| match e {
            ExtensionEvent::EvalEnd {
                span_id,
                kind,
                outcome,
                duration,
            } => Some((span_id, kind, outcome, duration)),
            _ => None,
        })
    }

    /// Largest error bound reported by any cutoff, `0` if every value was exact.
    pub fn max_error_bound(&self) -> f64 {
        self.events
            .iter()
            .filter_map(|e| match e {
                ExtensionEvent::LimitCutoff { error_bound, .. } => Some(*error_bound),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    /// Number of evaluations that fell back to zero.
    pub fn fallback_count(&self) -> usize {
        self.eval_ends()
            .filter(|(_, _, outcome, _)| matches!(outcome, Outcome::Fallback))
            .count()
    }

    /// Check if any event matches a predicate.
    pub fn has_event<F>(&self, predicate: F) -> bool
    where
        F: Fn(&ExtensionEvent) -> bool,
    {
        self.events.iter().any(predicate)
    }
}
