//! Tracer trait for observing evaluations of extended set functions.
//!
//! This module defines the [`Tracer`] trait and related types for observing
//! how [`SetToFun`](crate::SetToFun) evaluates its argument: which layer of
//! the extension handled it, how many pieces were summed, at what depth a
//! limit was cut off, and why a function was found not integrable. The
//! default [`NoopTracer`] provides zero-cost when tracing is not needed.
//!
//! # Example
//!
//! ```ignore
//! use bochner::{SetToFun, SpanId, Tracer, EvalKind};
//!
//! struct MyTracer;
//!
//! impl Tracer for MyTracer {
//!     fn new_span_id(&self) -> SpanId {
//!         SpanId(1)
//!     }
//!
//!     fn on_eval_start(&self, span_id: SpanId, kind: EvalKind) {
//!         println!("evaluating {:?}", kind);
//!     }
//! }
//!
//! let extension = SetToFun::with_tracer(set_fn, ExtensionConfig::default(), MyTracer)?;
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::NotIntegrableReason;

/// Unique identifier for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanId(pub u64);

/// Which layer of the extension an evaluation entered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvalKind {
    /// A simple function.
    Simple,
    /// An integrable simple function.
    L1Simple,
    /// A point of L¹.
    L1,
    /// An arbitrary integrand, classified first.
    Function,
}

/// Outcome of classifying an integrand.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Integrable; `embedded` is `true` if the class is a simple function.
    Integrable {
        /// The class has no limit part.
        embedded: bool,
    },
    /// Not integrable, so the value is zero.
    NotIntegrable {
        /// Why the integrand has no L¹ class.
        reason: NotIntegrableReason,
    },
}

/// How the value of an evaluation was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalOutcome {
    /// Computed exactly as a finite sum.
    Exact,
    /// Computed from a term of a Cauchy sequence.
    Approximate {
        /// Index of the term evaluated.
        depth: u32,
        /// Upper bound on the error of the value.
        error_bound: f64,
    },
    /// The integrand was not integrable and the value is zero.
    Fallback,
}

/// Tracer trait for observing extension evaluations.
///
/// Implementations can collect events for testing, forward to the `tracing` crate,
/// or provide custom observability.
///
/// All methods have default empty implementations, so you only need to override
/// the events you're interested in. The [`NoopTracer`] uses all defaults for
/// zero-cost when tracing is disabled.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` as the tracer may be called from
/// multiple threads concurrently.
pub trait Tracer: Send + Sync + 'static {
    /// Generate a new unique span ID.
    ///
    /// This is the only required method. Called at the start of each evaluation.
    fn new_span_id(&self) -> SpanId;

    /// Called when an evaluation starts.
    #[inline]
    fn on_eval_start(&self, _span_id: SpanId, _kind: EvalKind) {}

    /// Called after an integrand has been classified.
    #[inline]
    fn on_classified(&self, _span_id: SpanId, _classification: &Classification) {}

    /// Called when a simple function is summed piece by piece.
    #[inline]
    fn on_simple_sum(&self, _span_id: SpanId, _pieces: usize) {}

    /// Called when a limit is evaluated at a term of its Cauchy sequence.
    #[inline]
    fn on_limit_cutoff(&self, _span_id: SpanId, _depth: u32, _error_bound: f64) {}

    /// Called when an evaluation ends.
    #[inline]
    fn on_eval_end(&self, _span_id: SpanId, _kind: EvalKind, _outcome: &EvalOutcome) {}
}

/// Zero-cost tracer that discards all events.
///
/// This is the default tracer for [`SetToFun`](crate::SetToFun).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

/// Global span counter for NoopTracer.
static NOOP_SPAN_COUNTER: AtomicU64 = AtomicU64::new(1);

impl Tracer for NoopTracer {
    #[inline(always)]
    fn new_span_id(&self) -> SpanId {
        SpanId(NOOP_SPAN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
    // All other methods use the default empty implementations
}
