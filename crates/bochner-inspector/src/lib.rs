//! Inspector: tracing and observability for bochner extensions.
//!
//! This crate turns the `Tracer` hooks of [`bochner::SetToFun`] into a stream
//! of [`ExtensionEvent`]s. It supports multiple output modes:
//!
//! - **EventCollector**: Collects events for testing and assertion
//! - **TracingAdapter**: Bridges to the `tracing` crate (with `tracing` feature)
//!
//! # Quick Start
//!
//! ```ignore
//! use bochner::{ExtensionConfig, SetToFun};
//! use bochner_inspector::{EventCollector, EventSinkTracer, ExtensionEvent, Outcome};
//! use std::sync::Arc;
//!
//! let collector = Arc::new(EventCollector::new());
//! let tracer = EventSinkTracer::new(collector.clone());
//! let ext = SetToFun::with_tracer(set_fn, ExtensionConfig::default(), tracer)?;
//!
//! ext.set_to_fun(&f);
//!
//! let trace = collector.trace();
//! assert!(trace.has_event(|e| matches!(
//!     e,
//!     ExtensionEvent::EvalEnd { outcome: Outcome::Exact, .. }
//! )));
//! ```
//!
//! # Event Types
//!
//! - **Lifecycle**: `EvalStart`, `EvalEnd`
//! - **Integrability**: `Classified`
//! - **Evaluation Steps**: `SimpleSum`, `LimitCutoff`
//!
//! See [`ExtensionEvent`] for the complete list.

mod collector;
mod events;
mod sink;
mod tracer_impl;
#[cfg(feature = "tracing")]
mod tracing_adapter;

pub use collector::EventCollector;
pub use events::{
    to_kinds, ClassificationResult, EvalKind, EvaluationTrace, EventKind, ExtensionEvent, Outcome,
    OutcomeKind, SpanId,
};
pub use sink::{is_inexact, EventSink, FilterSink, NullSink};
pub use tracer_impl::EventSinkTracer;
#[cfg(feature = "tracing")]
pub use tracing_adapter::TracingAdapter;
