//! Destinations for extension events.
//!
//! A [`SetToFun`](bochner::SetToFun) traced through
//! [`EventSinkTracer`](crate::EventSinkTracer) hands every event to one
//! sink. [`FilterSink`] narrows that stream, for instance to the evaluations
//! whose value is not an exact finite sum.

use std::sync::Arc;

use crate::events::{ClassificationResult, ExtensionEvent, Outcome};

/// Receiver of extension events.
pub trait EventSink: Send + Sync + 'static {
    /// Receive one event.
    fn emit(&self, event: ExtensionEvent);

    /// Flush buffered events. Does nothing unless the sink buffers.
    fn flush(&self) {}
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: ExtensionEvent) {
        (**self).emit(event);
    }

    fn flush(&self) {
        (**self).flush();
    }
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: ExtensionEvent) {}
}

/// Forwards the events accepted by `filter` to `inner`.
pub struct FilterSink<F, S>
where
    F: Fn(&ExtensionEvent) -> bool + Send + Sync + 'static,
    S: EventSink,
{
    filter: F,
    inner: S,
}

impl<F, S> FilterSink<F, S>
where
    F: Fn(&ExtensionEvent) -> bool + Send + Sync + 'static,
    S: EventSink,
{
    pub fn new(filter: F, inner: S) -> Self {
        Self { filter, inner }
    }

    /// The sink receiving the accepted events.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: EventSink> FilterSink<fn(&ExtensionEvent) -> bool, S> {
    /// Keep only the events of evaluations that were not exact: cutoffs of
    /// Cauchy sequences, failed classifications and their zero fallbacks.
    pub fn inexact(inner: S) -> Self {
        Self::new(is_inexact, inner)
    }
}

impl<F, S> EventSink for FilterSink<F, S>
where
    F: Fn(&ExtensionEvent) -> bool + Send + Sync + 'static,
    S: EventSink,
{
    fn emit(&self, event: ExtensionEvent) {
        if (self.filter)(&event) {
            self.inner.emit(event);
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Returns `true` for events that report an approximate or fallback value.
pub fn is_inexact(event: &ExtensionEvent) -> bool {
    match event {
        ExtensionEvent::LimitCutoff { .. } => true,
        ExtensionEvent::Classified { result, .. } => {
            matches!(result, ClassificationResult::NotIntegrable { .. })
        }
        ExtensionEvent::EvalEnd { outcome, .. } => !matches!(outcome, Outcome::Exact),
        ExtensionEvent::EvalStart { .. } | ExtensionEvent::SimpleSum { .. } => false,
    }
}
