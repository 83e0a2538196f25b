//! Extension of a dominated additive set function to all functions.
//!
//! [`SetToFun`] chains the layers of the construction: finite sums on simple
//! functions, the bounded linear map on integrable simple functions, its
//! continuous extension to L¹, and zero on everything that is not integrable.

use std::fmt;
use std::sync::Arc;

use crate::completion::{Approximation, LipschitzExtension};
use crate::config::ExtensionConfig;
use crate::error::MeasureError;
use crate::integrand::{Integrability, Integrand};
use crate::l1::L1;
use crate::l1_simple::{L1Simple, SimpleExtension};
use crate::normed::NormedSpace;
use crate::set_function::DominatedAdditive;
use crate::simple::SimpleFunction;
use crate::space::MeasureSpace;
use crate::tracer::{Classification, EvalKind, EvalOutcome, NoopTracer, SpanId, Tracer};

/// `setToFun(T) : (α → E) → F` for a dominated additive `T`.
///
/// Linear in the function, a.e.-congruent, bounded by
/// `‖setToFun(T, f)‖ ≤ max(C, 0) · ‖f‖₁`, and zero on functions that are not
/// integrable. Values at limits of Cauchy sequences are computed to within
/// the tolerance of the [`ExtensionConfig`].
pub struct SetToFun<M: MeasureSpace, E, F, T = NoopTracer> {
    extension: LipschitzExtension<SimpleExtension<M, E, F>>,
    tracer: T,
}

impl<M: MeasureSpace, E, F, T: Clone> Clone for SetToFun<M, E, F, T> {
    fn clone(&self) -> Self {
        Self {
            extension: self.extension.clone(),
            tracer: self.tracer.clone(),
        }
    }
}

impl<M: MeasureSpace, E, F, T> fmt::Debug for SetToFun<M, E, F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetToFun")
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

impl<M: MeasureSpace, E: NormedSpace, F: NormedSpace> SetToFun<M, E, F> {
    /// Extend `set_fn` with the default configuration.
    pub fn new(set_fn: DominatedAdditive<M, E, F>) -> Self {
        Self {
            extension: LipschitzExtension::new(
                SimpleExtension::new(set_fn),
                ExtensionConfig::default(),
            ),
            tracer: NoopTracer,
        }
    }

    /// Extend `set_fn` with a custom configuration.
    pub fn with_config(
        set_fn: DominatedAdditive<M, E, F>,
        config: ExtensionConfig,
    ) -> Result<Self, MeasureError> {
        Self::with_tracer(set_fn, config, NoopTracer)
    }
}

impl<M: MeasureSpace, E: NormedSpace, F: NormedSpace, T: Tracer> SetToFun<M, E, F, T> {
    /// Extend `set_fn`, reporting every evaluation to `tracer`.
    pub fn with_tracer(
        set_fn: DominatedAdditive<M, E, F>,
        config: ExtensionConfig,
        tracer: T,
    ) -> Result<Self, MeasureError> {
        config.validate()?;
        Ok(Self {
            extension: LipschitzExtension::new(SimpleExtension::new(set_fn), config),
            tracer,
        })
    }

    /// The set function being extended.
    pub fn set_function(&self) -> &DominatedAdditive<M, E, F> {
        self.extension.inner().set_function()
    }

    /// The underlying measure.
    pub fn measure(&self) -> &Arc<M> {
        self.set_function().measure()
    }

    /// The evaluation configuration.
    pub fn config(&self) -> &ExtensionConfig {
        self.extension.config()
    }

    /// The tracer.
    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    /// Operator norm bound `max(C, 0)` of the extension on L¹.
    pub fn bound(&self) -> f64 {
        self.set_function().bound().max(0.0)
    }

    /// Upper bound `max(C, 0) · ‖f‖₁` on the norm of the exact value of
    /// `setToFun(T, f)`, widened by the error of the computed `‖f‖₁`. Zero
    /// when `f` is not integrable.
    pub fn norm_le<I: Integrand<M, E> + ?Sized>(&self, f: &I) -> f64 {
        match f.classify_with(self.measure(), self.config()) {
            Integrability::Integrable(class) => {
                let norm = class.norm_approx(self.config());
                self.bound() * (norm.value + norm.error_bound)
            }
            Integrability::NotIntegrable(_) => 0.0,
        }
    }

    /// The extension of `T + T'`: `setToFun(T + T', f) = setToFun(T, f) + setToFun(T', f)`.
    pub fn add_left(&self, other: &DominatedAdditive<M, E, F>) -> Self
    where
        T: Clone,
    {
        self.extend_other(self.set_function().add(other))
    }

    /// The extension of `c • T`: `setToFun(c • T, f) = c • setToFun(T, f)`.
    pub fn smul_left(&self, c: f64) -> Self
    where
        T: Clone,
    {
        self.extend_other(self.set_function().smul(c))
    }

    fn extend_other(&self, set_fn: DominatedAdditive<M, E, F>) -> Self
    where
        T: Clone,
    {
        Self {
            extension: LipschitzExtension::new(SimpleExtension::new(set_fn), *self.config()),
            tracer: self.tracer.clone(),
        }
    }

    /// `Σ T(f⁻¹({x}))(x)` for a simple function.
    pub fn set_to_simple(&self, f: &SimpleFunction<M, E>) -> F {
        let span_id = self.tracer.new_span_id();
        self.tracer.on_eval_start(span_id, EvalKind::Simple);
        let value = self.sum_simple(span_id, f);
        self.tracer
            .on_eval_end(span_id, EvalKind::Simple, &EvalOutcome::Exact);
        value
    }

    /// The extension on integrable simple functions.
    pub fn set_to_l1_simple(&self, f: &L1Simple<M, E>) -> F {
        let span_id = self.tracer.new_span_id();
        self.tracer.on_eval_start(span_id, EvalKind::L1Simple);
        let value = self.sum_simple(span_id, f.representative());
        self.tracer
            .on_eval_end(span_id, EvalKind::L1Simple, &EvalOutcome::Exact);
        value
    }

    /// The continuous extension to L¹, with its error bound.
    pub fn set_to_l1_approx(&self, f: &L1<M, E>) -> Approximation<F> {
        let span_id = self.tracer.new_span_id();
        self.tracer.on_eval_start(span_id, EvalKind::L1);
        let approx = self.eval_l1(span_id, f);
        self.tracer
            .on_eval_end(span_id, EvalKind::L1, &outcome_of(&approx));
        approx
    }

    /// The continuous extension to L¹.
    pub fn set_to_l1(&self, f: &L1<M, E>) -> F {
        self.set_to_l1_approx(f).value
    }

    /// Classify `f` against the measure of the set function.
    pub fn classify<I: Integrand<M, E> + ?Sized>(&self, f: &I) -> Integrability<M, E> {
        let span_id = self.tracer.new_span_id();
        self.classify_in(span_id, f)
    }

    /// `setToFun(T, f)` with its error bound. Exactly zero if `f` is not
    /// integrable.
    pub fn set_to_fun_approx<I: Integrand<M, E> + ?Sized>(&self, f: &I) -> Approximation<F> {
        let span_id = self.tracer.new_span_id();
        self.tracer.on_eval_start(span_id, EvalKind::Function);
        let (approx, outcome) = match self.classify_in(span_id, f) {
            Integrability::Integrable(class) => {
                let approx = self.eval_l1(span_id, &class);
                let outcome = outcome_of(&approx);
                (approx, outcome)
            }
            Integrability::NotIntegrable(_) => {
                (Approximation::exact(F::zero()), EvalOutcome::Fallback)
            }
        };
        self.tracer
            .on_eval_end(span_id, EvalKind::Function, &outcome);
        approx
    }

    /// `setToFun(T, f)`: the extension on L¹ if `f` is integrable, zero otherwise.
    pub fn set_to_fun<I: Integrand<M, E> + ?Sized>(&self, f: &I) -> F {
        self.set_to_fun_approx(f).value
    }

    fn sum_simple(&self, span_id: SpanId, f: &SimpleFunction<M, E>) -> F {
        self.tracer.on_simple_sum(span_id, f.piece_count());
        f.set_to_simple_func(self.set_function())
    }

    fn eval_l1(&self, span_id: SpanId, f: &L1<M, E>) -> Approximation<F> {
        if let Some(simple) = f.as_simple() {
            return Approximation::exact(self.sum_simple(span_id, simple.representative()));
        }
        let approx = self.extension.extend(f.point());
        if let Some(depth) = approx.depth {
            self.tracer
                .on_limit_cutoff(span_id, depth, approx.error_bound);
        }
        approx
    }

    fn classify_in<I: Integrand<M, E> + ?Sized>(
        &self,
        span_id: SpanId,
        f: &I,
    ) -> Integrability<M, E> {
        let result = f.classify_with(self.measure(), self.config());
        let classification = match &result {
            Integrability::Integrable(class) => Classification::Integrable {
                embedded: class.as_simple().is_some(),
            },
            Integrability::NotIntegrable(reason) => Classification::NotIntegrable {
                reason: reason.clone(),
            },
        };
        self.tracer.on_classified(span_id, &classification);
        result
    }
}

fn outcome_of<F>(approx: &Approximation<F>) -> EvalOutcome {
    match approx.depth {
        None => EvalOutcome::Exact,
        Some(depth) => EvalOutcome::Approximate {
            depth,
            error_bound: approx.error_bound,
        },
    }
}
