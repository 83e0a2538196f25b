//! Law checks against generated inputs.

use crate::generator::{LipschitzCase, Space, Vector};
use bochner::{
    Lebesgue, MeasureError, MeasureSpace, Normed, PointFunction, PointSet, SetToFun,
    SimpleFunction, Tracer,
};
use serde::{Deserialize, Serialize};

/// Property of the extension being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Law {
    /// `T(s ∪ t) = T(s) + T(t)` on disjoint finite-measure sets.
    Additivity,
    /// `setToFun(f + g) = setToFun(f) + setToFun(g)` and `setToFun(c • f) = c • setToFun(f)`.
    Linearity,
    /// Simple integrable functions are evaluated exactly as finite sums.
    Consistency,
    /// `‖setToFun(f)‖ ≤ max(C, 0) · ‖f‖₁`.
    Boundedness,
    /// Non-integrable functions evaluate to zero.
    Fallback,
    /// `setToFun(1_s • x) = T(s)(x)`.
    Indicator,
    /// A simple function and its pointwise form agree.
    Pointwise,
    /// Limits of step approximations land within their error bound.
    LipschitzLimit,
}

impl Law {
    pub fn name(&self) -> &'static str {
        match self {
            Law::Additivity => "additivity",
            Law::Linearity => "linearity",
            Law::Consistency => "consistency",
            Law::Boundedness => "boundedness",
            Law::Fallback => "fallback",
            Law::Indicator => "indicator",
            Law::Pointwise => "pointwise",
            Law::LipschitzLimit => "lipschitz_limit",
        }
    }
}

/// Validation failure information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub trial: u32,
    pub law: Law,
    pub detail: String,
}

/// Result of validation.
#[derive(Debug, Default, Clone)]
pub struct ValidationResult {
    pub successes: u32,
    pub failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.successes += other.successes;
        self.failures.extend(other.failures);
    }
}

/// Checks laws of one extension, accumulating the outcomes.
pub struct Validator<'a, M: MeasureSpace, T> {
    trial: u32,
    ext: &'a SetToFun<M, Vector, Vector, T>,
    tolerance: f64,
    result: ValidationResult,
}

impl<'a, M: MeasureSpace, T: Tracer> Validator<'a, M, T> {
    pub fn new(trial: u32, ext: &'a SetToFun<M, Vector, Vector, T>, tolerance: f64) -> Self {
        Self {
            trial,
            ext,
            tolerance,
            result: ValidationResult::default(),
        }
    }

    pub fn finish(self) -> ValidationResult {
        self.result
    }

    fn record(&mut self, law: Law, ok: bool, detail: impl FnOnce() -> String) {
        if ok {
            self.result.successes += 1;
        } else {
            self.result.failures.push(ValidationFailure {
                trial: self.trial,
                law,
                detail: detail(),
            });
        }
    }

    fn expect_close(&mut self, law: Law, expected: &Vector, actual: &Vector, scale: f64) {
        let allowed = self.tolerance * (1.0 + scale);
        let error = expected.dist(actual);
        self.record(law, error <= allowed, || {
            format!("expected {expected:?}, got {actual:?} (error {error:e} > {allowed:e})")
        });
    }
}

impl<'a, T: Tracer> Validator<'a, Space, T> {
    pub fn check_linearity(
        &mut self,
        f: &SimpleFunction<Space, Vector>,
        g: &SimpleFunction<Space, Vector>,
        c: f64,
    ) {
        let (ef, eg) = (self.ext.set_to_fun(f), self.ext.set_to_fun(g));
        let scale = ef.norm() + eg.norm();
        let sum = self.ext.set_to_fun(&f.add(g));
        self.expect_close(Law::Linearity, &ef.add(&eg), &sum, scale);
        let scaled = self.ext.set_to_fun(&f.smul(c));
        self.expect_close(Law::Linearity, &ef.smul(c), &scaled, scale * c.abs());
    }

    pub fn check_consistency(&mut self, f: &SimpleFunction<Space, Vector>) {
        let approx = self.ext.set_to_fun_approx(f);
        let simple = self.ext.set_to_simple(f);
        self.record(
            Law::Consistency,
            approx.is_exact() && approx.value == simple,
            || format!("set_to_fun gave {approx:?}, finite sum gave {simple:?}"),
        );
    }

    pub fn check_boundedness(&mut self, f: &SimpleFunction<Space, Vector>) {
        let value = self.ext.set_to_fun(f).norm();
        let allowed = self.ext.bound() * f.l1_norm().to_real();
        let slack = self.tolerance * (1.0 + allowed);
        self.record(Law::Boundedness, value <= allowed + slack, || {
            format!("‖setToFun(f)‖ = {value} exceeds C · ‖f‖₁ = {allowed}")
        });
    }

    pub fn check_fallback(&mut self, h: &SimpleFunction<Space, Vector>) {
        let approx = self.ext.set_to_fun_approx(h);
        self.record(
            Law::Fallback,
            approx.value == [0.0; 2] && approx.is_exact(),
            || format!("non-integrable function evaluated to {approx:?}"),
        );
    }

    pub fn check_indicator(&mut self, s: &PointSet, x: &Vector) -> Result<(), MeasureError> {
        let f = SimpleFunction::indicator_const(self.ext.measure().clone(), s.clone(), *x)?;
        let expected = self.ext.set_function().apply(s).apply(x);
        let actual = self.ext.set_to_fun(&f);
        self.expect_close(Law::Indicator, &expected, &actual, expected.norm());
        Ok(())
    }

    pub fn check_additivity(&mut self, s: &PointSet, t: &PointSet, x: &Vector) {
        let set_fn = self.ext.set_function();
        let union = self.ext.measure().union(s, t);
        let whole = set_fn.apply(&union).apply(x);
        let parts = set_fn.apply(s).apply(x).add(&set_fn.apply(t).apply(x));
        self.expect_close(Law::Additivity, &parts, &whole, whole.norm());
    }

    pub fn check_pointwise(&mut self, f: &SimpleFunction<Space, Vector>, g: &PointFunction<Vector>) {
        let expected = self.ext.set_to_fun(f);
        let actual = self.ext.set_to_fun(g);
        self.expect_close(Law::Pointwise, &expected, &actual, expected.norm());
    }
}

impl<'a, T: Tracer> Validator<'a, Lebesgue, T> {
    pub fn check_lipschitz(&mut self, case: &LipschitzCase) {
        let approx = self.ext.set_to_fun_approx(&case.integrand);
        let error = approx.value.dist(&case.exact);
        let allowed = approx.error_bound + self.tolerance * (1.0 + case.exact.norm());
        self.record(Law::LipschitzLimit, error <= allowed, || {
            format!(
                "{:?}: got {:?}, exact {:?} (error {error:e} > {allowed:e})",
                case.integrand, approx.value, case.exact
            )
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bochner::{DiscreteMeasure, DominatedAdditive, NoopTracer};
    use std::sync::Arc;

    fn ext(weights: Vec<f64>) -> SetToFun<Space, Vector, Vector, NoopTracer> {
        let mu = Arc::new(DiscreteMeasure::weighted(weights).unwrap());
        SetToFun::new(DominatedAdditive::weighted_smul(mu))
    }

    #[test]
    fn test_laws_hold_for_weighted_smul() {
        let ext = ext(vec![1.0, 2.0, 0.0]);
        let mu = ext.measure().clone();
        let f = SimpleFunction::constant(mu.clone(), [1.0, -1.0]);
        let g = SimpleFunction::indicator_const(mu, PointSet::from([1]), [3.0, 0.5]).unwrap();

        let mut v = Validator::new(0, &ext, 1e-9);
        v.check_linearity(&f, &g, 2.5);
        v.check_consistency(&f);
        v.check_boundedness(&g);
        v.check_indicator(&PointSet::from([0, 2]), &[4.0, 4.0]).unwrap();
        v.check_additivity(&PointSet::from([0]), &PointSet::from([1]), &[1.0, 1.0]);
        let result = v.finish();

        assert!(result.is_success(), "{:?}", result.failures);
        assert_eq!(result.successes, 6);
    }

    #[test]
    fn test_fallback_failure_is_reported() {
        let ext = ext(vec![1.0, f64::INFINITY]);
        let mu = ext.measure().clone();
        // Integrable, so it does not fall back to zero.
        let f = SimpleFunction::indicator_const(mu, PointSet::from([0]), [1.0, 0.0]).unwrap();

        let mut v = Validator::new(3, &ext, 1e-9);
        v.check_fallback(&f);
        let result = v.finish();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].law, Law::Fallback);
        assert_eq!(result.failures[0].trial, 3);
    }
}
