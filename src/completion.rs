//! The metric completion of a normed space and the extension of bounded
//! linear maps to it.
//!
//! A point of the completion is either a point of the dense subspace or the
//! limit of a Cauchy sequence whose terms carry an upper bound on their
//! distance to the limit. For a *regular* sequence, one with
//! `‖xₙ - xₘ‖ ≤ 2^-min(n, m)`, that bound is `2^-n`. The bound turns
//! extension by continuity into an algorithm: if `L` is `C`-Lipschitz then
//! `L(xₙ)` is within `C · error(n)` of the value of the extension at the
//! limit.

use std::fmt;
use std::sync::Arc;

use crate::config::ExtensionConfig;
use crate::normed::{Normed, NormedSpace};

/// Largest index searched when reindexing a sequence by its error bounds.
const MAX_REINDEX: u32 = 1 << 16;

/// Deepest term evaluated by [`Completion::norm_within`].
const MAX_NORM_DEPTH: u32 = 1000;

/// A bounded linear map `X → F`.
pub trait BoundedLinear<X, F>: Send + Sync {
    /// `L(x)`.
    fn apply(&self, x: &X) -> F;

    /// An upper bound on the operator norm, `‖L(x)‖ ≤ op_norm_bound · ‖x‖`.
    fn op_norm_bound(&self) -> f64;
}

/// A term of a Cauchy sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Term<X> {
    /// The point.
    pub value: X,
    /// Upper bound on the distance from `value` to the limit.
    pub error: f64,
}

/// A Cauchy sequence whose `n`-th term is within `error(n)` of the limit,
/// with `error(n) → 0`.
///
/// Terms are computed on demand and not cached.
pub struct CauchySeq<X> {
    terms: Arc<dyn Fn(u32) -> Term<X> + Send + Sync>,
}

impl<X> Clone for CauchySeq<X> {
    fn clone(&self) -> Self {
        Self {
            terms: self.terms.clone(),
        }
    }
}

impl<X> fmt::Debug for CauchySeq<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CauchySeq").finish_non_exhaustive()
    }
}

impl<X: Normed> CauchySeq<X> {
    /// Wrap a sequence the caller guarantees to be regular. Term `n` is
    /// within `2^-n` of the limit.
    pub fn new(terms: impl Fn(u32) -> X + Send + Sync + 'static) -> Self {
        Self::from_terms(move |n| Term {
            value: terms(n),
            error: modulus(n),
        })
    }

    /// Wrap terms that carry their own distance to the limit.
    pub fn from_terms(terms: impl Fn(u32) -> Term<X> + Send + Sync + 'static) -> Self {
        Self {
            terms: Arc::new(terms),
        }
    }

    /// Build a sequence from approximations with known errors.
    ///
    /// `error(k)` must bound the distance from `approx(k)` to the limit and
    /// tend to zero. Term `n` is the first `approx(k)` with
    /// `error(k) ≤ 2^-n`. The search stops at a fixed index; past it the
    /// term keeps the larger error it actually has.
    pub fn from_approximations(
        approx: impl Fn(u32) -> X + Send + Sync + 'static,
        error: impl Fn(u32) -> f64 + Send + Sync + 'static,
    ) -> Self {
        let error = move |k| {
            let e: f64 = error(k);
            if e.is_nan() {
                f64::INFINITY
            } else {
                e.max(0.0)
            }
        };
        Self::from_terms(move |n| {
            let target = modulus(n);
            let k = (0..MAX_REINDEX)
                .find(|&k| error(k) <= target)
                .unwrap_or(MAX_REINDEX);
            Term {
                value: approx(k),
                error: error(k),
            }
        })
    }

    /// The `n`-th term.
    pub fn term(&self, n: u32) -> X {
        (self.terms)(n).value
    }

    /// The `n`-th term with its distance to the limit.
    pub fn term_with_error(&self, n: u32) -> Term<X> {
        (self.terms)(n)
    }

    /// `n ↦ term(n + k)`.
    pub fn shift(&self, k: u32) -> Self {
        let terms = self.terms.clone();
        Self {
            terms: Arc::new(move |n| terms(n.saturating_add(k))),
        }
    }

    /// Check the regular modulus on all pairs of indices below `depth`.
    pub fn is_regular_up_to(&self, depth: u32, tolerance: f64) -> bool {
        let terms: Vec<X> = (0..depth).map(|n| self.term(n)).collect();
        terms.iter().enumerate().all(|(n, x)| {
            terms.iter().enumerate().skip(n + 1).all(|(_, y)| {
                x.dist(y) <= 0.5f64.powi(n as i32) + tolerance
            })
        })
    }
}

/// `2^-n`.
fn modulus(n: u32) -> f64 {
    0.5f64.powi(n.min(1074) as i32)
}

/// A point of the completion of `X`.
pub enum Completion<X> {
    /// A point of the dense subspace.
    Embedded(X),
    /// The limit of a Cauchy sequence.
    Limit(CauchySeq<X>),
}

impl<X: Clone> Clone for Completion<X> {
    fn clone(&self) -> Self {
        match self {
            Self::Embedded(x) => Self::Embedded(x.clone()),
            Self::Limit(seq) => Self::Limit(seq.clone()),
        }
    }
}

impl<X: fmt::Debug> fmt::Debug for Completion<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded(x) => f.debug_tuple("Embedded").field(x).finish(),
            Self::Limit(seq) => f.debug_tuple("Limit").field(seq).finish(),
        }
    }
}

impl<X: Normed> Completion<X> {
    /// Embed a point of the dense subspace.
    pub fn embed(x: X) -> Self {
        Self::Embedded(x)
    }

    /// The limit of `seq`.
    pub fn limit(seq: CauchySeq<X>) -> Self {
        Self::Limit(seq)
    }

    /// The embedded point, if this is one.
    pub fn as_embedded(&self) -> Option<&X> {
        match self {
            Self::Embedded(x) => Some(x),
            Self::Limit(_) => None,
        }
    }

    /// Term `n` of the sequence converging to `self`; exact for embedded
    /// points.
    pub fn approx(&self, n: u32) -> X {
        self.approx_with_error(n).value
    }

    /// Term `n` with its distance to `self`.
    pub fn approx_with_error(&self, n: u32) -> Term<X> {
        match self {
            Self::Embedded(x) => Term {
                value: x.clone(),
                error: 0.0,
            },
            Self::Limit(seq) => seq.term_with_error(n),
        }
    }

    /// `self + other`.
    pub fn add(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Embedded(x), Self::Embedded(y)) => Self::Embedded(x.add(y)),
            _ => {
                let (a, b) = (self.clone(), other.clone());
                Self::Limit(CauchySeq::from_terms(move |n| {
                    let n = n.saturating_add(1);
                    let (x, y) = (a.approx_with_error(n), b.approx_with_error(n));
                    Term {
                        value: x.value.add(&y.value),
                        error: x.error + y.error,
                    }
                }))
            }
        }
    }

    /// `-self`.
    pub fn neg(&self) -> Self {
        match self {
            Self::Embedded(x) => Self::Embedded(x.neg()),
            Self::Limit(seq) => {
                let seq = seq.clone();
                Self::Limit(CauchySeq::from_terms(move |n| {
                    let term = seq.term_with_error(n);
                    Term {
                        value: term.value.neg(),
                        error: term.error,
                    }
                }))
            }
        }
    }

    /// `self - other`.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// `c • self`.
    pub fn smul(&self, c: f64) -> Self {
        match self {
            Self::Embedded(x) => Self::Embedded(x.smul(c)),
            Self::Limit(seq) => {
                // Shift by k with 2^k ≥ |c| so a regular sequence stays regular.
                let shift = lipschitz_shift(c.abs());
                let seq = seq.shift(shift);
                Self::Limit(CauchySeq::from_terms(move |n| {
                    let term = seq.term_with_error(n);
                    Term {
                        value: term.value.smul(c),
                        error: c.abs() * term.error,
                    }
                }))
            }
        }
    }

    /// `‖self‖`, evaluated at the depth `config` chooses for a 1-Lipschitz
    /// map, with its error bound.
    pub fn norm_approx(&self, config: &ExtensionConfig) -> Approximation<f64> {
        match self {
            Self::Embedded(x) => Approximation::exact(x.norm()),
            Self::Limit(seq) => {
                let depth = config.depth_for(1.0);
                let term = seq.term_with_error(depth);
                Approximation {
                    value: term.value.norm(),
                    error_bound: term.error,
                    depth: Some(depth),
                }
            }
        }
    }

    /// `‖self‖` within `tolerance`, as far as the terms of the sequence
    /// reach it.
    pub fn norm_within(&self, tolerance: f64) -> f64 {
        let config = ExtensionConfig::default()
            .with_tolerance(tolerance)
            .with_max_depth(MAX_NORM_DEPTH);
        self.norm_approx(&config).value
    }

    /// `‖self - other‖` within `tolerance`.
    pub fn dist_within(&self, other: &Self, tolerance: f64) -> f64 {
        self.sub(other).norm_within(tolerance)
    }
}

/// Smallest `k` with `2^k ≥ lipschitz`.
fn lipschitz_shift(lipschitz: f64) -> u32 {
    if lipschitz <= 1.0 {
        0
    } else if lipschitz.is_finite() {
        lipschitz.log2().ceil() as u32
    } else {
        1024
    }
}

/// The value of an extended map at a point, with its error.
#[derive(Debug, Clone, PartialEq)]
pub struct Approximation<F> {
    /// The computed value.
    pub value: F,
    /// Upper bound on the distance from `value` to the exact value.
    pub error_bound: f64,
    /// Index of the Cauchy term evaluated; `None` for exact evaluation.
    pub depth: Option<u32>,
}

impl<F> Approximation<F> {
    /// An exactly computed value.
    pub fn exact(value: F) -> Self {
        Self {
            value,
            error_bound: 0.0,
            depth: None,
        }
    }

    /// Returns `true` if no Cauchy term was involved.
    pub fn is_exact(&self) -> bool {
        self.depth.is_none()
    }
}

/// The unique continuous extension of a bounded linear map from a dense
/// subspace to its completion.
pub struct LipschitzExtension<L> {
    inner: L,
    config: ExtensionConfig,
}

impl<L: Clone> Clone for LipschitzExtension<L> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: self.config,
        }
    }
}

impl<L: fmt::Debug> fmt::Debug for LipschitzExtension<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LipschitzExtension")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}

impl<L> LipschitzExtension<L> {
    /// Extend `inner` using `config` to evaluate limits.
    pub fn new(inner: L, config: ExtensionConfig) -> Self {
        Self { inner, config }
    }

    /// The map on the dense subspace.
    pub fn inner(&self) -> &L {
        &self.inner
    }

    /// The evaluation configuration.
    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Evaluate the extension at `point`.
    ///
    /// Embedded points are evaluated exactly. Limits are evaluated at the
    /// depth chosen by [`ExtensionConfig::depth_for`] for the operator norm
    /// bound of `inner`, with error `C · error(depth)` of that term.
    pub fn extend<X, F>(&self, point: &Completion<X>) -> Approximation<F>
    where
        X: Normed,
        F: NormedSpace,
        L: BoundedLinear<X, F>,
    {
        match point {
            Completion::Embedded(x) => Approximation::exact(self.inner.apply(x)),
            Completion::Limit(seq) => {
                let lipschitz = self.inner.op_norm_bound().max(0.0);
                let depth = self.config.depth_for(lipschitz);
                let term = seq.term_with_error(depth);
                Approximation {
                    value: self.inner.apply(&term.value),
                    error_bound: lipschitz * term.error,
                    depth: Some(depth),
                }
            }
        }
    }
}

impl<X, F, L> BoundedLinear<Completion<X>, F> for LipschitzExtension<L>
where
    X: Normed,
    F: NormedSpace,
    L: BoundedLinear<X, F>,
{
    fn apply(&self, x: &Completion<X>) -> F {
        self.extend(x).value
    }

    fn op_norm_bound(&self) -> f64 {
        self.inner.op_norm_bound()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Partial sums of `Σ 2^-(k+1)`, converging to 1.
    fn geometric() -> CauchySeq<f64> {
        CauchySeq::new(|n| 1.0 - 0.5f64.powi(n as i32 + 1))
    }

    struct Doubling;

    impl BoundedLinear<f64, f64> for Doubling {
        fn apply(&self, x: &f64) -> f64 {
            2.0 * x
        }

        fn op_norm_bound(&self) -> f64 {
            2.0
        }
    }

    #[test]
    fn test_geometric_sequence_is_regular() {
        assert!(geometric().is_regular_up_to(12, 0.0));
        let irregular = CauchySeq::new(|n| if n == 0 { 5.0 } else { 0.0 });
        assert!(!irregular.is_regular_up_to(3, 0.0));
    }

    #[test]
    fn test_approx_is_within_modulus() {
        let x = Completion::limit(geometric());
        for n in 0..20 {
            assert!((x.approx(n) - 1.0).abs() <= 0.5f64.powi(n as i32));
        }
        assert_eq!(Completion::embed(3.0).approx(7), 3.0);
    }

    #[test]
    fn test_arithmetic_on_limits() {
        let x = Completion::limit(geometric());
        let y = Completion::embed(2.0);
        assert!((x.add(&y).norm_within(1e-9) - 3.0).abs() < 1e-9);
        assert!((x.sub(&y).norm_within(1e-9) - 1.0).abs() < 1e-9);
        assert!((x.smul(-10.0).norm_within(1e-9) - 10.0).abs() < 1e-9);
        assert!((x.neg().dist_within(&Completion::embed(-1.0), 1e-9)).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_limit_stays_regular() {
        let x = Completion::limit(geometric()).smul(100.0);
        match x {
            Completion::Limit(seq) => assert!(seq.is_regular_up_to(10, 1e-12)),
            Completion::Embedded(_) => panic!("expected a limit"),
        }
    }

    #[test]
    fn test_from_approximations_reindexes() {
        // approx(k) = 1 + 1/(k+1) with error 1/(k+1).
        let seq = CauchySeq::from_approximations(|k| 1.0 + 1.0 / (k as f64 + 1.0), |k| {
            1.0 / (k as f64 + 1.0)
        });
        assert!(seq.is_regular_up_to(8, 1e-12));
        let term = seq.term_with_error(8);
        assert_eq!(term.error, 1.0 / 256.0);
        assert!((term.value - 1.0).abs() <= term.error);
    }

    #[test]
    fn test_slow_approximations_report_their_error() {
        // Reaching 2^-21 would need two million approximations.
        let seq = CauchySeq::from_approximations(|k| 1.0 + 1.0 / (k as f64 + 1.0), |k| {
            1.0 / (k as f64 + 1.0)
        });
        let ext = LipschitzExtension::new(Doubling, ExtensionConfig::default());
        let value: Approximation<f64> = ext.extend(&Completion::limit(seq));
        assert!(value.error_bound > ExtensionConfig::default().tolerance);
        assert!((value.value - 2.0).abs() <= value.error_bound + 1e-12);
    }

    #[test]
    fn test_nan_errors_are_never_accepted() {
        let seq = CauchySeq::from_approximations(|k| k as f64, |_| f64::NAN);
        let term = seq.term_with_error(0);
        assert_eq!(term.error, f64::INFINITY);
    }

    #[test]
    fn test_errors_propagate_through_arithmetic() {
        let x = Completion::limit(geometric());
        let y = Completion::embed(2.0);
        let sum = x.add(&y).approx_with_error(4);
        assert!(sum.error <= 0.5f64.powi(5));
        assert!((sum.value - 3.0).abs() <= sum.error);
        let scaled = x.smul(-8.0).approx_with_error(4);
        assert!((scaled.value + 8.0).abs() <= scaled.error);
        assert_eq!(y.approx_with_error(9).error, 0.0);
    }

    #[test]
    fn test_norm_within_goes_past_default_depth() {
        let x = Completion::limit(geometric());
        let norm = x.norm_within(1e-15);
        assert!((norm - 1.0).abs() <= 1e-15);
        let approx = x.norm_approx(&ExtensionConfig::default().with_max_depth(3));
        assert_eq!(approx.depth, Some(3));
        assert_eq!(approx.error_bound, 0.125);
    }

    #[test]
    fn test_extension_exact_on_dense_subspace() {
        let ext = LipschitzExtension::new(Doubling, ExtensionConfig::default());
        let value: Approximation<f64> = ext.extend(&Completion::embed(1.5));
        assert_eq!(value, Approximation::exact(3.0));
        assert!(value.is_exact());
    }

    #[test]
    fn test_extension_error_bound_holds() {
        let config = ExtensionConfig::default().with_tolerance(1e-4);
        let ext = LipschitzExtension::new(Doubling, config);
        let value: Approximation<f64> = ext.extend(&Completion::limit(geometric()));
        assert!(value.error_bound <= 1e-4);
        assert!((value.value - 2.0).abs() <= value.error_bound);
        // 2 / 1e-4 = 20000 -> 2^15
        assert_eq!(value.depth, Some(15));
    }

    #[test]
    fn test_extension_respects_max_depth() {
        let config = ExtensionConfig::default().with_tolerance(1e-9).with_max_depth(5);
        let ext = LipschitzExtension::new(Doubling, config);
        let value: Approximation<f64> = ext.extend(&Completion::limit(geometric()));
        assert_eq!(value.depth, Some(5));
        assert_eq!(value.error_bound, 2.0 / 32.0);
        assert!((value.value - 2.0).abs() <= value.error_bound);
    }

    #[test]
    fn test_extension_is_linear() {
        let ext = LipschitzExtension::new(Doubling, ExtensionConfig::default());
        let x = Completion::limit(geometric());
        let y = Completion::embed(0.25);
        let lhs: f64 = ext.apply(&x.add(&y).smul(3.0));
        let (fx, fy): (f64, f64) = (ext.apply(&x), ext.apply(&y));
        let rhs = 3.0 * (fx + fy);
        assert!((lhs - rhs).abs() < 1e-5);
    }
}
