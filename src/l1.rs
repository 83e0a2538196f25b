//! L¹: the completion of the integrable simple functions.

use std::fmt;
use std::sync::Arc;

use crate::completion::{Approximation, CauchySeq, Completion};
use crate::config::ExtensionConfig;
use crate::l1_simple::L1Simple;
use crate::normed::{Normed, NormedSpace};
use crate::space::MeasureSpace;

/// An integrable function, as a point of the completion of [`L1Simple`].
///
/// Either an integrable simple function or the L¹ limit of a Cauchy
/// sequence of them whose terms know their distance to the limit.
pub struct L1<M: MeasureSpace, E> {
    point: Completion<L1Simple<M, E>>,
}

impl<M: MeasureSpace, E: Clone> Clone for L1<M, E> {
    fn clone(&self) -> Self {
        Self {
            point: self.point.clone(),
        }
    }
}

impl<M: MeasureSpace, E: fmt::Debug> fmt::Debug for L1<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("L1").field(&self.point).finish()
    }
}

impl<M: MeasureSpace, E: NormedSpace> L1<M, E> {
    /// The zero class.
    pub fn zero(space: Arc<M>) -> Self {
        Self::from_simple(L1Simple::zero(space))
    }

    /// Embed an integrable simple function.
    pub fn from_simple(func: L1Simple<M, E>) -> Self {
        Self {
            point: Completion::embed(func),
        }
    }

    /// The limit of a Cauchy sequence in the L¹ norm.
    pub fn from_cauchy(seq: CauchySeq<L1Simple<M, E>>) -> Self {
        Self {
            point: Completion::limit(seq),
        }
    }

    /// The limit of `approx(k)`, where `error(k)` bounds the L¹ distance from
    /// `approx(k)` to the limit and tends to zero.
    pub fn from_approximations(
        approx: impl Fn(u32) -> L1Simple<M, E> + Send + Sync + 'static,
        error: impl Fn(u32) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::from_cauchy(CauchySeq::from_approximations(approx, error))
    }

    /// The point of the completion.
    pub fn point(&self) -> &Completion<L1Simple<M, E>> {
        &self.point
    }

    /// The simple function, if this class has one as its representation.
    pub fn as_simple(&self) -> Option<&L1Simple<M, E>> {
        self.point.as_embedded()
    }

    /// Term `n` of the sequence converging to this class.
    pub fn approx(&self, n: u32) -> L1Simple<M, E> {
        self.point.approx(n)
    }

    /// `‖f‖₁` at the depth `config` chooses, with its error bound.
    pub fn norm_approx(&self, config: &ExtensionConfig) -> Approximation<f64> {
        self.point.norm_approx(config)
    }

    /// `f + g`.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            point: self.point.add(&other.point),
        }
    }

    /// `-f`.
    pub fn neg(&self) -> Self {
        Self {
            point: self.point.neg(),
        }
    }

    /// `f - g`.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            point: self.point.sub(&other.point),
        }
    }

    /// `c • f`.
    pub fn smul(&self, c: f64) -> Self {
        Self {
            point: self.point.smul(c),
        }
    }

    /// `‖f‖₁` within `tolerance`.
    pub fn norm_within(&self, tolerance: f64) -> f64 {
        self.point.norm_within(tolerance)
    }

    /// `‖f - g‖₁` within `tolerance`.
    pub fn dist_within(&self, other: &Self, tolerance: f64) -> f64 {
        self.point.dist_within(&other.point, tolerance)
    }
}

impl<M: MeasureSpace, E: NormedSpace> From<L1Simple<M, E>> for L1<M, E> {
    fn from(func: L1Simple<M, E>) -> Self {
        Self::from_simple(func)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrete::{DiscreteMeasure, PointSet};

    fn set(points: &[usize]) -> PointSet {
        points.iter().copied().collect()
    }

    #[test]
    fn test_simple_classes_stay_embedded() {
        let mu = Arc::new(DiscreteMeasure::counting(2));
        let f: L1<_, f64> = L1Simple::indicator_const(mu.clone(), set(&[0]), 2.0)
            .unwrap()
            .into();
        let g = L1::from_simple(L1Simple::indicator_const(mu, set(&[1]), -1.0).unwrap());
        let h = f.add(&g).smul(2.0);
        assert!(h.as_simple().is_some());
        assert_eq!(h.norm_within(1e-9), 6.0);
    }

    #[test]
    fn test_limit_norm() {
        let mu = Arc::new(DiscreteMeasure::counting(1));
        let m = mu.clone();
        // 1 - 2^-(k+1) on the single point, converging to 1.
        let f = L1::from_cauchy(CauchySeq::new(move |k| {
            L1Simple::indicator_const(m.clone(), set(&[0]), 1.0 - 0.5f64.powi(k as i32 + 1))
                .unwrap()
        }));
        assert!(f.as_simple().is_none());
        assert!((f.norm_within(1e-6) - 1.0).abs() <= 1e-6);

        let one = L1::from_simple(L1Simple::indicator_const(mu, set(&[0]), 1.0).unwrap());
        assert!(f.dist_within(&one, 1e-6) <= 1e-6);
        assert!(f.approx(3).dist(&one.approx(0)) <= 0.5f64.powi(3));
    }

    #[test]
    fn test_slow_approximations_keep_honest_norm() {
        use crate::lebesgue::{IntervalSet, Lebesgue};

        let mu = Arc::new(Lebesgue);
        // 1 on [0, 1 + 1/(k+1)), within 1/(k+1) of 1 on [0, 1).
        let f = L1::from_approximations(
            move |k| {
                let end = 1.0 + 1.0 / (k as f64 + 1.0);
                L1Simple::indicator_const(mu.clone(), IntervalSet::interval(0.0, end), 1.0)
                    .unwrap()
            },
            |k| 1.0 / (k as f64 + 1.0),
        );
        let config = ExtensionConfig::default();
        let norm = f.norm_approx(&config);
        assert!(norm.error_bound > config.tolerance);
        assert!((norm.value - 1.0).abs() <= norm.error_bound + 1e-12);
    }
}
