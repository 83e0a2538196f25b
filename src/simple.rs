//! Simple functions and the evaluation of set functions on them.
//!
//! A [`SimpleFunction`] is stored as a finite measurable partition of the
//! space with one value per piece. A value may label several pieces; the
//! fiber `f⁻¹({x})` is the union of those pieces, and [`canonical`] merges
//! them. Every operation here is correct for either representation: set
//! functions are additive on disjoint sets, so summing over pieces and
//! summing over fibers agree.
//!
//! [`canonical`]: SimpleFunction::canonical

use std::fmt;
use std::sync::Arc;

use crate::ennreal::ENNReal;
use crate::error::MeasureError;
use crate::normed::{self, Normed, NormedSpace};
use crate::set_function::DominatedAdditive;
use crate::space::MeasureSpace;

/// Piece count above which evaluation is summed in parallel.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 4096;

/// A function with finite range and measurable fibers.
///
/// Immutable. Cheap to share, but cloning copies the partition.
pub struct SimpleFunction<M: MeasureSpace, E> {
    space: Arc<M>,
    /// Nonempty, pairwise disjoint, measurable, covering the space.
    pieces: Vec<(M::Set, E)>,
}

impl<M: MeasureSpace, E: Clone> Clone for SimpleFunction<M, E> {
    fn clone(&self) -> Self {
        Self {
            space: self.space.clone(),
            pieces: self.pieces.clone(),
        }
    }
}

impl<M: MeasureSpace, E: fmt::Debug> fmt::Debug for SimpleFunction<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pieces.iter().map(|(set, value)| (set, value)))
            .finish()
    }
}

impl<M: MeasureSpace, E: Clone + PartialEq> SimpleFunction<M, E> {
    /// Build from pieces that partition the whole space.
    ///
    /// Fails if a piece is not measurable, two pieces overlap, or the pieces
    /// miss part of the space.
    pub fn from_partition(
        space: Arc<M>,
        pieces: impl IntoIterator<Item = (M::Set, E)>,
    ) -> Result<Self, MeasureError> {
        let pieces: Vec<_> = pieces.into_iter().collect();
        validate_pieces(space.as_ref(), &pieces)?;

        let covered = pieces
            .iter()
            .fold(space.empty(), |acc, (set, _)| space.union(&acc, set));
        let uncovered = space.compl(&covered);
        if !space.is_empty(&uncovered) {
            return Err(MeasureError::IncompletePartition {
                uncovered: format!("{:?}", uncovered),
            });
        }

        Ok(Self::from_trusted(space, pieces))
    }

    /// Build from pieces already known to be a measurable partition.
    pub(crate) fn from_trusted(space: Arc<M>, pieces: Vec<(M::Set, E)>) -> Self {
        let pieces = pieces
            .into_iter()
            .filter(|(set, _)| !space.is_empty(set))
            .collect();
        Self { space, pieces }
    }

    /// The constant function.
    pub fn constant(space: Arc<M>, value: E) -> Self {
        let univ = space.univ();
        Self::from_trusted(space, vec![(univ, value)])
    }

    /// The measure space this function lives on.
    pub fn space(&self) -> &Arc<M> {
        &self.space
    }

    /// The pieces of the partition with their values.
    pub fn pieces(&self) -> impl Iterator<Item = (&M::Set, &E)> {
        self.pieces.iter().map(|(set, value)| (set, value))
    }

    /// Number of pieces in the partition.
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    /// `f(point)`, or `None` for points outside the space.
    pub fn eval(&self, point: &M::Point) -> Option<&E> {
        self.pieces
            .iter()
            .find(|(set, _)| self.space.contains(set, point))
            .map(|(_, value)| value)
    }

    /// The distinct values taken.
    pub fn range(&self) -> Vec<E> {
        let mut values: Vec<E> = Vec::new();
        for (_, value) in &self.pieces {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
        values
    }

    /// `f⁻¹({value})`.
    pub fn preimage(&self, value: &E) -> M::Set {
        self.pieces
            .iter()
            .filter(|(_, v)| v == value)
            .fold(self.space.empty(), |acc, (set, _)| self.space.union(&acc, set))
    }

    /// The same function with exactly one piece per value.
    pub fn canonical(&self) -> Self {
        let pieces = self
            .range()
            .into_iter()
            .map(|value| (self.preimage(&value), value))
            .collect();
        Self {
            space: self.space.clone(),
            pieces,
        }
    }

    /// `g ∘ f`.
    pub fn map<G: Clone + PartialEq>(&self, g: impl Fn(&E) -> G) -> SimpleFunction<M, G> {
        SimpleFunction {
            space: self.space.clone(),
            pieces: self
                .pieces
                .iter()
                .map(|(set, value)| (set.clone(), g(value)))
                .collect(),
        }
    }

    /// `x ↦ (f(x), g(x))`, on the common refinement of both partitions.
    pub fn pair<G: Clone + PartialEq>(
        &self,
        other: &SimpleFunction<M, G>,
    ) -> SimpleFunction<M, (E, G)> {
        let mut pieces = Vec::with_capacity(self.pieces.len().max(other.pieces.len()));
        for (a, x) in &self.pieces {
            for (b, y) in &other.pieces {
                let set = self.space.inter(a, b);
                if !self.space.is_empty(&set) {
                    pieces.push((set, (x.clone(), y.clone())));
                }
            }
        }
        SimpleFunction {
            space: self.space.clone(),
            pieces,
        }
    }

    /// `x ↦ op(f(x), g(x))`.
    pub fn zip_with<G: Clone + PartialEq, H: Clone + PartialEq>(
        &self,
        other: &SimpleFunction<M, G>,
        op: impl Fn(&E, &G) -> H,
    ) -> SimpleFunction<M, H> {
        self.pair(other).map(|(x, y)| op(x, y))
    }

    /// Returns `true` if `f = g` outside a null set.
    pub fn ae_eq(&self, other: &Self) -> bool {
        self.pair(other)
            .pieces
            .iter()
            .filter(|(_, (x, y))| x != y)
            .map(|(set, _)| self.space.measure(set))
            .sum::<ENNReal>()
            .is_zero()
    }
}

impl<M: MeasureSpace, E: NormedSpace> SimpleFunction<M, E> {
    /// Build from disjoint measurable pieces; the rest of the space maps to zero.
    pub fn from_pieces(
        space: Arc<M>,
        pieces: impl IntoIterator<Item = (M::Set, E)>,
    ) -> Result<Self, MeasureError> {
        let mut pieces: Vec<_> = pieces.into_iter().collect();
        validate_pieces(space.as_ref(), &pieces)?;

        let covered = pieces
            .iter()
            .fold(space.empty(), |acc, (set, _)| space.union(&acc, set));
        pieces.push((space.compl(&covered), E::zero()));
        Ok(Self::from_trusted(space, pieces))
    }

    /// The zero function.
    pub fn zero(space: Arc<M>) -> Self {
        Self::constant(space, E::zero())
    }

    /// `value` on `set`, zero elsewhere.
    pub fn indicator_const(space: Arc<M>, set: M::Set, value: E) -> Result<Self, MeasureError> {
        Self::from_pieces(space, [(set, value)])
    }

    /// `f + g`.
    pub fn add(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x.add(y))
    }

    /// `-f`.
    pub fn neg(&self) -> Self {
        self.map(|x| x.neg())
    }

    /// `f - g`.
    pub fn sub(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x.sub(y))
    }

    /// `c • f`.
    pub fn smul(&self, c: f64) -> Self {
        self.map(|x| x.smul(c))
    }

    /// `x ↦ ‖f(x)‖`.
    pub fn norm_fn(&self) -> SimpleFunction<M, f64> {
        self.map(|x| x.norm())
    }

    /// `∫ ‖f‖ dμ = Σ μ(fiber) · ‖value‖`, with `0 · ∞ = 0`.
    pub fn l1_norm(&self) -> ENNReal {
        self.pieces
            .iter()
            .map(|(set, value)| self.space.measure(set).mul_real(value.norm()))
            .sum()
    }

    /// Returns `true` if every nonzero value has a fiber of finite measure.
    pub fn has_finite_integral(&self) -> bool {
        self.l1_norm().is_finite()
    }

    /// `Σ T(f⁻¹({x}))(x)` over the values `x` of `f`.
    ///
    /// Zero-valued pieces are skipped, so `T` is never consulted on the
    /// (possibly infinite-measure) zero fiber. For integrable `f` the result
    /// is bounded by `C · ‖f‖₁`.
    pub fn set_to_simple_func<F: NormedSpace>(&self, t: &DominatedAdditive<M, E, F>) -> F {
        let term = |(set, value): &(M::Set, E)| {
            if value.is_zero() {
                F::zero()
            } else {
                t.apply(set).apply(value)
            }
        };

        #[cfg(feature = "parallel")]
        if self.pieces.len() >= PARALLEL_THRESHOLD {
            use rayon::prelude::*;
            return self
                .pieces
                .par_iter()
                .map(&term)
                .reduce(F::zero, |a, b| a.add(&b));
        }

        normed::sum(self.pieces.iter().map(term))
    }
}

impl<M: MeasureSpace> SimpleFunction<M, f64> {
    /// `x ↦ max(f(x), 0)`.
    pub fn pos_part(&self) -> Self {
        self.map(|x| x.max(0.0))
    }

    /// `x ↦ max(-f(x), 0)`.
    pub fn neg_part(&self) -> Self {
        self.map(|x| (-x).max(0.0))
    }
}

fn validate_pieces<M: MeasureSpace, E>(
    space: &M,
    pieces: &[(M::Set, E)],
) -> Result<(), MeasureError> {
    for (i, (set, _)) in pieces.iter().enumerate() {
        if !space.is_measurable(set) {
            return Err(MeasureError::NotMeasurable {
                set: format!("{:?}", set),
            });
        }
        for (j, (other, _)) in pieces.iter().enumerate().skip(i + 1) {
            if !space.is_disjoint(set, other) {
                return Err(MeasureError::OverlappingPieces {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrete::{DiscreteMeasure, PointSet};
    use crate::lebesgue::{IntervalSet, Lebesgue};
    use crate::normed::ContinuousLinearMap;

    fn set(points: &[usize]) -> PointSet {
        points.iter().copied().collect()
    }

    fn space(weights: &[f64]) -> Arc<DiscreteMeasure> {
        Arc::new(DiscreteMeasure::weighted(weights.to_vec()).unwrap())
    }

    fn integral_set_fn(
        mu: &Arc<DiscreteMeasure>,
    ) -> DominatedAdditive<DiscreteMeasure, f64, f64> {
        DominatedAdditive::weighted_smul(mu.clone())
    }

    #[test]
    fn test_from_partition_validates() {
        let mu = space(&[1.0, 1.0, 1.0]);
        assert!(SimpleFunction::from_partition(mu.clone(), [(set(&[0, 1]), 1.0), (set(&[2]), 2.0)]).is_ok());
        assert!(matches!(
            SimpleFunction::from_partition(mu.clone(), [(set(&[0, 1]), 1.0), (set(&[1, 2]), 2.0)]),
            Err(MeasureError::OverlappingPieces { first: 0, second: 1 })
        ));
        assert!(matches!(
            SimpleFunction::from_partition(mu, [(set(&[0]), 1.0)]),
            Err(MeasureError::IncompletePartition { .. })
        ));
    }

    #[test]
    fn test_rejects_non_measurable_piece() {
        let mu = Arc::new(
            DiscreteMeasure::from_atoms(vec![(vec![0, 1], ENNReal::ONE), (vec![2], ENNReal::ONE)])
                .unwrap(),
        );
        assert!(matches!(
            SimpleFunction::indicator_const(mu, set(&[0]), 1.0),
            Err(MeasureError::NotMeasurable { .. })
        ));
    }

    #[test]
    fn test_eval_and_range() {
        let mu = space(&[1.0, 1.0, 1.0, 1.0]);
        let f = SimpleFunction::from_pieces(mu, [(set(&[0]), 2.0), (set(&[3]), 2.0)]).unwrap();
        assert_eq!(f.eval(&0), Some(&2.0));
        assert_eq!(f.eval(&1), Some(&0.0));
        assert_eq!(f.eval(&9), None);

        let mut range = f.range();
        range.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(range, vec![0.0, 2.0]);
        assert_eq!(f.preimage(&2.0), set(&[0, 3]));
        assert_eq!(f.canonical().piece_count(), 2);
    }

    #[test]
    fn test_pair_refines_partitions() {
        let mu = space(&[1.0, 1.0, 1.0]);
        let f = SimpleFunction::from_pieces(mu.clone(), [(set(&[0, 1]), 1.0)]).unwrap();
        let g = SimpleFunction::from_pieces(mu, [(set(&[1, 2]), 5.0)]).unwrap();
        let h = f.pair(&g);
        assert_eq!(h.piece_count(), 3);
        assert_eq!(h.eval(&1), Some(&(1.0, 5.0)));
        assert_eq!(f.add(&g).eval(&1), Some(&6.0));
        assert_eq!(f.sub(&g).eval(&2), Some(&-5.0));
    }

    #[test]
    fn test_ae_eq_ignores_null_sets() {
        let mu = space(&[1.0, 0.0, 2.0]);
        let f = SimpleFunction::from_pieces(mu.clone(), [(set(&[0]), 1.0), (set(&[1]), 100.0)]).unwrap();
        let g = SimpleFunction::from_pieces(mu.clone(), [(set(&[0]), 1.0)]).unwrap();
        let h = SimpleFunction::from_pieces(mu, [(set(&[2]), 1.0)]).unwrap();
        assert!(f.ae_eq(&g));
        assert!(!f.ae_eq(&h));
    }

    #[test]
    fn test_l1_norm_and_integrability() {
        let mu = space(&[2.0, f64::INFINITY]);
        let f = SimpleFunction::from_pieces(mu.clone(), [(set(&[0]), -3.0)]).unwrap();
        assert_eq!(f.l1_norm(), ENNReal::new(6.0).unwrap());
        assert!(f.has_finite_integral());

        let g = SimpleFunction::constant(mu, 1.0);
        assert!(!g.has_finite_integral());
    }

    #[test]
    fn test_set_to_simple_func_is_weighted_sum() {
        let mu = space(&[1.0, 2.0, 3.0]);
        let f = SimpleFunction::from_partition(
            mu.clone(),
            [(set(&[0]), 1.0), (set(&[1]), -1.0), (set(&[2]), 2.0)],
        )
        .unwrap();
        // 1·1 + 2·(-1) + 3·2
        assert_eq!(f.set_to_simple_func(&integral_set_fn(&mu)), 5.0);
    }

    #[test]
    fn test_zero_fiber_of_infinite_measure_is_skipped() {
        let mu = space(&[1.0, f64::INFINITY]);
        let f = SimpleFunction::indicator_const(mu.clone(), set(&[0]), 4.0).unwrap();
        assert_eq!(f.set_to_simple_func(&integral_set_fn(&mu)), 4.0);
    }

    #[test]
    fn test_set_to_simple_func_is_linear() {
        let mu = space(&[0.5, 1.0, 1.5, 2.0]);
        let t = integral_set_fn(&mu);
        let f = SimpleFunction::from_pieces(mu.clone(), [(set(&[0, 1]), 2.0), (set(&[3]), -1.0)]).unwrap();
        let g = SimpleFunction::from_pieces(mu, [(set(&[1, 2]), 4.0)]).unwrap();

        let eval = |h: &SimpleFunction<DiscreteMeasure, f64>| h.set_to_simple_func(&t);
        assert!((eval(&f.add(&g)) - (eval(&f) + eval(&g))).abs() < 1e-12);
        assert!((eval(&f.smul(-3.0)) + 3.0 * eval(&f)).abs() < 1e-12);
        assert!((eval(&f.neg()) + eval(&f)).abs() < 1e-12);
        assert!((eval(&f.sub(&g)) - (eval(&f) - eval(&g))).abs() < 1e-12);
        assert_eq!(eval(&SimpleFunction::zero(f.space().clone())), 0.0);
    }

    #[test]
    fn test_canonical_form_evaluates_identically() {
        let mu = space(&[1.0, 2.0, 3.0]);
        let t = integral_set_fn(&mu);
        let f = SimpleFunction::from_partition(
            mu,
            [(set(&[0]), 1.5), (set(&[1]), -2.0), (set(&[2]), 1.5)],
        )
        .unwrap();
        assert_eq!(
            f.set_to_simple_func(&t),
            f.canonical().set_to_simple_func(&t)
        );
    }

    #[test]
    fn test_ae_congruence() {
        let mu = space(&[1.0, 0.0]);
        let t = integral_set_fn(&mu);
        let f = SimpleFunction::from_pieces(mu.clone(), [(set(&[0]), 3.0)]).unwrap();
        let g = SimpleFunction::from_pieces(mu, [(set(&[0]), 3.0), (set(&[1]), -50.0)]).unwrap();
        assert!(f.ae_eq(&g));
        assert_eq!(f.set_to_simple_func(&t), g.set_to_simple_func(&t));
    }

    #[test]
    fn test_norm_bound() {
        let mu = space(&[1.0, 2.0, 0.5]);
        let f = SimpleFunction::from_pieces(
            mu.clone(),
            [(set(&[0]), [1.0, 2.0]), (set(&[2]), [-3.0, 0.5])],
        )
        .unwrap();
        let t = DominatedAdditive::<_, [f64; 2], [f64; 2]>::weighted_smul(mu.clone()).smul(-2.5);
        let value = f.set_to_simple_func(&t);
        assert!(value.norm() <= t.bound() * f.l1_norm().to_real() + 1e-12);

        // The bound is the integral of the pointwise norm.
        let g = f.norm_fn();
        let norm_integral = g.set_to_simple_func(&integral_set_fn(&mu));
        assert!((norm_integral - f.l1_norm().to_real()).abs() < 1e-12);
    }

    #[test]
    fn test_monotone_in_set_function() {
        let mu = space(&[1.0, 2.0, 3.0]);
        let small = integral_set_fn(&mu);
        let large = small.smul(2.0);
        let f = SimpleFunction::from_pieces(mu, [(set(&[0]), 1.0), (set(&[2]), 0.5)]).unwrap();
        // Both families are non-negative on non-negative vectors and `small ≤ large` pointwise.
        assert!(f.set_to_simple_func(&small) <= f.set_to_simple_func(&large));
    }

    #[test]
    fn test_positive_and_negative_parts() {
        let mu = space(&[1.0, 1.0]);
        let f = SimpleFunction::from_partition(mu, [(set(&[0]), 2.0), (set(&[1]), -3.0)]).unwrap();
        let diff = f.pos_part().sub(&f.neg_part());
        assert!(diff.ae_eq(&f));
        assert_eq!(f.neg_part().eval(&1), Some(&3.0));
    }

    #[test]
    fn test_vector_valued_set_function() {
        let mu = Arc::new(Lebesgue);
        let m = mu.clone();
        // T(s) = λ(s) • (x ↦ [x, 2x]), dominated with C = √5.
        let t = DominatedAdditive::new(mu.clone(), 5f64.sqrt(), move |s: &IntervalSet| {
            let w = m.measure(s).to_real();
            ContinuousLinearMap::new(w * 5f64.sqrt(), move |x: &f64| [w * x, 2.0 * w * x])
        })
        .unwrap();
        let f = SimpleFunction::indicator_const(mu, IntervalSet::interval(0.0, 2.0), 1.5).unwrap();
        assert_eq!(f.set_to_simple_func(&t), [3.0, 6.0]);
    }
}
