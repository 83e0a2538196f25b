//! Integrable simple functions and the extension of a set function to them.

use std::fmt;
use std::sync::Arc;

use crate::completion::BoundedLinear;
use crate::ennreal::ENNReal;
use crate::error::{MeasureError, NotIntegrableReason};
use crate::normed::{Normed, NormedSpace};
use crate::set_function::DominatedAdditive;
use crate::simple::SimpleFunction;
use crate::space::MeasureSpace;

/// A simple function with `∫ ‖f‖ dμ < ∞`, up to equality almost everywhere.
///
/// Normed by `‖f‖₁ = Σ μ(fiber).toReal · ‖value‖`. This is the dense
/// subspace of L¹ the completion is built from.
pub struct L1Simple<M: MeasureSpace, E> {
    func: SimpleFunction<M, E>,
}

impl<M: MeasureSpace, E: Clone> Clone for L1Simple<M, E> {
    fn clone(&self) -> Self {
        Self {
            func: self.func.clone(),
        }
    }
}

impl<M: MeasureSpace, E: fmt::Debug> fmt::Debug for L1Simple<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("L1Simple").field(&self.func).finish()
    }
}

impl<M: MeasureSpace, E: NormedSpace> L1Simple<M, E> {
    /// Wrap an integrable simple function.
    pub fn new(func: SimpleFunction<M, E>) -> Result<Self, NotIntegrableReason> {
        if let Some((_, value)) = func.pieces().find(|(_, v)| !v.norm().is_finite()) {
            return Err(NotIntegrableReason::NonFinite {
                detail: format!("{:?}", value),
            });
        }
        if !func.has_finite_integral() {
            return Err(NotIntegrableReason::InfiniteIntegral);
        }
        Ok(Self { func })
    }

    /// The zero class.
    pub fn zero(space: Arc<M>) -> Self {
        Self {
            func: SimpleFunction::zero(space),
        }
    }

    /// `value` on `set`, zero elsewhere. `set` must have finite measure
    /// unless `value` is zero.
    pub fn indicator_const(space: Arc<M>, set: M::Set, value: E) -> Result<Self, MeasureError> {
        let func = SimpleFunction::indicator_const(space, set, value)?;
        Ok(Self::new(func)?)
    }

    /// A representative of the class.
    pub fn representative(&self) -> &SimpleFunction<M, E> {
        &self.func
    }

    /// Unwrap into a representative.
    pub fn into_simple(self) -> SimpleFunction<M, E> {
        self.func
    }

    /// The measure space this class lives on.
    pub fn space(&self) -> &Arc<M> {
        self.func.space()
    }

    /// `‖f‖₁` as an extended real; always finite.
    pub fn l1_norm(&self) -> ENNReal {
        self.func.l1_norm()
    }

    /// Build from a representative known to be integrable.
    pub(crate) fn from_trusted(func: SimpleFunction<M, E>) -> Self {
        debug_assert!(func.has_finite_integral());
        Self { func }
    }
}

impl<M: MeasureSpace, E: NormedSpace> PartialEq for L1Simple<M, E> {
    fn eq(&self, other: &Self) -> bool {
        self.func.ae_eq(&other.func)
    }
}

impl<M: MeasureSpace, E: NormedSpace> Normed for L1Simple<M, E> {
    fn add(&self, other: &Self) -> Self {
        Self::from_trusted(self.func.add(&other.func))
    }

    fn neg(&self) -> Self {
        Self::from_trusted(self.func.neg())
    }

    fn sub(&self, other: &Self) -> Self {
        Self::from_trusted(self.func.sub(&other.func))
    }

    fn smul(&self, c: f64) -> Self {
        Self::from_trusted(self.func.smul(c))
    }

    fn norm(&self) -> f64 {
        self.func.l1_norm().to_real()
    }
}

/// [`SimpleFunction::set_to_simple_func`] as a bounded linear map on
/// integrable simple functions, with operator norm at most `C`.
pub struct SimpleExtension<M: MeasureSpace, E, F> {
    set_fn: DominatedAdditive<M, E, F>,
}

impl<M: MeasureSpace, E, F> Clone for SimpleExtension<M, E, F> {
    fn clone(&self) -> Self {
        Self {
            set_fn: self.set_fn.clone(),
        }
    }
}

impl<M: MeasureSpace, E, F> fmt::Debug for SimpleExtension<M, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleExtension")
            .field("set_fn", &self.set_fn)
            .finish()
    }
}

impl<M: MeasureSpace, E: NormedSpace, F: NormedSpace> SimpleExtension<M, E, F> {
    /// Extension of `set_fn` to integrable simple functions.
    pub fn new(set_fn: DominatedAdditive<M, E, F>) -> Self {
        Self { set_fn }
    }

    /// The underlying set function.
    pub fn set_function(&self) -> &DominatedAdditive<M, E, F> {
        &self.set_fn
    }
}

impl<M: MeasureSpace, E: NormedSpace, F: NormedSpace> BoundedLinear<L1Simple<M, E>, F>
    for SimpleExtension<M, E, F>
{
    fn apply(&self, x: &L1Simple<M, E>) -> F {
        x.representative().set_to_simple_func(&self.set_fn)
    }

    fn op_norm_bound(&self) -> f64 {
        self.set_fn.bound().max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrete::{DiscreteMeasure, PointSet};

    fn set(points: &[usize]) -> PointSet {
        points.iter().copied().collect()
    }

    fn space(weights: &[f64]) -> Arc<DiscreteMeasure> {
        Arc::new(DiscreteMeasure::weighted(weights.to_vec()).unwrap())
    }

    #[test]
    fn test_rejects_infinite_integral() {
        let mu = space(&[1.0, f64::INFINITY]);
        let f = SimpleFunction::constant(mu.clone(), 1.0);
        assert!(matches!(
            L1Simple::new(f),
            Err(NotIntegrableReason::InfiniteIntegral)
        ));
        assert!(L1Simple::indicator_const(mu, set(&[1]), 2.0).is_err());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mu = space(&[1.0, 1.0]);
        let f = SimpleFunction::indicator_const(mu, set(&[0]), f64::NAN).unwrap();
        assert!(matches!(
            L1Simple::new(f),
            Err(NotIntegrableReason::NonFinite { .. })
        ));
    }

    #[test]
    fn test_norm_and_vector_operations() {
        let mu = space(&[1.0, 2.0, f64::INFINITY]);
        let f = L1Simple::indicator_const(mu.clone(), set(&[0]), 3.0).unwrap();
        let g = L1Simple::indicator_const(mu.clone(), set(&[1]), -1.0).unwrap();
        assert_eq!(f.norm(), 3.0);
        assert_eq!(g.norm(), 2.0);
        assert_eq!(f.add(&g).norm(), 5.0);
        assert_eq!(f.smul(-2.0).norm(), 6.0);
        assert_eq!(f.dist(&f), 0.0);
        assert_eq!(f.sub(&f), L1Simple::zero(mu));
    }

    #[test]
    fn test_equality_is_almost_everywhere() {
        let mu = space(&[1.0, 0.0]);
        let f = L1Simple::indicator_const(mu.clone(), set(&[0]), 1.0).unwrap();
        let g = L1Simple::new(
            SimpleFunction::from_partition(mu, [(set(&[0]), 1.0), (set(&[1]), 7.0)]).unwrap(),
        )
        .unwrap();
        assert_eq!(f, g);
        assert_eq!(f.dist(&g), 0.0);
    }

    #[test]
    fn test_extension_is_bounded_by_constant() {
        let mu = space(&[0.5, 1.5]);
        let t = DominatedAdditive::<_, f64, f64>::weighted_smul(mu.clone()).smul(3.0);
        let ext = SimpleExtension::new(t);
        assert_eq!(ext.op_norm_bound(), 3.0);

        let f = L1Simple::new(
            SimpleFunction::from_partition(mu, [(set(&[0]), 2.0), (set(&[1]), -4.0)]).unwrap(),
        )
        .unwrap();
        // 3 · (0.5·2 + 1.5·(-4)) = -15
        assert_eq!(ext.apply(&f), -15.0);
        assert!(ext.apply(&f).norm() <= ext.op_norm_bound() * f.norm() + 1e-12);
    }
}
