//! Dominated finitely-additive set functions `T : Set → (E →L F)`.

use std::fmt;
use std::sync::Arc;

use crate::error::MeasureError;
use crate::normed::{ContinuousLinearMap, Normed, NormedSpace};
use crate::space::MeasureSpace;

type Family<S, E, F> = Arc<dyn Fn(&S) -> ContinuousLinearMap<E, F> + Send + Sync>;

/// Slack allowed when comparing reported norm bounds against `C · μ(s)`.
const BOUND_SLACK: f64 = 1e-9;

/// A set function that is additive on disjoint sets of finite measure and
/// dominated by the measure.
///
/// # Contract
///
/// For all measurable `s`, `t` with `μ(s), μ(t) < ∞`:
///
/// - if `s ∩ t = ∅` then `T(s ∪ t) = T(s) + T(t)`;
/// - `‖T(s)‖ ≤ C · μ(s).toReal`, where `‖T(s)‖` is the operator norm bound
///   reported by the returned [`ContinuousLinearMap`].
///
/// The contract is assumed, not checked: results of the extensions built on
/// a value that violates it are meaningless. Debug builds assert domination
/// on every [`apply`](Self::apply); [`verify`](Self::verify) checks both
/// conditions on a sample of sets.
///
/// Consequences used throughout the crate: `T(∅) = 0`, and `T(s) = 0`
/// whenever `μ(s) = 0`.
pub struct DominatedAdditive<M: MeasureSpace, E, F> {
    measure: Arc<M>,
    family: Family<M::Set, E, F>,
    bound: f64,
}

impl<M: MeasureSpace, E, F> Clone for DominatedAdditive<M, E, F> {
    fn clone(&self) -> Self {
        Self {
            measure: self.measure.clone(),
            family: self.family.clone(),
            bound: self.bound,
        }
    }
}

impl<M: MeasureSpace, E, F> fmt::Debug for DominatedAdditive<M, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DominatedAdditive")
            .field("measure", &self.measure)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl<M: MeasureSpace, E: NormedSpace, F: NormedSpace> DominatedAdditive<M, E, F> {
    /// Package `family` with its domination constant `bound`.
    ///
    /// Fails with [`MeasureError::InvalidBound`] if `bound` is negative,
    /// infinite or NaN.
    pub fn new(
        measure: Arc<M>,
        bound: f64,
        family: impl Fn(&M::Set) -> ContinuousLinearMap<E, F> + Send + Sync + 'static,
    ) -> Result<Self, MeasureError> {
        if !(bound.is_finite() && bound >= 0.0) {
            return Err(MeasureError::InvalidBound { bound });
        }
        Ok(Self::from_family(measure, bound, family))
    }

    /// [`new`](Self::new) for constants known to be valid.
    pub(crate) fn from_family(
        measure: Arc<M>,
        bound: f64,
        family: impl Fn(&M::Set) -> ContinuousLinearMap<E, F> + Send + Sync + 'static,
    ) -> Self {
        Self {
            measure,
            family: Arc::new(family),
            bound,
        }
    }

    /// The zero set function.
    pub fn zero(measure: Arc<M>) -> Self {
        Self {
            measure,
            family: Arc::new(|_| ContinuousLinearMap::zero()),
            bound: 0.0,
        }
    }

    /// The underlying measure.
    pub fn measure(&self) -> &Arc<M> {
        &self.measure
    }

    /// The domination constant `C`.
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// `T(set)`. The set should be measurable.
    pub fn apply(&self, set: &M::Set) -> ContinuousLinearMap<E, F> {
        let map = (self.family)(set);
        debug_assert!(
            self.dominance_violation(set, &map).is_none(),
            "set function exceeds its domination constant on {:?}",
            set
        );
        map
    }

    /// `T(set)`, rejecting sets outside the σ-algebra.
    pub fn try_apply(&self, set: &M::Set) -> Result<ContinuousLinearMap<E, F>, MeasureError> {
        if !self.measure.is_measurable(set) {
            return Err(MeasureError::NotMeasurable {
                set: format!("{:?}", set),
            });
        }
        Ok(self.apply(set))
    }

    /// `T(⋃ sᵢ)` for pairwise-disjoint measurable sets of finite measure,
    /// computed as `Σ T(sᵢ)`.
    pub fn apply_disjoint_union(
        &self,
        sets: &[M::Set],
    ) -> Result<ContinuousLinearMap<E, F>, MeasureError> {
        for (i, s) in sets.iter().enumerate() {
            if !self.measure.is_measurable(s) {
                return Err(MeasureError::NotMeasurable {
                    set: format!("{:?}", s),
                });
            }
            for (j, t) in sets.iter().enumerate().skip(i + 1) {
                if !self.measure.is_disjoint(s, t) {
                    return Err(MeasureError::NotDisjoint {
                        first: i,
                        second: j,
                    });
                }
            }
        }
        Ok(sets
            .iter()
            .map(|s| self.apply(s))
            .fold(ContinuousLinearMap::zero(), |acc, map| acc.add(&map)))
    }

    /// `s ↦ T(s) + T'(s)`, dominated by `C + C'`.
    pub fn add(&self, other: &Self) -> Self {
        let (a, b) = (self.family.clone(), other.family.clone());
        Self {
            measure: self.measure.clone(),
            family: Arc::new(move |s| a(s).add(&b(s))),
            bound: self.bound + other.bound,
        }
    }

    /// `s ↦ c • T(s)`, dominated by `|c| · C`.
    pub fn smul(&self, c: f64) -> Self {
        let a = self.family.clone();
        Self {
            measure: self.measure.clone(),
            family: Arc::new(move |s| a(s).smul(c)),
            bound: c.abs() * self.bound,
        }
    }

    /// `s ↦ -T(s)`.
    pub fn neg(&self) -> Self {
        self.smul(-1.0)
    }

    /// Check the contract on a sample.
    ///
    /// Verifies `T(∅) = 0`, domination on every finite-measure set of `sets`,
    /// and additivity on every disjoint finite-measure pair, evaluating maps
    /// at each vector of `probes` with absolute tolerance `tolerance`.
    pub fn verify(
        &self,
        sets: &[M::Set],
        probes: &[E],
        tolerance: f64,
    ) -> Result<(), MeasureError> {
        let empty = self.measure.empty();
        let at_empty = (self.family)(&empty);
        if let Some(x) = probes
            .iter()
            .find(|x| at_empty.apply(x).norm() > tolerance)
        {
            return Err(MeasureError::DominanceViolation {
                set: format!("{:?}", empty),
                norm: at_empty.apply(x).norm(),
                allowed: 0.0,
            });
        }

        for s in sets {
            if !self.measure.is_measurable(s) {
                return Err(MeasureError::NotMeasurable {
                    set: format!("{:?}", s),
                });
            }
        }

        let finite: Vec<&M::Set> = sets
            .iter()
            .filter(|s| self.measure.is_finite_measure(s))
            .collect();

        for s in &finite {
            let map = (self.family)(s);
            if let Some(err) = self.dominance_violation(s, &map) {
                return Err(err);
            }
            let allowed = self.bound * self.measure.measure(s).to_real();
            for x in probes {
                let norm = map.apply(x).norm();
                if norm > allowed * x.norm() + tolerance {
                    return Err(MeasureError::DominanceViolation {
                        set: format!("{:?}", s),
                        norm: norm / x.norm().max(f64::MIN_POSITIVE),
                        allowed,
                    });
                }
            }
        }

        for (i, s) in finite.iter().enumerate() {
            for t in finite.iter().skip(i + 1) {
                if !self.measure.is_disjoint(s, t) {
                    continue;
                }
                let union = (self.family)(&self.measure.union(s, t));
                let (ts, tt) = ((self.family)(s), (self.family)(t));
                for x in probes {
                    let difference = union
                        .apply(x)
                        .sub(&ts.apply(x).add(&tt.apply(x)))
                        .norm();
                    if difference > tolerance {
                        return Err(MeasureError::AdditivityViolation {
                            first: format!("{:?}", s),
                            second: format!("{:?}", t),
                            difference,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    fn dominance_violation(
        &self,
        set: &M::Set,
        map: &ContinuousLinearMap<E, F>,
    ) -> Option<MeasureError> {
        let measure = self.measure.measure(set);
        if measure.is_infinite() {
            return None;
        }
        let allowed = self.bound * measure.to_real();
        if map.norm_bound() > allowed * (1.0 + BOUND_SLACK) + BOUND_SLACK {
            Some(MeasureError::DominanceViolation {
                set: format!("{:?}", set),
                norm: map.norm_bound(),
                allowed,
            })
        } else {
            None
        }
    }
}
