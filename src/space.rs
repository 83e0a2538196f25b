//! Measure spaces: a σ-algebra of sets together with a measure on it.

use std::fmt::Debug;

use crate::ennreal::ENNReal;
use crate::error::MeasureError;

/// A measure space `(α, 𝓜, μ)`.
///
/// Sets are concrete values that support the Boolean operations; the
/// σ-algebra is given by [`is_measurable`](MeasureSpace::is_measurable).
/// Implementations must guarantee:
///
/// - `measure(empty()) = 0`;
/// - `measure` is monotone and additive on disjoint measurable sets;
/// - measurable sets are closed under `union`, `inter`, `diff` and `compl`.
///
/// Values are immutable and shared through `Arc`. Equal values describe
/// the same measure.
pub trait MeasureSpace: Debug + PartialEq + Send + Sync + 'static {
    /// Points of the underlying space.
    type Point: Clone + Debug + Send + Sync;

    /// Subsets of the underlying space.
    type Set: Clone + Debug + PartialEq + Send + Sync + 'static;

    /// `∅`.
    fn empty(&self) -> Self::Set;

    /// The whole space.
    fn univ(&self) -> Self::Set;

    /// `a ∪ b`.
    fn union(&self, a: &Self::Set, b: &Self::Set) -> Self::Set;

    /// `a ∩ b`.
    fn inter(&self, a: &Self::Set, b: &Self::Set) -> Self::Set;

    /// `a \ b`.
    fn diff(&self, a: &Self::Set, b: &Self::Set) -> Self::Set;

    /// Returns `true` if `set` has no points.
    fn is_empty(&self, set: &Self::Set) -> bool;

    /// Returns `true` if `point ∈ set`.
    fn contains(&self, set: &Self::Set, point: &Self::Point) -> bool;

    /// Returns `true` if `set` belongs to the σ-algebra.
    fn is_measurable(&self, set: &Self::Set) -> bool;

    /// `μ(set)`. Meaningful for measurable sets; implementations return an
    /// outer measure otherwise.
    fn measure(&self, set: &Self::Set) -> ENNReal;

    /// `univ \ set`.
    fn compl(&self, set: &Self::Set) -> Self::Set {
        self.diff(&self.univ(), set)
    }

    /// Returns `true` if `a ∩ b = ∅`.
    fn is_disjoint(&self, a: &Self::Set, b: &Self::Set) -> bool {
        self.is_empty(&self.inter(a, b))
    }

    /// Returns `true` if `a ⊆ b`.
    fn is_subset(&self, a: &Self::Set, b: &Self::Set) -> bool {
        self.is_empty(&self.diff(a, b))
    }

    /// Returns `true` if `μ(set) = 0`.
    fn is_null(&self, set: &Self::Set) -> bool {
        self.measure(set).is_zero()
    }

    /// Returns `true` if `μ(set) < ∞`.
    fn is_finite_measure(&self, set: &Self::Set) -> bool {
        self.measure(set).is_finite()
    }

    /// Pass `set` through if it is measurable.
    fn measurable(&self, set: Self::Set) -> Result<Self::Set, MeasureError> {
        if self.is_measurable(&set) {
            Ok(set)
        } else {
            Err(MeasureError::NotMeasurable {
                set: format!("{:?}", set),
            })
        }
    }
}

/// The scaled measure `c • μ` on the same σ-algebra.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaled<M> {
    inner: M,
    factor: ENNReal,
}

impl<M: MeasureSpace> Scaled<M> {
    /// Scale `inner` by `factor`.
    pub fn new(inner: M, factor: ENNReal) -> Self {
        Self { inner, factor }
    }

    /// The unscaled measure.
    pub fn inner(&self) -> &M {
        &self.inner
    }

    /// The scaling factor.
    pub fn factor(&self) -> ENNReal {
        self.factor
    }
}

impl<M: MeasureSpace> MeasureSpace for Scaled<M> {
    type Point = M::Point;
    type Set = M::Set;

    fn empty(&self) -> Self::Set {
        self.inner.empty()
    }

    fn univ(&self) -> Self::Set {
        self.inner.univ()
    }

    fn union(&self, a: &Self::Set, b: &Self::Set) -> Self::Set {
        self.inner.union(a, b)
    }

    fn inter(&self, a: &Self::Set, b: &Self::Set) -> Self::Set {
        self.inner.inter(a, b)
    }

    fn diff(&self, a: &Self::Set, b: &Self::Set) -> Self::Set {
        self.inner.diff(a, b)
    }

    fn is_empty(&self, set: &Self::Set) -> bool {
        self.inner.is_empty(set)
    }

    fn contains(&self, set: &Self::Set, point: &Self::Point) -> bool {
        self.inner.contains(set, point)
    }

    fn is_measurable(&self, set: &Self::Set) -> bool {
        self.inner.is_measurable(set)
    }

    fn measure(&self, set: &Self::Set) -> ENNReal {
        self.factor.mul(self.inner.measure(set))
    }
}
