//! Normed vector spaces and bounded linear maps between them.
//!
//! [`Normed`] is the single abstraction every vector-valued operation in this
//! crate is generic over: values of simple functions, codomains of set
//! functions, integrable simple functions and the points of their completion.

use std::fmt::{self, Debug};
use std::sync::Arc;

/// A real normed vector space, without a distinguished zero.
///
/// Elements whose zero depends on runtime data (for example integrable
/// simple functions, whose zero lives on a particular measure space) only
/// implement this trait; see [`NormedSpace`] for the full interface.
///
/// Implementations must satisfy the vector space axioms, the triangle
/// inequality and `‖c • x‖ = |c| · ‖x‖`.
pub trait Normed: Clone + Send + Sync + 'static {
    /// `self + other`.
    fn add(&self, other: &Self) -> Self;

    /// `-self`.
    fn neg(&self) -> Self;

    /// `self - other`.
    fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// `c • self`.
    fn smul(&self, c: f64) -> Self;

    /// `‖self‖`.
    fn norm(&self) -> f64;

    /// `‖self - other‖`.
    fn dist(&self, other: &Self) -> f64 {
        self.sub(other).norm()
    }
}

/// A normed vector space with a statically known zero.
///
/// Codomains of set functions must be complete (Banach); every implementation
/// shipped here is finite dimensional and therefore complete.
pub trait NormedSpace: Normed + PartialEq + Debug {
    /// The additive identity.
    fn zero() -> Self;

    /// Returns `true` for the additive identity.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl Normed for f64 {
    #[inline]
    fn add(&self, other: &Self) -> Self {
        self + other
    }

    #[inline]
    fn neg(&self) -> Self {
        -self
    }

    #[inline]
    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    #[inline]
    fn smul(&self, c: f64) -> Self {
        c * self
    }

    #[inline]
    fn norm(&self) -> f64 {
        self.abs()
    }
}

impl NormedSpace for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }
}

/// Euclidean space `ℝᴺ`.
impl<const N: usize> Normed for [f64; N] {
    fn add(&self, other: &Self) -> Self {
        std::array::from_fn(|i| self[i] + other[i])
    }

    fn neg(&self) -> Self {
        self.map(|x| -x)
    }

    fn sub(&self, other: &Self) -> Self {
        std::array::from_fn(|i| self[i] - other[i])
    }

    fn smul(&self, c: f64) -> Self {
        self.map(|x| c * x)
    }

    fn norm(&self) -> f64 {
        self.iter().map(|x| x * x).sum::<f64>().sqrt()
    }
}

impl<const N: usize> NormedSpace for [f64; N] {
    fn zero() -> Self {
        [0.0; N]
    }
}

/// Sum of a sequence of vectors, `0` when empty.
pub fn sum<F: NormedSpace>(items: impl IntoIterator<Item = F>) -> F {
    items
        .into_iter()
        .fold(F::zero(), |acc, item| acc.add(&item))
}

/// A continuous linear map `E →L F`.
///
/// Stores the map together with an upper bound on its operator norm. The
/// bound is part of the value's contract: `‖apply(x)‖ ≤ norm_bound() · ‖x‖`
/// for every `x`. Constructors that derive maps from other maps (`add`,
/// `smul`, ...) derive the bound accordingly.
///
/// Cheap to clone; the map itself is behind an `Arc`.
pub struct ContinuousLinearMap<E, F> {
    map: Arc<dyn Fn(&E) -> F + Send + Sync>,
    norm_bound: f64,
}

impl<E, F> Clone for ContinuousLinearMap<E, F> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
            norm_bound: self.norm_bound,
        }
    }
}

impl<E, F> Debug for ContinuousLinearMap<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContinuousLinearMap")
            .field("norm_bound", &self.norm_bound)
            .finish_non_exhaustive()
    }
}

impl<E: NormedSpace, F: NormedSpace> ContinuousLinearMap<E, F> {
    /// Wrap a linear map whose operator norm is at most `norm_bound`.
    ///
    /// Linearity and the bound are the caller's contract.
    pub fn new(norm_bound: f64, map: impl Fn(&E) -> F + Send + Sync + 'static) -> Self {
        debug_assert!(norm_bound >= 0.0, "negative operator norm bound");
        Self {
            map: Arc::new(map),
            norm_bound: norm_bound.max(0.0),
        }
    }

    /// The zero map.
    pub fn zero() -> Self {
        Self::new(0.0, |_| F::zero())
    }

    /// Apply the map.
    #[inline]
    pub fn apply(&self, x: &E) -> F {
        (self.map)(x)
    }

    /// Upper bound on the operator norm.
    #[inline]
    pub fn norm_bound(&self) -> f64 {
        self.norm_bound
    }

    /// Pointwise sum.
    pub fn add(&self, other: &Self) -> Self {
        let (a, b) = (self.map.clone(), other.map.clone());
        Self::new(self.norm_bound + other.norm_bound, move |x| {
            a(x).add(&b(x))
        })
    }

    /// Pointwise negation.
    pub fn neg(&self) -> Self {
        let a = self.map.clone();
        Self::new(self.norm_bound, move |x| a(x).neg())
    }

    /// Pointwise scalar multiple.
    pub fn smul(&self, c: f64) -> Self {
        let a = self.map.clone();
        Self::new(c.abs() * self.norm_bound, move |x| a(x).smul(c))
    }

    /// Returns `true` if both maps agree within `tolerance` on every probe.
    pub fn agrees_on(&self, other: &Self, probes: &[E], tolerance: f64) -> bool {
        probes
            .iter()
            .all(|x| self.apply(x).dist(&other.apply(x)) <= tolerance)
    }
}

impl<E: NormedSpace> ContinuousLinearMap<E, E> {
    /// `x ↦ c • x`, with norm exactly `|c|`.
    pub fn scalar(c: f64) -> Self {
        Self::new(c.abs(), move |x: &E| x.smul(c))
    }

    /// The identity map.
    pub fn identity() -> Self {
        Self::new(1.0, |x: &E| x.clone())
    }
}
