//! Total functions and their classification into L¹.
//!
//! Anything that can be integrated implements [`Integrand`]: given the
//! measure, it either produces its L¹ class or says why it has none.

use std::fmt;
use std::sync::Arc;

use crate::completion::{CauchySeq, Term};
use crate::config::ExtensionConfig;
use crate::discrete::DiscreteMeasure;
use crate::error::{MeasureError, NotIntegrableReason};
use crate::l1::L1;
use crate::l1_simple::L1Simple;
use crate::lebesgue::{IntervalSet, Lebesgue};
use crate::normed::{Normed, NormedSpace};
use crate::simple::SimpleFunction;
use crate::space::MeasureSpace;

/// Result of classifying a function against a measure.
pub enum Integrability<M: MeasureSpace, E> {
    /// The function is integrable, with this L¹ class.
    Integrable(L1<M, E>),
    /// The function is not integrable.
    NotIntegrable(NotIntegrableReason),
}

impl<M: MeasureSpace, E: fmt::Debug> fmt::Debug for Integrability<M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integrable(class) => f.debug_tuple("Integrable").field(class).finish(),
            Self::NotIntegrable(reason) => f.debug_tuple("NotIntegrable").field(reason).finish(),
        }
    }
}

impl<M: MeasureSpace, E> Integrability<M, E> {
    /// Returns `true` for integrable functions.
    pub fn is_integrable(&self) -> bool {
        matches!(self, Self::Integrable(_))
    }

    /// The L¹ class, if integrable.
    pub fn into_l1(self) -> Option<L1<M, E>> {
        match self {
            Self::Integrable(class) => Some(class),
            Self::NotIntegrable(_) => None,
        }
    }

    /// Why the function is not integrable.
    pub fn reason(&self) -> Option<&NotIntegrableReason> {
        match self {
            Self::Integrable(_) => None,
            Self::NotIntegrable(reason) => Some(reason),
        }
    }
}

impl<M: MeasureSpace, E> From<Result<L1<M, E>, NotIntegrableReason>> for Integrability<M, E> {
    fn from(result: Result<L1<M, E>, NotIntegrableReason>) -> Self {
        match result {
            Ok(class) => Self::Integrable(class),
            Err(reason) => Self::NotIntegrable(reason),
        }
    }
}

/// A function `α → E` that can be classified against a measure on `α`.
pub trait Integrand<M: MeasureSpace, E: NormedSpace> {
    /// The L¹ class of `self` with respect to `measure`, or the reason there
    /// is none.
    fn classify(&self, measure: &Arc<M>) -> Integrability<M, E>;

    /// [`classify`](Self::classify), with approximations of the class sized
    /// by `config`.
    fn classify_with(&self, measure: &Arc<M>, _config: &ExtensionConfig) -> Integrability<M, E> {
        self.classify(measure)
    }
}

/// Simple functions are classified by their pieces under `measure`.
impl<M: MeasureSpace, E: NormedSpace> Integrand<M, E> for SimpleFunction<M, E> {
    fn classify(&self, measure: &Arc<M>) -> Integrability<M, E> {
        if let Some((set, _)) = self.pieces().find(|(set, _)| !measure.is_measurable(set)) {
            return Integrability::NotIntegrable(NotIntegrableReason::NotMeasurable {
                detail: format!("piece {:?}", set),
            });
        }
        let pieces = self
            .pieces()
            .map(|(set, value)| (set.clone(), value.clone()))
            .collect();
        L1Simple::new(SimpleFunction::from_trusted(measure.clone(), pieces))
            .map(L1::from_simple)
            .into()
    }
}

/// Integrable simple classes are classified like their representative.
impl<M: MeasureSpace, E: NormedSpace> Integrand<M, E> for L1Simple<M, E> {
    fn classify(&self, measure: &Arc<M>) -> Integrability<M, E> {
        if same_space(self.space(), measure) {
            return Integrability::Integrable(L1::from_simple(self.clone()));
        }
        self.representative().classify(measure)
    }
}

/// Limits carry norms computed under the measure they were built on, so
/// they only classify against that measure.
impl<M: MeasureSpace, E: NormedSpace> Integrand<M, E> for L1<M, E> {
    fn classify(&self, measure: &Arc<M>) -> Integrability<M, E> {
        if let Some(simple) = self.as_simple() {
            return simple.classify(measure);
        }
        if same_space(self.approx(0).space(), measure) {
            Integrability::Integrable(self.clone())
        } else {
            Integrability::NotIntegrable(NotIntegrableReason::NotMeasurable {
                detail: "limit built over a different measure".to_string(),
            })
        }
    }
}

fn same_space<M: MeasureSpace>(a: &Arc<M>, b: &Arc<M>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

/// An arbitrary function on the points of a [`DiscreteMeasure`].
///
/// Measurable iff constant on every atom; integrable iff in addition every
/// atom of infinite weight maps to zero.
pub struct PointFunction<E> {
    values: Arc<dyn Fn(usize) -> E + Send + Sync>,
}

impl<E> Clone for PointFunction<E> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
        }
    }
}

impl<E> fmt::Debug for PointFunction<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointFunction").finish_non_exhaustive()
    }
}

impl<E: NormedSpace> PointFunction<E> {
    /// `point ↦ values(point)`.
    pub fn new(values: impl Fn(usize) -> E + Send + Sync + 'static) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    /// `point ↦ values[point]`, zero past the end.
    pub fn from_values(values: Vec<E>) -> Self {
        Self::new(move |p| values.get(p).cloned().unwrap_or_else(E::zero))
    }

    /// `f(point)`.
    pub fn eval(&self, point: usize) -> E {
        (self.values)(point)
    }
}

impl<E: NormedSpace> Integrand<DiscreteMeasure, E> for PointFunction<E> {
    fn classify(&self, measure: &Arc<DiscreteMeasure>) -> Integrability<DiscreteMeasure, E> {
        let mut pieces = Vec::with_capacity(measure.atom_count());
        for (index, (atom, _)) in measure.atoms().enumerate() {
            let mut points = atom.iter().copied();
            let Some(first) = points.next() else {
                continue;
            };
            let value = self.eval(first);
            if !value.norm().is_finite() {
                return Integrability::NotIntegrable(NotIntegrableReason::NonFinite {
                    detail: format!("f({first}) = {:?}", value),
                });
            }
            if let Some(p) = points.find(|&p| self.eval(p) != value) {
                return Integrability::NotIntegrable(NotIntegrableReason::NotMeasurable {
                    detail: format!("f is not constant on atom {index}: f({first}) ≠ f({p})"),
                });
            }
            pieces.push((atom.clone(), value));
        }
        L1Simple::new(SimpleFunction::from_trusted(measure.clone(), pieces))
            .map(L1::from_simple)
            .into()
    }
}

/// A Lipschitz function on a bounded interval `[start, end)`, zero elsewhere,
/// integrated against [`Lebesgue`] measure.
///
/// Its L¹ class is the limit of midpoint step functions: with `m` equal
/// steps the L¹ error is at most `K (b - a)² / (4m)`, so term `n` uses
/// `m = ⌈K (b - a)² 2^(n-1)⌉` steps, at most
/// [`ExtensionConfig::max_pieces`]. Each term carries the error of the steps
/// it actually has.
pub struct LipschitzIntegrand<E> {
    start: f64,
    end: f64,
    lipschitz: f64,
    func: Arc<dyn Fn(f64) -> E + Send + Sync>,
}

impl<E> Clone for LipschitzIntegrand<E> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            end: self.end,
            lipschitz: self.lipschitz,
            func: self.func.clone(),
        }
    }
}

impl<E> fmt::Debug for LipschitzIntegrand<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LipschitzIntegrand")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("lipschitz", &self.lipschitz)
            .finish_non_exhaustive()
    }
}

impl<E: NormedSpace> LipschitzIntegrand<E> {
    /// `func` on `[start, end)` with Lipschitz constant `lipschitz`.
    ///
    /// The constant is trusted. Fails if the interval is not finite and
    /// ordered or the constant is negative or not finite.
    pub fn new(
        start: f64,
        end: f64,
        lipschitz: f64,
        func: impl Fn(f64) -> E + Send + Sync + 'static,
    ) -> Result<Self, MeasureError> {
        IntervalSet::bounded(start, end)?;
        if !(lipschitz.is_finite() && lipschitz >= 0.0) {
            return Err(MeasureError::InvalidBound { bound: lipschitz });
        }
        Ok(Self {
            start,
            end,
            lipschitz,
            func: Arc::new(func),
        })
    }

    /// The support interval `[start, end)`.
    pub fn support(&self) -> IntervalSet {
        IntervalSet::interval(self.start, self.end)
    }

    /// The Lipschitz constant.
    pub fn lipschitz(&self) -> f64 {
        self.lipschitz
    }

    /// `f(x)`.
    pub fn eval(&self, x: f64) -> E {
        if self.start <= x && x < self.end {
            (self.func)(x)
        } else {
            E::zero()
        }
    }

    /// Number of steps used for term `n` of the approximating sequence,
    /// at most `max_steps`.
    pub fn steps_at(&self, n: u32, max_steps: usize) -> usize {
        let width = self.end - self.start;
        let exact = self.lipschitz * width * width * 2f64.powi(n.min(1100) as i32 - 1);
        // Saturating float-to-int cast.
        (exact.ceil() as usize).clamp(1, max_steps.max(1))
    }

    /// L¹ distance bound `K (b - a)² / (4 · steps)` between `f` and its
    /// approximation with `steps` steps.
    pub fn step_error(&self, steps: usize) -> f64 {
        let width = self.end - self.start;
        self.lipschitz * width * width / (4.0 * steps.max(1) as f64)
    }

    /// The step function with `steps` equal steps on the support, each
    /// taking the value at its midpoint.
    pub fn step_approximation(&self, space: &Arc<Lebesgue>, steps: usize) -> SimpleFunction<Lebesgue, E> {
        let steps = steps.max(1);
        let h = (self.end - self.start) / steps as f64;
        let mut pieces = Vec::with_capacity(steps + 1);
        for i in 0..steps {
            let lo = self.start + i as f64 * h;
            let hi = if i + 1 == steps {
                self.end
            } else {
                self.start + (i + 1) as f64 * h
            };
            pieces.push((IntervalSet::interval(lo, hi), (self.func)(0.5 * (lo + hi))));
        }
        pieces.push((self.support().complement(), E::zero()));
        SimpleFunction::from_trusted(space.clone(), pieces)
    }
}

impl<E: NormedSpace> Integrand<Lebesgue, E> for LipschitzIntegrand<E> {
    fn classify(&self, measure: &Arc<Lebesgue>) -> Integrability<Lebesgue, E> {
        self.classify_with(measure, &ExtensionConfig::default())
    }

    fn classify_with(
        &self,
        measure: &Arc<Lebesgue>,
        config: &ExtensionConfig,
    ) -> Integrability<Lebesgue, E> {
        if self.start == self.end {
            return Integrability::Integrable(L1::zero(measure.clone()));
        }

        // Validates the values of the coarsest approximation.
        let first = match L1Simple::new(self.step_approximation(measure, 1)) {
            Ok(first) => first,
            Err(reason) => return Integrability::NotIntegrable(reason),
        };
        if self.lipschitz == 0.0 {
            return Integrability::Integrable(L1::from_simple(first));
        }

        let (this, space, max_steps) = (self.clone(), measure.clone(), config.max_pieces);
        Integrability::Integrable(L1::from_cauchy(CauchySeq::from_terms(move |n| {
            let steps = this.steps_at(n, max_steps);
            Term {
                value: L1Simple::from_trusted(this.step_approximation(&space, steps)),
                error: this.step_error(steps),
            }
        })))
    }
}
