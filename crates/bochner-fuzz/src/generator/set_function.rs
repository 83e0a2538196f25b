//! Random dominated additive set functions.

use super::{Generator, Space, Vector};
use crate::config::SetFunctionKind;
use bochner::{ContinuousLinearMap, DominatedAdditive, MeasureError, MeasureSpace, PointSet};
use rand::Rng;
use std::sync::Arc;

impl<R: Rng> Generator<R> {
    /// A set function of the configured kind on `mu`.
    pub fn set_function(
        &mut self,
        mu: &Arc<Space>,
    ) -> Result<DominatedAdditive<Space, Vector, Vector>, MeasureError> {
        match self.config.set_function {
            SetFunctionKind::WeightedSmul => Ok(DominatedAdditive::weighted_smul(mu.clone())),
            SetFunctionKind::Matrix { max_entry } => self.matrix_set_function(mu, max_entry),
            SetFunctionKind::Combination { terms, max_entry } => {
                let mut t = DominatedAdditive::zero(mu.clone());
                for _ in 0..terms.max(1) {
                    let c = self.scalar();
                    t = t.add(&self.matrix_set_function(mu, max_entry)?.smul(c));
                }
                Ok(t)
            }
        }
    }

    /// `T(s) = μ(s) • A`, dominated by the Frobenius norm of `A`.
    fn matrix_set_function(
        &mut self,
        mu: &Arc<Space>,
        max_entry: f64,
    ) -> Result<DominatedAdditive<Space, Vector, Vector>, MeasureError> {
        let m = max_entry.abs();
        let a: [[f64; 2]; 2] = [
            [self.rng.gen_range(-m..=m), self.rng.gen_range(-m..=m)],
            [self.rng.gen_range(-m..=m), self.rng.gen_range(-m..=m)],
        ];
        let bound = a.iter().flatten().map(|x| x * x).sum::<f64>().sqrt();
        let measure = mu.clone();
        DominatedAdditive::new(mu.clone(), bound, move |s: &PointSet| {
            let w = measure.measure(s).to_real();
            ContinuousLinearMap::new(w * bound, move |x: &Vector| {
                [
                    w * (a[0][0] * x[0] + a[0][1] * x[1]),
                    w * (a[1][0] * x[0] + a[1][1] * x[1]),
                ]
            })
        })
    }
}
