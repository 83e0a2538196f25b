//! The weighted indicator value `s ↦ μ(s).toReal • id`, the set function
//! behind the Bochner integral.

use std::sync::Arc;

use crate::normed::{ContinuousLinearMap, NormedSpace};
use crate::set_function::DominatedAdditive;
use crate::space::MeasureSpace;

/// `x ↦ μ(s).toReal • x`.
///
/// Zero on null sets and on sets of infinite measure; additive on disjoint
/// finite-measure sets; `‖weighted_smul(μ, s)‖ = μ(s).toReal`.
pub fn weighted_smul<M: MeasureSpace, E: NormedSpace>(
    measure: &M,
    set: &M::Set,
) -> ContinuousLinearMap<E, E> {
    ContinuousLinearMap::scalar(measure.measure(set).to_real())
}

impl<M: MeasureSpace, E: NormedSpace> DominatedAdditive<M, E, E> {
    /// [`weighted_smul`] as a dominated additive set function with `C = 1`.
    pub fn weighted_smul(measure: Arc<M>) -> Self {
        let mu = measure.clone();
        Self::from_family(measure, 1.0, move |s| weighted_smul(mu.as_ref(), s))
    }
}
