//! The Bochner integral: [`SetToFun`] applied to [`weighted_smul`].
//!
//! [`weighted_smul`]: crate::weighted::weighted_smul

use std::sync::Arc;

use crate::completion::Approximation;
use crate::config::ExtensionConfig;
use crate::error::MeasureError;
use crate::integrand::Integrand;
use crate::normed::NormedSpace;
use crate::set_function::DominatedAdditive;
use crate::set_to_fun::SetToFun;
use crate::space::MeasureSpace;

impl<M: MeasureSpace, E: NormedSpace> SetToFun<M, E, E> {
    /// `f ↦ ∫ f dμ`.
    pub fn integral(measure: Arc<M>) -> Self {
        Self::new(DominatedAdditive::weighted_smul(measure))
    }
}

/// `∫ f dμ`, zero if `f` is not integrable.
pub fn integral<M, E, I>(measure: &Arc<M>, f: &I) -> E
where
    M: MeasureSpace,
    E: NormedSpace,
    I: Integrand<M, E> + ?Sized,
{
    SetToFun::integral(measure.clone()).set_to_fun(f)
}

/// `∫ f dμ` computed with `config`, with its error bound.
pub fn integral_approx<M, E, I>(
    measure: &Arc<M>,
    f: &I,
    config: ExtensionConfig,
) -> Result<Approximation<E>, MeasureError>
where
    M: MeasureSpace,
    E: NormedSpace,
    I: Integrand<M, E> + ?Sized,
{
    let ext = SetToFun::with_config(DominatedAdditive::weighted_smul(measure.clone()), config)?;
    Ok(ext.set_to_fun_approx(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discrete::DiscreteMeasure;
    use crate::integrand::{LipschitzIntegrand, PointFunction};
    use crate::lebesgue::Lebesgue;
    use crate::simple::SimpleFunction;

    #[test]
    fn test_integral_of_point_function() {
        let mu = Arc::new(DiscreteMeasure::weighted(vec![0.5, 1.5, 2.0]).unwrap());
        let f = PointFunction::from_values(vec![[1.0, 0.0], [0.0, 2.0], [1.0, 1.0]]);
        assert_eq!(integral(&mu, &f), [2.5, 5.0]);
    }

    #[test]
    fn test_integral_of_constant_is_measure_of_space() {
        let mu = Arc::new(DiscreteMeasure::counting(4));
        let f = SimpleFunction::constant(mu.clone(), 3.0);
        assert_eq!(integral(&mu, &f), 12.0);
    }

    #[test]
    fn test_integral_over_infinite_measure_is_zero() {
        let mu = Arc::new(Lebesgue);
        let f = SimpleFunction::constant(mu.clone(), 1.0);
        assert_eq!(integral(&mu, &f), 0.0);
    }

    #[test]
    fn test_integral_of_lipschitz_function() {
        let mu = Arc::new(Lebesgue);
        let f = LipschitzIntegrand::new(0.0, 1.0, 2.0, |x: f64| x * x).unwrap();
        let config = ExtensionConfig::default().with_tolerance(1e-4);
        let approx = integral_approx(&mu, &f, config).unwrap();
        assert!(approx.error_bound <= 1e-4);
        assert!((approx.value - 1.0 / 3.0).abs() <= approx.error_bound);
    }
}
