//! Probability distributions and scale utilities.

use rand::Rng;

/// Logarithmic scale for generating parameter values.
///
/// # Example
/// ```
/// use bochner_fuzz::LogScale;
///
/// let scale = LogScale::new(10, 0, 3);
/// let values: Vec<_> = scale.values().collect();
/// assert_eq!(values, vec![1, 10, 100, 1000]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LogScale {
    pub base: u32,
    pub min_exp: u32,
    pub max_exp: u32,
}

impl LogScale {
    pub const fn new(base: u32, min_exp: u32, max_exp: u32) -> Self {
        Self {
            base,
            min_exp,
            max_exp,
        }
    }

    /// Standard base-10 logarithmic scale: 1, 10, 100, 1000
    pub const STANDARD: Self = Self::new(10, 0, 3);

    /// Binary scale: 1, 2, 4, ..., 64
    pub const BINARY: Self = Self::new(2, 0, 6);

    /// Small scale for quick tests: 1, 10, 100
    pub const SMALL: Self = Self::new(10, 0, 2);

    /// Returns an iterator over the scale values.
    pub fn values(&self) -> impl Iterator<Item = u64> {
        let base = self.base as u64;
        (self.min_exp..=self.max_exp).map(move |exp| base.pow(exp))
    }

    /// Returns the number of values in this scale.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max_exp - self.min_exp + 1) as usize
        }
    }

    /// Returns true if the scale is empty.
    pub fn is_empty(&self) -> bool {
        self.min_exp > self.max_exp
    }
}

/// Distribution type for sampling values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Distribution {
    /// Always returns the same value (min).
    #[default]
    Constant,
    /// Uniform distribution between min and max.
    Uniform,
    /// Normal distribution with mean at (min+max)/2, clamped to the range.
    Normal {
        /// Standard deviation as a fraction of the range (0.0 to 1.0).
        stddev_fraction: f64,
    },
    /// Exponential distribution shifted to start at min.
    Exponential {
        /// Lambda parameter (rate).
        lambda: f64,
    },
    /// Either min or max.
    Bimodal {
        /// Probability of the min value.
        low_probability: f64,
    },
}

impl Distribution {
    /// Get a short name for this distribution.
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Constant => "constant",
            Distribution::Uniform => "uniform",
            Distribution::Normal { .. } => "normal",
            Distribution::Exponential { .. } => "exponential",
            Distribution::Bimodal { .. } => "bimodal",
        }
    }
}

/// Sample a value from a distribution within `[min, max]`.
pub fn sample_in_range<R: Rng>(rng: &mut R, min: f64, max: f64, distribution: Distribution) -> f64 {
    if min >= max {
        return min;
    }

    match distribution {
        Distribution::Constant => min,
        Distribution::Uniform => rng.gen_range(min..=max),
        Distribution::Normal { stddev_fraction } => {
            let mean = (min + max) / 2.0;
            let stddev = (max - min) * stddev_fraction;
            sample_normal(rng, mean, stddev).clamp(min, max)
        }
        Distribution::Exponential { lambda } => {
            (min + sample_exponential(rng, lambda)).min(max)
        }
        Distribution::Bimodal { low_probability } => {
            if rng.gen::<f64>() < low_probability {
                min
            } else {
                max
            }
        }
    }
}

/// Sample from a normal distribution using Box-Muller transform.
fn sample_normal<R: Rng>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    // 1 - u keeps the logarithm finite.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z * stddev
}

/// Sample from an exponential distribution.
fn sample_exponential<R: Rng>(rng: &mut R, lambda: f64) -> f64 {
    let u: f64 = 1.0 - rng.gen::<f64>();
    -u.ln() / lambda
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_log_scale_standard() {
        let values: Vec<_> = LogScale::STANDARD.values().collect();
        assert_eq!(values, vec![1, 10, 100, 1000]);
    }

    #[test]
    fn test_log_scale_len() {
        assert_eq!(LogScale::STANDARD.len(), 4);
        assert_eq!(LogScale::SMALL.len(), 3);
        assert_eq!(LogScale::new(2, 3, 1).len(), 0);
    }

    #[test]
    fn test_sample_constant() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(sample_in_range(&mut rng, 4.2, 10.0, Distribution::Constant), 4.2);
        }
    }

    #[test]
    fn test_sample_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(2);
        let distributions = [
            Distribution::Uniform,
            Distribution::Normal {
                stddev_fraction: 0.5,
            },
            Distribution::Exponential { lambda: 0.1 },
        ];
        for distribution in distributions {
            for _ in 0..200 {
                let value = sample_in_range(&mut rng, -1.0, 3.0, distribution);
                assert!((-1.0..=3.0).contains(&value), "{distribution:?} gave {value}");
            }
        }
    }

    #[test]
    fn test_sample_bimodal() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut low = 0;
        let mut high = 0;
        for _ in 0..1000 {
            let value = sample_in_range(
                &mut rng,
                0.0,
                100.0,
                Distribution::Bimodal {
                    low_probability: 0.5,
                },
            );
            if value == 0.0 {
                low += 1;
            } else if value == 100.0 {
                high += 1;
            }
        }
        assert_eq!(low + high, 1000);
        assert!(low > 400 && low < 600);
    }
}
