//! Random measures, functions and set functions.

mod function;
mod measure;
mod set_function;

pub use function::LipschitzCase;

use crate::config::FuzzConfig;
use crate::distribution::sample_in_range;
use bochner::DiscreteMeasure;
use rand::Rng;

/// Codomain of every generated function and set function.
pub type Vector = [f64; 2];

/// Space of every generated discrete measure.
pub type Space = DiscreteMeasure;

/// Seeded source of random test inputs.
pub struct Generator<R> {
    config: FuzzConfig,
    rng: R,
}

impl<R: Rng> Generator<R> {
    pub fn new(config: FuzzConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &FuzzConfig {
        &self.config
    }

    /// A vector with coordinates drawn from the configured value range.
    pub fn vector(&mut self) -> Vector {
        let range = self.config.values;
        [
            sample_in_range(&mut self.rng, range.min, range.max, range.distribution),
            sample_in_range(&mut self.rng, range.min, range.max, range.distribution),
        ]
    }

    /// A vector that is not zero.
    pub fn nonzero_vector(&mut self) -> Vector {
        let x = self.vector();
        if x == [0.0; 2] {
            [1.0, 0.0]
        } else {
            x
        }
    }

    /// A scalar in `[-4, 4]`.
    pub fn scalar(&mut self) -> f64 {
        self.rng.gen_range(-4.0..=4.0)
    }
}
