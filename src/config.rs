//! Configuration of the continuous extension.

use serde::{Deserialize, Serialize};

use crate::error::MeasureError;

/// Controls how limits in the completion are evaluated.
///
/// A point of the completion given as a regular Cauchy sequence is evaluated
/// at the smallest depth `n` with `C · 2^-n ≤ tolerance`, where `C` is the
/// Lipschitz constant of the map being extended, but never deeper than
/// `max_depth`. Points of the dense subspace are always evaluated exactly.
///
/// When a cap stops a sequence short of the tolerance, the reported error
/// bound is that of the term actually evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Target absolute error of evaluated limits.
    pub tolerance: f64,

    /// Deepest term of a Cauchy sequence that will be evaluated.
    pub max_depth: u32,

    /// Most pieces a step approximation of an integrand may have.
    pub max_pieces: usize,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_depth: 40,
            max_pieces: 1 << 18,
        }
    }
}

impl ExtensionConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Coarse configuration for fast, low-precision evaluation.
    pub fn coarse() -> Self {
        Self {
            tolerance: 1e-3,
            max_depth: 24,
            max_pieces: 1 << 14,
        }
    }

    // === Builder methods ===

    /// Set the target tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the maximum evaluation depth.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the largest step approximation.
    pub fn with_max_pieces(mut self, max_pieces: usize) -> Self {
        self.max_pieces = max_pieces;
        self
    }

    /// Check that the tolerance is positive and finite, the depth is small
    /// enough for `2^-max_depth` to be representable, and steps are allowed.
    pub fn validate(&self) -> Result<(), MeasureError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MeasureError::InvalidConfig {
                reason: format!("tolerance must be positive and finite, got {}", self.tolerance),
            });
        }
        if self.max_depth > 1000 {
            return Err(MeasureError::InvalidConfig {
                reason: format!("max_depth must be at most 1000, got {}", self.max_depth),
            });
        }
        if self.max_pieces == 0 {
            return Err(MeasureError::InvalidConfig {
                reason: "max_pieces must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The depth at which a map with Lipschitz constant `lipschitz` is
    /// evaluated, `⌈log₂(lipschitz / tolerance)⌉` clamped to `0..=max_depth`.
    pub fn depth_for(&self, lipschitz: f64) -> u32 {
        if lipschitz <= 0.0 {
            return 0;
        }
        let ratio = lipschitz / self.tolerance;
        if !ratio.is_finite() {
            return self.max_depth;
        }
        if ratio <= 1.0 {
            return 0;
        }
        // Saturating float-to-int cast.
        (ratio.log2().ceil() as u32).min(self.max_depth)
    }
}
