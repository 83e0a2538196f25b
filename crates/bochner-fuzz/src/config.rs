//! Configuration types for randomized law checking.

use crate::distribution::Distribution;
use bochner::ExtensionConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration for a fuzz run.
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    // === Measure parameters ===
    /// Number of points of each generated space.
    pub point_count: u32,

    /// How points are grouped into atoms.
    pub atom_shape: AtomShape,

    /// Distribution of finite atom weights.
    pub weights: ValueRange,

    /// Probability that an atom has weight zero.
    pub null_fraction: f64,

    /// Probability that an atom has infinite weight.
    pub infinite_fraction: f64,

    // === Function parameters ===
    /// Maximum number of pieces of a generated simple function.
    pub max_pieces: u32,

    /// Distribution of each coordinate of function values.
    pub values: ValueRange,

    // === Set function parameters ===
    /// Family of generated set functions.
    pub set_function: SetFunctionKind,

    // === Lebesgue trials ===
    /// Number of Lipschitz integrands checked per trial.
    pub lipschitz_checks: u32,

    /// Largest Lipschitz constant of generated integrands.
    pub max_lipschitz: f64,

    /// Configuration of the extensions under test.
    pub extension: ExtensionConfig,

    // === Run parameters ===
    /// Number of trials, each with a fresh measure and set function.
    pub trials: u32,

    /// Worker threads (1 = sequential).
    pub threads: usize,

    /// Relative tolerance of the law checks.
    pub tolerance: f64,

    // === RNG ===
    /// Seed for reproducibility (None = random).
    pub seed: Option<u64>,

    // === Recording ===
    /// Enable inspector event recording.
    pub record_events: bool,

    /// Output path for events (if recording).
    pub event_output_path: Option<PathBuf>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self::minimal()
    }
}

impl FuzzConfig {
    /// Create a minimal configuration for fast tests.
    pub fn minimal() -> Self {
        Self {
            point_count: 4,
            atom_shape: AtomShape::Singletons,
            weights: ValueRange::uniform(0.0, 4.0),
            null_fraction: 0.1,
            infinite_fraction: 0.1,
            max_pieces: 3,
            values: ValueRange::uniform(-10.0, 10.0),
            set_function: SetFunctionKind::WeightedSmul,
            lipschitz_checks: 0,
            max_lipschitz: 2.0,
            extension: ExtensionConfig::coarse(),
            trials: 10,
            threads: 1,
            tolerance: 1e-9,
            seed: Some(42),
            record_events: false,
            event_output_path: None,
        }
    }

    // === Builder methods ===

    pub fn with_point_count(mut self, count: u32) -> Self {
        self.point_count = count;
        self
    }

    pub fn with_atom_shape(mut self, shape: AtomShape) -> Self {
        self.atom_shape = shape;
        self
    }

    pub fn with_weights(mut self, weights: ValueRange) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_null_fraction(mut self, fraction: f64) -> Self {
        self.null_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_infinite_fraction(mut self, fraction: f64) -> Self {
        self.infinite_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_pieces(mut self, pieces: u32) -> Self {
        self.max_pieces = pieces.max(1);
        self
    }

    pub fn with_values(mut self, values: ValueRange) -> Self {
        self.values = values;
        self
    }

    pub fn with_set_function(mut self, kind: SetFunctionKind) -> Self {
        self.set_function = kind;
        self
    }

    pub fn with_lipschitz_checks(mut self, checks: u32) -> Self {
        self.lipschitz_checks = checks;
        self
    }

    pub fn with_max_lipschitz(mut self, lipschitz: f64) -> Self {
        self.max_lipschitz = lipschitz;
        self
    }

    pub fn with_extension(mut self, extension: ExtensionConfig) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_trials(mut self, trials: u32) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_random_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn with_recording(mut self, enabled: bool) -> Self {
        self.record_events = enabled;
        self
    }

    pub fn with_event_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.event_output_path = Some(path.into());
        self.record_events = true;
        self
    }

    /// Convert to a serializable form for recording.
    pub fn to_serializable(&self) -> SerializableConfig {
        SerializableConfig {
            point_count: self.point_count,
            atom_shape: self.atom_shape.name().to_string(),
            weight_min: self.weights.min,
            weight_max: self.weights.max,
            weight_distribution: self.weights.distribution.name().to_string(),
            null_fraction: self.null_fraction,
            infinite_fraction: self.infinite_fraction,
            max_pieces: self.max_pieces,
            value_min: self.values.min,
            value_max: self.values.max,
            set_function: self.set_function.name().to_string(),
            lipschitz_checks: self.lipschitz_checks,
            max_lipschitz: self.max_lipschitz,
            extension: self.extension,
            trials: self.trials,
            threads: self.threads,
            tolerance: self.tolerance,
        }
    }
}

/// How the points of a generated space are grouped into atoms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AtomShape {
    /// Every point is its own atom (power-set σ-algebra).
    Singletons,

    /// Consecutive points are grouped into atoms of 1 to `max_atom_size` points.
    Grouped { max_atom_size: u32 },

    /// A single atom holding every point (trivial σ-algebra).
    Trivial,
}

impl AtomShape {
    /// Get a short name for this shape.
    pub fn name(&self) -> &'static str {
        match self {
            AtomShape::Singletons => "singletons",
            AtomShape::Grouped { .. } => "grouped",
            AtomShape::Trivial => "trivial",
        }
    }
}

/// Family of generated set functions on `ℝ²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetFunctionKind {
    /// `T(s) = μ(s) • id`.
    WeightedSmul,

    /// `T(s) = μ(s) • A` for a random matrix `A`.
    Matrix { max_entry: f64 },

    /// `Σ cᵢ • Tᵢ` of `terms` random matrix set functions.
    Combination { terms: u32, max_entry: f64 },
}

impl SetFunctionKind {
    /// Get a short name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            SetFunctionKind::WeightedSmul => "weighted_smul",
            SetFunctionKind::Matrix { .. } => "matrix",
            SetFunctionKind::Combination { .. } => "combination",
        }
    }
}

/// A range of real values with a sampling distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub distribution: Distribution,
}

impl ValueRange {
    /// Always `value`.
    pub const fn constant(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            distribution: Distribution::Constant,
        }
    }

    /// Uniform on `[min, max]`.
    pub const fn uniform(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            distribution: Distribution::Uniform,
        }
    }

    /// Range with an explicit distribution.
    pub const fn new(min: f64, max: f64, distribution: Distribution) -> Self {
        Self {
            min,
            max,
            distribution,
        }
    }
}

/// Serializable configuration for recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializableConfig {
    pub point_count: u32,
    pub atom_shape: String,
    pub weight_min: f64,
    pub weight_max: f64,
    pub weight_distribution: String,
    pub null_fraction: f64,
    pub infinite_fraction: f64,
    pub max_pieces: u32,
    pub value_min: f64,
    pub value_max: f64,
    pub set_function: String,
    pub lipschitz_checks: u32,
    pub max_lipschitz: f64,
    pub extension: ExtensionConfig,
    pub trials: u32,
    pub threads: usize,
    pub tolerance: f64,
}
