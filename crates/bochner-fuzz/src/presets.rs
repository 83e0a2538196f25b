//! Predefined configurations for common test scenarios.

use crate::config::{AtomShape, FuzzConfig, SetFunctionKind, ValueRange};
use crate::distribution::Distribution;
use bochner::ExtensionConfig;

/// Collection of preset configurations.
pub struct Presets;

impl Presets {
    /// Quick sanity check (CI-friendly, runs fast).
    pub fn quick() -> FuzzConfig {
        FuzzConfig::minimal().with_point_count(4).with_trials(20)
    }

    /// Standard test suite.
    pub fn standard() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(16)
            .with_atom_shape(AtomShape::Grouped { max_atom_size: 3 })
            .with_max_pieces(5)
            .with_set_function(SetFunctionKind::Matrix { max_entry: 3.0 })
            .with_lipschitz_checks(1)
            .with_trials(100)
    }

    /// Atoms spanning several points, so sets must respect atom boundaries.
    pub fn grouped_atoms() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(32)
            .with_atom_shape(AtomShape::Grouped { max_atom_size: 8 })
            .with_max_pieces(4)
            .with_trials(50)
    }

    /// Only the empty set and the whole space are measurable.
    pub fn trivial_sigma_algebra() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(8)
            .with_atom_shape(AtomShape::Trivial)
            .with_trials(50)
    }

    /// Many infinite atoms, exercising the non-integrable fallback.
    pub fn infinite_heavy() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(12)
            .with_infinite_fraction(0.5)
            .with_max_pieces(6)
            .with_trials(50)
    }

    /// Many null atoms.
    pub fn null_heavy() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(12)
            .with_null_fraction(0.6)
            .with_infinite_fraction(0.0)
            .with_trials(50)
    }

    /// Random matrix set functions.
    pub fn matrix() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(10)
            .with_set_function(SetFunctionKind::Matrix { max_entry: 5.0 })
            .with_trials(50)
    }

    /// Linear combinations of matrix set functions.
    pub fn combination() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(10)
            .with_set_function(SetFunctionKind::Combination {
                terms: 4,
                max_entry: 2.0,
            })
            .with_trials(50)
    }

    /// Lipschitz integrands on the real line, checked against closed forms.
    pub fn lipschitz() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_lipschitz_checks(4)
            .with_max_lipschitz(8.0)
            .with_extension(ExtensionConfig::coarse().with_max_depth(16))
            .with_trials(20)
    }

    /// Large spaces with many pieces.
    pub fn large_space() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(1000)
            .with_atom_shape(AtomShape::Grouped { max_atom_size: 4 })
            .with_max_pieces(64)
            .with_trials(20)
    }

    /// Weights that are mostly tiny with occasional large ones.
    pub fn bimodal_weights() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(16)
            .with_weights(ValueRange::new(
                0.0,
                1e3,
                Distribution::Bimodal {
                    low_probability: 0.8,
                },
            ))
            .with_values(ValueRange::new(
                -100.0,
                100.0,
                Distribution::Normal {
                    stddev_fraction: 0.2,
                },
            ))
            .with_trials(50)
    }

    /// Trials spread across a thread pool.
    pub fn concurrent() -> FuzzConfig {
        FuzzConfig::minimal()
            .with_point_count(16)
            .with_atom_shape(AtomShape::Grouped { max_atom_size: 3 })
            .with_set_function(SetFunctionKind::Matrix { max_entry: 3.0 })
            .with_threads(4)
            .with_trials(100)
    }

    /// All presets as a list for iteration.
    pub fn all() -> Vec<(&'static str, FuzzConfig)> {
        vec![
            ("quick", Self::quick()),
            ("standard", Self::standard()),
            ("grouped_atoms", Self::grouped_atoms()),
            ("trivial_sigma_algebra", Self::trivial_sigma_algebra()),
            ("infinite_heavy", Self::infinite_heavy()),
            ("null_heavy", Self::null_heavy()),
            ("matrix", Self::matrix()),
            ("combination", Self::combination()),
            ("lipschitz", Self::lipschitz()),
            ("large_space", Self::large_space()),
            ("bimodal_weights", Self::bimodal_weights()),
            ("concurrent", Self::concurrent()),
        ]
    }
}
