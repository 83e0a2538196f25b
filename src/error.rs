//! Error types for measure-space construction and set-function evaluation.

use thiserror::Error;

/// Errors raised while building measures, simple functions and set functions.
///
/// Evaluating a set function on an integrand never fails: integrands that are
/// not integrable are classified with a [`NotIntegrableReason`] and evaluate
/// to zero (see [`SetToFun::set_to_fun`](crate::SetToFun::set_to_fun)).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// A set outside the σ-algebra was passed where a measurable set is required.
    #[error("set is not measurable: {set}")]
    NotMeasurable {
        /// Debug representation of the rejected set.
        set: String,
    },

    /// Two pieces of a simple function overlap.
    #[error("pieces {first} and {second} of the partition overlap")]
    OverlappingPieces {
        /// Index of the first overlapping piece.
        first: usize,
        /// Index of the second overlapping piece.
        second: usize,
    },

    /// The pieces of a partition do not cover the whole space.
    #[error("partition does not cover the space; uncovered: {uncovered}")]
    IncompletePartition {
        /// Debug representation of the uncovered remainder.
        uncovered: String,
    },

    /// Sets required to be pairwise disjoint intersect.
    #[error("sets {first} and {second} are not disjoint")]
    NotDisjoint {
        /// Index of the first set.
        first: usize,
        /// Index of the second set.
        second: usize,
    },

    /// The domination constant is negative, infinite or NaN.
    #[error("invalid domination constant: {bound}")]
    InvalidBound {
        /// The rejected constant.
        bound: f64,
    },

    /// A measure weight is negative or NaN.
    #[error("invalid measure weight: {weight}")]
    InvalidWeight {
        /// The rejected weight.
        weight: f64,
    },

    /// Atoms of a discrete measure do not partition its points.
    #[error("invalid atom partition: {reason}")]
    InvalidPartition {
        /// What is wrong with the partition.
        reason: String,
    },

    /// Interval endpoints are unusable for the requested construction.
    #[error("invalid interval [{start}, {end})")]
    InvalidInterval {
        /// Left endpoint.
        start: f64,
        /// Right endpoint.
        end: f64,
    },

    /// An extension configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// `T(s ∪ t) ≠ T(s) + T(t)` for a disjoint finite-measure pair.
    #[error("set function is not additive on {first} and {second}: difference {difference}")]
    AdditivityViolation {
        /// Debug representation of the first set.
        first: String,
        /// Debug representation of the second set.
        second: String,
        /// Norm of `T(s ∪ t)(x) - T(s)(x) - T(t)(x)` at the failing probe.
        difference: f64,
    },

    /// `‖T(s)‖ > C · μ(s).toReal` for a finite-measure set.
    #[error("set function exceeds its bound on {set}: {norm} > {allowed}")]
    DominanceViolation {
        /// Debug representation of the set.
        set: String,
        /// The operator norm bound reported for `T(s)`.
        norm: f64,
        /// `C · μ(s).toReal`.
        allowed: f64,
    },

    /// A function required to be integrable is not.
    #[error("function is not integrable: {0}")]
    NotIntegrable(#[from] NotIntegrableReason),
}

/// Why an integrand was classified as not integrable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotIntegrableReason {
    /// The function is not constant on the atoms of the σ-algebra.
    #[error("function is not measurable: {detail}")]
    NotMeasurable {
        /// Description of the offending region.
        detail: String,
    },

    /// `∫ ‖f‖ dμ = ∞`.
    #[error("function has infinite integral")]
    InfiniteIntegral,

    /// The function or its regularity data contains a non-finite number.
    #[error("function takes non-finite values: {detail}")]
    NonFinite {
        /// Description of the offending value.
        detail: String,
    },
}
