//! Randomized law checking and parameter sweeps for bochner extensions.
//!
//! This crate provides tools for:
//! - Generating random discrete measure spaces, set functions and integrands
//! - Checking linearity, boundedness and the other extension laws against them
//! - Recording inspector events for performance analysis
//! - Running parameter sweeps from the `sweep` binary

mod config;
mod distribution;
pub mod generator;
mod presets;
mod recorder;
mod runner;
mod validator;

pub use config::{AtomShape, FuzzConfig, SerializableConfig, SetFunctionKind, ValueRange};
pub use distribution::{Distribution, LogScale};
pub use generator::{Generator, LipschitzCase};
pub use presets::Presets;
pub use recorder::{FuzzEventRecorder, FuzzRunRecord, RunMetadata, RunStats, TimestampedEvent};
pub use runner::{FuzzResult, FuzzRunner, TrialResult};
pub use validator::{Law, ValidationFailure, ValidationResult, Validator};
