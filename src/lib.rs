#![deny(missing_docs)]
#![doc = include_str!("../README.md")]
//!
//! # Layers
//!
//! Each layer extends the one before it:
//!
//! - [`DominatedAdditive`] - the set function `T : Set → (E →L F)`
//! - [`SimpleFunction::set_to_simple_func`] - finite sums on simple functions
//! - [`SimpleExtension`] - a bounded linear map on [`L1Simple`]
//! - [`LipschitzExtension`] - its continuous extension to the completion [`L1`]
//! - [`SetToFun`] - total on every [`Integrand`], zero off L¹
//!
//! [`integral`] is the instance with `T = weighted_smul(μ)`.
//!
//! See the [`tracer`] module for observing evaluations.

mod completion;
mod config;
mod discrete;
mod ennreal;
mod error;
mod integral;
mod integrand;
mod l1;
mod l1_simple;
mod lebesgue;
mod normed;
mod set_function;
mod set_to_fun;
mod simple;
mod space;
pub mod tracer;
mod weighted;

pub use completion::{Approximation, BoundedLinear, CauchySeq, Completion, LipschitzExtension, Term};
pub use config::ExtensionConfig;
pub use discrete::{DiscreteMeasure, PointSet};
pub use ennreal::ENNReal;
pub use error::{MeasureError, NotIntegrableReason};
pub use integral::{integral, integral_approx};
pub use integrand::{Integrability, Integrand, LipschitzIntegrand, PointFunction};
pub use l1::L1;
pub use l1_simple::{L1Simple, SimpleExtension};
pub use lebesgue::{IntervalSet, Lebesgue};
pub use normed::{ContinuousLinearMap, Normed, NormedSpace};
pub use set_function::DominatedAdditive;
pub use set_to_fun::SetToFun;
pub use simple::SimpleFunction;
pub use space::{MeasureSpace, Scaled};
pub use tracer::{Classification, EvalKind, EvalOutcome, NoopTracer, SpanId, Tracer};
pub use weighted::weighted_smul;
