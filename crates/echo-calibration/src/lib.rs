//! Calibration of the echo-chamber model against an empirical target.
//!
//! The harness repeatedly draws a [`ParameterSample`] from a
//! [`ParameterSpace`], applies it to a base model configuration, runs N
//! replicated simulations concurrently, scores the sample by the mean
//! distance of the final echo-chamber ratios from the target, and keeps the
//! K best samples.
//!
//! # Modules
//!
//! - [`config`] -- The full experiment configuration ([`ExperimentConfig`])
//! - [`error`] -- Error types ([`CalibrationError`])
//! - [`harness`] -- The calibration loop ([`Harness`])
//! - [`parameters`] -- Calibrated components and their priors
//! - [`pool`] -- Worker pool plus result queue for replicated runs
//! - [`report`] -- CSV lines and the serializable [`CalibrationReport`]
//! - [`top_k`] -- Bounded best-K retention ([`TopK`])

pub mod config;
pub mod error;
pub mod harness;
pub mod parameters;
pub mod pool;
pub mod report;
pub mod top_k;

// Re-export primary types at crate root for convenience.
pub use config::{CalibrationConfig, ExperimentConfig};
pub use error::CalibrationError;
pub use harness::{Harness, SampleEvaluation, SampleOutcome, derive_seed, score};
pub use parameters::{Behavior, ParameterSample, ParameterSpace, ParameterSpec, ParameterTarget};
pub use pool::ReplicaPool;
pub use report::{CalibrationReport, SampleRecord};
pub use top_k::{RankedResult, TopK};
