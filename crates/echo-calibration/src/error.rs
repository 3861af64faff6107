//! Error types for the echo-calibration crate.
//!
//! Any failed run fails the whole calibration: there is no retry and no
//! partial aggregation of a sample's replicas.

use echo_core::{ConfigError, ModelError, PriorError};

use crate::parameters::ParameterTarget;

/// Errors that abort a calibration.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// The experiment configuration was rejected.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// A component prior could not be sampled.
    #[error("cannot sample `{target}`: {source}")]
    Prior {
        /// The component being sampled.
        target: ParameterTarget,
        /// The underlying prior error.
        source: PriorError,
    },

    /// A sampled value has no counterpart in the base model's priors.
    #[error("`{target}` does not apply to the configured prior")]
    InapplicableTarget {
        /// The component that could not be applied.
        target: ParameterTarget,
    },

    /// One replicated run failed.
    #[error("sample {sample}, replica {replica} failed: {source}")]
    Run {
        /// Sample index.
        sample: usize,
        /// Replica index.
        replica: usize,
        /// The underlying model error.
        source: ModelError,
    },

    /// Fewer results arrived than runs were dispatched.
    #[error("expected {expected} run results, received {received}")]
    MissingResults {
        /// Runs dispatched.
        expected: usize,
        /// Results received.
        received: usize,
    },

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {source}")]
    Pool {
        /// The underlying rayon error.
        #[from]
        source: rayon::ThreadPoolBuildError,
    },

    /// The report could not be written.
    #[error("failed to write report: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}
