//! Error types for the calibration binary.

use std::path::PathBuf;

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The experiment file could not be loaded.
    #[error("failed to load {}: {source}", path.display())]
    Config {
        /// File that was being read.
        path: PathBuf,
        /// The underlying config error.
        source: echo_core::ConfigError,
    },

    /// The calibration failed to start or aborted.
    #[error("calibration error: {source}")]
    Calibration {
        /// The underlying harness error.
        #[from]
        source: echo_calibration::CalibrationError,
    },
}
