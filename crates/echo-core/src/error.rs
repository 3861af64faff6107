//! Error types for the echo-core crate.

use echo_agents::AgentError;
use echo_types::CultureError;
use echo_world::WorldError;

use crate::prior::PriorError;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its allowed range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Description of the offending value.
        reason: String,
    },

    /// A prior is malformed.
    #[error("invalid prior `{name}`: {source}")]
    Prior {
        /// Which prior.
        name: String,
        /// What is wrong with it.
        source: PriorError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }
}

/// Errors that abort a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The model configuration was rejected.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// An agent operation failed during a step.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// The landscape could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Drawing from a prior failed.
    #[error("prior error: {source}")]
    Prior {
        /// The underlying prior error.
        #[from]
        source: PriorError,
    },

    /// An initial culture could not be built.
    #[error("culture error: {source}")]
    Culture {
        /// The underlying culture error.
        #[from]
        source: CultureError,
    },
}
