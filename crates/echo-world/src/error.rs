//! Error types for the `echo-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type.

use echo_types::AgentId;

/// Errors that can occur during landscape operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The agent is not placed on this landscape.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// An agent cannot be linked to itself.
    #[error("agent {0} cannot be linked to itself")]
    SelfLink(AgentId),

    /// The landscape geometry is invalid (non-positive size, negative sight).
    #[error("invalid landscape geometry: {reason}")]
    InvalidGeometry {
        /// Description of the invalid parameter.
        reason: String,
    },

    /// The landscape cannot hold more agents (ids are `u32`).
    #[error("landscape is full: cannot place more than {capacity} agents")]
    CapacityExceeded {
        /// Maximum number of agents.
        capacity: usize,
    },

    /// The agents handed to a habitat do not match the landscape.
    #[error("population mismatch: landscape has {expected} agents, got {actual}")]
    PopulationMismatch {
        /// Number of agents placed on the landscape.
        expected: usize,
        /// Number of agents supplied.
        actual: usize,
    },

    /// An agent's id does not match its position in the population.
    #[error("agent at index {index} reports id {id}")]
    IdMismatch {
        /// Position in the population.
        index: usize,
        /// The id the agent reported.
        id: AgentId,
    },
}
