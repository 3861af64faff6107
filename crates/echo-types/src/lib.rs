//! Shared value types for the echo-chamber model.
//!
//! This crate is the single source of truth for the types that flow between
//! the landscape, the agents, the model, and the calibration harness.
//!
//! # Modules
//!
//! - [`ids`] -- Dense, strongly-typed identifiers for agents and blogs
//! - [`culture`] -- Cultural states (feature vectors and opinions),
//!   similarity, and the structural [`CultureKey`] used for counting cultures

pub mod culture;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use culture::{CultureError, CultureKey, CulturalState, FeatureVector, Opinion};
pub use ids::{AgentId, BlogId};
