//! Landscapes for the echo-chamber model: where agents live and whom they meet.
//!
//! The simulation only needs two things from a landscape: a way to displace
//! an agent, and a way to pick a random partner for direct contact. Both are
//! captured by the [`Landscape`] trait. The agents themselves are stored next
//! to the landscape in a [`Habitat`], which is generic over the concrete
//! agent type so callers never deal with untyped handles.
//!
//! # Modules
//!
//! - [`error`] -- Error types for landscape operations.
//! - [`landscape`] -- The [`Landscape`] trait.
//! - [`grid`] -- [`SpatialGrid`]: a toroidal plane with movement and a sight
//!   radius for neighbor queries.
//! - [`network`] -- [`LinkGraph`]: agents connected by undirected links.
//! - [`habitat`] -- [`Habitat`] and the [`Inhabitant`] capability trait.

pub mod error;
pub mod grid;
pub mod habitat;
pub mod landscape;
pub mod network;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::{Position, SpatialGrid};
pub use habitat::{Habitat, Inhabitant};
pub use landscape::Landscape;
pub use network::LinkGraph;
