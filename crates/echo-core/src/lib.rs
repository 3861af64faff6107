//! Model stepping, statistics, and the convergence driver.
//!
//! A [`Model`] owns one population (landscape plus agents) and the blogs it
//! writes. A step activates every agent once in landscape enumeration order
//! and then aggregates [`ModelStats`]. The [`SimulationDriver`] steps a model
//! until the echo-chamber ratio stabilizes or the step budget runs out.
//!
//! # Modules
//!
//! - [`config`] -- Typed model and driver configuration ([`ModelConfig`])
//! - [`driver`] -- Convergence detection and [`RunResult`]
//! - [`error`] -- Error types ([`ModelError`], [`ConfigError`])
//! - [`model`] -- The [`Model`] and its closed set of landscapes ([`Simulation`])
//! - [`prior`] -- Prior distributions with bounds ([`Prior`])
//! - [`sampler`] -- Thin constructors over `rand` / `rand_distr`
//! - [`stats`] -- Per-step aggregate statistics ([`ModelStats`])

pub mod config;
pub mod driver;
pub mod error;
pub mod model;
pub mod prior;
pub mod sampler;
pub mod stats;

// Re-export primary types at crate root for convenience.
pub use config::{
    AgentPriors, CultureModel, DriverConfig, LandscapeConfig, ModelConfig, RuleSet,
};
pub use driver::{RunResult, SimulationDriver, Termination, sample_variance};
pub use error::{ConfigError, ModelError};
pub use model::{Model, Simulate, Simulation};
pub use prior::{Bounds, Prior, PriorError, Shape};
pub use stats::ModelStats;
