//! Agent state, interaction rules, and the blog subsystem.
//!
//! This crate contains the logic layer for agents -- everything that happens
//! when a single agent is activated. It sits between `echo-types` (the value
//! types) and `echo-core` (which owns the model, aggregates statistics, and
//! drives the steps).
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] type: culture, counters, blog, subscriptions
//! - [`behavior`] -- The per-activation state machine ([`act`])
//! - [`blog`] -- Blogs, posts, responses, and the [`BlogRegistry`]
//! - [`error`] -- Error types for all agent operations ([`AgentError`])
//! - [`interaction`] -- Trait adoption and relative-agreement update rules
//! - [`profile`] -- Per-agent behavioral probabilities ([`BehaviorProfile`])
//! - [`subscription`] -- Followed blogs and read-post tracking

pub mod agent;
pub mod behavior;
pub mod blog;
pub mod error;
pub mod interaction;
pub mod profile;
pub mod subscription;

// Re-export primary types at crate root for convenience.
pub use agent::Agent;
pub use behavior::{ActContext, Activation, EngineSettings, act};
pub use blog::{
    APPROVAL_SIMILARITY, BlogStatistics, Blog, BlogRegistry, ECHO_CHAMBER_APPROVAL, Post,
    TopicBounds,
};
pub use error::AgentError;
pub use interaction::{
    CONVERGED_SIMILARITY, OpinionUpdate, adopt_features, relative_agreement,
    relative_agreement_toward, roll,
};
pub use profile::{BehaviorProfile, Range};
pub use subscription::SubscriptionSet;
