//! Error types for the echo-agents crate.
//!
//! Most preconditions (a blog always has a post, a feature vector is never
//! empty) hold by construction. The variants here cover the ones that can
//! only be checked at runtime; every one of them aborts the current run.

use echo_types::{AgentId, BlogId};
use echo_world::WorldError;

/// Errors that can occur while an agent acts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AgentError {
    /// Agent with the given ID is not part of the population.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Blog with the given ID is not in the registry.
    #[error("blog not found: {0}")]
    BlogNotFound(BlogId),

    /// A post index does not exist on the blog.
    #[error("post {post} not found on blog {blog}")]
    PostNotFound {
        /// The blog that was addressed.
        blog: BlogId,
        /// The missing post index.
        post: usize,
    },

    /// The agent already writes a blog and cannot start another one.
    #[error("agent {agent} already writes blog {blog}")]
    AlreadyBlogging {
        /// The writer.
        agent: AgentId,
        /// The blog the writer already owns.
        blog: BlogId,
    },

    /// Two cultural states of different kinds met in one interaction.
    #[error("agent {agent} met a cultural state of a different kind")]
    CultureMismatch {
        /// The agent whose state could not be compared.
        agent: AgentId,
    },

    /// The blog registry cannot hold more blogs (ids are `u32`).
    #[error("blog registry is full")]
    RegistryFull,

    /// A landscape operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}
