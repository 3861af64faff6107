//! The landscape contract shared by spatial and network substrates.

use echo_types::AgentId;
use rand::Rng;

use crate::error::WorldError;

/// A substrate that places agents and answers "who can I meet?".
///
/// Agents are identified by dense ids `0..agent_count()`, and that order is
/// the enumeration order used when a simulation step activates every agent.
pub trait Landscape {
    /// Number of agents placed on the landscape.
    fn agent_count(&self) -> usize;

    /// Displace `agent` by a random vector of length at most `max_distance`.
    ///
    /// Landscapes without geometry treat this as a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AgentNotFound`] if `agent` is not placed here.
    fn move_agent<R: Rng + ?Sized>(
        &mut self,
        agent: AgentId,
        max_distance: f64,
        rng: &mut R,
    ) -> Result<(), WorldError>;

    /// Pick a uniformly random partner reachable from `agent`.
    ///
    /// Never returns `agent` itself; returns `None` when nobody is in reach.
    fn random_neighbor<R: Rng + ?Sized>(&self, agent: AgentId, rng: &mut R) -> Option<AgentId>;

    /// All agent ids in enumeration order.
    fn agent_ids(&self) -> Vec<AgentId> {
        (0..self.agent_count())
            .filter_map(AgentId::from_index)
            .collect()
    }

    /// Whether `agent` is placed on this landscape.
    fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.agent_count()
    }
}
