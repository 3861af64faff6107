//! A landscape together with the typed agents that live on it.
//!
//! [`Habitat`] owns both halves for the lifetime of one simulation run. It is
//! generic over the agent type, which only has to declare its id through
//! [`Inhabitant`], so there is never a need to downcast a generic handle.

use echo_types::AgentId;

use crate::error::WorldError;
use crate::landscape::Landscape;

/// Capability every agent type stored in a [`Habitat`] must provide.
pub trait Inhabitant {
    /// The id the landscape assigned to this agent.
    fn id(&self) -> AgentId;
}

/// A landscape and its population, indexed by agent id.
#[derive(Debug, Clone)]
pub struct Habitat<L, A> {
    landscape: L,
    agents: Vec<A>,
}

impl<L: Landscape, A: Inhabitant> Habitat<L, A> {
    /// Pair a landscape with its agents.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::PopulationMismatch`] if the number of agents does
    /// not match the landscape, and [`WorldError::IdMismatch`] if an agent is
    /// not stored at the index of its id.
    pub fn new(landscape: L, agents: Vec<A>) -> Result<Self, WorldError> {
        if agents.len() != landscape.agent_count() {
            return Err(WorldError::PopulationMismatch {
                expected: landscape.agent_count(),
                actual: agents.len(),
            });
        }
        for (index, agent) in agents.iter().enumerate() {
            if agent.id().index() != index {
                return Err(WorldError::IdMismatch {
                    index,
                    id: agent.id(),
                });
            }
        }
        Ok(Self { landscape, agents })
    }

    /// Build the population by calling `make` once per landscape id, in order.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `make`, and the errors of
    /// [`Habitat::new`].
    pub fn populate<E, F>(landscape: L, mut make: F) -> Result<Self, E>
    where
        E: From<WorldError>,
        F: FnMut(AgentId) -> Result<A, E>,
    {
        let agents = landscape
            .agent_ids()
            .into_iter()
            .map(&mut make)
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Self::new(landscape, agents)?)
    }

    /// The landscape.
    pub const fn landscape(&self) -> &L {
        &self.landscape
    }

    /// Mutable access to the landscape (movement).
    pub const fn landscape_mut(&mut self) -> &mut L {
        &mut self.landscape
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the habitat holds no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent by id.
    pub fn agent(&self, id: AgentId) -> Option<&A> {
        self.agents.get(id.index())
    }

    /// Mutable agent by id.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut A> {
        self.agents.get_mut(id.index())
    }

    /// All agents in enumeration order.
    pub fn agents(&self) -> &[A] {
        &self.agents
    }

    /// All agent ids in enumeration order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.landscape.agent_ids()
    }

    /// Two distinct agents, mutably.
    ///
    /// Returns `None` if `a == b` or either id is unknown. Callers use this
    /// to guard paired interactions against self-interaction.
    pub fn pair_mut(&mut self, a: AgentId, b: AgentId) -> Option<(&mut A, &mut A)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia >= self.agents.len() || ib >= self.agents.len() {
            return None;
        }
        let (low, high, swapped) = if ia < ib { (ia, ib, false) } else { (ib, ia, true) };
        let (head, tail) = self.agents.split_at_mut(high);
        let first = head.get_mut(low)?;
        let second = tail.first_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }
}
