//! Agents connected by undirected links.
//!
//! The link graph carries the virtual substrate: an agent can only meet the
//! agents it is linked to. There is no geometry, so movement is a no-op.

use std::collections::BTreeSet;

use echo_types::AgentId;
use rand::Rng;
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::landscape::Landscape;

/// Undirected graph over the agent population.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkGraph {
    /// Adjacency sets, indexed by agent id.
    links: Vec<BTreeSet<AgentId>>,
}

impl LinkGraph {
    /// Create an empty graph.
    pub const fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// A graph where every agent is linked to every other agent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CapacityExceeded`] if ids would overflow.
    pub fn complete(agent_count: usize) -> Result<Self, WorldError> {
        let mut graph = Self::new();
        let ids = (0..agent_count)
            .map(|_| graph.add_agent())
            .collect::<Result<Vec<_>, _>>()?;
        for (offset, &a) in ids.iter().enumerate() {
            for &b in ids.iter().skip(offset.saturating_add(1)) {
                graph.connect(a, b)?;
            }
        }
        Ok(graph)
    }

    /// A random graph where each agent opens `degree` links to other agents
    /// chosen uniformly (links are undirected, so degrees can exceed it).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CapacityExceeded`] if ids would overflow.
    pub fn random<R: Rng + ?Sized>(
        agent_count: usize,
        degree: usize,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let mut graph = Self::new();
        let ids = (0..agent_count)
            .map(|_| graph.add_agent())
            .collect::<Result<Vec<_>, _>>()?;
        for &a in &ids {
            let partners = ids
                .iter()
                .copied()
                .filter(|&b| b != a)
                .choose_multiple(rng, degree);
            for b in partners {
                graph.connect(a, b)?;
            }
        }
        debug!(agent_count, degree, links = graph.link_count(), "Random link graph built");
        Ok(graph)
    }

    /// Add an unlinked agent and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CapacityExceeded`] if ids would overflow.
    pub fn add_agent(&mut self) -> Result<AgentId, WorldError> {
        let id = AgentId::from_index(self.links.len()).ok_or(WorldError::CapacityExceeded {
            capacity: u32::MAX as usize,
        })?;
        self.links.push(BTreeSet::new());
        Ok(id)
    }

    /// Link `a` and `b`. Linking an existing pair again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::SelfLink`] if `a == b` and
    /// [`WorldError::AgentNotFound`] if either agent is missing.
    pub fn connect(&mut self, a: AgentId, b: AgentId) -> Result<(), WorldError> {
        if a == b {
            return Err(WorldError::SelfLink(a));
        }
        if !self.contains(b) {
            return Err(WorldError::AgentNotFound(b));
        }
        self.links
            .get_mut(a.index())
            .ok_or(WorldError::AgentNotFound(a))?
            .insert(b);
        if let Some(set) = self.links.get_mut(b.index()) {
            set.insert(a);
        }
        Ok(())
    }

    /// Agents linked to `agent`, in id order.
    pub fn links_of(&self, agent: AgentId) -> impl Iterator<Item = AgentId> + '_ {
        self.links
            .get(agent.index())
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Pick a uniformly random link of `agent`.
    pub fn random_link<R: Rng + ?Sized>(&self, agent: AgentId, rng: &mut R) -> Option<AgentId> {
        self.links.get(agent.index())?.iter().copied().choose(rng)
    }

    /// Total number of undirected links.
    pub fn link_count(&self) -> usize {
        self.links.iter().map(BTreeSet::len).sum::<usize>() / 2
    }
}

impl Landscape for LinkGraph {
    fn agent_count(&self) -> usize {
        self.links.len()
    }

    fn move_agent<R: Rng + ?Sized>(
        &mut self,
        agent: AgentId,
        _max_distance: f64,
        _rng: &mut R,
    ) -> Result<(), WorldError> {
        if self.contains(agent) {
            Ok(())
        } else {
            Err(WorldError::AgentNotFound(agent))
        }
    }

    fn random_neighbor<R: Rng + ?Sized>(&self, agent: AgentId, rng: &mut R) -> Option<AgentId> {
        self.random_link(agent, rng)
    }
}
