//! A toroidal plane with movement and sight-radius neighbor queries.
//!
//! Agents occupy continuous positions in `[0, size) x [0, size)`. Both axes
//! wrap around, so an agent walking off one edge re-enters on the opposite
//! edge and distances are measured along the shorter way around.

use std::f64::consts::TAU;

use echo_types::AgentId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::landscape::Landscape;

/// A point on the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

/// Toroidal plane holding one position per agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialGrid {
    /// Side length of the square plane.
    size: f64,
    /// Radius within which two agents can see (and meet) each other.
    sight: f64,
    /// Position of each agent, indexed by agent id.
    positions: Vec<Position>,
}

impl SpatialGrid {
    /// Create an empty plane.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidGeometry`] if `size` is not positive or
    /// `sight` is negative.
    pub fn new(size: f64, sight: f64) -> Result<Self, WorldError> {
        if !size.is_finite() || size <= 0.0 {
            return Err(WorldError::InvalidGeometry {
                reason: format!("size must be positive, got {size}"),
            });
        }
        if !sight.is_finite() || sight < 0.0 {
            return Err(WorldError::InvalidGeometry {
                reason: format!("sight must be non-negative, got {sight}"),
            });
        }
        Ok(Self {
            size,
            sight,
            positions: Vec::new(),
        })
    }

    /// Create a plane and scatter `agent_count` agents uniformly over it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidGeometry`] for invalid geometry and
    /// [`WorldError::CapacityExceeded`] if ids would overflow.
    pub fn scatter<R: Rng + ?Sized>(
        agent_count: usize,
        size: f64,
        sight: f64,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let mut grid = Self::new(size, sight)?;
        for _ in 0..agent_count {
            let position = Position {
                x: rng.random_range(0.0..size),
                y: rng.random_range(0.0..size),
            };
            grid.place(position)?;
        }
        debug!(agent_count, size, sight, "Agents scattered on spatial grid");
        Ok(grid)
    }

    /// Place a new agent at `position` (wrapped onto the plane).
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CapacityExceeded`] if ids would overflow.
    pub fn place(&mut self, position: Position) -> Result<AgentId, WorldError> {
        let id = AgentId::from_index(self.positions.len()).ok_or(WorldError::CapacityExceeded {
            capacity: u32::MAX as usize,
        })?;
        let wrapped = self.wrap(position);
        self.positions.push(wrapped);
        Ok(id)
    }

    /// Side length of the plane.
    pub const fn size(&self) -> f64 {
        self.size
    }

    /// Sight radius used by neighbor queries.
    pub const fn sight_radius(&self) -> f64 {
        self.sight
    }

    /// Current position of `agent`.
    pub fn position(&self, agent: AgentId) -> Option<Position> {
        self.positions.get(agent.index()).copied()
    }

    /// Shortest distance between two points on the torus.
    pub fn distance(&self, a: Position, b: Position) -> f64 {
        let dx = self.axis_distance(a.x, b.x);
        let dy = self.axis_distance(a.y, b.y);
        dx.hypot(dy)
    }

    /// All agents within sight of `agent`, excluding `agent` itself.
    pub fn neighbors(&self, agent: AgentId) -> Vec<AgentId> {
        let Some(origin) = self.position(agent) else {
            return Vec::new();
        };
        self.positions
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != agent.index())
            .filter(|(_, pos)| self.distance(origin, **pos) <= self.sight)
            .filter_map(|(index, _)| AgentId::from_index(index))
            .collect()
    }

    fn axis_distance(&self, a: f64, b: f64) -> f64 {
        let d = (a - b).abs().rem_euclid(self.size);
        d.min(self.size - d)
    }

    fn wrap(&self, position: Position) -> Position {
        Position {
            x: position.x.rem_euclid(self.size),
            y: position.y.rem_euclid(self.size),
        }
    }
}

impl Landscape for SpatialGrid {
    fn agent_count(&self) -> usize {
        self.positions.len()
    }

    fn move_agent<R: Rng + ?Sized>(
        &mut self,
        agent: AgentId,
        max_distance: f64,
        rng: &mut R,
    ) -> Result<(), WorldError> {
        let current = self
            .position(agent)
            .ok_or(WorldError::AgentNotFound(agent))?;
        let length = if max_distance > 0.0 {
            rng.random_range(0.0..=max_distance)
        } else {
            0.0
        };
        let angle = rng.random_range(0.0..TAU);
        let moved = self.wrap(Position {
            x: current.x + length * angle.cos(),
            y: current.y + length * angle.sin(),
        });
        if let Some(slot) = self.positions.get_mut(agent.index()) {
            *slot = moved;
        }
        Ok(())
    }

    fn random_neighbor<R: Rng + ?Sized>(&self, agent: AgentId, rng: &mut R) -> Option<AgentId> {
        let neighbors = self.neighbors(agent);
        if neighbors.is_empty() {
            return None;
        }
        neighbors.get(rng.random_range(0..neighbors.len())).copied()
    }
}
