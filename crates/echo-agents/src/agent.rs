//! The [`Agent`]: one member of the population.

use echo_types::{AgentId, BlogId, CulturalState, FeatureVector, Opinion};
use echo_world::Inhabitant;
use serde::{Deserialize, Serialize};

use crate::profile::BehaviorProfile;
use crate::subscription::SubscriptionSet;

/// One agent: its culture, behavior, blog, and subscriptions.
///
/// For the opinion variant the agent keeps the history of every position
/// it has held, oldest first; the current position is always the last entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    culture: CulturalState,
    opinion_history: Vec<f64>,
    /// Behavioral parameters drawn at creation.
    pub profile: BehaviorProfile,
    /// Cultural changes caused by reading blogs.
    pub online_interactions: u64,
    /// Cultural changes caused by meeting neighbors.
    pub offline_interactions: u64,
    blog: Option<BlogId>,
    /// Blogs this agent follows.
    pub subscriptions: SubscriptionSet,
}

impl Agent {
    /// Create an agent with the given initial culture.
    pub fn new(id: AgentId, culture: CulturalState, profile: BehaviorProfile) -> Self {
        let opinion_history = match &culture {
            CulturalState::Opinion(opinion) => vec![opinion.position],
            CulturalState::Features(_) => Vec::new(),
        };
        Self {
            id,
            culture,
            opinion_history,
            profile,
            online_interactions: 0,
            offline_interactions: 0,
            blog: None,
            subscriptions: SubscriptionSet::new(),
        }
    }

    /// This agent's id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// The agent's current culture.
    pub const fn culture(&self) -> &CulturalState {
        &self.culture
    }

    /// Mutable access to the feature vector (discrete variant only).
    pub const fn features_mut(&mut self) -> Option<&mut FeatureVector> {
        match &mut self.culture {
            CulturalState::Features(features) => Some(features),
            CulturalState::Opinion(_) => None,
        }
    }

    /// The current opinion (continuous variant only).
    pub const fn opinion(&self) -> Option<Opinion> {
        match &self.culture {
            CulturalState::Opinion(opinion) => Some(*opinion),
            CulturalState::Features(_) => None,
        }
    }

    /// Replace the opinion and append its position to the history.
    ///
    /// Feature-vector agents are left untouched.
    pub fn set_opinion(&mut self, opinion: Opinion) {
        if let CulturalState::Opinion(current) = &mut self.culture {
            *current = opinion;
            self.opinion_history.push(opinion.position);
        }
    }

    /// Positions this agent has held, oldest first.
    pub fn opinion_history(&self) -> &[f64] {
        &self.opinion_history
    }

    /// The blog this agent writes, if any.
    pub const fn blog(&self) -> Option<BlogId> {
        self.blog
    }

    /// Mark this agent as the writer of `blog`.
    pub const fn set_blog(&mut self, blog: BlogId) {
        self.blog = Some(blog);
    }

    /// Total number of cultural changes from either channel.
    pub const fn interactions(&self) -> u64 {
        self.online_interactions
            .saturating_add(self.offline_interactions)
    }
}

impl Inhabitant for Agent {
    fn id(&self) -> AgentId {
        Self::id(self)
    }
}
