//! The model: one population, its blogs, and the step loop.

use std::collections::HashSet;

use echo_agents::{
    ActContext, Agent, BehaviorProfile, BlogRegistry, EngineSettings, act,
};
use echo_types::{CultureKey, CulturalState, FeatureVector, Opinion};
use echo_world::{Habitat, Landscape, LinkGraph, SpatialGrid};
use rand::rngs::SmallRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{AgentPriors, CultureModel, LandscapeConfig, ModelConfig};
use crate::error::ModelError;
use crate::sampler::uniform_in;
use crate::stats::ModelStats;

/// Anything the driver can step.
pub trait Simulate {
    /// Activate every agent once, then aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if any activation fails; the run is over.
    fn step(&mut self) -> Result<ModelStats, ModelError>;

    /// Aggregate statistics of the current state.
    fn stats(&self) -> ModelStats;

    /// Number of agent activations performed so far.
    fn events(&self) -> u64;
}

/// One population on landscape `L`, with its blogs and random stream.
#[derive(Debug)]
pub struct Model<L> {
    habitat: Habitat<L, Agent>,
    registry: BlogRegistry,
    settings: EngineSettings,
    rng: SmallRng,
    steps: u64,
    events: u64,
}

impl<L: Landscape> Model<L> {
    /// Populate `landscape` according to `config`.
    ///
    /// One agent is created per landscape id, with a random initial culture
    /// and behavioral probabilities drawn from the configured priors. The
    /// first `initial_bloggers` writers (chosen at random) start with a blog.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the configuration is invalid or a prior
    /// cannot be sampled.
    pub fn new(landscape: L, config: &ModelConfig, mut rng: SmallRng) -> Result<Self, ModelError> {
        config.validate()?;
        let template = config.profile_template();
        let mut habitat = Habitat::populate(landscape, |id| {
            let culture = initial_culture(&config.culture, &mut rng)?;
            let profile = draw_profile(&template, &config.priors, &mut rng)?;
            Ok::<_, ModelError>(Agent::new(id, culture, profile))
        })?;

        let mut registry = BlogRegistry::new();
        let population = habitat.len();
        let bloggers = config.initial_bloggers.min(population);
        let mut writers = index::sample(&mut rng, population, bloggers).into_vec();
        writers.sort_unstable();
        for index in writers {
            let Some(agent) = habitat.agents().get(index) else {
                continue;
            };
            let id = agent.id();
            let blog = registry.create(id, agent.culture().clone())?;
            if let Some(agent) = habitat.agent_mut(id) {
                agent.set_blog(blog);
            }
        }

        debug!(
            agents = population,
            initial_bloggers = bloggers,
            "Model populated"
        );
        Ok(Self {
            habitat,
            registry,
            settings: config.engine_settings(),
            rng,
            steps: 0,
            events: 0,
        })
    }

    /// Landscape and agents.
    pub const fn habitat(&self) -> &Habitat<L, Agent> {
        &self.habitat
    }

    /// All blogs.
    pub const fn registry(&self) -> &BlogRegistry {
        &self.registry
    }

    /// Steps completed.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Activate every agent once in enumeration order, then aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Agent`] if an activation fails.
    pub fn step(&mut self) -> Result<ModelStats, ModelError> {
        let Self {
            habitat,
            registry,
            settings,
            rng,
            events,
            ..
        } = self;
        let ids = habitat.ids();
        let mut ctx = ActContext {
            habitat,
            registry,
            settings,
        };
        for id in ids {
            act(&mut ctx, id, rng)?;
            *events = events.saturating_add(1);
        }

        self.steps = self.steps.saturating_add(1);
        let stats = self.stats();
        debug!(
            step = self.steps,
            ratio = stats.echo_chamber_ratio,
            blogs = stats.blogs,
            cultures = stats.cultures,
            "Step complete"
        );
        Ok(stats)
    }

    /// Aggregate statistics of the current state.
    pub fn stats(&self) -> ModelStats {
        let agents = self.habitat.agents();
        let cultures: HashSet<CultureKey> = agents.iter().map(|a| a.culture().key()).collect();
        let (online, offline) = agents.iter().fold((0_u64, 0_u64), |(on, off), agent| {
            (
                on.saturating_add(agent.online_interactions),
                off.saturating_add(agent.offline_interactions),
            )
        });
        let blogs = self.registry.statistics();
        ModelStats {
            cultures: cultures.len(),
            online_interactions: online,
            offline_interactions: offline,
            posts: blogs.posts,
            comments: blogs.comments,
            blogs: blogs.blogs,
            echo_chambers: blogs.echo_chambers,
            echo_chamber_ratio: blogs.echo_chamber_ratio(),
            subscriptions: blogs.subscriptions,
            mean_topic_spread: blogs.mean_topic_spread,
        }
    }
}

impl<L: Landscape> Simulate for Model<L> {
    fn step(&mut self) -> Result<ModelStats, ModelError> {
        Self::step(self)
    }

    fn stats(&self) -> ModelStats {
        Self::stats(self)
    }

    fn events(&self) -> u64 {
        self.events
    }
}

fn initial_culture<R: Rng + ?Sized>(
    culture: &CultureModel,
    rng: &mut R,
) -> Result<CulturalState, ModelError> {
    match *culture {
        CultureModel::Features { features, traits } => {
            let values = (0..features)
                .map(|_| rng.random_range(0..traits))
                .collect();
            Ok(CulturalState::Features(FeatureVector::new(values)?))
        }
        CultureModel::Opinion {
            uncertainty, range, ..
        } => {
            let position = uniform_in(rng, range.min, range.max);
            Ok(CulturalState::Opinion(Opinion::new(position, uncertainty)?))
        }
    }
}

fn draw_profile<R: Rng + ?Sized>(
    template: &BehaviorProfile,
    priors: &AgentPriors,
    rng: &mut R,
) -> Result<BehaviorProfile, ModelError> {
    Ok(BehaviorProfile {
        p_online: priors.online.sample(rng)?,
        p_start_blogging: priors.start_blogging.sample(rng)?,
        p_write_post: priors.write_post.sample(rng)?,
        p_respond: priors.respond.sample(rng)?,
        understanding: priors.understanding.sample(rng)?,
        ..template.clone()
    })
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A model on one of the supported landscapes.
#[derive(Debug)]
pub enum Simulation {
    /// Spatial grid.
    Grid(Model<SpatialGrid>),
    /// Link graph.
    Network(Model<LinkGraph>),
}

impl Simulation {
    /// Build the landscape and model described by `config`, seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the configuration is invalid or the
    /// landscape cannot be built.
    pub fn build(config: &ModelConfig, seed: u64) -> Result<Self, ModelError> {
        config.validate()?;
        let mut rng = SmallRng::seed_from_u64(seed);
        match config.landscape {
            LandscapeConfig::Grid { size, sight } => {
                let grid = SpatialGrid::scatter(config.agents, size, sight, &mut rng)?;
                Ok(Self::Grid(Model::new(grid, config, rng)?))
            }
            LandscapeConfig::Network { degree } => {
                let graph = LinkGraph::random(config.agents, degree, &mut rng)?;
                Ok(Self::Network(Model::new(graph, config, rng)?))
            }
        }
    }
}

impl Simulate for Simulation {
    fn step(&mut self) -> Result<ModelStats, ModelError> {
        match self {
            Self::Grid(model) => model.step(),
            Self::Network(model) => model.step(),
        }
    }

    fn stats(&self) -> ModelStats {
        match self {
            Self::Grid(model) => model.stats(),
            Self::Network(model) => model.stats(),
        }
    }

    fn events(&self) -> u64 {
        match self {
            Self::Grid(model) => model.events,
            Self::Network(model) => model.events,
        }
    }
}
