//! Typed configuration for one model variant and its driver.
//!
//! These structs mirror the `model` and `driver` sections of
//! `echo-config.yaml`. Every field has a default matching the reference
//! calibration run (10 agents with 20 features of 50 traits on a 30x30
//! grid), so an empty document is a valid configuration.

use echo_agents::{BehaviorProfile, EngineSettings, Range};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::prior::{Bounds, Prior};

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Optional behavior switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Agents move before offline interactions.
    #[serde(default = "default_true")]
    pub movement: bool,

    /// Copied traits can be garbled with probability `1 - similarity`.
    #[serde(default)]
    pub transmission_error: bool,

    /// Calibration only scores samples whose runs all converged.
    #[serde(default)]
    pub only_stable_models: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            movement: true,
            transmission_error: false,
            only_stable_models: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Culture and landscape variants
// ---------------------------------------------------------------------------

/// Which cultural representation the model uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CultureModel {
    /// Discrete feature vectors.
    Features {
        /// Number of features per agent.
        #[serde(default = "default_features")]
        features: usize,
        /// Number of distinct values per feature.
        #[serde(default = "default_traits")]
        traits: u32,
    },
    /// Continuous opinions with uncertainty (relative agreement).
    Opinion {
        /// Initial uncertainty of every agent.
        #[serde(default = "default_uncertainty")]
        uncertainty: f64,
        /// Convergence rate.
        #[serde(default = "default_mu")]
        mu: f64,
        /// Range initial positions are drawn from.
        #[serde(default = "default_opinion_range")]
        range: Bounds,
    },
}

impl Default for CultureModel {
    fn default() -> Self {
        Self::Features {
            features: default_features(),
            traits: default_traits(),
        }
    }
}

/// Which landscape the agents live on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LandscapeConfig {
    /// Toroidal plane with a sight radius.
    Grid {
        /// Side length.
        #[serde(default = "default_grid_size")]
        size: f64,
        /// Neighborhood radius.
        #[serde(default = "default_sight")]
        sight: f64,
    },
    /// Random undirected link graph.
    Network {
        /// Links each agent opens at construction.
        #[serde(default = "default_degree")]
        degree: usize,
    },
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self::Grid {
            size: default_grid_size(),
            sight: default_sight(),
        }
    }
}

// ---------------------------------------------------------------------------
// Priors
// ---------------------------------------------------------------------------

/// Priors for the per-agent behavioral probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentPriors {
    /// Probability of spending an activation online.
    #[serde(default = "default_online_prior")]
    pub online: Prior,

    /// Probability of starting a blog.
    #[serde(default = "default_start_blogging_prior")]
    pub start_blogging: Prior,

    /// Probability of publishing a post.
    #[serde(default = "default_write_post_prior")]
    pub write_post: Prior,

    /// Probability of responding to a post.
    #[serde(default = "default_respond_prior")]
    pub respond: Prior,

    /// Probability of copying an adopted trait faithfully.
    #[serde(default = "default_understanding_prior")]
    pub understanding: Prior,
}

impl Default for AgentPriors {
    fn default() -> Self {
        Self {
            online: default_online_prior(),
            start_blogging: default_start_blogging_prior(),
            write_post: default_write_post_prior(),
            respond: default_respond_prior(),
            understanding: default_understanding_prior(),
        }
    }
}

impl AgentPriors {
    /// All priors with their configuration names.
    pub const fn named(&self) -> [(&'static str, &Prior); 5] {
        [
            ("online", &self.online),
            ("start_blogging", &self.start_blogging),
            ("write_post", &self.write_post),
            ("respond", &self.respond),
            ("understanding", &self.understanding),
        ]
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Everything needed to build one [`Model`](crate::Model).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Population size.
    #[serde(default = "default_agents")]
    pub agents: usize,

    /// Cultural representation.
    #[serde(default)]
    pub culture: CultureModel,

    /// Landscape.
    #[serde(default)]
    pub landscape: LandscapeConfig,

    /// Behavior switches.
    #[serde(default)]
    pub rules: RuleSet,

    /// Probability of moving before an offline interaction.
    #[serde(default = "default_p_veloc")]
    pub p_veloc: f64,

    /// Maximum displacement of one move.
    #[serde(default = "default_step_length")]
    pub step_length: f64,

    /// Desired number of followed blogs.
    #[serde(default = "default_subscriptions")]
    pub subscriptions: Range<usize>,

    /// Latest-post similarity range within which a blog is kept.
    #[serde(default = "default_comfort")]
    pub comfort: Range<f64>,

    /// Agents that already write a blog when the model is built.
    #[serde(default)]
    pub initial_bloggers: usize,

    /// Whether readers interact with a random subset of responses.
    #[serde(default = "default_true")]
    pub read_responses: bool,

    /// Priors for per-agent probabilities.
    #[serde(default)]
    pub priors: AgentPriors,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            agents: default_agents(),
            culture: CultureModel::default(),
            landscape: LandscapeConfig::default(),
            rules: RuleSet::default(),
            p_veloc: default_p_veloc(),
            step_length: default_step_length(),
            subscriptions: default_subscriptions(),
            comfort: default_comfort(),
            initial_bloggers: 0,
            read_responses: true,
            priors: AgentPriors::default(),
        }
    }
}

impl ModelConfig {
    /// Check every value for range and consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] or [`ConfigError::Prior`] for the
    /// first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agents == 0 {
            return Err(ConfigError::invalid("agents must be at least 1"));
        }
        match self.culture {
            CultureModel::Features { features, traits } => {
                if features == 0 || traits == 0 {
                    return Err(ConfigError::invalid(
                        "features and traits must be at least 1",
                    ));
                }
            }
            CultureModel::Opinion {
                uncertainty,
                mu,
                range,
            } => {
                if !(uncertainty.is_finite() && uncertainty >= 0.0) {
                    return Err(ConfigError::invalid(format!(
                        "uncertainty must be non-negative, got {uncertainty}"
                    )));
                }
                if !(mu > 0.0 && mu <= 1.0) {
                    return Err(ConfigError::invalid(format!(
                        "mu must lie in (0, 1], got {mu}"
                    )));
                }
                range.validate().map_err(|source| ConfigError::Prior {
                    name: "culture.range".to_owned(),
                    source,
                })?;
            }
        }
        match self.landscape {
            LandscapeConfig::Grid { size, sight } => {
                if !(size.is_finite() && size > 0.0 && sight.is_finite() && sight >= 0.0) {
                    return Err(ConfigError::invalid(format!(
                        "grid size must be positive and sight non-negative, got {size} / {sight}"
                    )));
                }
            }
            LandscapeConfig::Network { degree } => {
                if degree >= self.agents {
                    return Err(ConfigError::invalid(format!(
                        "network degree {degree} must be below the population {}",
                        self.agents
                    )));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.p_veloc) {
            return Err(ConfigError::invalid("p_veloc must lie in [0, 1]"));
        }
        if !(self.step_length.is_finite() && self.step_length >= 0.0) {
            return Err(ConfigError::invalid("step_length must be non-negative"));
        }
        if !self.subscriptions.is_ordered() {
            return Err(ConfigError::invalid("subscriptions.min exceeds subscriptions.max"));
        }
        if !self.comfort.is_ordered() || self.comfort.min < 0.0 || self.comfort.max > 1.0 {
            return Err(ConfigError::invalid("comfort must be an ordered range inside [0, 1]"));
        }
        if self.initial_bloggers > self.agents {
            return Err(ConfigError::invalid(format!(
                "initial_bloggers {} exceeds agents {}",
                self.initial_bloggers, self.agents
            )));
        }
        for (name, prior) in self.priors.named() {
            prior.validate().map_err(|source| ConfigError::Prior {
                name: format!("priors.{name}"),
                source,
            })?;
        }
        Ok(())
    }

    /// Settings shared by every activation of a model built from this config.
    pub const fn engine_settings(&self) -> EngineSettings {
        let (trait_count, mu) = match self.culture {
            CultureModel::Features { traits, .. } => (traits, 0.0),
            CultureModel::Opinion { mu, .. } => (0, mu),
        };
        EngineSettings {
            trait_count,
            mu,
            movement: self.rules.movement,
            transmission_error: self.rules.transmission_error,
            read_responses: self.read_responses,
        }
    }

    /// A profile with the fixed fields filled in and probabilities zeroed.
    ///
    /// The model overwrites the probabilities with draws from [`AgentPriors`].
    pub fn profile_template(&self) -> BehaviorProfile {
        BehaviorProfile {
            p_online: 0.0,
            p_veloc: self.p_veloc,
            step_length: self.step_length,
            p_start_blogging: 0.0,
            p_write_post: 0.0,
            p_respond: 0.0,
            understanding: 0.0,
            subscriptions: self.subscriptions,
            comfort: self.comfort,
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Step budget and convergence criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Maximum number of steps.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Number of trailing ratios the variance is computed over.
    #[serde(default = "default_window")]
    pub window: usize,

    /// Variance below which the run counts as converged.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            window: default_window(),
            epsilon: default_epsilon(),
        }
    }
}

impl DriverConfig {
    /// Check the budget and criterion.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero budget, a window below 2,
    /// or a non-positive epsilon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps == 0 {
            return Err(ConfigError::invalid("max_steps must be at least 1"));
        }
        if self.window < 2 {
            return Err(ConfigError::invalid("window must be at least 2"));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ConfigError::invalid("epsilon must be positive"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_features() -> usize {
    20
}

const fn default_traits() -> u32 {
    50
}

const fn default_uncertainty() -> f64 {
    0.5
}

const fn default_mu() -> f64 {
    0.3
}

const fn default_opinion_range() -> Bounds {
    Bounds::new(-1.0, 1.0)
}

const fn default_grid_size() -> f64 {
    30.0
}

const fn default_sight() -> f64 {
    1.0
}

const fn default_degree() -> usize {
    3
}

const fn default_agents() -> usize {
    10
}

const fn default_p_veloc() -> f64 {
    0.15
}

const fn default_step_length() -> f64 {
    1.5
}

const fn default_subscriptions() -> Range<usize> {
    Range::new(1, 10)
}

const fn default_comfort() -> Range<f64> {
    Range::new(0.4, 1.0)
}

const fn default_online_prior() -> Prior {
    Prior::beta(5.0, 3.0)
}

const fn default_start_blogging_prior() -> Prior {
    Prior::fixed(0.1)
}

const fn default_write_post_prior() -> Prior {
    Prior::beta(2.0, 5.0)
}

const fn default_respond_prior() -> Prior {
    Prior::fixed(0.2)
}

const fn default_understanding_prior() -> Prior {
    Prior::fixed(1.0)
}

const fn default_max_steps() -> u64 {
    1000
}

const fn default_window() -> usize {
    100
}

const fn default_epsilon() -> f64 {
    1e-6
}
