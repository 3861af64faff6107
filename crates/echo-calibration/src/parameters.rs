//! Calibrated components.
//!
//! A component addresses one number of one behavioral prior of the base
//! model, written `behavior.shape` (for example `online.alpha`). The
//! calibration draws a concrete value for every component from its own
//! prior and writes it into a copy of the base [`ModelConfig`].

use std::fmt;
use std::str::FromStr;

use echo_core::{AgentPriors, ModelConfig, Prior, Shape};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// One of the per-agent behavioral probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    /// Going online.
    Online,
    /// Starting a blog.
    StartBlogging,
    /// Publishing a post.
    WritePost,
    /// Responding to a post.
    Respond,
    /// Copying adopted traits faithfully.
    Understanding,
}

impl Behavior {
    /// Every behavior, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Online,
        Self::StartBlogging,
        Self::WritePost,
        Self::Respond,
        Self::Understanding,
    ];

    /// Snake-case name as used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::StartBlogging => "start_blogging",
            Self::WritePost => "write_post",
            Self::Respond => "respond",
            Self::Understanding => "understanding",
        }
    }

    /// The prior this behavior is drawn from.
    pub const fn prior_mut(self, priors: &mut AgentPriors) -> &mut Prior {
        match self {
            Self::Online => &mut priors.online,
            Self::StartBlogging => &mut priors.start_blogging,
            Self::WritePost => &mut priors.write_post,
            Self::Respond => &mut priors.respond,
            Self::Understanding => &mut priors.understanding,
        }
    }
}

/// Error parsing a `behavior.shape` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parameter target `{0}` (expected `behavior.shape`, e.g. `online.alpha`)")]
pub struct ParseTargetError(String);

/// Address of one number inside the base model's priors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParameterTarget {
    /// Which behavior.
    pub behavior: Behavior,
    /// Which number of its prior.
    pub shape: Shape,
}

impl ParameterTarget {
    /// Create a target.
    pub const fn new(behavior: Behavior, shape: Shape) -> Self {
        Self { behavior, shape }
    }
}

impl fmt::Display for ParameterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.behavior.as_str(), self.shape.as_str())
    }
}

impl FromStr for ParameterTarget {
    type Err = ParseTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (behavior, shape) = s
            .split_once('.')
            .ok_or_else(|| ParseTargetError(s.to_owned()))?;
        let behavior = Behavior::ALL
            .into_iter()
            .find(|b| b.as_str() == behavior)
            .ok_or_else(|| ParseTargetError(s.to_owned()))?;
        let shape = Shape::ALL
            .into_iter()
            .find(|sh| sh.as_str() == shape)
            .ok_or_else(|| ParseTargetError(s.to_owned()))?;
        Ok(Self { behavior, shape })
    }
}

impl TryFrom<String> for ParameterTarget {
    type Error = ParseTargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParameterTarget> for String {
    fn from(target: ParameterTarget) -> Self {
        target.to_string()
    }
}

// ---------------------------------------------------------------------------
// Space
// ---------------------------------------------------------------------------

/// One calibrated component: where it goes and how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// The number being calibrated.
    pub target: ParameterTarget,
    /// The distribution its values are drawn from.
    pub prior: Prior,
}

/// The ordered set of calibrated components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpace {
    components: Vec<ParameterSpec>,
}

impl Default for ParameterSpace {
    /// Shape parameters of the `online` and `write_post` Beta priors.
    fn default() -> Self {
        let uniform = |min, max| Prior::Uniform { min, max };
        Self::new(vec![
            ParameterSpec {
                target: ParameterTarget::new(Behavior::Online, Shape::Alpha),
                prior: uniform(2.5, 15.0),
            },
            ParameterSpec {
                target: ParameterTarget::new(Behavior::Online, Shape::Beta),
                prior: uniform(0.1, 7.0),
            },
            ParameterSpec {
                target: ParameterTarget::new(Behavior::WritePost, Shape::Alpha),
                prior: uniform(0.5, 10.0),
            },
            ParameterSpec {
                target: ParameterTarget::new(Behavior::WritePost, Shape::Beta),
                prior: uniform(0.5, 10.0),
            },
        ])
    }
}

impl ParameterSpace {
    /// Create a space from its components, in order.
    pub const fn new(components: Vec<ParameterSpec>) -> Self {
        Self { components }
    }

    /// The components in order.
    pub fn components(&self) -> &[ParameterSpec] {
        &self.components
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether there is nothing to calibrate.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component names in order.
    pub fn names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.target.to_string()).collect()
    }

    /// Reject malformed priors and duplicate targets.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Prior`] for a malformed prior and
    /// [`CalibrationError::Config`] for a duplicate target.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        for (position, spec) in self.components.iter().enumerate() {
            spec.prior
                .validate()
                .map_err(|source| CalibrationError::Prior {
                    target: spec.target,
                    source,
                })?;
            let duplicate = self
                .components
                .iter()
                .take(position)
                .any(|earlier| earlier.target == spec.target);
            if duplicate {
                return Err(echo_core::ConfigError::invalid(format!(
                    "parameter `{}` is calibrated twice",
                    spec.target
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Draw one value per component.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Prior`] if rejection sampling fails.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ParameterSample, CalibrationError> {
        let components = self
            .components
            .iter()
            .map(|spec| {
                spec.prior
                    .sample(rng)
                    .map(|value| SampledValue {
                        target: spec.target,
                        value,
                    })
                    .map_err(|source| CalibrationError::Prior {
                        target: spec.target,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ParameterSample { components })
    }
}

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// A concrete value for one component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampledValue {
    /// The component.
    pub target: ParameterTarget,
    /// Its drawn value.
    pub value: f64,
}

/// One concrete value per component, in space order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSample {
    /// The drawn values.
    pub components: Vec<SampledValue>,
}

impl ParameterSample {
    /// The values in component order.
    pub fn values(&self) -> Vec<f64> {
        self.components.iter().map(|c| c.value).collect()
    }

    /// Whether the sample holds no values.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Write every value into a copy of `base` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::InapplicableTarget`] if a target names a
    /// shape the base prior does not have (e.g. `alpha` of a fixed prior),
    /// and [`CalibrationError::Config`] if the result does not validate.
    pub fn apply(&self, base: &ModelConfig) -> Result<ModelConfig, CalibrationError> {
        let mut config = base.clone();
        for component in &self.components {
            let target = component.target;
            let slot = target
                .behavior
                .prior_mut(&mut config.priors)
                .shape_mut(target.shape)
                .ok_or(CalibrationError::InapplicableTarget { target })?;
            *slot = component.value;
        }
        config.validate()?;
        Ok(config)
    }
}
