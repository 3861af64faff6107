//! Prior distributions over scalar parameters.
//!
//! A [`Prior`] is drawn from by rejection: draws outside the declared
//! [`Bounds`] are discarded until one lands inside, up to
//! [`MAX_REJECTIONS`] attempts.

use rand::Rng;
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use crate::sampler::{beta_sampler, normal_sampler, uniform_in};

/// Attempts allowed before rejection sampling gives up.
pub const MAX_REJECTIONS: u32 = 10_000;

/// Errors raised by malformed priors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriorError {
    /// `min > max`, or a bound is not finite.
    #[error("invalid bounds [{min}, {max}]")]
    InvalidBounds {
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },

    /// A shape parameter is out of its domain.
    #[error("invalid shape parameter {name} = {value}")]
    InvalidShape {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },

    /// The distribution crate rejected the parameters.
    #[error("distribution rejected parameters: {reason}")]
    Distribution {
        /// Message from `rand_distr`.
        reason: String,
    },

    /// No draw landed inside the bounds.
    #[error("no draw inside bounds after {attempts} attempts")]
    RejectionExhausted {
        /// Number of draws made.
        attempts: u32,
    },
}

/// Inclusive acceptance range for a prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
}

impl Bounds {
    /// Create bounds without validation.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Check that both ends are finite and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError::InvalidBounds`] otherwise.
    pub fn validate(&self) -> Result<(), PriorError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(PriorError::InvalidBounds {
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Names of the adjustable numbers inside a [`Prior`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// [`Prior::Fixed`] value.
    Value,
    /// [`Prior::Uniform`] lower end.
    Min,
    /// [`Prior::Uniform`] upper end.
    Max,
    /// [`Prior::Beta`] alpha.
    Alpha,
    /// [`Prior::Beta`] beta.
    Beta,
    /// [`Prior::Normal`] mean.
    Mean,
    /// [`Prior::Normal`] standard deviation.
    StdDev,
}

impl Shape {
    /// Every shape, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Value,
        Self::Min,
        Self::Max,
        Self::Alpha,
        Self::Beta,
        Self::Mean,
        Self::StdDev,
    ];

    /// Snake-case name as used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Min => "min",
            Self::Max => "max",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Mean => "mean",
            Self::StdDev => "std_dev",
        }
    }
}

/// A distribution over one scalar parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prior {
    /// Always the same value.
    Fixed {
        /// The value.
        value: f64,
    },
    /// Uniform on `[min, max]`.
    Uniform {
        /// Lower end.
        min: f64,
        /// Upper end.
        max: f64,
    },
    /// Beta(`alpha`, `beta`), optionally restricted to `bounds`.
    Beta {
        /// First shape parameter.
        alpha: f64,
        /// Second shape parameter.
        beta: f64,
        /// Acceptance range.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<Bounds>,
    },
    /// Normal(`mean`, `std_dev`), optionally restricted to `bounds`.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std_dev: f64,
        /// Acceptance range.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bounds: Option<Bounds>,
    },
}

impl Prior {
    /// A fixed value.
    pub const fn fixed(value: f64) -> Self {
        Self::Fixed { value }
    }

    /// An unbounded Beta prior.
    pub const fn beta(alpha: f64, beta: f64) -> Self {
        Self::Beta {
            alpha,
            beta,
            bounds: None,
        }
    }

    /// Check every parameter of the prior.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError`] for non-positive Beta shapes, a negative
    /// standard deviation, or malformed bounds.
    pub fn validate(&self) -> Result<(), PriorError> {
        match *self {
            Self::Fixed { value } => {
                if value.is_finite() {
                    Ok(())
                } else {
                    Err(PriorError::InvalidShape {
                        name: "value",
                        value,
                    })
                }
            }
            Self::Uniform { min, max } => Bounds::new(min, max).validate(),
            Self::Beta {
                alpha,
                beta,
                bounds,
            } => {
                beta_sampler(alpha, beta)?;
                bounds.as_ref().map_or(Ok(()), Bounds::validate)
            }
            Self::Normal {
                mean,
                std_dev,
                bounds,
            } => {
                normal_sampler(mean, std_dev)?;
                bounds.as_ref().map_or(Ok(()), Bounds::validate)
            }
        }
    }

    /// Draw one value.
    ///
    /// # Errors
    ///
    /// Returns [`PriorError`] if the prior is malformed or rejection
    /// sampling runs out of attempts.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, PriorError> {
        match *self {
            Self::Fixed { value } => Ok(value),
            Self::Uniform { min, max } => {
                Bounds::new(min, max).validate()?;
                Ok(uniform_in(rng, min, max))
            }
            Self::Beta {
                alpha,
                beta,
                bounds,
            } => reject(rng, &beta_sampler(alpha, beta)?, bounds),
            Self::Normal {
                mean,
                std_dev,
                bounds,
            } => reject(rng, &normal_sampler(mean, std_dev)?, bounds),
        }
    }

    /// Mutable access to one named number of this prior.
    ///
    /// Returns `None` if this kind of prior has no such number.
    pub const fn shape_mut(&mut self, shape: Shape) -> Option<&mut f64> {
        match (self, shape) {
            (Self::Fixed { value }, Shape::Value)
            | (Self::Uniform { min: value, .. }, Shape::Min)
            | (Self::Uniform { max: value, .. }, Shape::Max)
            | (Self::Beta { alpha: value, .. }, Shape::Alpha)
            | (Self::Beta { beta: value, .. }, Shape::Beta)
            | (Self::Normal { mean: value, .. }, Shape::Mean)
            | (Self::Normal { std_dev: value, .. }, Shape::StdDev) => Some(value),
            _ => None,
        }
    }
}

fn reject<R, D>(rng: &mut R, distribution: &D, bounds: Option<Bounds>) -> Result<f64, PriorError>
where
    R: Rng + ?Sized,
    D: Distribution<f64>,
{
    let Some(bounds) = bounds else {
        return Ok(distribution.sample(rng));
    };
    bounds.validate()?;
    for _ in 0..MAX_REJECTIONS {
        let value = distribution.sample(rng);
        if bounds.contains(value) {
            return Ok(value);
        }
    }
    Err(PriorError::RejectionExhausted {
        attempts: MAX_REJECTIONS,
    })
}
