//! Cultural states and the similarity measures defined over them.
//!
//! A model variant uses exactly one representation for every agent:
//!
//! - [`FeatureVector`] -- an ordered, fixed-length sequence of trait values,
//!   each in `[0, trait_count)`. Similarity is the fraction of equal
//!   positions.
//! - [`Opinion`] -- a scalar position with a non-negative uncertainty radius.
//!   Similarity is the overlap of the two uncertainty intervals divided by
//!   their union.
//!
//! Both are wrapped in [`CulturalState`], which is also the snapshot type
//! stored in blog posts and responses. [`CultureKey`] gives every state a
//! structural hash/equality key so that distinct cultures can be counted
//! without formatting states into strings.

use serde::{Deserialize, Serialize};

/// Errors raised when constructing an invalid cultural state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CultureError {
    /// A feature vector must have at least one position.
    #[error("feature vector must not be empty")]
    EmptyFeatureVector,

    /// Uncertainty must be finite and non-negative.
    #[error("invalid uncertainty {0}: must be finite and >= 0")]
    InvalidUncertainty(f64),

    /// Opinion position must be finite.
    #[error("invalid opinion position {0}: must be finite")]
    InvalidPosition(f64),
}

/// Divide two counts as `f64`.
#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// An ordered, non-empty sequence of trait values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<u32>);

impl FeatureVector {
    /// Wrap a list of trait values.
    ///
    /// # Errors
    ///
    /// Returns [`CultureError::EmptyFeatureVector`] if `values` is empty.
    pub fn new(values: Vec<u32>) -> Result<Self, CultureError> {
        if values.is_empty() {
            return Err(CultureError::EmptyFeatureVector);
        }
        Ok(Self(values))
    }

    /// Number of features (positions).
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; construction rejects empty vectors.
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The trait values in position order.
    pub fn values(&self) -> &[u32] {
        &self.0
    }

    /// The trait value at `position`, if it exists.
    pub fn get(&self, position: usize) -> Option<u32> {
        self.0.get(position).copied()
    }

    /// Overwrite the trait value at `position`.
    ///
    /// Returns `true` if the stored value actually changed.
    pub fn set(&mut self, position: usize, value: u32) -> bool {
        match self.0.get_mut(position) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }

    /// Fraction of positions holding equal values, in `[0, 1]`.
    ///
    /// Vectors of different lengths are compared over the longer length,
    /// with missing positions counted as mismatches, which keeps the measure
    /// symmetric.
    pub fn similarity(&self, other: &Self) -> f64 {
        let equal = self
            .0
            .iter()
            .zip(other.0.iter())
            .filter(|(a, b)| a == b)
            .count();
        ratio(equal, self.0.len().max(other.0.len()))
    }

    /// Index of the first position where `self` and `other` differ.
    pub fn first_mismatch(&self, other: &Self) -> Option<usize> {
        self.0
            .iter()
            .zip(other.0.iter())
            .position(|(a, b)| a != b)
    }
}

// ---------------------------------------------------------------------------
// Opinion
// ---------------------------------------------------------------------------

/// A scalar opinion with an uncertainty radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    /// Position on the opinion axis.
    pub position: f64,
    /// Half-width of the uncertainty interval around `position`.
    pub uncertainty: f64,
}

impl Opinion {
    /// Create an opinion, validating both components.
    ///
    /// # Errors
    ///
    /// Returns [`CultureError::InvalidPosition`] for a non-finite position
    /// and [`CultureError::InvalidUncertainty`] for a negative or non-finite
    /// uncertainty.
    pub fn new(position: f64, uncertainty: f64) -> Result<Self, CultureError> {
        if !position.is_finite() {
            return Err(CultureError::InvalidPosition(position));
        }
        if !uncertainty.is_finite() || uncertainty < 0.0 {
            return Err(CultureError::InvalidUncertainty(uncertainty));
        }
        Ok(Self {
            position,
            uncertainty,
        })
    }

    /// Lower end of the uncertainty interval.
    pub fn lower(&self) -> f64 {
        self.position - self.uncertainty
    }

    /// Upper end of the uncertainty interval.
    pub fn upper(&self) -> f64 {
        self.position + self.uncertainty
    }

    /// Signed overlap `H` of the two uncertainty intervals.
    ///
    /// `H = min(X_i + U_i, X_j + U_j) - max(X_i - U_i, X_j - U_j)`. Negative
    /// values mean the intervals are disjoint. The measure is symmetric.
    pub fn overlap(&self, other: &Self) -> f64 {
        self.upper().min(other.upper()) - self.lower().max(other.lower())
    }

    /// Overlap divided by the width of the union, clamped to `[0, 1]`.
    pub fn similarity(&self, other: &Self) -> f64 {
        let union = self.upper().max(other.upper()) - self.lower().min(other.lower());
        if union <= f64::EPSILON {
            // Two points: similar only if they coincide.
            return if (self.position - other.position).abs() <= f64::EPSILON {
                1.0
            } else {
                0.0
            };
        }
        (self.overlap(other) / union).clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// CulturalState
// ---------------------------------------------------------------------------

/// The comparable cultural position of an agent, post, or response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CulturalState {
    /// Discrete trait vector.
    Features(FeatureVector),
    /// Continuous opinion with uncertainty.
    Opinion(Opinion),
}

impl CulturalState {
    /// Similarity in `[0, 1]`; states of different kinds are never similar.
    pub fn similarity(&self, other: &Self) -> f64 {
        match (self, other) {
            (Self::Features(a), Self::Features(b)) => a.similarity(b),
            (Self::Opinion(a), Self::Opinion(b)) => a.similarity(b),
            _ => 0.0,
        }
    }

    /// Structural key identifying this exact culture.
    pub fn key(&self) -> CultureKey {
        match self {
            Self::Features(features) => CultureKey::Features(features.values().to_vec()),
            Self::Opinion(opinion) => CultureKey::Opinion {
                position_bits: opinion.position.to_bits(),
                uncertainty_bits: opinion.uncertainty.to_bits(),
            },
        }
    }

    /// The feature vector, if this is the discrete variant.
    pub const fn as_features(&self) -> Option<&FeatureVector> {
        match self {
            Self::Features(features) => Some(features),
            Self::Opinion(_) => None,
        }
    }
}

/// Structural equality/hash key of a [`CulturalState`].
///
/// Opinions are keyed by the bit patterns of their components, so two
/// agents share a culture only if their opinions are bit-for-bit identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CultureKey {
    /// Key of a feature vector: the ordered trait values.
    Features(Vec<u32>),
    /// Key of an opinion: the raw bits of position and uncertainty.
    Opinion {
        /// `f64::to_bits` of the position.
        position_bits: u64,
        /// `f64::to_bits` of the uncertainty.
        uncertainty_bits: u64,
    },
}
