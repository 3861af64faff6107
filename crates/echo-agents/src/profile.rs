//! Per-agent behavioral parameters.
//!
//! The model draws the probabilities of a [`BehaviorProfile`] once, when the
//! agent is created, from the priors in its configuration. The ranges are
//! shared by all agents of a run.

use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    /// Lower end.
    pub min: T,
    /// Upper end.
    pub max: T,
}

impl<T: PartialOrd + Copy> Range<T> {
    /// Create a range.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Whether `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }

    /// Whether `value` lies inside the range (inclusive).
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Behavioral parameters of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// Probability that an activation is spent online (blogs) instead of
    /// offline (spatial neighbors).
    pub p_online: f64,
    /// Probability of moving before an offline interaction.
    pub p_veloc: f64,
    /// Maximum displacement of one move.
    pub step_length: f64,
    /// Probability of starting a blog when online without one.
    pub p_start_blogging: f64,
    /// Probability of publishing a post when online with a blog.
    pub p_write_post: f64,
    /// Probability of responding to a post just read.
    pub p_respond: f64,
    /// Probability that an adopted trait is copied faithfully rather than
    /// replaced by a random trait.
    pub understanding: f64,
    /// Desired number of followed blogs.
    pub subscriptions: Range<usize>,
    /// Latest-post similarity range within which a followed blog is kept.
    pub comfort: Range<f64>,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            p_online: 0.5,
            p_veloc: 0.15,
            step_length: 1.5,
            p_start_blogging: 0.1,
            p_write_post: 0.3,
            p_respond: 0.2,
            understanding: 1.0,
            subscriptions: Range::new(1, 10),
            comfort: Range::new(0.4, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_is_inclusive() {
        let r = Range::new(0.4, 1.0);
        assert!(r.contains(0.4));
        assert!(r.contains(1.0));
        assert!(!r.contains(0.39));
        assert!(r.is_ordered());
        assert!(!Range::new(3, 1).is_ordered());
    }

    #[test]
    fn default_profile_values() {
        let p = BehaviorProfile::default();
        assert_eq!(p.subscriptions, Range::new(1, 10));
        assert!((p.understanding - 1.0).abs() < f64::EPSILON);
    }
}
