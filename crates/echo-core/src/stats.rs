//! Aggregate statistics computed after every step.

use serde::{Deserialize, Serialize};

/// Model-wide counters at the end of a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    /// Number of distinct cultures in the population.
    pub cultures: usize,
    /// Cumulative cultural changes caused by reading blogs.
    pub online_interactions: u64,
    /// Cumulative cultural changes caused by meeting neighbors.
    pub offline_interactions: u64,
    /// Posts across all blogs.
    pub posts: usize,
    /// Responses across all posts.
    pub comments: usize,
    /// Number of blogs.
    pub blogs: usize,
    /// Blogs whose approval exceeds the echo-chamber threshold.
    pub echo_chambers: usize,
    /// `echo_chambers / blogs`, `0` without blogs.
    pub echo_chamber_ratio: f64,
    /// Follow relations across all blogs.
    pub subscriptions: usize,
    /// Mean width of blog topic bounds (opinion variant, else `0`).
    pub mean_topic_spread: f64,
}

impl ModelStats {
    /// Names of the values exposed by [`ModelStats::report`], in order.
    pub const REPORTABLE_FIELDS: [&'static str; 10] = [
        "cultures",
        "online_interactions",
        "offline_interactions",
        "posts",
        "comments",
        "blogs",
        "echo_chambers",
        "echo_chamber_ratio",
        "subscriptions",
        "mean_topic_spread",
    ];

    /// Every reportable value as `f64`, in [`ModelStats::REPORTABLE_FIELDS`] order.
    #[allow(clippy::cast_precision_loss)]
    pub const fn values(&self) -> [f64; 10] {
        [
            self.cultures as f64,
            self.online_interactions as f64,
            self.offline_interactions as f64,
            self.posts as f64,
            self.comments as f64,
            self.blogs as f64,
            self.echo_chambers as f64,
            self.echo_chamber_ratio,
            self.subscriptions as f64,
            self.mean_topic_spread,
        ]
    }

    /// Named reportable values.
    pub fn report(&self) -> Vec<(&'static str, f64)> {
        Self::REPORTABLE_FIELDS
            .into_iter()
            .zip(self.values())
            .collect()
    }

    /// One reportable value by name.
    pub fn field(&self, name: &str) -> Option<f64> {
        Self::REPORTABLE_FIELDS
            .into_iter()
            .zip(self.values())
            .find_map(|(field, value)| (field == name).then_some(value))
    }

    /// Total cultural changes from both channels.
    pub const fn interactions(&self) -> u64 {
        self.online_interactions
            .saturating_add(self.offline_interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_follows_field_order() {
        let stats = ModelStats {
            cultures: 3,
            blogs: 4,
            echo_chambers: 1,
            echo_chamber_ratio: 0.25,
            ..ModelStats::default()
        };
        let report = stats.report();
        assert_eq!(report.len(), ModelStats::REPORTABLE_FIELDS.len());
        assert_eq!(report.first().map(|(name, _)| *name), Some("cultures"));
        assert_eq!(stats.field("blogs"), Some(4.0));
        assert_eq!(stats.field("echo_chamber_ratio"), Some(0.25));
        assert_eq!(stats.field("nope"), None);
    }

    #[test]
    fn serializes_with_field_names() {
        let json = serde_json::to_value(ModelStats::default()).unwrap_or_default();
        for field in ModelStats::REPORTABLE_FIELDS {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
