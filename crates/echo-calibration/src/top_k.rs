//! Bounded retention of the best-scoring samples.
//!
//! [`TopK`] always holds exactly `capacity` entries, sorted ascending by
//! score (lower is better). It starts filled with sentinel entries of
//! infinite score, so the first `capacity` real entries always get in.

use serde::{Deserialize, Serialize};

use crate::parameters::ParameterSample;

/// A scored sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// Index of the sample in evaluation order.
    pub index: usize,
    /// Mean distance from the target; lower is better.
    pub score: f64,
    /// The sample itself.
    pub sample: ParameterSample,
}

impl RankedResult {
    fn sentinel() -> Self {
        Self {
            index: usize::MAX,
            score: f64::INFINITY,
            sample: ParameterSample::default(),
        }
    }

    /// Whether this is a placeholder rather than a real result.
    pub fn is_sentinel(&self) -> bool {
        self.score.is_infinite()
    }
}

/// The `capacity` best results seen so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopK {
    entries: Vec<RankedResult>,
}

impl TopK {
    /// Create a retention set of `capacity` sentinel entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: (0..capacity).map(|_| RankedResult::sentinel()).collect(),
        }
    }

    /// Number of entries (always the capacity).
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// All entries including sentinels, best first.
    pub fn entries(&self) -> &[RankedResult] {
        &self.entries
    }

    /// Real entries only, best first.
    pub fn retained(&self) -> impl Iterator<Item = &RankedResult> {
        self.entries.iter().filter(|e| !e.is_sentinel())
    }

    /// Offer a candidate. It replaces the worst entry iff its score is
    /// strictly lower; the entries are then re-sorted. Returns whether the
    /// candidate was kept.
    pub fn offer(&mut self, candidate: RankedResult) -> bool {
        if !candidate.score.is_finite() {
            return false;
        }
        let Some(worst) = self.entries.last_mut() else {
            return false;
        };
        if candidate.score >= worst.score {
            return false;
        }
        *worst = candidate;
        self.entries.sort_by(|a, b| a.score.total_cmp(&b.score));
        true
    }

    /// Per-component mean over the retained entries.
    ///
    /// Returns an empty vector when nothing has been retained yet.
    #[allow(clippy::cast_precision_loss)]
    pub fn component_means(&self) -> Vec<f64> {
        let mut sums: Vec<f64> = Vec::new();
        let mut count = 0_usize;
        for entry in self.retained() {
            let values = entry.sample.values();
            if sums.is_empty() {
                sums = vec![0.0; values.len()];
            }
            for (sum, value) in sums.iter_mut().zip(values) {
                *sum += value;
            }
            count = count.saturating_add(1);
        }
        if count == 0 {
            return Vec::new();
        }
        let n = count as f64;
        sums.into_iter().map(|sum| sum / n).collect()
    }
}
