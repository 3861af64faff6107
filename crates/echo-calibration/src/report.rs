//! Calibration output.
//!
//! Two forms: one CSV line per evaluated sample (`index, score, c1, c2, ...`)
//! plus a closing `mean, c1, c2, ...` line over the retained samples, and a
//! JSON [`CalibrationReport`] for archiving a whole calibration.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CalibrationError;
use crate::top_k::RankedResult;

/// What happened to one evaluated sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Position in evaluation order.
    pub index: usize,
    /// Mean distance from the target, `None` if the sample was unstable.
    pub score: Option<f64>,
    /// Drawn component values in space order.
    pub values: Vec<f64>,
    /// Mean final echo-chamber ratio across replicas.
    pub mean_ratio: f64,
    /// Replicas that converged.
    pub converged_runs: usize,
    /// Replicas run.
    pub runs: usize,
}

impl SampleRecord {
    /// `index, score, c1, c2, ...`; unstable samples print `unstable`.
    pub fn csv_line(&self) -> String {
        let mut line = match self.score {
            Some(score) => format!("{}, {score}", self.index),
            None => format!("{}, unstable", self.index),
        };
        append_values(&mut line, &self.values);
        line
    }
}

/// `mean, c1, c2, ...` over component means.
pub fn mean_line(means: &[f64]) -> String {
    let mut line = String::from("mean");
    append_values(&mut line, means);
    line
}

fn append_values(line: &mut String, values: &[f64]) {
    for value in values {
        // Writing into a String cannot fail.
        let _ = write!(line, ", {value}");
    }
}

/// Everything a calibration produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    /// Unique id of this calibration.
    pub id: Uuid,
    /// When the first sample was drawn.
    pub started_at: DateTime<Utc>,
    /// When the last sample finished.
    pub finished_at: DateTime<Utc>,
    /// Target ratio.
    pub target: f64,
    /// Replicas per sample.
    pub replications: usize,
    /// Component names in order.
    pub components: Vec<String>,
    /// Every evaluated sample in order.
    pub evaluated: Vec<SampleRecord>,
    /// Retained samples, best first.
    pub best: Vec<RankedResult>,
    /// Per-component mean over `best`.
    pub means: Vec<f64>,
}

impl CalibrationReport {
    /// Create an empty report stamped with a fresh id and the current time.
    pub fn begin(target: f64, replications: usize, components: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            started_at: now,
            finished_at: now,
            target,
            replications,
            components,
            evaluated: Vec::new(),
            best: Vec::new(),
            means: Vec::new(),
        }
    }

    /// Number of samples that were unstable.
    pub fn unstable_samples(&self) -> usize {
        self.evaluated.iter().filter(|r| r.score.is_none()).count()
    }

    /// The closing CSV line.
    pub fn mean_line(&self) -> String {
        mean_line(&self.means)
    }

    /// Every CSV line: one per evaluated sample, then the mean line.
    pub fn csv_lines(&self) -> Vec<String> {
        self.evaluated
            .iter()
            .map(SampleRecord::csv_line)
            .chain(std::iter::once(self.mean_line()))
            .collect()
    }

    /// Write the report as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Io`] or [`CalibrationError::Json`].
    pub fn write_json(&self, path: &Path) -> Result<(), CalibrationError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(index: usize, score: Option<f64>) -> SampleRecord {
        SampleRecord {
            index,
            score,
            values: vec![2.5, 0.5],
            mean_ratio: 0.6,
            converged_runs: 4,
            runs: 4,
        }
    }

    #[test]
    fn csv_lines_follow_layout() {
        assert_eq!(record(3, Some(0.125)).csv_line(), "3, 0.125, 2.5, 0.5");
        assert_eq!(record(4, None).csv_line(), "4, unstable, 2.5, 0.5");
        assert_eq!(mean_line(&[1.0, 2.5]), "mean, 1, 2.5");
    }

    #[test]
    fn report_collects_lines_and_counts_unstable() {
        let mut report = CalibrationReport::begin(0.64, 4, vec!["online.alpha".into()]);
        report.evaluated = vec![record(0, Some(0.1)), record(1, None)];
        report.means = vec![2.5];
        assert_eq!(report.unstable_samples(), 1);
        let lines = report.csv_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.last().map(String::as_str), Some("mean, 2.5"));
    }

    #[test]
    fn report_serializes_with_identity_and_timestamps() {
        let report = CalibrationReport::begin(0.64, 2, Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("id").and_then(|v| v.as_str()).is_some());
        assert!(json.get("started_at").is_some());
        assert_eq!(json.get("replications").and_then(serde_json::Value::as_u64), Some(2));
        let back: CalibrationReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, report.id);
    }
}
