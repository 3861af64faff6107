//! The calibration loop.
//!
//! For every sample: apply it to the base model, run the configured number
//! of replicas concurrently, wait for all of them, and score the sample by
//! the mean absolute distance of the final echo-chamber ratios from the
//! target. With the `only_stable_models` rule active, a sample whose
//! replicas did not all converge is reported as unstable and never ranked.

use echo_core::{RunResult, Simulation, SimulationDriver};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ExperimentConfig;
use crate::error::CalibrationError;
use crate::parameters::ParameterSample;
use crate::pool::ReplicaPool;
use crate::report::{CalibrationReport, SampleRecord};
use crate::top_k::{RankedResult, TopK};

/// SplitMix64 finalizer.
const fn mix(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of replica `replica` of sample `sample` under calibration seed `base`.
pub fn derive_seed(base: u64, sample: usize, replica: usize) -> u64 {
    let sample = u64::try_from(sample).unwrap_or(u64::MAX);
    let replica = u64::try_from(replica).unwrap_or(u64::MAX);
    mix(mix(base ^ mix(sample)) ^ replica)
}

/// Mean absolute distance of the final ratios from `target`.
///
/// Infinite for an empty slice, so it can never be ranked.
#[allow(clippy::cast_precision_loss)]
pub fn score(runs: &[RunResult], target: f64) -> f64 {
    if runs.is_empty() {
        return f64::INFINITY;
    }
    let total: f64 = runs
        .iter()
        .map(|run| (run.echo_chamber_ratio() - target).abs())
        .sum();
    total / runs.len() as f64
}

/// How a sample fared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOutcome {
    /// Scored; lower is better.
    Scored(f64),
    /// Not every replica converged and only stable models are ranked.
    Unstable {
        /// Replicas that did converge.
        converged: usize,
    },
}

/// A sample together with all of its replica results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleEvaluation {
    /// Position in evaluation order.
    pub index: usize,
    /// The sample.
    pub sample: ParameterSample,
    /// One result per replica, in replica order.
    pub runs: Vec<RunResult>,
    /// Score or instability.
    pub outcome: SampleOutcome,
}

impl SampleEvaluation {
    /// Number of replicas that converged.
    pub fn converged_runs(&self) -> usize {
        self.runs.iter().filter(|r| r.converged()).count()
    }

    /// Mean final echo-chamber ratio across replicas.
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_ratio(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: f64 = self.runs.iter().map(RunResult::echo_chamber_ratio).sum();
        total / self.runs.len() as f64
    }

    /// The reportable summary of this evaluation.
    pub fn record(&self) -> SampleRecord {
        SampleRecord {
            index: self.index,
            score: match self.outcome {
                SampleOutcome::Scored(score) => Some(score),
                SampleOutcome::Unstable { .. } => None,
            },
            values: self.sample.values(),
            mean_ratio: self.mean_ratio(),
            converged_runs: self.converged_runs(),
            runs: self.runs.len(),
        }
    }
}

/// Drives a whole calibration.
#[derive(Debug)]
pub struct Harness {
    config: ExperimentConfig,
    driver: SimulationDriver,
    pool: ReplicaPool,
}

impl Harness {
    /// Validate `config` and start the worker pool.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError`] if the configuration is invalid or the
    /// pool cannot be built.
    pub fn new(config: ExperimentConfig) -> Result<Self, CalibrationError> {
        config.validate()?;
        let driver = SimulationDriver::new(config.driver)?;
        let pool = ReplicaPool::new(config.calibration.workers)?;
        Ok(Self {
            config,
            driver,
            pool,
        })
    }

    /// The experiment being calibrated.
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run every replica of one sample and score it.
    ///
    /// All replicas are collected before anything is scored.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Run`] for the first failed replica (in
    /// replica order); no partial score is produced.
    pub fn evaluate(
        &self,
        index: usize,
        sample: ParameterSample,
    ) -> Result<SampleEvaluation, CalibrationError> {
        let model = sample.apply(&self.config.model)?;
        let calibration = &self.config.calibration;
        let replications = calibration.replications;
        let driver = &self.driver;

        let outcomes = self.pool.run_all(replications, |replica| {
            let seed = derive_seed(calibration.seed, index, replica);
            let mut simulation = Simulation::build(&model, seed)?;
            driver.run(&mut simulation)
        })?;
        let runs = outcomes
            .into_iter()
            .enumerate()
            .map(|(replica, outcome)| {
                outcome.map_err(|source| CalibrationError::Run {
                    sample: index,
                    replica,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let converged = runs.iter().filter(|r| r.converged()).count();
        let outcome = if model.rules.only_stable_models && converged < runs.len() {
            SampleOutcome::Unstable { converged }
        } else {
            SampleOutcome::Scored(score(&runs, calibration.target))
        };
        Ok(SampleEvaluation {
            index,
            sample,
            runs,
            outcome,
        })
    }

    /// Run the calibration to completion.
    ///
    /// # Errors
    ///
    /// Returns the first [`CalibrationError`]; the calibration stops there.
    pub fn run(&self) -> Result<CalibrationReport, CalibrationError> {
        self.run_with(|_| {})
    }

    /// Run the calibration, calling `on_sample` after every evaluation.
    ///
    /// # Errors
    ///
    /// Returns the first [`CalibrationError`]; the calibration stops there.
    pub fn run_with<F>(&self, mut on_sample: F) -> Result<CalibrationReport, CalibrationError>
    where
        F: FnMut(&SampleRecord),
    {
        let calibration = &self.config.calibration;
        let space = &calibration.parameters;
        let mut rng = SmallRng::seed_from_u64(calibration.seed);
        let mut top = TopK::new(calibration.keep);
        let mut report =
            CalibrationReport::begin(calibration.target, calibration.replications, space.names());

        info!(
            calibration_id = %report.id,
            samples = calibration.samples,
            replications = calibration.replications,
            keep = calibration.keep,
            target = calibration.target,
            threads = self.pool.threads(),
            "Calibration started"
        );

        for index in 0..calibration.samples {
            let sample = space.sample(&mut rng)?;
            let evaluation = self.evaluate(index, sample)?;
            let record = evaluation.record();
            match evaluation.outcome {
                SampleOutcome::Scored(score) => {
                    let kept = top.offer(RankedResult {
                        index,
                        score,
                        sample: evaluation.sample,
                    });
                    debug!(index, score, kept, mean_ratio = record.mean_ratio, "Sample scored");
                }
                SampleOutcome::Unstable { converged } => {
                    warn!(
                        index,
                        converged,
                        runs = record.runs,
                        "Sample unstable, not ranked"
                    );
                }
            }
            on_sample(&record);
            report.evaluated.push(record);
        }

        report.best = top.retained().cloned().collect();
        report.means = top.component_means();
        report.finished_at = chrono::Utc::now();
        info!(
            calibration_id = %report.id,
            retained = report.best.len(),
            unstable = report.unstable_samples(),
            best_score = report.best.first().map(|b| b.score),
            "Calibration finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use echo_core::{DriverConfig, ModelConfig, ModelStats, Termination};

    fn run_with_ratio(ratio: f64, termination: Termination) -> RunResult {
        RunResult {
            stats: ModelStats {
                echo_chamber_ratio: ratio,
                ..ModelStats::default()
            },
            events: 0,
            steps: 1,
            termination,
        }
    }

    fn small_experiment() -> ExperimentConfig {
        let mut config = ExperimentConfig {
            model: ModelConfig {
                agents: 8,
                ..ModelConfig::default()
            },
            driver: DriverConfig {
                max_steps: 20,
                window: 5,
                epsilon: 1e-6,
            },
            ..ExperimentConfig::default()
        };
        config.calibration.samples = 3;
        config.calibration.replications = 2;
        config.calibration.keep = 2;
        config.calibration.workers = Some(2);
        config
    }

    #[test]
    fn score_is_mean_absolute_distance() {
        let runs = [
            run_with_ratio(0.5, Termination::Converged),
            run_with_ratio(0.9, Termination::Converged),
        ];
        assert!((score(&runs, 0.64) - (0.14 + 0.26) / 2.0).abs() < 1e-12);
        assert!(score(&[], 0.64).is_infinite());
    }

    #[test]
    fn seeds_differ_across_samples_and_replicas() {
        let a = derive_seed(42, 0, 0);
        assert_ne!(a, derive_seed(42, 0, 1));
        assert_ne!(a, derive_seed(42, 1, 0));
        assert_ne!(a, derive_seed(43, 0, 0));
        assert_eq!(a, derive_seed(42, 0, 0));
    }

    #[test]
    fn evaluation_collects_every_replica() {
        let harness = Harness::new(small_experiment()).unwrap();
        let sample = harness
            .config()
            .calibration
            .parameters
            .sample(&mut SmallRng::seed_from_u64(1))
            .unwrap();
        let evaluation = harness.evaluate(0, sample).unwrap();
        assert_eq!(evaluation.runs.len(), 2);
        assert!(matches!(evaluation.outcome, SampleOutcome::Scored(s) if (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn unconverged_samples_are_unstable_under_the_rule() {
        let mut config = small_experiment();
        // Too few steps to ever fill the window.
        config.driver = DriverConfig {
            max_steps: 3,
            window: 10,
            epsilon: 1e-6,
        };
        config.model.rules.only_stable_models = true;
        let harness = Harness::new(config.clone()).unwrap();
        let sample = config
            .calibration
            .parameters
            .sample(&mut SmallRng::seed_from_u64(2))
            .unwrap();
        let evaluation = harness.evaluate(0, sample.clone()).unwrap();
        assert_eq!(evaluation.outcome, SampleOutcome::Unstable { converged: 0 });
        assert_eq!(evaluation.runs.len(), 2);

        config.model.rules.only_stable_models = false;
        let harness = Harness::new(config).unwrap();
        let evaluation = harness.evaluate(0, sample).unwrap();
        assert!(matches!(evaluation.outcome, SampleOutcome::Scored(_)));
    }

    #[test]
    fn run_reports_every_sample() {
        let harness = Harness::new(small_experiment()).unwrap();
        let mut streamed = 0;
        let report = harness.run_with(|_| streamed += 1).unwrap();
        assert_eq!(streamed, 3);
        assert_eq!(report.evaluated.len(), 3);
        assert!(report.best.len() <= 2);
        assert_eq!(report.components.len(), 4);
        assert_eq!(report.csv_lines().len(), 4);
    }
}
