//! Stepping a model to convergence.
//!
//! After every step the driver records the echo-chamber ratio. Once more
//! than `window` ratios exist, the sample variance of the most recent
//! `window` is compared against `epsilon`; dropping below it ends the run
//! as [`Termination::Converged`]. A run that never converges ends as
//! [`Termination::BudgetExhausted`] after `max_steps`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DriverConfig;
use crate::error::{ConfigError, ModelError};
use crate::model::Simulate;
use crate::stats::ModelStats;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The ratio variance fell below epsilon.
    Converged,
    /// The step budget ran out first.
    BudgetExhausted,
}

/// Final outcome of one run. Produced exactly once per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Statistics after the last step.
    pub stats: ModelStats,
    /// Agent activations performed.
    pub events: u64,
    /// Steps executed.
    pub steps: u64,
    /// Why the run stopped.
    pub termination: Termination,
}

impl RunResult {
    /// Final echo-chamber ratio.
    pub const fn echo_chamber_ratio(&self) -> f64 {
        self.stats.echo_chamber_ratio
    }

    /// Whether the run converged.
    pub const fn converged(&self) -> bool {
        matches!(self.termination, Termination::Converged)
    }
}

/// Unbiased sample variance (`n - 1` denominator).
///
/// Returns `None` for fewer than two values.
#[allow(clippy::cast_precision_loss)]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let count = n as f64;
    let mean = values.iter().sum::<f64>() / count;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(squares / (count - 1.0))
}

/// Steps a [`Simulate`] until convergence or budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationDriver {
    config: DriverConfig,
}

impl SimulationDriver {
    /// Create a driver.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the config does not validate.
    pub fn new(config: DriverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The driver's configuration.
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run `model` to completion.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ModelError`] raised by a step; no partial
    /// result is produced in that case.
    pub fn run<S: Simulate + ?Sized>(&self, model: &mut S) -> Result<RunResult, ModelError> {
        let DriverConfig {
            max_steps,
            window,
            epsilon,
        } = self.config;
        let mut recent: VecDeque<f64> = VecDeque::with_capacity(window.saturating_add(1));
        let mut stats = model.stats();

        for step in 1..=max_steps {
            stats = model.step()?;
            recent.push_back(stats.echo_chamber_ratio);
            if recent.len() > window {
                recent.pop_front();
                let variance = sample_variance(recent.make_contiguous());
                if variance.is_some_and(|v| v < epsilon) {
                    debug!(step, ?variance, "Run converged");
                    return Ok(RunResult {
                        stats,
                        events: model.events(),
                        steps: step,
                        termination: Termination::Converged,
                    });
                }
            }
        }

        debug!(max_steps, "Run exhausted its step budget");
        Ok(RunResult {
            stats,
            events: model.events(),
            steps: max_steps,
            termination: Termination::BudgetExhausted,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Replays a fixed ratio sequence, cycling when exhausted.
    struct Scripted {
        ratios: Vec<f64>,
        steps: usize,
    }

    impl Simulate for Scripted {
        fn step(&mut self) -> Result<ModelStats, ModelError> {
            self.steps += 1;
            Ok(self.stats())
        }

        fn stats(&self) -> ModelStats {
            let ratio = if self.steps == 0 {
                0.0
            } else {
                self.ratios[(self.steps - 1) % self.ratios.len()]
            };
            ModelStats {
                echo_chamber_ratio: ratio,
                ..ModelStats::default()
            }
        }

        fn events(&self) -> u64 {
            self.steps as u64 * 10
        }
    }

    fn driver(max_steps: u64, window: usize, epsilon: f64) -> SimulationDriver {
        SimulationDriver::new(DriverConfig {
            max_steps,
            window,
            epsilon,
        })
        .unwrap()
    }

    #[test]
    fn variance_uses_n_minus_one() {
        let v = sample_variance(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert!((v - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(sample_variance(&[1.0]), None);
    }

    #[test]
    fn stops_at_window_plus_one_when_epsilon_is_generous() {
        let mut model = Scripted {
            ratios: vec![0.0, 1.0, 0.5],
            steps: 0,
        };
        let result = driver(1000, 10, 1.0).run(&mut model).unwrap();
        assert_eq!(result.steps, 11);
        assert_eq!(result.termination, Termination::Converged);
        assert_eq!(result.events, 110);
    }

    #[test]
    fn oscillating_ratio_exhausts_budget() {
        let mut model = Scripted {
            ratios: vec![0.0, 1.0],
            steps: 0,
        };
        let result = driver(50, 10, 1e-6).run(&mut model).unwrap();
        assert_eq!(result.steps, 50);
        assert_eq!(result.termination, Termination::BudgetExhausted);
        assert!(!result.converged());
    }

    #[test]
    fn constant_ratio_converges_after_window() {
        let mut model = Scripted {
            ratios: vec![0.25],
            steps: 0,
        };
        let result = driver(1000, 100, 1e-6).run(&mut model).unwrap();
        assert_eq!(result.steps, 101);
        assert!((result.echo_chamber_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_driver_config_is_rejected() {
        let config = DriverConfig {
            max_steps: 0,
            ..DriverConfig::default()
        };
        assert!(SimulationDriver::new(config).is_err());
    }
}
