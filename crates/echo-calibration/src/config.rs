//! The full experiment configuration.
//!
//! The canonical configuration lives in `echo-config.yaml` at the project
//! root. It has three sections: `model` (what to simulate), `driver` (when
//! a run stops), and `calibration` (what to search and how hard).

use std::path::{Path, PathBuf};

use echo_core::{ConfigError, DriverConfig, ModelConfig};
use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;
use crate::parameters::ParameterSpace;

/// Top-level experiment configuration, one value per experimental variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Base model every sample is applied to.
    #[serde(default)]
    pub model: ModelConfig,

    /// Step budget and convergence criterion for every run.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Search settings.
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

impl ExperimentConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Validate every section, and check that every calibrated component
    /// applies to the base model.
    ///
    /// # Errors
    ///
    /// Returns the first [`CalibrationError`] found.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        self.model.validate()?;
        self.driver.validate()?;
        self.calibration.validate()?;
        for spec in self.calibration.parameters.components() {
            let mut priors = self.model.priors;
            if spec.target.behavior.prior_mut(&mut priors).shape_mut(spec.target.shape).is_none() {
                return Err(CalibrationError::InapplicableTarget {
                    target: spec.target,
                });
            }
        }
        Ok(())
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Number of samples to draw and evaluate.
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Replicated runs per sample.
    #[serde(default = "default_replications")]
    pub replications: usize,

    /// Number of best samples retained.
    #[serde(default = "default_keep")]
    pub keep: usize,

    /// Empirical echo-chamber ratio to match.
    #[serde(default = "default_target")]
    pub target: f64,

    /// Seed of the sampling stream; run seeds derive from it.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Worker threads; one per core when absent.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Where to write the JSON report, if anywhere.
    #[serde(default)]
    pub report_path: Option<PathBuf>,

    /// Calibrated components.
    #[serde(default)]
    pub parameters: ParameterSpace,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            replications: default_replications(),
            keep: default_keep(),
            target: default_target(),
            seed: default_seed(),
            workers: None,
            report_path: None,
            parameters: ParameterSpace::default(),
        }
    }
}

impl CalibrationConfig {
    /// Check counts, target, and the parameter space.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Config`] for zero counts or a target
    /// outside `[0, 1]`, and the space's own validation errors.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.samples == 0 || self.replications == 0 || self.keep == 0 {
            return Err(ConfigError::invalid(
                "samples, replications and keep must be at least 1",
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.target) {
            return Err(ConfigError::invalid(format!(
                "target ratio must lie in [0, 1], got {}",
                self.target
            ))
            .into());
        }
        if self.workers == Some(0) {
            return Err(ConfigError::invalid("workers must be at least 1").into());
        }
        self.parameters.validate()
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_samples() -> usize {
    20
}

const fn default_replications() -> usize {
    4
}

const fn default_keep() -> usize {
    15
}

const fn default_target() -> f64 {
    0.64
}

const fn default_seed() -> u64 {
    42
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use echo_core::{LandscapeConfig, Prior};

    #[test]
    fn default_config_is_valid() {
        let config = ExperimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.calibration.samples, 20);
        assert_eq!(config.calibration.replications, 4);
        assert_eq!(config.calibration.keep, 15);
        assert!((config.calibration.target - 0.64).abs() < f64::EPSILON);
        assert_eq!(config.calibration.parameters.len(), 4);
        assert_eq!(config.driver.window, 100);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
model:
  agents: 15
  landscape:
    kind: grid
    size: 12.0
    sight: 2.0
  rules:
    transmission_error: true
driver:
  max_steps: 200
  window: 20
  epsilon: 0.0001
calibration:
  samples: 5
  replications: 2
  keep: 3
  target: 0.5
  seed: 7
  workers: 2
  report_path: out/report.json
  parameters:
    - target: online.alpha
      prior:
        kind: uniform
        min: 2.5
        max: 15.0
";
        let config = ExperimentConfig::parse(yaml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.model.agents, 15);
        assert_eq!(
            config.model.landscape,
            LandscapeConfig::Grid {
                size: 12.0,
                sight: 2.0
            }
        );
        assert!(config.model.rules.transmission_error);
        assert_eq!(config.driver.max_steps, 200);
        assert_eq!(config.calibration.workers, Some(2));
        assert_eq!(
            config.calibration.report_path.as_deref(),
            Some(Path::new("out/report.json"))
        );
        assert_eq!(config.calibration.parameters.names(), vec!["online.alpha"]);
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config = ExperimentConfig::parse("{}").unwrap();
        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let err = ExperimentConfig::parse("model: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ExperimentConfig::from_file(Path::new("/nonexistent/echo-config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn components_must_apply_to_the_base_model() {
        let mut config = ExperimentConfig::default();
        config.model.priors.online = Prior::fixed(0.5);
        assert!(matches!(
            config.validate(),
            Err(CalibrationError::InapplicableTarget { .. })
        ));
    }

    #[test]
    fn zero_replications_are_rejected() {
        let mut config = ExperimentConfig::default();
        config.calibration.replications = 0;
        assert!(matches!(config.validate(), Err(CalibrationError::Config { .. })));
    }
}
