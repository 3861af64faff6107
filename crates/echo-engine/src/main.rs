//! Calibration binary for the echo-chamber model.
//!
//! Loads an experiment, samples behavior parameters, runs every sample
//! as a batch of replicated simulations and prints one CSV line per
//! sample to stdout. Logs go to stderr through `tracing`.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `$ECHO_CONFIG` or `echo-config.yaml`
//! 3. Validate it and start the replica pool
//! 4. Run the calibration, streaming CSV lines as samples finish
//! 5. Print the mean line of the retained samples
//! 6. Write the JSON report if `calibration.report_path` is set

mod error;

use std::path::PathBuf;

use anyhow::Context;
use echo_calibration::{ExperimentConfig, Harness, SampleRecord};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming the experiment file.
const CONFIG_ENV: &str = "ECHO_CONFIG";

/// Experiment file used when `ECHO_CONFIG` is unset.
const DEFAULT_CONFIG: &str = "echo-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a simulation fails,
/// or the report cannot be written.
fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    info!("echo-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        agents = config.model.agents,
        max_steps = config.driver.max_steps,
        window = config.driver.window,
        samples = config.calibration.samples,
        replications = config.calibration.replications,
        components = config.calibration.parameters.len(),
        "Configuration loaded"
    );

    // 3. Validate and start the pool.
    let report_path = config.calibration.report_path.clone();
    let harness = Harness::new(config).map_err(EngineError::from)?;

    // 4. Run, printing each sample as it is evaluated.
    let report = harness
        .run_with(print_record)
        .map_err(EngineError::from)?;

    // 5. Mean line.
    println!("{}", report.mean_line());

    // 6. Optional JSON report.
    if let Some(path) = report_path {
        report
            .write_json(&path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    info!(
        calibration_id = %report.id,
        evaluated = report.evaluated.len(),
        retained = report.best.len(),
        "echo-engine finished"
    );
    Ok(())
}

fn print_record(record: &SampleRecord) {
    println!("{}", record.csv_line());
}

/// Load the experiment from `$ECHO_CONFIG`, else `echo-config.yaml`.
///
/// A missing default file means "use the defaults"; a missing file that
/// was named explicitly is an error.
fn load_config() -> Result<ExperimentConfig, EngineError> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let path = explicit
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    if explicit.is_none() && !path.exists() {
        info!("Config file not found, using defaults");
        return Ok(ExperimentConfig::default());
    }
    ExperimentConfig::from_file(&path).map_err(|source| EngineError::Config { path, source })
}
