//! lesiontrack-cli
//!
//! Batch validation of a saved viewer session: load the measurements,
//! image metadata and selected criteria, run a full validation pass and
//! report what the viewer would display.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use lesiontrack_core::models::{Measurement, SuccessMessage, ValidationError};
use lesiontrack_core::source::{InMemoryMeasurements, RepaintSink};
use lesiontrack_criteria::resolve::{CriteriaRegistry, ImageContext, SelectedCriteria};
use lesiontrack_validation::{MeasurementValidator, ValidatorConfig};

/// Command line of the `lesiontrack` binary.
#[derive(Debug, Parser)]
#[command(name = "lesiontrack", version, about = "Validate lesion measurements against trial criteria")]
pub struct Cli {
    /// Saved viewer session (criteria, measurements, images)
    pub session: PathBuf,

    /// Validator config; defaults apply when omitted
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

/// A saved viewer session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Selected criteria ids, e.g. `["RECIST"]`.
    #[serde(default)]
    pub criteria: Vec<String>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    /// Image id to acquisition and timepoint metadata.
    #[serde(default)]
    pub images: HashMap<String, ImageContext>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read session at {}", path.display()))?;
        serde_json::from_str(&contents)
            .wrap_err_with(|| format!("invalid session file {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub errors: Vec<ValidationError>,
    pub successes: Vec<SuccessMessage>,
}

/// Logs instead of redrawing.
pub struct LogRepaint;

impl RepaintSink for LogRepaint {
    fn notify_changed(&self) {
        tracing::info!("validation results changed");
    }
}

/// Validate every measurement in the session and collect the results.
pub fn run(session: Session, config: &ValidatorConfig, repaint: &dyn RepaintSink) -> Report {
    let measurement_count = session.measurements.len();
    let validator = MeasurementValidator::new(
        Arc::new(InMemoryMeasurements::new(session.measurements)),
        Arc::new(SelectedCriteria::new(session.criteria)),
        Arc::new(CriteriaRegistry::new(session.images)),
        config,
    );

    validator.validate_all();
    if validator.with_state(|s| s.revision()) > 0 {
        repaint.notify_changed();
    }

    let report = Report {
        errors: validator.errors(),
        successes: validator.successes(),
    };
    tracing::info!(
        measurements = measurement_count,
        errors = report.errors.len(),
        successes = report.successes.len(),
        "session validated"
    );
    report
}
