//! Offline session driver and artefact writers.

use std::path::Path;

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::PairMatrix;
use marr_engine::{Session, SessionConfig, SessionResult};
use serde::{Deserialize, Serialize};

use crate::participant::SimulatedParticipant;

/// Simulated arranging cost per presented item, in milliseconds. Stands in
/// for wall-clock time so simulated sessions are replayable.
pub const PER_ITEM_MILLIS: u64 = 1_000;

/// YAML-configurable parameters governing a simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRunConfig {
    /// Engine configuration for the session.
    pub session: SessionConfig,
    /// Master seed for the simulated participant.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Uniform placement jitter amplitude in arena units.
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Safety cap on simulated trials.
    #[serde(default = "default_max_trials")]
    pub max_trials: usize,
}

fn default_seed() -> u64 {
    0xDA7A_5EED
}

fn default_noise() -> f64 {
    0.05
}

fn default_max_trials() -> usize {
    64
}

impl SimRunConfig {
    /// Validates the simulation parameters and the nested session config.
    pub fn validate(&self) -> Result<(), MarrError> {
        self.session.validate()?;
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(MarrError::Config(
                ErrorInfo::new("invalid-noise", "noise must be finite and non-negative")
                    .with_context("noise", self.noise.to_string()),
            ));
        }
        if self.max_trials == 0 {
            return Err(MarrError::Config(ErrorInfo::new(
                "invalid-max-trials",
                "at least one trial must be allowed",
            )));
        }
        Ok(())
    }
}

/// Terminal output of a simulated session.
#[derive(Debug, Clone)]
pub struct SimOutcome {
    /// The engine's session result.
    pub result: SessionResult,
    /// Trials executed before a termination criterion fired.
    pub trials: usize,
}

/// Drives one session against a simulated participant until the engine
/// terminates it.
pub fn run_session(config: &SimRunConfig) -> Result<SimOutcome, MarrError> {
    config.validate()?;
    let participant =
        SimulatedParticipant::new(config.session.item_count, config.noise, config.seed);
    let mut session = Session::new(config.session.clone())?;
    let mut elapsed = 0u64;
    let mut trials = 0usize;
    while let Some(subset) = session.current_subset().map(<[usize]>::to_vec) {
        if trials >= config.max_trials {
            return Err(MarrError::Session(
                ErrorInfo::new("max-trials-exceeded", "the session did not terminate in time")
                    .with_context("max_trials", config.max_trials.to_string())
                    .with_hint("raise max_trials, the noise, or the evidence threshold"),
            ));
        }
        let placements = participant.arrange(&subset, trials);
        elapsed += PER_ITEM_MILLIS * subset.len() as u64;
        session.submit_arrangement(&placements, elapsed)?;
        trials += 1;
    }
    let result = session.finish()?;
    Ok(SimOutcome { result, trials })
}

/// Writes a dissimilarity matrix as CSV, one labelled row per item, with
/// empty fields for undefined cells.
pub fn write_rdm_csv(rdm: &PairMatrix, path: &Path) -> Result<(), MarrError> {
    let csv_error = |code: &str, err: String| {
        MarrError::Serde(
            ErrorInfo::new(code, err).with_context("path", path.display().to_string()),
        )
    };
    let mut writer =
        csv::Writer::from_path(path).map_err(|err| csv_error("rdm-csv-open", err.to_string()))?;
    let item_count = rdm.item_count();
    let mut header = vec!["item".to_string()];
    header.extend((0..item_count).map(|i| format!("item_{i}")));
    writer
        .write_record(&header)
        .map_err(|err| csv_error("rdm-csv-write", err.to_string()))?;
    for i in 0..item_count {
        let mut row = vec![format!("item_{i}")];
        for j in 0..item_count {
            row.push(match rdm.get(i, j) {
                Some(value) => format!("{value:.6}"),
                None => String::new(),
            });
        }
        writer
            .write_record(&row)
            .map_err(|err| csv_error("rdm-csv-write", err.to_string()))?;
    }
    writer
        .flush()
        .map_err(|err| csv_error("rdm-csv-flush", err.to_string()))
}
