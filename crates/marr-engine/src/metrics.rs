//! Per-trial metrics collection and CSV export.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Diagnostics recorded after every accepted trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSample {
    /// Zero-based trial index.
    pub trial: usize,
    /// Number of items presented in the trial.
    pub subset_size: usize,
    /// Elapsed session time when the trial completed, in milliseconds.
    pub elapsed_millis: u64,
    /// Refinement rounds the estimator ran after the trial.
    pub estimate_iterations: usize,
    /// Residual RMS of the estimator's final round.
    pub estimate_residual: f64,
    /// Smallest off-diagonal evidence utility after the trial.
    pub min_utility: f64,
    /// Mean off-diagonal evidence utility after the trial.
    pub mean_utility: f64,
}

/// Collects trial samples over a session.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    samples: Vec<TrialSample>,
}

impl MetricsRecorder {
    /// Creates a new recorder instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a trial sample.
    pub fn push_sample(&mut self, sample: TrialSample) {
        self.samples.push(sample);
    }

    /// Returns an immutable view over the recorded samples.
    pub fn samples(&self) -> &[TrialSample] {
        &self.samples
    }

    /// Writes the recorded metrics to a CSV file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(
            file,
            "trial,subset_size,elapsed_millis,estimate_iterations,estimate_residual,min_utility,mean_utility"
        )?;
        for sample in &self.samples {
            writeln!(
                file,
                "{},{},{},{},{:.6},{:.6},{:.6}",
                sample.trial,
                sample.subset_size,
                sample.elapsed_millis,
                sample.estimate_iterations,
                sample.estimate_residual,
                sample.min_utility,
                sample.mean_utility
            )?;
        }
        Ok(())
    }
}
