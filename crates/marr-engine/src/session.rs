//! Session state machine orchestrating trials, evidence and termination.

use std::collections::BTreeMap;

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::PairMatrix;
use serde::Serialize;

use crate::arrangement::{Arrangement, Coord};
use crate::config::SessionConfig;
use crate::estimate::{estimate_dissimilarity, EstimateReport};
use crate::evidence::EvidenceMatrix;
use crate::metrics::{MetricsRecorder, TrialSample};
use crate::select::next_subset;

/// Stage the session is currently in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionStage {
    /// A subset has been chosen and its arrangement has not arrived yet.
    AwaitingArrangement {
        /// Items the presentation layer should display.
        subset: Vec<usize>,
    },
    /// A termination criterion fired; no further trials run.
    Complete,
}

/// Outcome of one submitted arrangement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Whether the session reached a termination criterion.
    pub done: bool,
    /// Items to present next; `None` once done.
    pub next_subset: Option<Vec<usize>>,
}

/// Terminal output of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    /// Every arrangement collected, in trial order.
    pub arrangements: Vec<Arrangement>,
    /// The final reconstructed dissimilarity matrix.
    pub rdm: PairMatrix,
    /// Per-trial response times in milliseconds.
    pub trial_millis: Vec<u64>,
    /// Per-trial diagnostics.
    pub samples: Vec<TrialSample>,
}

/// One participant's multi-arrangement session.
///
/// The session owns the append-only arrangement history and the current
/// stage; every derived quantity (evidence, RDM, next subset) is a pure
/// function of that history. The session never reads a clock: callers pass
/// the elapsed time with each submission, so runs are replayable.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    arrangements: Vec<Arrangement>,
    stage: SessionStage,
    recorder: MetricsRecorder,
    trial_millis: Vec<u64>,
    last_elapsed: u64,
    final_estimate: Option<EstimateReport>,
}

impl Session {
    /// Starts a session: the first trial always presents the full item set.
    pub fn new(config: SessionConfig) -> Result<Self, MarrError> {
        config.validate()?;
        let full_set = (0..config.item_count).collect();
        Ok(Self {
            config,
            arrangements: Vec::new(),
            stage: SessionStage::AwaitingArrangement { subset: full_set },
            recorder: MetricsRecorder::new(),
            trial_millis: Vec::new(),
            last_elapsed: 0,
            final_estimate: None,
        })
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Items awaiting arrangement, or `None` once the session is complete.
    pub fn current_subset(&self) -> Option<&[usize]> {
        match &self.stage {
            SessionStage::AwaitingArrangement { subset } => Some(subset),
            SessionStage::Complete => None,
        }
    }

    /// Arrangements accepted so far, in trial order.
    pub fn arrangements(&self) -> &[Arrangement] {
        &self.arrangements
    }

    /// Per-trial diagnostics recorded so far.
    pub fn metrics(&self) -> &MetricsRecorder {
        &self.recorder
    }

    /// Whether a termination criterion has fired.
    pub fn is_complete(&self) -> bool {
        matches!(self.stage, SessionStage::Complete)
    }

    /// Accepts one trial's placements and advances the state machine.
    ///
    /// The placement map must cover exactly the awaited subset; otherwise
    /// the trial is rejected, the history stays untouched, and the same
    /// subset remains current so the caller can re-present it.
    pub fn submit_arrangement(
        &mut self,
        placements: &BTreeMap<usize, Coord>,
        elapsed_millis: u64,
    ) -> Result<StepOutcome, MarrError> {
        let subset = match &self.stage {
            SessionStage::AwaitingArrangement { subset } => subset.clone(),
            SessionStage::Complete => {
                return Err(MarrError::Session(
                    ErrorInfo::new("session-complete", "the session has already finished")
                        .with_hint("call finish() to retrieve the result"),
                ));
            }
        };
        for &item in &subset {
            if !placements.contains_key(&item) {
                return Err(MarrError::Placement(
                    ErrorInfo::new("incomplete-placement", "a requested item was not placed")
                        .with_context("item", item.to_string())
                        .with_context("subset_size", subset.len().to_string())
                        .with_hint("re-present the same subset and collect all items"),
                ));
            }
        }
        for &item in placements.keys() {
            if !subset.contains(&item) {
                return Err(MarrError::Placement(
                    ErrorInfo::new("unexpected-item", "a placed item was not in the subset")
                        .with_context("item", item.to_string()),
                ));
            }
        }

        let arrangement = Arrangement::from_placements(self.config.item_count, placements)?;
        self.arrangements.push(arrangement);
        self.trial_millis
            .push(elapsed_millis.saturating_sub(self.last_elapsed));
        self.last_elapsed = elapsed_millis;

        let evidence = EvidenceMatrix::accumulate(&self.arrangements, self.config.item_count)?;
        let report = estimate_dissimilarity(&self.arrangements, self.config.item_count)?;
        let summary = evidence.utility_summary();
        self.recorder.push_sample(TrialSample {
            trial: self.arrangements.len() - 1,
            subset_size: subset.len(),
            elapsed_millis,
            estimate_iterations: report.iterations,
            estimate_residual: report.residual,
            min_utility: summary.min,
            mean_utility: summary.mean,
        });

        let timed_out = elapsed_millis >= self.config.timeout_millis;
        let saturated = evidence.all_utilities_above(self.config.evidence_threshold);
        if timed_out || saturated {
            self.stage = SessionStage::Complete;
            self.final_estimate = Some(report);
            return Ok(StepOutcome {
                done: true,
                next_subset: None,
            });
        }

        let next = next_subset(&self.arrangements, self.config.item_count)?;
        self.stage = SessionStage::AwaitingArrangement {
            subset: next.clone(),
        };
        Ok(StepOutcome {
            done: false,
            next_subset: Some(next),
        })
    }

    /// Consumes the completed session and returns its terminal output.
    pub fn finish(self) -> Result<SessionResult, MarrError> {
        if !self.is_complete() {
            return Err(MarrError::Session(
                ErrorInfo::new("session-active", "the session has not finished yet")
                    .with_hint("submit arrangements until a termination criterion fires"),
            ));
        }
        let Some(estimate) = self.final_estimate else {
            return Err(MarrError::Session(ErrorInfo::new(
                "missing-estimate",
                "a complete session must hold a final estimate",
            )));
        };
        Ok(SessionResult {
            arrangements: self.arrangements,
            rdm: estimate.rdm,
            trial_millis: self.trial_millis,
            samples: self.recorder.samples().to_vec(),
        })
    }
}
