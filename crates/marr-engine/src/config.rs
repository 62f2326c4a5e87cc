//! Session configuration schema and defaults.

use marr_core::errors::{ErrorInfo, MarrError};
use serde::{Deserialize, Serialize};

/// Parameters fixed once at session start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of items in the stimulus list.
    pub item_count: usize,
    /// Utility every off-diagonal pair must strictly exceed before the
    /// session can finish on evidence alone.
    #[serde(default = "default_evidence_threshold")]
    pub evidence_threshold: f64,
    /// Elapsed-time bound ending the session regardless of evidence.
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,
    /// Arena edge length in presentation-layer units. Coordinates arrive
    /// already normalized; the size is recorded for provenance and used by
    /// drivers that normalize raw screen positions.
    #[serde(default = "default_arena_size")]
    pub arena_size: f64,
}

fn default_evidence_threshold() -> f64 {
    0.5
}

fn default_timeout_millis() -> u64 {
    600_000
}

fn default_arena_size() -> f64 {
    1.0
}

impl SessionConfig {
    /// Creates a configuration for `item_count` items with default
    /// threshold, timeout and arena size.
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            evidence_threshold: default_evidence_threshold(),
            timeout_millis: default_timeout_millis(),
            arena_size: default_arena_size(),
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), MarrError> {
        if self.item_count < 3 {
            return Err(MarrError::Config(
                ErrorInfo::new("too-few-items", "a session needs at least three items")
                    .with_context("item_count", self.item_count.to_string())
                    .with_hint("adaptive subsets must be smaller than the full set"),
            ));
        }
        if !self.evidence_threshold.is_finite() || self.evidence_threshold < 0.0 {
            return Err(MarrError::Config(
                ErrorInfo::new(
                    "invalid-threshold",
                    "evidence threshold must be finite and non-negative",
                )
                .with_context("evidence_threshold", self.evidence_threshold.to_string()),
            ));
        }
        if !self.arena_size.is_finite() || self.arena_size <= 0.0 {
            return Err(MarrError::Config(
                ErrorInfo::new("invalid-arena", "arena size must be finite and positive")
                    .with_context("arena_size", self.arena_size.to_string()),
            ));
        }
        Ok(())
    }
}
