//! Session manifest serialization helpers.

use std::fs;
use std::path::{Path, PathBuf};

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::{SchemaVersion, SessionProvenance};
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Structured manifest describing a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionManifest {
    /// Schema of this manifest payload.
    pub schema_version: SchemaVersion,
    /// Provenance of the session run.
    pub provenance: SessionProvenance,
    /// Configuration used for the session.
    pub config: SessionConfig,
    /// Number of arrangements collected.
    pub trial_count: usize,
    /// Canonical hash of the final dissimilarity matrix.
    pub rdm_hash: String,
    /// Metrics file produced during the session (relative to the out dir).
    pub metrics_file: Option<PathBuf>,
}

impl SessionManifest {
    /// Writes the manifest to a JSON file.
    pub fn write(&self, path: &Path) -> Result<(), MarrError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                MarrError::Serde(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|err| {
            MarrError::Serde(
                ErrorInfo::new("manifest-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, json).map_err(|err| {
            MarrError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, MarrError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            MarrError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents).map_err(|err| {
            MarrError::Serde(
                ErrorInfo::new("manifest-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}
