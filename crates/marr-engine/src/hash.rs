//! Canonical hashing helpers for session artifacts.

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::PairMatrix;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Computes a stable hexadecimal hash for the provided serialisable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, MarrError> {
    let bytes = serde_json::to_vec(value).map_err(|err| {
        MarrError::Serde(ErrorInfo::new("hash-serialize", err.to_string()))
    })?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Canonical hash of a dissimilarity matrix, with cells rounded so that
/// platform-dependent last-bit noise does not change the digest.
pub fn rdm_hash(rdm: &PairMatrix) -> Result<String, MarrError> {
    let rounded: Vec<(usize, usize, Option<f64>)> = rdm
        .cells()
        .map(|(i, j, cell)| (i, j, cell.map(round_f64)))
        .collect();
    stable_hash_string(&(rdm.item_count(), rounded))
}

/// Rounds a floating point value to the canonical 1e-9 precision used for
/// hashing.
pub fn round_f64(value: f64) -> f64 {
    let scaled = (value * 1e9).round();
    scaled / 1e9
}
