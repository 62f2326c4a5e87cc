//! Iterative reconstruction of the global dissimilarity matrix (RDM).
//!
//! Each trial measures distances only within its item subset, at an
//! arbitrary scale set by how much of the arena the participant used. The
//! estimator makes those scales commensurable by repeatedly rescaling every
//! arrangement against the evolving consensus estimate and re-averaging,
//! following the inverse-MDS procedure of Kriegeskorte & Mur (2012).

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::PairMatrix;
use serde::Serialize;

use crate::arrangement::Arrangement;

/// Residual RMS below which successive estimates count as converged.
pub const CONVERGENCE_RMS: f64 = 0.01;

/// Hard cap on refinement rounds. The fixed point is not guaranteed to
/// converge monotonically on pathological input; the last estimate is
/// returned regardless.
pub const MAX_ITERATIONS: usize = 50;

/// Outcome of one dissimilarity estimation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    /// The reconstructed dissimilarity matrix.
    pub rdm: PairMatrix,
    /// Refinement rounds executed.
    pub iterations: usize,
    /// Whether the residual dropped below [`CONVERGENCE_RMS`].
    pub converged: bool,
    /// Residual RMS between the last two estimates.
    pub residual: f64,
}

/// Reconstructs the RDM from the full arrangement history.
///
/// Pairs no arrangement has jointly measured stay undefined in the result.
pub fn estimate_dissimilarity(
    arrangements: &[Arrangement],
    item_count: usize,
) -> Result<EstimateReport, MarrError> {
    if arrangements.is_empty() {
        return Err(MarrError::Estimate(
            ErrorInfo::new("empty-history", "cannot estimate dissimilarity without arrangements")
                .with_hint("collect at least one arrangement first"),
        ));
    }
    for (trial, arrangement) in arrangements.iter().enumerate() {
        if arrangement.item_count() != item_count {
            return Err(MarrError::Estimate(
                ErrorInfo::new("item-count-mismatch", "arrangement covers a different item set")
                    .with_context("trial", trial.to_string())
                    .with_context("expected", item_count.to_string())
                    .with_context("actual", arrangement.item_count().to_string()),
            ));
        }
    }

    let mut seed = initial_estimate(arrangements, item_count)?;
    let mut estimate = seed.clone();
    let mut iterations = 0;
    let mut converged = false;
    let mut residual = f64::INFINITY;

    while iterations < MAX_ITERATIONS {
        let rescaled = rescale_arrangements(arrangements, &seed);
        estimate = weighted_reestimate(arrangements, &rescaled, item_count)?;
        iterations += 1;
        match estimate.residual_rms(&seed)? {
            Some(value) => {
                residual = value;
                if value < CONVERGENCE_RMS {
                    converged = true;
                    break;
                }
            }
            None => {
                // Nothing comparable between rounds: zero-information input,
                // trivially stable.
                residual = 0.0;
                converged = true;
                break;
            }
        }
        seed = estimate.clone();
    }

    Ok(EstimateReport {
        rdm: estimate,
        iterations,
        converged,
        residual,
    })
}

/// Seed for the fixed-point iteration, RMS-normalized to 1.
///
/// A lone arrangement (the first, full-set trial) seeds directly with its
/// distance matrix. Otherwise each pair seeds with the evidence-weighted
/// average of on-screen distances, weighting each arrangement by its own
/// squared distance for that pair: larger on-screen spread, more weight.
fn initial_estimate(
    arrangements: &[Arrangement],
    item_count: usize,
) -> Result<PairMatrix, MarrError> {
    if let [only] = arrangements {
        return Ok(only.distance().normalized());
    }

    let mut average = PairMatrix::new(item_count);
    for i in 0..item_count {
        for j in (i + 1)..item_count {
            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for arrangement in arrangements {
                let (Some(dist), Some(weight)) = (
                    arrangement.distance().get(i, j),
                    arrangement.distance_squared().get(i, j),
                ) else {
                    continue;
                };
                numerator += dist * weight;
                denominator += weight;
            }
            // Zero accumulated weight means no arrangement measured the
            // pair at a nonzero distance: no estimate yet.
            if denominator > 0.0 {
                average.set(i, j, numerator / denominator)?;
            }
        }
    }
    Ok(average.normalized())
}

/// Rescales each arrangement's distance matrix so its RMS matches the RMS
/// of the current seed restricted to that arrangement's item subset.
fn rescale_arrangements(arrangements: &[Arrangement], seed: &PairMatrix) -> Vec<PairMatrix> {
    arrangements
        .iter()
        .map(|arrangement| {
            let subset = arrangement.present_items();
            let distance = arrangement.distance();
            match (distance.rms(), seed.rms_over(&subset)) {
                (Some(own_rms), Some(target_rms)) if own_rms > 0.0 => {
                    distance.scaled(target_rms / own_rms)
                }
                // A degenerate trial (all items stacked, or a subset the
                // seed knows nothing about) cannot be rescaled and must
                // contribute nothing this round.
                _ => PairMatrix::new(distance.item_count()),
            }
        })
        .collect()
}

/// Evidence-weighted average of the rescaled distances, per pair across all
/// trials that measured it.
fn weighted_reestimate(
    arrangements: &[Arrangement],
    rescaled: &[PairMatrix],
    item_count: usize,
) -> Result<PairMatrix, MarrError> {
    let mut estimate = PairMatrix::new(item_count);
    for i in 0..item_count {
        for j in (i + 1)..item_count {
            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for (arrangement, scaled) in arrangements.iter().zip(rescaled) {
                let Some(weight) = arrangement.distance_squared().get(i, j) else {
                    continue;
                };
                denominator += weight;
                if let Some(scaled_dist) = scaled.get(i, j) {
                    numerator += scaled_dist * weight;
                }
            }
            if denominator > 0.0 {
                estimate.set(i, j, numerator / denominator)?;
            }
        }
    }
    Ok(estimate)
}
