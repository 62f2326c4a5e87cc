//! Evidence accumulation across trials and the saturating utility transform.

use marr_core::errors::{ErrorInfo, MarrError};
use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;

/// Decay constant of the evidence utility transform.
pub const UTILITY_DECAY: f64 = 10.0;

/// Converts an accumulated evidence weight into a bounded utility,
/// `1 - exp(-weight * UTILITY_DECAY)`.
///
/// Zero evidence maps to zero utility; repeated measurement of the same
/// pair saturates toward 1.
pub fn evidence_utility(weight: f64) -> f64 {
    1.0 - (-weight * UTILITY_DECAY).exp()
}

/// Accumulated squared on-screen distance per item pair.
///
/// A pair never jointly placed contributes nothing, so the matrix is dense:
/// absence reads as zero evidence rather than missing data. The diagonal
/// stays at zero and is never consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceMatrix {
    item_count: usize,
    cells: Vec<f64>,
}

/// Off-diagonal utility coverage, recorded per trial for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilitySummary {
    /// Smallest off-diagonal utility.
    pub min: f64,
    /// Mean off-diagonal utility.
    pub mean: f64,
}

impl EvidenceMatrix {
    /// Sums squared distances cell-wise across the full arrangement history.
    pub fn accumulate(arrangements: &[Arrangement], item_count: usize) -> Result<Self, MarrError> {
        let mut cells = vec![0.0; item_count * item_count];
        for (trial, arrangement) in arrangements.iter().enumerate() {
            if arrangement.item_count() != item_count {
                return Err(MarrError::Matrix(
                    ErrorInfo::new("item-count-mismatch", "arrangement covers a different item set")
                        .with_context("trial", trial.to_string())
                        .with_context("expected", item_count.to_string())
                        .with_context("actual", arrangement.item_count().to_string()),
                ));
            }
            for (i, j, cell) in arrangement.distance_squared().cells() {
                if let Some(weight) = cell {
                    cells[i * item_count + j] += weight;
                    cells[j * item_count + i] += weight;
                }
            }
        }
        Ok(Self { item_count, cells })
    }

    /// Number of items the matrix is defined over.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Accumulated evidence weight for the pair `(i, j)`. The diagonal and
    /// out-of-range indices read as zero.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j || i >= self.item_count || j >= self.item_count {
            return 0.0;
        }
        self.cells[i * self.item_count + j]
    }

    /// Off-diagonal cell with the globally minimum evidence weight, the
    /// first found in row-major order. `None` for fewer than two items.
    pub fn weakest_pair(&self) -> Option<(usize, usize)> {
        let mut weakest: Option<(usize, usize)> = None;
        let mut min_weight = f64::INFINITY;
        for i in 0..self.item_count {
            for j in 0..self.item_count {
                if i == j {
                    continue;
                }
                let weight = self.get(i, j);
                if weight < min_weight {
                    min_weight = weight;
                    weakest = Some((i, j));
                }
            }
        }
        weakest
    }

    /// Whether every off-diagonal pair has utility strictly above
    /// `threshold`. This is the evidence-based session termination test.
    pub fn all_utilities_above(&self, threshold: f64) -> bool {
        for i in 0..self.item_count {
            for j in (i + 1)..self.item_count {
                if evidence_utility(self.get(i, j)) <= threshold {
                    return false;
                }
            }
        }
        true
    }

    /// Min/mean utility over off-diagonal pairs.
    pub fn utility_summary(&self) -> UtilitySummary {
        let mut min = f64::INFINITY;
        let mut total = 0.0;
        let mut count = 0usize;
        for i in 0..self.item_count {
            for j in (i + 1)..self.item_count {
                let utility = evidence_utility(self.get(i, j));
                min = min.min(utility);
                total += utility;
                count += 1;
            }
        }
        if count == 0 {
            return UtilitySummary { min: 0.0, mean: 0.0 };
        }
        UtilitySummary {
            min,
            mean: total / count as f64,
        }
    }
}
