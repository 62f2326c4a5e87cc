//! Symmetric item-pair matrices with explicit missing cells.
//!
//! Distance and dissimilarity data is inherently sparse: a trial only
//! measures the item pairs it actually placed. Cells carry `Option<f64>`
//! instead of relying on floating-point NaN propagation, so "no
//! information" is representable without poisoning downstream arithmetic.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, MarrError};

/// Symmetric `n x n` matrix over item pairs. The diagonal is always
/// undefined; off-diagonal cells are undefined until a value is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMatrix {
    item_count: usize,
    cells: Vec<Option<f64>>,
}

impl PairMatrix {
    /// Creates a matrix over `item_count` items with every cell undefined.
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            cells: vec![None; item_count * item_count],
        }
    }

    /// Number of items the matrix is defined over.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Returns the cell for the pair `(i, j)`. The diagonal and
    /// out-of-range indices read as undefined.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i == j || i >= self.item_count || j >= self.item_count {
            return None;
        }
        self.cells[i * self.item_count + j]
    }

    /// Stores `value` for the unordered pair `(i, j)` in both triangles.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<(), MarrError> {
        if i >= self.item_count || j >= self.item_count {
            return Err(MarrError::Matrix(
                ErrorInfo::new("cell-out-of-range", "pair index exceeds the item count")
                    .with_context("row", i.to_string())
                    .with_context("col", j.to_string())
                    .with_context("item_count", self.item_count.to_string()),
            ));
        }
        if i == j {
            return Err(MarrError::Matrix(
                ErrorInfo::new("diagonal-cell", "the diagonal carries no pair information")
                    .with_context("index", i.to_string()),
            ));
        }
        if !value.is_finite() {
            return Err(MarrError::Matrix(
                ErrorInfo::new("non-finite-cell", "pair values must be finite")
                    .with_context("row", i.to_string())
                    .with_context("col", j.to_string()),
            ));
        }
        self.cells[i * self.item_count + j] = Some(value);
        self.cells[j * self.item_count + i] = Some(value);
        Ok(())
    }

    /// Iterates the upper triangle as `(i, j, cell)` with `i < j`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Option<f64>)> + '_ {
        (0..self.item_count).flat_map(move |i| {
            ((i + 1)..self.item_count).map(move |j| (i, j, self.get(i, j)))
        })
    }

    /// Root-mean-square over defined cells, counting each unordered pair
    /// once. `None` when the matrix holds no information.
    pub fn rms(&self) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for (_, _, cell) in self.cells() {
            if let Some(value) = cell {
                total += value * value;
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        Some((total / count as f64).sqrt())
    }

    /// RMS restricted to the pairs drawn from `indices`. Indices outside
    /// the matrix contribute nothing.
    pub fn rms_over(&self, indices: &[usize]) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                if let Some(value) = self.get(i, j) {
                    total += value * value;
                    count += 1;
                }
            }
        }
        if count == 0 {
            return None;
        }
        Some((total / count as f64).sqrt())
    }

    /// Largest defined cell restricted to the pairs drawn from `indices`.
    pub fn max_over(&self, indices: &[usize]) -> Option<f64> {
        let mut max: Option<f64> = None;
        for (pos, &i) in indices.iter().enumerate() {
            for &j in &indices[pos + 1..] {
                if let Some(value) = self.get(i, j) {
                    max = Some(max.map_or(value, |current| current.max(value)));
                }
            }
        }
        max
    }

    /// Cell-wise multiplication by `factor`, preserving undefined cells.
    pub fn scaled(&self, factor: f64) -> PairMatrix {
        Self {
            item_count: self.item_count,
            cells: self
                .cells
                .iter()
                .map(|cell| cell.map(|value| value * factor))
                .collect(),
        }
    }

    /// Divides by the matrix's own RMS so the result has RMS 1. Matrices
    /// with no information, or an RMS of zero, are returned unchanged.
    pub fn normalized(&self) -> PairMatrix {
        match self.rms() {
            Some(rms) if rms > 0.0 => self.scaled(1.0 / rms),
            _ => self.clone(),
        }
    }

    /// RMS of the cell-wise difference against `other`, over the pairs
    /// defined in both. `None` when no pair is comparable.
    pub fn residual_rms(&self, other: &PairMatrix) -> Result<Option<f64>, MarrError> {
        if self.item_count != other.item_count {
            return Err(MarrError::Matrix(
                ErrorInfo::new("item-count-mismatch", "matrices cover different item sets")
                    .with_context("left", self.item_count.to_string())
                    .with_context("right", other.item_count.to_string()),
            ));
        }
        let mut total = 0.0;
        let mut count = 0usize;
        for (i, j, cell) in self.cells() {
            if let (Some(a), Some(b)) = (cell, other.get(i, j)) {
                let diff = a - b;
                total += diff * diff;
                count += 1;
            }
        }
        if count == 0 {
            return Ok(None);
        }
        Ok(Some((total / count as f64).sqrt()))
    }
}
