//! One trial's recorded 2D placement of a subset of items.

use std::collections::BTreeMap;

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::PairMatrix;
use serde::{Deserialize, Serialize};

/// Normalized 2D position of an item, relative to the arena center and
/// scaled by the arena size. The engine never re-checks bounds; the caller
/// normalizes before constructing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    /// Horizontal offset from the arena center.
    pub x: f64,
    /// Vertical offset from the arena center.
    pub y: f64,
}

impl Coord {
    /// Creates a coordinate pair.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Immutable record of one trial: which items were placed and where.
///
/// The pairwise Euclidean distance matrix and its square are derived once
/// at construction. Pairs involving an absent item stay undefined, as does
/// the diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arrangement {
    item_count: usize,
    coords: Vec<Option<Coord>>,
    distance: PairMatrix,
    distance_sq: PairMatrix,
}

impl Arrangement {
    /// Builds an arrangement from a placement map over the full item range.
    ///
    /// Items absent from the map were not part of the trial. Fails when
    /// fewer than two items are placed, when an index falls outside
    /// `0..item_count`, or when a coordinate is not finite.
    pub fn from_placements(
        item_count: usize,
        placements: &BTreeMap<usize, Coord>,
    ) -> Result<Self, MarrError> {
        let mut coords = vec![None; item_count];
        for (&item, &coord) in placements {
            if item >= item_count {
                return Err(MarrError::Placement(
                    ErrorInfo::new("item-out-of-range", "placed item is not in the stimulus list")
                        .with_context("item", item.to_string())
                        .with_context("item_count", item_count.to_string()),
                ));
            }
            coords[item] = Some(coord);
        }
        Self::from_coords(coords)
    }

    /// Builds an arrangement from a dense per-item coordinate vector, with
    /// `None` marking absent items. The vector length is the item count.
    pub fn from_coords(coords: Vec<Option<Coord>>) -> Result<Self, MarrError> {
        let item_count = coords.len();
        let placed = coords.iter().flatten().count();
        if placed < 2 {
            return Err(MarrError::Placement(
                ErrorInfo::new("too-few-placements", "a trial must place at least two items")
                    .with_context("placed", placed.to_string())
                    .with_hint("distances are only defined between pairs of placed items"),
            ));
        }
        for (item, coord) in coords.iter().enumerate() {
            if let Some(coord) = coord {
                if !coord.x.is_finite() || !coord.y.is_finite() {
                    return Err(MarrError::Placement(
                        ErrorInfo::new("non-finite-coordinate", "coordinates must be finite")
                            .with_context("item", item.to_string()),
                    ));
                }
            }
        }

        let mut distance = PairMatrix::new(item_count);
        let mut distance_sq = PairMatrix::new(item_count);
        for i in 0..item_count {
            let Some(a) = coords[i] else { continue };
            for j in (i + 1)..item_count {
                let Some(b) = coords[j] else { continue };
                let dist = (b.x - a.x).hypot(b.y - a.y);
                distance.set(i, j, dist)?;
                distance_sq.set(i, j, dist * dist)?;
            }
        }

        Ok(Self {
            item_count,
            coords,
            distance,
            distance_sq,
        })
    }

    /// Number of items in the session's stimulus list.
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Per-item coordinates, `None` for items absent from this trial.
    pub fn coords(&self) -> &[Option<Coord>] {
        &self.coords
    }

    /// Whether `item` was placed in this trial.
    pub fn is_present(&self, item: usize) -> bool {
        self.coords.get(item).is_some_and(Option::is_some)
    }

    /// Indices of the items placed in this trial, in ascending order.
    pub fn present_items(&self) -> Vec<usize> {
        self.coords
            .iter()
            .enumerate()
            .filter_map(|(item, coord)| coord.map(|_| item))
            .collect()
    }

    /// Number of items placed in this trial.
    pub fn placed_count(&self) -> usize {
        self.coords.iter().flatten().count()
    }

    /// Pairwise Euclidean distances between the placed items.
    pub fn distance(&self) -> &PairMatrix {
        &self.distance
    }

    /// Element-wise square of [`Arrangement::distance`], the per-trial
    /// evidence weight of each pair.
    pub fn distance_squared(&self) -> &PairMatrix {
        &self.distance_sq
    }
}
