//! "Lift the weakest" adaptive selection of the next trial's item subset.
//!
//! The pair with the least accumulated evidence seeds the subset; items are
//! then added greedily while each addition keeps improving the expected
//! evidence gain per unit of participant effort.

use marr_core::errors::{ErrorInfo, MarrError};
use marr_core::PairMatrix;

use crate::arrangement::Arrangement;
use crate::estimate::estimate_dissimilarity;
use crate::evidence::{evidence_utility, EvidenceMatrix};

struct Candidate {
    item: usize,
    gain: f64,
}

/// Chooses the item subset for the next trial.
///
/// Returns between 2 and `item_count - 1` items: the full set is never
/// re-presented, so every selection leaves at least one item out. Requires
/// a non-empty history (the first trial always presents the full set) and
/// at least three items.
pub fn next_subset(
    arrangements: &[Arrangement],
    item_count: usize,
) -> Result<Vec<usize>, MarrError> {
    if item_count < 3 {
        return Err(MarrError::Config(
            ErrorInfo::new("too-few-items", "subset selection needs at least three items")
                .with_context("item_count", item_count.to_string()),
        ));
    }
    let evidence = EvidenceMatrix::accumulate(arrangements, item_count)?;
    let rdm = estimate_dissimilarity(arrangements, item_count)?.rdm;
    let Some((row, col)) = evidence.weakest_pair() else {
        return Err(MarrError::Matrix(
            ErrorInfo::new("no-pairs", "evidence matrix has no off-diagonal cells")
                .with_context("item_count", item_count.to_string()),
        ));
    };

    let mut subset = vec![row, col];
    let mut best_efficiency = 0.0;
    loop {
        if subset.len() == item_count - 1 {
            return Ok(subset);
        }
        let Some(candidate) = best_candidate(&rdm, &evidence, &subset, item_count) else {
            return Ok(subset);
        };
        let cost = ((subset.len() + 1) as f64).powf(1.5);
        let efficiency = candidate.gain / cost;
        if efficiency <= best_efficiency {
            return Ok(subset);
        }
        subset.push(candidate.item);
        best_efficiency = efficiency;
    }
}

/// Candidate outside `subset` whose addition maximizes the evidence gain.
/// `None` when no candidate yields a strictly positive gain.
fn best_candidate(
    rdm: &PairMatrix,
    evidence: &EvidenceMatrix,
    subset: &[usize],
    item_count: usize,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for item in 0..item_count {
        if subset.contains(&item) {
            continue;
        }
        let mut indexes = subset.to_vec();
        indexes.push(item);
        let gain = subset_gain(rdm, evidence, &indexes);
        if gain > best.as_ref().map_or(0.0, |candidate| candidate.gain) {
            best = Some(Candidate { item, gain });
        }
    }
    best
}

/// Expected utility gain of presenting `indexes` together.
///
/// The estimated dissimilarities within the subset are scaled so the most
/// dissimilar pair sits at distance 1 (opposite arena extremes), squared
/// into hypothetical evidence, and summed as the per-pair utility increase
/// over the current evidence.
fn subset_gain(rdm: &PairMatrix, evidence: &EvidenceMatrix, indexes: &[usize]) -> f64 {
    let Some(max) = rdm.max_over(indexes) else {
        return 0.0;
    };
    if max <= 0.0 {
        return 0.0;
    }
    let mut gain = 0.0;
    for (pos, &i) in indexes.iter().enumerate() {
        for &j in &indexes[pos + 1..] {
            let Some(value) = rdm.get(i, j) else { continue };
            let current = evidence.get(i, j);
            let hypothetical = (value / max) * (value / max);
            gain += evidence_utility(current + hypothetical) - evidence_utility(current);
        }
    }
    gain
}
