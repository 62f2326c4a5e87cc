//! Simulated participants standing in for the presentation layer.

use std::collections::BTreeMap;

use marr_core::{derive_substream_seed, RngHandle};
use marr_engine::Coord;
use rand::Rng;

/// A deterministic stand-in for a human arranging items in the arena.
///
/// The participant holds a fixed ground-truth 2D embedding drawn from the
/// master seed. Each trial places the requested items at their ground-truth
/// positions plus uniform jitter, clamped to the arena, using a per-trial
/// substream so replays are exact.
#[derive(Debug, Clone)]
pub struct SimulatedParticipant {
    ground_truth: Vec<Coord>,
    noise: f64,
    master_seed: u64,
}

impl SimulatedParticipant {
    /// Draws a ground-truth embedding for `item_count` items.
    pub fn new(item_count: usize, noise: f64, master_seed: u64) -> Self {
        let mut rng = RngHandle::from_seed(derive_substream_seed(master_seed, 0));
        let ground_truth = (0..item_count)
            .map(|_| {
                Coord::new(
                    rng.inner_mut().gen_range(-0.5..0.5),
                    rng.inner_mut().gen_range(-0.5..0.5),
                )
            })
            .collect();
        Self {
            ground_truth,
            noise,
            master_seed,
        }
    }

    /// The latent positions the participant's placements approximate.
    pub fn ground_truth(&self) -> &[Coord] {
        &self.ground_truth
    }

    /// Produces normalized placements for one trial's subset.
    pub fn arrange(&self, subset: &[usize], trial_index: usize) -> BTreeMap<usize, Coord> {
        let mut rng =
            RngHandle::from_seed(derive_substream_seed(self.master_seed, trial_index as u64 + 1));
        let mut placements = BTreeMap::new();
        for &item in subset {
            let truth = self.ground_truth[item];
            let x = (truth.x + rng.inner_mut().gen_range(-self.noise..=self.noise))
                .clamp(-0.5, 0.5);
            let y = (truth.y + rng.inner_mut().gen_range(-self.noise..=self.noise))
                .clamp(-0.5, 0.5);
            placements.insert(item, Coord::new(x, y));
        }
        placements
    }
}
