use std::collections::VecDeque;

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use shared::domain::Color;

/// Source of the two random choices a round needs.
pub trait RandomSource {
    /// Permutes `colors` in place.
    fn shuffle(&mut self, colors: &mut [Color]);

    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn shuffle(&mut self, colors: &mut [Color]) {
        colors.shuffle(&mut self.rng);
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays fixed choices so rounds can be asserted exactly.
///
/// Each shuffle rotates the palette left by the next queued amount and each pick returns
/// the next queued index. Exhausted queues fall back to no rotation and index 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    rotations: VecDeque<usize>,
    picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(
        rotations: impl IntoIterator<Item = usize>,
        picks: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            rotations: rotations.into_iter().collect(),
            picks: picks.into_iter().collect(),
        }
    }

    pub fn push_round(&mut self, rotation: usize, pick: usize) {
        self.rotations.push_back(rotation);
        self.picks.push_back(pick);
    }
}

impl RandomSource for ScriptedRandom {
    fn shuffle(&mut self, colors: &mut [Color]) {
        if colors.is_empty() {
            return;
        }
        let rotation = self.rotations.pop_front().unwrap_or(0);
        colors.rotate_left(rotation % colors.len());
    }

    fn pick_index(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }
}
