use shared::domain::{Palette, Round};
use tracing::debug;

use crate::random::RandomSource;

/// Draws `options_per_round` distinct colors from `palette` and marks one as the target.
///
/// The palette is fully shuffled before the prefix is taken, so every ordered subset is
/// equally likely with an unbiased source. Callers guarantee
/// `2 <= options_per_round <= palette.len()`; [`crate::GameConfig`] enforces it.
pub fn generate_round<R>(palette: &Palette, options_per_round: usize, random: &mut R) -> Round
where
    R: RandomSource + ?Sized,
{
    debug_assert!(options_per_round > 0 && options_per_round <= palette.len());

    let mut options = palette.colors().to_vec();
    random.shuffle(&mut options);
    options.truncate(options_per_round);

    // Keeps a misbehaving source from indexing past the options.
    let correct_index = random.pick_index(options.len()) % options.len();
    let target = options[correct_index];

    debug!(target_color = %target, correct_index, "generated round");

    Round {
        target,
        options,
        correct_index,
    }
}

#[cfg(test)]
#[path = "tests/round_tests.rs"]
mod tests;
