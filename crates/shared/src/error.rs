use thiserror::Error;

use crate::domain::Color;

/// Smallest option set that still contains a distractor.
pub const MIN_OPTIONS_PER_ROUND: usize = 2;

/// Configuration errors. Gameplay itself has no failure modes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("palette must contain at least one color")]
    EmptyPalette,
    #[error("palette color {color} appears more than once")]
    DuplicateColor { color: Color },
    #[error("invalid color '{value}': expected #RRGGBB")]
    InvalidColor { value: String },
    #[error("palette has {palette_len} colors but each round needs {options_per_round}")]
    PaletteTooSmall {
        palette_len: usize,
        options_per_round: usize,
    },
    #[error("a round needs at least 2 options, got {options_per_round}")]
    TooFewOptions { options_per_round: usize },
    #[error("round duration must be at least one second")]
    ZeroDuration,
}
