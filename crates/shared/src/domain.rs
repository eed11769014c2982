use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// An opaque RGB swatch color. Rendered and parsed as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = GameError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidColor {
            value: raw.to_string(),
        };

        let hex = raw.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

const REFERENCE_COLORS: [Color; 6] = [
    Color::rgb(0xFF, 0x6B, 0x6B),
    Color::rgb(0x4E, 0xCD, 0xC4),
    Color::rgb(0x45, 0xB7, 0xD1),
    Color::rgb(0xFF, 0xA0, 0x7A),
    Color::rgb(0x98, 0xD8, 0xC8),
    Color::rgb(0xF7, 0xDC, 0x6F),
];

/// Ordered set of distinct colors rounds are drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, GameError> {
        if colors.is_empty() {
            return Err(GameError::EmptyPalette);
        }

        let mut seen = HashSet::with_capacity(colors.len());
        for color in &colors {
            if !seen.insert(*color) {
                return Err(GameError::DuplicateColor { color: *color });
            }
        }

        Ok(Self { colors })
    }

    pub fn parse<I, S>(hex_colors: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = hex_colors
            .into_iter()
            .map(|raw| raw.as_ref().parse::<Color>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// The six-color palette the game ships with.
    pub fn reference() -> Self {
        Self {
            colors: REFERENCE_COLORS.to_vec(),
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.colors.contains(&color)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::reference()
    }
}

/// One target color plus the swatches offered for it.
///
/// `options[correct_index] == target` and the target appears exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub target: Color,
    pub options: Vec<Color>,
    pub correct_index: usize,
}

impl Round {
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
