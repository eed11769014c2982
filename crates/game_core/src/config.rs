use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::{
    domain::Palette,
    error::{GameError, MIN_OPTIONS_PER_ROUND},
};
use tracing::warn;

pub const SETTINGS_FILE: &str = "color_match.toml";
pub const DEFAULT_ROUND_DURATION_SECS: u32 = 30;
pub const DEFAULT_OPTIONS_PER_ROUND: usize = 4;
pub const DEFAULT_SUCCESS_FLASH_MS: u64 = 300;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/color_match.db";

/// Validated, immutable configuration for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    palette: Palette,
    round_duration_secs: u32,
    options_per_round: usize,
    success_flash: Duration,
}

impl GameConfig {
    pub fn new(
        palette: Palette,
        round_duration_secs: u32,
        options_per_round: usize,
    ) -> Result<Self, GameError> {
        if round_duration_secs == 0 {
            return Err(GameError::ZeroDuration);
        }
        if options_per_round < MIN_OPTIONS_PER_ROUND {
            return Err(GameError::TooFewOptions { options_per_round });
        }
        if palette.len() < options_per_round {
            return Err(GameError::PaletteTooSmall {
                palette_len: palette.len(),
                options_per_round,
            });
        }

        Ok(Self {
            palette,
            round_duration_secs,
            options_per_round,
            success_flash: Duration::from_millis(DEFAULT_SUCCESS_FLASH_MS),
        })
    }

    /// Six colors, four options, thirty seconds.
    pub fn reference() -> Self {
        Self {
            palette: Palette::reference(),
            round_duration_secs: DEFAULT_ROUND_DURATION_SECS,
            options_per_round: DEFAULT_OPTIONS_PER_ROUND,
            success_flash: Duration::from_millis(DEFAULT_SUCCESS_FLASH_MS),
        }
    }

    pub fn with_success_flash(mut self, success_flash: Duration) -> Self {
        self.success_flash = success_flash;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn round_duration_secs(&self) -> u32 {
        self.round_duration_secs
    }

    pub fn options_per_round(&self) -> usize {
        self.options_per_round
    }

    /// How long front-ends hold the success highlight before showing the next round.
    pub fn success_flash(&self) -> Duration {
        self.success_flash
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::reference()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub palette: Vec<String>,
    pub round_duration_secs: u32,
    pub options_per_round: usize,
    pub success_flash_ms: u64,
    pub database_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette: Palette::reference()
                .colors()
                .iter()
                .map(|color| color.to_hex())
                .collect(),
            round_duration_secs: DEFAULT_ROUND_DURATION_SECS,
            options_per_round: DEFAULT_OPTIONS_PER_ROUND,
            success_flash_ms: DEFAULT_SUCCESS_FLASH_MS,
            database_url: DEFAULT_DATABASE_URL.into(),
        }
    }
}

impl Settings {
    pub fn game_config(&self) -> Result<GameConfig, GameError> {
        let palette = Palette::parse(&self.palette)?;
        Ok(
            GameConfig::new(palette, self.round_duration_secs, self.options_per_round)?
                .with_success_flash(Duration::from_millis(self.success_flash_ms)),
        )
    }
}

/// Reads `color_match.toml` from the working directory, then applies environment overrides.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<Settings>(&raw) {
            Ok(file_cfg) => settings = file_cfg,
            Err(err) => warn!(
                path = %path.display(),
                "ignoring unreadable settings file: {err}"
            ),
        }
    }

    apply_env_overrides(&mut settings, &env);
    settings
}

fn apply_env_overrides(settings: &mut Settings, env: &impl Fn(&str) -> Option<String>) {
    if let Some(v) = env("COLOR_MATCH_DURATION") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.round_duration_secs = parsed;
        }
    }
    if let Some(v) = env("APP__ROUND_DURATION_SECS") {
        if let Ok(parsed) = v.trim().parse::<u32>() {
            settings.round_duration_secs = parsed;
        }
    }

    if let Some(v) = env("APP__OPTIONS_PER_ROUND") {
        if let Ok(parsed) = v.trim().parse::<usize>() {
            settings.options_per_round = parsed;
        }
    }

    if let Some(v) = env("APP__PALETTE") {
        let palette: Vec<String> = v
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        if !palette.is_empty() {
            settings.palette = palette;
        }
    }

    if let Some(v) = env("APP__SUCCESS_FLASH_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.success_flash_ms = parsed;
        }
    }

    if let Some(v) = env("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
