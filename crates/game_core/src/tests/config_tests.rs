use std::{collections::HashMap, fs};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn defaults_match_reference_game() {
    let settings = load_settings_from(Path::new("does-not-exist.toml"), env_from(&[]));
    assert_eq!(settings, Settings::default());

    let config = settings.game_config().expect("config");
    assert_eq!(config, GameConfig::reference());
    assert_eq!(config.palette().len(), 6);
    assert_eq!(config.round_duration_secs(), 30);
    assert_eq!(config.options_per_round(), 4);
    assert_eq!(config.success_flash(), Duration::from_millis(300));
}

#[test]
fn reads_settings_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(
        &path,
        r##"
round_duration_secs = 45
options_per_round = 3
palette = ["#111111", "#222222", "#333333"]
"##,
    )
    .expect("write settings");

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.round_duration_secs, 45);
    assert_eq!(settings.options_per_round, 3);
    assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);

    let config = settings.game_config().expect("config");
    assert_eq!(config.palette().len(), 3);
}

#[test]
fn malformed_settings_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(SETTINGS_FILE);
    fs::write(&path, "round_duration_secs = \"soon\"").expect("write settings");

    assert_eq!(load_settings_from(&path, env_from(&[])), Settings::default());
}

#[test]
fn environment_overrides_file_and_defaults() {
    let settings = load_settings_from(
        Path::new("does-not-exist.toml"),
        env_from(&[
            ("COLOR_MATCH_DURATION", "10"),
            ("APP__ROUND_DURATION_SECS", "20"),
            ("APP__OPTIONS_PER_ROUND", "3"),
            ("APP__PALETTE", "#000000, #FFFFFF ,#FF0000,"),
            ("APP__SUCCESS_FLASH_MS", "150"),
            ("DATABASE_URL", "sqlite://ignored.db"),
            ("APP__DATABASE_URL", "sqlite://scores.db"),
        ]),
    );

    assert_eq!(settings.round_duration_secs, 20);
    assert_eq!(settings.options_per_round, 3);
    assert_eq!(settings.palette, vec!["#000000", "#FFFFFF", "#FF0000"]);
    assert_eq!(settings.success_flash_ms, 150);
    assert_eq!(settings.database_url, "sqlite://scores.db");
}

#[test]
fn unparsable_numeric_overrides_are_ignored() {
    let settings = load_settings_from(
        Path::new("does-not-exist.toml"),
        env_from(&[("APP__ROUND_DURATION_SECS", "thirty")]),
    );
    assert_eq!(settings.round_duration_secs, DEFAULT_ROUND_DURATION_SECS);
}

#[test]
fn rejects_palette_smaller_than_option_count() {
    let palette = Palette::parse(["#000000", "#FFFFFF", "#FF0000"]).expect("palette");
    assert_eq!(
        GameConfig::new(palette, 30, 4),
        Err(GameError::PaletteTooSmall {
            palette_len: 3,
            options_per_round: 4
        })
    );
}

#[test]
fn rejects_zero_duration_and_single_option() {
    assert_eq!(
        GameConfig::new(Palette::reference(), 0, 4),
        Err(GameError::ZeroDuration)
    );
    assert_eq!(
        GameConfig::new(Palette::reference(), 30, 1),
        Err(GameError::TooFewOptions {
            options_per_round: 1
        })
    );
}

#[test]
fn invalid_palette_entry_surfaces_from_settings() {
    let settings = Settings {
        palette: vec!["#FF6B6B".into(), "teal".into()],
        ..Settings::default()
    };
    assert_eq!(
        settings.game_config(),
        Err(GameError::InvalidColor {
            value: "teal".into()
        })
    );
}
