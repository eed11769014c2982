use super::*;

#[test]
fn parses_hex_with_and_without_hash() {
    assert_eq!("#FF6B6B".parse::<Color>().expect("color"), Color::rgb(0xFF, 0x6B, 0x6B));
    assert_eq!("4ecdc4".parse::<Color>().expect("color"), Color::rgb(0x4E, 0xCD, 0xC4));
}

#[test]
fn rejects_malformed_hex() {
    for raw in ["", "#FFF", "#GG0000", "#FF6B6B00", "red"] {
        assert_eq!(
            raw.parse::<Color>(),
            Err(GameError::InvalidColor {
                value: raw.to_string()
            }),
            "{raw:?} should not parse"
        );
    }
}

#[test]
fn formats_as_uppercase_hex() {
    assert_eq!(Color::rgb(0x45, 0xb7, 0xd1).to_string(), "#45B7D1");
}

#[test]
fn reference_palette_has_six_distinct_colors() {
    let palette = Palette::reference();
    assert_eq!(palette.len(), 6);
    assert!(Palette::new(palette.colors().to_vec()).is_ok());
    assert!(palette.contains(Color::rgb(0xF7, 0xDC, 0x6F)));
}

#[test]
fn palette_rejects_duplicates_and_empty() {
    assert_eq!(Palette::new(Vec::new()), Err(GameError::EmptyPalette));
    assert_eq!(
        Palette::parse(["#FF6B6B", "#4ECDC4", "#ff6b6b"]),
        Err(GameError::DuplicateColor {
            color: Color::rgb(0xFF, 0x6B, 0x6B)
        })
    );
}

#[test]
fn round_reports_correct_index() {
    let round = Round {
        target: Color::rgb(1, 2, 3),
        options: vec![Color::rgb(9, 9, 9), Color::rgb(1, 2, 3)],
        correct_index: 1,
    };
    assert!(round.is_correct(1));
    assert!(!round.is_correct(0));
    assert_eq!(round.option_count(), 2);
}
