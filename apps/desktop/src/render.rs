//! Text rendering for the terminal front-end.

use shared::{
    domain::{Color, Round},
    protocol::{GameEvent, SessionReport},
};

const SWATCH_WIDTH: usize = 8;

/// A block of `color` drawn with 24-bit ANSI background escapes, or its hex code in plain mode.
pub fn swatch(color: Color, plain: bool) -> String {
    if plain {
        return color.to_hex();
    }
    format!(
        "\x1b[48;2;{};{};{}m{}\x1b[0m",
        color.r,
        color.g,
        color.b,
        " ".repeat(SWATCH_WIDTH)
    )
}

pub fn render_round(round: &Round, plain: bool) -> String {
    let options = round
        .options
        .iter()
        .enumerate()
        .map(|(index, color)| format!("{}) {}", index + 1, swatch(*color, plain)))
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "Match this color: {}\n{options}",
        swatch(round.target, plain)
    )
}

pub fn render_report(report: &SessionReport) -> String {
    format!(
        "Game Over!\nYour score: {}\n{}",
        report.final_score,
        report.headline()
    )
}

/// Returns the line to print for `event`, if it is worth printing.
pub fn render_event(event: &GameEvent, plain: bool) -> Option<String> {
    match event {
        GameEvent::SessionStarted { duration_secs } => Some(format!(
            "Game on! You have {duration_secs} seconds. Type an option number, 'e' to end."
        )),
        GameEvent::RoundStarted { round } => Some(render_round(round, plain)),
        GameEvent::Tick { time_remaining } if announces_time(*time_remaining) => {
            Some(format!("Time: {time_remaining}s"))
        }
        GameEvent::Tick { .. } => None,
        GameEvent::Success { score } => Some(format!("Correct! Score: {score}")),
        GameEvent::Failure { .. } => Some("Wrong! Try again!".to_string()),
        GameEvent::SessionEnded { report } => Some(render_report(report)),
    }
}

fn announces_time(time_remaining: u32) -> bool {
    time_remaining > 0 && (time_remaining <= 5 || time_remaining % 10 == 0)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
