//! Stdin-driven game loop. One task owns the controller and wakes up either for input or
//! for the controller's next countdown deadline.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use game_core::{GameController, RandomSource, SelectionOutcome};
use shared::protocol::GameEvent;
use storage::ScoreRepository;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::Instant,
};
use tracing::{debug, warn};

use crate::render::render_event;

const IDLE_WAKEUP: Duration = Duration::from_secs(3600);
const HELP: &str =
    "Commands: <enter>/s start, 1-9 pick a swatch, e end the game, q quit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Select(usize),
    End,
    Quit,
    Help,
}

pub fn parse_command(line: &str, active: bool) -> Command {
    let input = line.trim().to_ascii_lowercase();
    match input.as_str() {
        "" if !active => Command::Start,
        "s" | "start" | "p" | "play" => Command::Start,
        "e" | "end" => Command::End,
        "q" | "quit" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(number) if number >= 1 => Command::Select(number - 1),
            _ => Command::Help,
        },
    }
}

pub struct TerminalGame<R> {
    controller: GameController<R>,
    scores: Arc<dyn ScoreRepository>,
    plain: bool,
    json: bool,
    last_advance: Instant,
}

impl<R: RandomSource> TerminalGame<R> {
    pub fn new(
        controller: GameController<R>,
        scores: Arc<dyn ScoreRepository>,
        plain: bool,
        json: bool,
    ) -> Self {
        Self {
            controller,
            scores,
            plain,
            json,
            last_advance: Instant::now(),
        }
    }

    /// Plays until the player quits or `input` ends. A session still running at that point
    /// is ended and recorded.
    pub async fn run<I>(&mut self, input: I) -> Result<()>
    where
        I: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        if !self.json {
            println!("Color Match! Tap the swatch that matches the target color.");
            println!("High Score: {}", self.controller.best_score());
            println!("{HELP}");
        }

        loop {
            let wait = self.controller.next_deadline().unwrap_or(IDLE_WAKEUP);
            let keep_running = tokio::select! {
                line = lines.next_line() => {
                    self.catch_up();
                    match line {
                        Ok(Some(line)) => {
                            let command = parse_command(&line, self.controller.is_active());
                            self.apply(command)
                        }
                        Ok(None) => false,
                        Err(err) => {
                            warn!("stopping on unreadable input: {err}");
                            false
                        }
                    }
                }
                _ = tokio::time::sleep(wait) => {
                    self.catch_up();
                    true
                }
            };
            self.flush().await?;

            if !keep_running {
                break;
            }
        }

        if self.controller.end_session().is_some() {
            self.flush().await?;
        }
        Ok(())
    }

    fn catch_up(&mut self) {
        let now = Instant::now();
        self.controller.advance(now.saturating_duration_since(self.last_advance));
        self.last_advance = now;
    }

    /// Applies one player command. Returns `false` when the player quits.
    fn apply(&mut self, command: Command) -> bool {
        debug!(?command, "terminal command");
        match command {
            Command::Start => self.controller.start_session(),
            Command::Select(index) => {
                if self.controller.handle_selection(index) == SelectionOutcome::Ignored
                    && !self.json
                {
                    println!("{HELP}");
                }
            }
            Command::End => {
                if self.controller.end_session().is_none() && !self.json {
                    println!("No game running. Press enter to start.");
                }
            }
            Command::Quit => return false,
            Command::Help => {
                if !self.json {
                    println!("{HELP}");
                }
            }
        }
        true
    }

    async fn flush(&mut self) -> Result<()> {
        for event in self.controller.drain_events() {
            if self.json {
                println!("{}", serde_json::to_string(&event)?);
            } else if let Some(line) = render_event(&event, self.plain) {
                println!("{line}");
            }

            if let GameEvent::SessionEnded { report } = &event {
                if let Err(err) = self.scores.record_session(report).await {
                    warn!("failed to record session: {err:#}");
                }
                if !self.json {
                    println!("Press enter to play again, q to quit.");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
