//! Presentation state folded from controller events.
//!
//! The game controller moves to the next round the moment a correct answer lands. The UI
//! keeps showing the answered round for the success flash and only then swaps in the round
//! that is already live, so clicks are not accepted until the swap.

use std::time::{Duration, Instant};

use shared::{
    domain::Round,
    protocol::{GameEvent, SessionReport},
};

use crate::backend_bridge::commands::BackendCommand;

pub const WRONG_BANNER: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Correct,
    Wrong,
}

#[derive(Debug, Default)]
pub struct PlayState {
    shown_round: Option<Round>,
    pending_round: Option<Round>,
    hold_until: Option<Instant>,
    banner: Option<(Banner, Instant)>,
    last_wrong: Option<usize>,
    game_over: Option<SessionReport>,
}

impl PlayState {
    /// Applies one controller event. Returns the backend command the event calls for, if any.
    pub fn apply(
        &mut self,
        event: GameEvent,
        now: Instant,
        success_flash: Duration,
    ) -> Option<BackendCommand> {
        match event {
            GameEvent::SessionStarted { .. } => {
                *self = Self::default();
            }
            GameEvent::RoundStarted { round } => {
                self.last_wrong = None;
                if self.is_holding(now) {
                    self.pending_round = Some(round);
                } else {
                    self.shown_round = Some(round);
                    self.pending_round = None;
                }
            }
            GameEvent::Success { .. } => {
                let until = now + success_flash;
                self.hold_until = Some(until);
                self.banner = Some((Banner::Correct, until));
            }
            GameEvent::Failure { index } => {
                self.last_wrong = Some(index);
                self.banner = Some((Banner::Wrong, now + WRONG_BANNER));
            }
            GameEvent::Tick { .. } => {}
            GameEvent::SessionEnded { report } => {
                self.shown_round = None;
                self.pending_round = None;
                self.hold_until = None;
                self.banner = None;
                self.last_wrong = None;
                self.game_over = Some(report.clone());
                return Some(BackendCommand::RecordSession { report });
            }
        }
        None
    }

    /// Expires the success hold and banners whose time has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.hold_until.is_some_and(|until| now >= until) {
            self.hold_until = None;
            if let Some(round) = self.pending_round.take() {
                self.shown_round = Some(round);
            }
        }
        if self.banner.is_some_and(|(_, until)| now >= until) {
            self.banner = None;
        }
    }

    pub fn shown_round(&self) -> Option<&Round> {
        self.shown_round.as_ref()
    }

    pub fn accepts_input(&self, now: Instant) -> bool {
        self.shown_round.is_some() && !self.is_holding(now)
    }

    pub fn is_holding(&self, now: Instant) -> bool {
        self.hold_until.is_some_and(|until| now < until)
    }

    pub fn banner(&self, now: Instant) -> Option<Banner> {
        self.banner
            .filter(|(_, until)| now < *until)
            .map(|(banner, _)| banner)
    }

    pub fn last_wrong(&self) -> Option<usize> {
        self.last_wrong
    }

    pub fn game_over(&self) -> Option<&SessionReport> {
        self.game_over.as_ref()
    }

    pub fn dismiss_game_over(&mut self) {
        self.game_over = None;
    }

    /// Earliest moment presentation state changes on its own.
    pub fn next_wake(&self, now: Instant) -> Option<Duration> {
        [self.hold_until, self.banner.map(|(_, until)| until)]
            .into_iter()
            .flatten()
            .min()
            .map(|at| at.saturating_duration_since(now))
    }
}

#[cfg(test)]
#[path = "tests/reducer_tests.rs"]
mod tests;
