use std::{mem, time::Duration};

use shared::{
    domain::Round,
    protocol::{EndReason, GameEvent, SelectionOutcome, SessionReport},
};
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    random::RandomSource,
    round::generate_round,
    timer::{TimerId, TimerQueue},
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    CountdownTick,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Active { round: Round, countdown: TimerId },
}

/// Owns one game session at a time and the countdown that bounds it.
///
/// All mutation happens through `start_session`, `handle_selection`, `end_session` and
/// `advance`, processed in call order. The only pending timer is the countdown of the
/// active session; it is cancelled on every transition out of Active and dropped together
/// with the controller.
#[derive(Debug)]
pub struct GameController<R> {
    config: GameConfig,
    random: R,
    timers: TimerQueue<TimerKind>,
    phase: Phase,
    score: u32,
    time_remaining: u32,
    best_score: u32,
    events: Vec<GameEvent>,
}

impl<R: RandomSource> GameController<R> {
    pub fn new(config: GameConfig, random: R) -> Self {
        let time_remaining = config.round_duration_secs();
        Self {
            config,
            random,
            timers: TimerQueue::new(),
            phase: Phase::Idle,
            score: 0,
            time_remaining,
            best_score: 0,
            events: Vec::new(),
        }
    }

    /// Seeds the best score, typically from persisted storage.
    pub fn with_best_score(mut self, best_score: u32) -> Self {
        self.best_score = best_score;
        self
    }

    /// Folds in a best score that arrived after construction. Never lowers the current best.
    pub fn raise_best_score(&mut self, best_score: u32) {
        if best_score > self.best_score {
            debug!(best_score, "raised best score");
            self.best_score = best_score;
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    pub fn current_round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::Active { round, .. } => Some(round),
            Phase::Idle => None,
        }
    }

    /// Time until the pending countdown tick, if a session is running.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.time_until_next()
    }

    /// Starts a fresh session. A session that is already running is abandoned without a
    /// report and its countdown is cancelled.
    pub fn start_session(&mut self) {
        if let Phase::Active { countdown, .. } = mem::replace(&mut self.phase, Phase::Idle) {
            self.timers.cancel(countdown);
            debug!(score = self.score, "abandoning running session for restart");
        }

        self.score = 0;
        self.time_remaining = self.config.round_duration_secs();

        let round = generate_round(
            self.config.palette(),
            self.config.options_per_round(),
            &mut self.random,
        );
        let countdown = self
            .timers
            .schedule(TICK_INTERVAL, TimerKind::CountdownTick);

        info!(duration_secs = self.time_remaining, "session started");
        self.events.push(GameEvent::SessionStarted {
            duration_secs: self.time_remaining,
        });
        self.events.push(GameEvent::RoundStarted {
            round: round.clone(),
        });
        self.phase = Phase::Active { round, countdown };
    }

    pub fn handle_selection(&mut self, index: usize) -> SelectionOutcome {
        let Phase::Active { round, .. } = &mut self.phase else {
            debug!(index, "selection ignored: no active session");
            return SelectionOutcome::Ignored;
        };

        if index >= round.option_count() {
            debug!(index, "selection ignored: index out of range");
            return SelectionOutcome::Ignored;
        }

        if !round.is_correct(index) {
            debug!(index, "incorrect selection");
            self.events.push(GameEvent::Failure { index });
            return SelectionOutcome::Incorrect;
        }

        self.score += 1;
        *round = generate_round(
            self.config.palette(),
            self.config.options_per_round(),
            &mut self.random,
        );

        debug!(score = self.score, "correct selection");
        self.events.push(GameEvent::Success { score: self.score });
        self.events.push(GameEvent::RoundStarted {
            round: round.clone(),
        });
        SelectionOutcome::Correct
    }

    /// Ends the running session on player request. Returns `None` when already idle.
    pub fn end_session(&mut self) -> Option<SessionReport> {
        self.finish(EndReason::Requested)
    }

    /// Moves the session clock forward, firing every countdown tick that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let horizon = self.timers.now() + elapsed;
        while let Some((id, kind)) = self.timers.pop_due(horizon) {
            self.on_timer(id, kind);
        }
        self.timers.advance_to(horizon);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    fn on_timer(&mut self, id: TimerId, kind: TimerKind) {
        match kind {
            TimerKind::CountdownTick => self.on_countdown_tick(id),
        }
    }

    fn on_countdown_tick(&mut self, id: TimerId) {
        let Phase::Active { countdown, .. } = &self.phase else {
            debug!("stale countdown tick after session end");
            return;
        };
        if *countdown != id {
            debug!("stale countdown tick from a superseded session");
            return;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        debug!(time_remaining = self.time_remaining, "countdown tick");
        self.events.push(GameEvent::Tick {
            time_remaining: self.time_remaining,
        });

        if self.time_remaining == 0 {
            self.finish(EndReason::TimeUp);
            return;
        }

        let next = self
            .timers
            .schedule(TICK_INTERVAL, TimerKind::CountdownTick);
        if let Phase::Active { countdown, .. } = &mut self.phase {
            *countdown = next;
        }
    }

    fn finish(&mut self, reason: EndReason) -> Option<SessionReport> {
        let Phase::Active { countdown, .. } = mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        self.timers.cancel(countdown);

        let previous_best = self.best_score;
        let is_new_best = self.score > previous_best;
        if is_new_best {
            self.best_score = self.score;
        }

        let report = SessionReport {
            final_score: self.score,
            is_new_best,
            best_score: self.best_score,
            previous_best,
            reason,
            duration_secs: self.config.round_duration_secs(),
        };

        info!(
            final_score = report.final_score,
            best_score = report.best_score,
            is_new_best,
            reason = reason.as_str(),
            "session ended"
        );
        self.events.push(GameEvent::SessionEnded {
            report: report.clone(),
        });
        Some(report)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
