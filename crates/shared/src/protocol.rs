use serde::{Deserialize, Serialize};

use crate::domain::Round;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    Correct,
    Incorrect,
    /// No active session, or the index does not name a swatch.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    TimeUp,
    Requested,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TimeUp => "time_up",
            Self::Requested => "requested",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub final_score: u32,
    pub is_new_best: bool,
    pub best_score: u32,
    pub previous_best: u32,
    pub reason: EndReason,
    pub duration_secs: u32,
}

impl SessionReport {
    /// Second line of the game-over dialog.
    pub fn headline(&self) -> String {
        if self.is_new_best {
            "New High Score!".to_string()
        } else {
            format!("High Score: {}", self.best_score)
        }
    }
}

/// Signals queued by the session controller for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted {
        duration_secs: u32,
    },
    RoundStarted {
        round: Round,
    },
    Tick {
        time_remaining: u32,
    },
    Success {
        score: u32,
    },
    Failure {
        index: usize,
    },
    SessionEnded {
        report: SessionReport,
    },
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
