//! Backend-to-UI events and error modeling for the desktop GUI.

pub enum UiEvent {
    Info(String),
    BestScoreLoaded(u32),
    SessionRecorded { session_id: i64, best_score: u32 },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Persistence,
    Startup,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadBestScore,
    RecordSession,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("sqlite")
            || message_lower.contains("database")
            || message_lower.contains("migration")
            || message_lower.contains("score")
        {
            UiErrorCategory::Persistence
        } else if message_lower.contains("runtime")
            || message_lower.contains("startup")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Startup
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Scores are still kept for this run, so the player can keep going.
    pub fn is_recoverable(&self) -> bool {
        self.category != UiErrorCategory::Startup
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
