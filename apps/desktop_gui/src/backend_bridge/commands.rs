//! Backend commands queued from UI to backend worker.

use shared::protocol::SessionReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadBestScore,
    RecordSession { report: SessionReport },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadBestScore => "load_best_score",
            BackendCommand::RecordSession { .. } => "record_session",
        }
    }
}
