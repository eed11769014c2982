//! Worker thread that owns the score repository and serves UI commands.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender};
use storage::{MemoryScoreStore, ScoreRepository};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Where the worker keeps scores. `None` keeps them in memory for this run only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub database_url: Option<String>,
}

pub fn launch(
    config: BackendConfig,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let scores: Arc<dyn ScoreRepository> = match &config.database_url {
                Some(database_url) => storage::open_or_memory(database_url).await,
                None => Arc::new(MemoryScoreStore::new()),
            };
            let _ = ui_tx.try_send(UiEvent::Info("Score keeper ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(scores.as_ref(), cmd, &ui_tx).await;
            }
            tracing::debug!("ui command queue closed, backend worker exiting");
        });
    })
}

pub(crate) async fn handle_command(
    scores: &dyn ScoreRepository,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    let event = match cmd {
        BackendCommand::LoadBestScore => match scores.load_best_score().await {
            Ok(best_score) => UiEvent::BestScoreLoaded(best_score),
            Err(err) => {
                tracing::warn!("failed to load best score: {err:#}");
                UiEvent::Error(UiError::from_message(
                    UiErrorContext::LoadBestScore,
                    format!("could not load best score: {err:#}"),
                ))
            }
        },
        BackendCommand::RecordSession { report } => match scores.record_session(&report).await {
            Ok(stored) => {
                tracing::info!(
                    session_id = stored.session_id,
                    final_score = stored.final_score,
                    "session recorded"
                );
                UiEvent::SessionRecorded {
                    session_id: stored.session_id,
                    best_score: stored.best_score,
                }
            }
            Err(err) => {
                tracing::warn!("failed to record session: {err:#}");
                UiEvent::Error(UiError::from_message(
                    UiErrorContext::RecordSession,
                    format!("could not save score: {err:#}"),
                ))
            }
        },
    };

    if ui_tx.try_send(event).is_err() {
        tracing::warn!("ui event queue unavailable, dropping backend result");
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
