use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use game_core::{load_settings, GameController, RngSource};
use storage::{MemoryScoreStore, ScoreRepository};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod render;
mod terminal;

use terminal::TerminalGame;

#[derive(Parser, Debug)]
#[command(name = "color-match", about = "Match the target color before the clock runs out")]
struct Args {
    /// Session length in seconds.
    #[arg(long)]
    duration: Option<u32>,
    /// Seed for reproducible rounds.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    database_url: Option<String>,
    /// Keep the high score in memory only.
    #[arg(long)]
    no_persist: bool,
    /// Print hex codes instead of colored blocks.
    #[arg(long)]
    plain: bool,
    /// Emit game events as JSON lines.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(duration) = args.duration {
        settings.round_duration_secs = duration;
    }
    if let Some(database_url) = args.database_url {
        settings.database_url = database_url;
    }
    let config = settings.game_config()?;

    let scores: Arc<dyn ScoreRepository> = if args.no_persist {
        Arc::new(MemoryScoreStore::new())
    } else {
        storage::open_or_memory(&settings.database_url).await
    };
    let best_score = scores.load_best_score().await.unwrap_or_else(|err| {
        tracing::warn!("failed to load best score: {err:#}");
        0
    });

    let random = match args.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let controller = GameController::new(config, random).with_best_score(best_score);

    TerminalGame::new(controller, scores, args.plain, args.json)
        .run(BufReader::new(tokio::io::stdin()))
        .await
}
