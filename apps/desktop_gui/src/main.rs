use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::{commands::BackendCommand, runtime::BackendConfig};
use clap::Parser;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use game_core::{config::DEFAULT_DATABASE_URL, load_settings, GameController, RngSource};
use ui::{ColorMatchApp, PersistedGuiSettings, SETTINGS_STORAGE_KEY};

#[derive(Debug, Parser)]
#[command(name = "color-match-gui", about = "Color matching mini-game")]
struct Args {
    /// Session length in seconds.
    #[arg(long)]
    duration: Option<u32>,
    /// Fixed RNG seed for reproducible rounds.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    database_url: Option<String>,
    /// Keep scores in memory for this run only.
    #[arg(long)]
    no_persist: bool,
}

/// Places the score database under the per-user data dir unless one was configured.
fn resolve_database_url(cli_url: Option<String>, configured_url: &str) -> String {
    if let Some(url) = cli_url {
        return url;
    }
    if configured_url != DEFAULT_DATABASE_URL {
        return configured_url.to_string();
    }
    match dirs::data_local_dir() {
        Some(base) => {
            let path: PathBuf = base.join("color_match").join("color_match.db");
            format!("sqlite://{}", path.display().to_string().replace('\\', "/"))
        }
        None => configured_url.to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(duration) = args.duration {
        settings.round_duration_secs = duration;
    }
    let config = settings.game_config()?;

    let database_url = if args.no_persist {
        None
    } else {
        Some(resolve_database_url(
            args.database_url.clone(),
            &settings.database_url,
        ))
    };
    tracing::info!(?database_url, "starting color match gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(BackendConfig { database_url }, cmd_rx, ui_tx);

    let random = match args.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let controller = GameController::new(config, random);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Color Match")
            .with_inner_size([720.0, 560.0])
            .with_min_inner_size([520.0, 440.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Color Match",
        options,
        Box::new(|cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedGuiSettings>(&text).ok())
            });
            Ok(Box::new(ColorMatchApp::new(
                controller,
                cmd_tx,
                ui_rx,
                persisted_settings,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("gui exited with error: {err}"))
}
