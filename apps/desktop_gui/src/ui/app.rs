use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use game_core::{GameController, RngSource};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use shared::protocol::SelectionOutcome;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{Banner, PlayState};
use crate::ui::theme::{self, ThemeChoice};
use crate::ui::widgets::{centered_row_offset, color_swatch, SwatchHighlight};

pub const SETTINGS_STORAGE_KEY: &str = "color_match_gui_settings";

const TARGET_DIAMETER: f32 = 140.0;
const OPTION_DIAMETER: f32 = 96.0;
const OPTION_SPACING: f32 = 18.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedGuiSettings {
    pub theme: ThemeChoice,
    pub show_hex_labels: bool,
}

impl Default for PersistedGuiSettings {
    fn default() -> Self {
        Self {
            theme: ThemeChoice::Dark,
            show_hex_labels: false,
        }
    }
}

pub type DesktopController = GameController<RngSource<StdRng>>;

pub struct ColorMatchApp {
    controller: DesktopController,
    play: PlayState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    last_frame: Instant,
    status: String,
    settings: PersistedGuiSettings,
    applied_theme: Option<ThemeChoice>,
    /// Sessions compare against the stored best, so none starts before it is known.
    best_score_ready: bool,
}

impl ColorMatchApp {
    pub fn new(
        controller: DesktopController,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted_settings: Option<PersistedGuiSettings>,
    ) -> Self {
        let mut app = Self {
            controller,
            play: PlayState::default(),
            cmd_tx,
            ui_rx,
            last_frame: Instant::now(),
            status: String::new(),
            settings: persisted_settings.unwrap_or_default(),
            applied_theme: None,
            best_score_ready: false,
        };
        if !app.dispatch(BackendCommand::LoadBestScore) {
            app.best_score_ready = true;
        }
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status)
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    tracing::info!("{message}");
                    self.status = message;
                }
                UiEvent::BestScoreLoaded(best_score) => {
                    self.controller.raise_best_score(best_score);
                    self.best_score_ready = true;
                }
                UiEvent::SessionRecorded {
                    session_id,
                    best_score,
                } => {
                    self.controller.raise_best_score(best_score);
                    self.status = format!("Saved game #{session_id}");
                }
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "{}", err.message());
                    if matches!(
                        err.context(),
                        UiErrorContext::LoadBestScore | UiErrorContext::BackendStartup
                    ) {
                        self.best_score_ready = true;
                    }
                    self.status = match err.context() {
                        UiErrorContext::RecordSession | UiErrorContext::LoadBestScore
                            if err.is_recoverable() =>
                        {
                            format!("{} (scores still count for this run)", err.message())
                        }
                        _ => err.message().to_string(),
                    };
                }
            }
        }
    }

    /// Feeds wall-clock time since the previous frame into the session countdown.
    fn advance_clock(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.controller.advance(elapsed);
        self.pump_game_events(now);
        self.play.tick(now);
    }

    fn pump_game_events(&mut self, now: Instant) {
        let success_flash = self.controller.config().success_flash();
        for event in self.controller.drain_events() {
            if let Some(cmd) = self.play.apply(event, now, success_flash) {
                let _ = self.dispatch(cmd);
            }
        }
    }

    fn start_game(&mut self, now: Instant) {
        if !self.best_score_ready {
            return;
        }
        self.status.clear();
        self.controller.start_session();
        self.pump_game_events(now);
    }

    fn end_game(&mut self, now: Instant) {
        self.controller.end_session();
        self.pump_game_events(now);
    }

    fn select(&mut self, index: usize, now: Instant) -> SelectionOutcome {
        if !self.play.accepts_input(now) {
            return SelectionOutcome::Ignored;
        }
        let outcome = self.controller.handle_selection(index);
        self.pump_game_events(now);
        outcome
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.settings.theme) {
            return;
        }
        ctx.set_visuals(theme::visuals_for_theme(self.settings.theme));
        self.applied_theme = Some(self.settings.theme);
    }

    fn next_repaint(&self, now: Instant) -> Option<Duration> {
        [self.controller.next_deadline(), self.play.next_wake(now)]
            .into_iter()
            .flatten()
            .min()
    }

    fn render_scoreboard(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("Score: {}", self.controller.score())).strong());
            ui.separator();
            ui.label(format!("High Score: {}", self.controller.best_score()));
            if self.controller.is_active() {
                ui.separator();
                ui.label(format!("Time: {}s", self.controller.time_remaining()));
            }
            if !self.status.is_empty() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(&self.status);
                });
            }
        });
    }

    fn render_start_screen(&mut self, ui: &mut egui::Ui, now: Instant) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading(egui::RichText::new("Color Match").size(36.0).strong());
            ui.add_space(12.0);
            ui.label(format!(
                "Match the target color as many times as you can in {} seconds.",
                self.controller.config().round_duration_secs()
            ));
            ui.label("Click the option that has exactly the same color as the big circle.");
            ui.add_space(24.0);

            let start = egui::Button::new(egui::RichText::new("Start Game").size(20.0))
                .min_size(egui::vec2(180.0, 44.0));
            if ui.add_enabled(self.best_score_ready, start).clicked() {
                self.start_game(now);
            }
            if !self.best_score_ready {
                ui.weak("Loading high score...");
            }

            ui.add_space(32.0);
            ui.horizontal(|ui| {
                let offset = centered_row_offset(ui.available_width(), 1, 320.0, 0.0);
                ui.add_space(offset);
                ui.label("Theme:");
                for choice in [ThemeChoice::Dark, ThemeChoice::Light] {
                    ui.selectable_value(&mut self.settings.theme, choice, choice.label());
                }
                ui.checkbox(&mut self.settings.show_hex_labels, "Show color codes");
            });
        });
    }

    fn render_game_screen(&mut self, ui: &mut egui::Ui, now: Instant) {
        let Some(round) = self.play.shown_round().cloned() else {
            return;
        };
        let holding = self.play.is_holding(now);
        let accepts_input = self.play.accepts_input(now);
        let outline = theme::outline_for(self.settings.theme);
        let mut clicked = None;

        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.label(egui::RichText::new("Match this color").size(18.0));
            ui.add_space(8.0);
            color_swatch(
                ui,
                theme::to_color32(round.target),
                outline,
                TARGET_DIAMETER,
                SwatchHighlight::None,
                false,
            );
            if self.settings.show_hex_labels {
                ui.monospace(round.target.to_hex());
            }
            ui.add_space(24.0);
        });

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = OPTION_SPACING;
            ui.add_space(centered_row_offset(
                ui.available_width(),
                round.options.len(),
                OPTION_DIAMETER,
                OPTION_SPACING,
            ));
            for (index, color) in round.options.iter().enumerate() {
                let highlight = if holding && index == round.correct_index {
                    SwatchHighlight::Correct
                } else if self.play.last_wrong() == Some(index) {
                    SwatchHighlight::Wrong
                } else {
                    SwatchHighlight::None
                };
                let response = color_swatch(
                    ui,
                    theme::to_color32(*color),
                    outline,
                    OPTION_DIAMETER,
                    highlight,
                    accepts_input,
                );
                let response = if self.settings.show_hex_labels {
                    response.on_hover_text(color.to_hex())
                } else {
                    response
                };
                if response.clicked() {
                    clicked = Some(index);
                }
            }
        });

        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            match self.play.banner(now) {
                Some(Banner::Correct) => {
                    ui.label(
                        egui::RichText::new("Correct!")
                            .size(22.0)
                            .color(theme::CORRECT_GREEN),
                    );
                }
                Some(Banner::Wrong) => {
                    ui.label(
                        egui::RichText::new("Wrong! Try again!")
                            .size(22.0)
                            .color(theme::WRONG_RED),
                    );
                }
                None => {
                    ui.add_space(28.0);
                }
            }
            ui.add_space(20.0);
            if ui.button("End Game").clicked() {
                self.end_game(now);
            }
        });

        if let Some(index) = clicked {
            self.select(index, now);
        }
    }

    fn render_game_over(&mut self, ctx: &egui::Context, now: Instant) {
        let Some(report) = self.play.game_over().cloned() else {
            return;
        };

        let mut play_again = false;
        let mut close = false;
        egui::Window::new("Game Over!")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Final Score: {}", report.final_score))
                            .size(24.0)
                            .strong(),
                    );
                    let headline = egui::RichText::new(report.headline()).size(18.0);
                    ui.label(if report.is_new_best {
                        headline.color(theme::CORRECT_GREEN)
                    } else {
                        headline
                    });
                    ui.add_space(12.0);
                    ui.horizontal(|ui| {
                        play_again = ui.button("Play Again").clicked();
                        close = ui.button("Close").clicked();
                    });
                });
            });

        if play_again {
            self.play.dismiss_game_over();
            self.start_game(now);
        } else if close {
            self.play.dismiss_game_over();
        }
    }
}

impl eframe::App for ColorMatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme_if_needed(ctx);
        self.process_ui_events();

        let now = Instant::now();
        self.advance_clock(now);

        egui::TopBottomPanel::top("scoreboard").show(ctx, |ui| self.render_scoreboard(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.controller.is_active() {
                self.render_game_screen(ui, now);
            } else {
                self.render_start_screen(ui, now);
            }
        });
        self.render_game_over(ctx, now);

        if let Some(wake) = self.next_repaint(Instant::now()) {
            ctx.request_repaint_after(wake);
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
