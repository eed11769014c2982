use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::domain::Color;

pub const CORRECT_GREEN: egui::Color32 = egui::Color32::from_rgb(76, 175, 80);
pub const WRONG_RED: egui::Color32 = egui::Color32::from_rgb(229, 57, 53);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeChoice {
    #[default]
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn label(self) -> &'static str {
        match self {
            ThemeChoice::Dark => "Dark",
            ThemeChoice::Light => "Light",
        }
    }
}

pub fn visuals_for_theme(theme: ThemeChoice) -> egui::Visuals {
    match theme {
        ThemeChoice::Dark => {
            let mut v = egui::Visuals::dark();
            v.panel_fill = egui::Color32::from_rgb(30, 31, 34);
            v.window_fill = egui::Color32::from_rgb(43, 45, 49);
            v
        }
        ThemeChoice::Light => {
            let mut v = egui::Visuals::light();
            v.panel_fill = egui::Color32::from_rgb(245, 245, 245);
            v
        }
    }
}

pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Color32::from_rgb(color.r, color.g, color.b)
}

/// Ring drawn around every swatch so light colors stay visible on light panels.
pub fn outline_for(theme: ThemeChoice) -> egui::Color32 {
    match theme {
        ThemeChoice::Dark => egui::Color32::from_gray(200),
        ThemeChoice::Light => egui::Color32::from_gray(60),
    }
}
