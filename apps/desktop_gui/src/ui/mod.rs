//! UI layer for the desktop GUI: app shell, swatch widgets, and themes.

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::{ColorMatchApp, PersistedGuiSettings, SETTINGS_STORAGE_KEY};
