//! Color Match session controller: round generation, countdown and scoring.
//!
//! The controller performs no I/O and owns no threads. Drivers feed it input events and
//! elapsed time, then drain the [`GameEvent`]s it queues.

pub mod config;
pub mod controller;
pub mod random;
pub mod round;
pub mod timer;

pub use config::{load_settings, GameConfig, Settings};
pub use controller::{GameController, TICK_INTERVAL};
pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use round::generate_round;
pub use shared::{
    domain::{Color, Palette, Round},
    error::GameError,
    protocol::{EndReason, GameEvent, SelectionOutcome, SessionReport},
};
pub use timer::{TimerId, TimerQueue};
