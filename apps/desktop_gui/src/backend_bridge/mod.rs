//! Bridge between the UI thread and the persistence worker.

pub mod commands;
pub mod runtime;
