//! Types shared by the game core, storage and the front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
