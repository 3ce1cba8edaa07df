//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Direction
//! buffering and reversal rejection live in the core crate; this crate only
//! decides which keys mean what.

pub mod map;

pub use tui_snake_types as types;

pub use map::{handle_key_event, should_quit};
