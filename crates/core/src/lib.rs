//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the Snake engine and everything it needs. It has no
//! dependencies on UI, networking, or I/O, which makes it:
//!
//! - **Deterministic**: the same seed produces the same food sequence
//! - **Testable**: every rule is covered by unit tests
//! - **Portable**: the terminal front-end and the headless adapter share it
//!
//! # Module Structure
//!
//! - [`game_state`]: the engine (tick, reset, input, render projection)
//! - [`input_buffer`]: pending-direction buffer with reversal rejection
//! - [`snake`]: fixed-capacity, head-first body storage
//! - [`rng`]: seeded LCG used for food placement
//! - [`snapshot`]: `Copy` view consumed by renderers
//! - [`config`]: environment-driven run configuration
//!
//! # Rules
//!
//! - Each tick adopts the pending direction and moves the head one cell
//! - Leaving the board or touching any segment ends the game; the snake is left as it was
//! - Eating grows the snake by one and places food on a random free cell
//! - Score is the length gained since the start of the episode
//! - After game over, any accepted direction resumes play; `reset` starts over
//!
//! # Example
//!
//! ```
//! use tui_snake_core::GameState;
//! use tui_snake_types::{Direction, GameAction, TickOutcome};
//!
//! let mut game = GameState::new(12345);
//! assert!(game.running());
//!
//! game.apply_action(GameAction::Steer(Direction::Down));
//! assert_ne!(game.tick(), TickOutcome::Idle);
//! assert_eq!(game.direction(), Direction::Down);
//! ```

pub mod config;
pub mod error;
pub mod game_state;
pub mod input_buffer;
pub mod rng;
pub mod snake;
pub mod snapshot;

pub use tui_snake_types as types;

pub use config::RunConfig;
pub use error::LayoutError;
pub use game_state::GameState;
pub use input_buffer::DirectionBuffer;
pub use rng::SimpleRng;
pub use snake::Snake;
pub use snapshot::GameSnapshot;
