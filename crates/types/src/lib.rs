//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, headless adapter).
//!
//! # Board
//!
//! The playfield is a square grid of `BOARD_SIZE` x `BOARD_SIZE` cells.
//! Coordinates are `(x, y)` with `x` growing to the right and `y` growing
//! downwards, both in `[0, BOARD_SIZE)`.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 130 | Default interval between engine ticks |
//! | `MIN_TICK_MS` | 10 | Lower clamp for configured intervals |
//!
//! # Examples
//!
//! ```
//! use tui_snake_types::{Direction, GameAction, Position, BOARD_SIZE};
//!
//! let head = Position::new(8, 8);
//! assert_eq!(head.step(Direction::Right), Position::new(9, 8));
//!
//! assert!(Direction::Up.is_opposite(Direction::Down));
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//!
//! assert_eq!(
//!     GameAction::from_str("up"),
//!     Some(GameAction::Steer(Direction::Up))
//! );
//! assert_eq!(BOARD_SIZE, 16);
//! ```

/// Board edge length in cells
pub const BOARD_SIZE: i8 = 16;

/// Number of cells on the board (upper bound on snake length)
pub const BOARD_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Default tick interval in milliseconds
pub const TICK_MS: u32 = 130;

/// Smallest accepted tick interval in milliseconds
pub const MIN_TICK_MS: u32 = 10;

/// Snake at the start of every episode, head first
pub const INITIAL_SNAKE: [Position; 3] = [
    Position::new(8, 8),
    Position::new(7, 8),
    Position::new(6, 8),
];

/// Heading at the start of every episode
pub const INITIAL_DIRECTION: Direction = Direction::Right;

/// Length the score is measured against
pub const INITIAL_LENGTH: usize = INITIAL_SNAKE.len();

/// Random draws tried before food placement falls back to enumerating free cells
pub const FOOD_SAMPLE_ATTEMPTS: u32 = 64;


/// A cell coordinate on the board
///
/// Signed so that a step off the board (e.g. `x = -1`) is representable
/// and can be rejected by [`Position::in_bounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Neighbouring position one cell in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Whether the position lies within `[0, BOARD_SIZE)` on both axes
    pub fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }

    /// Row-major flat index, or `None` when off the board
    #[inline(always)]
    pub fn index(self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        Some((self.y as usize) * (BOARD_SIZE as usize) + (self.x as usize))
    }

    /// Inverse of [`Position::index`]
    pub fn from_index(idx: usize) -> Self {
        let size = BOARD_SIZE as usize;
        Self {
            x: (idx % size) as i8,
            y: (idx / size) as i8,
        }
    }
}

/// Movement heading
///
/// Each direction is a unit delta with exactly one nonzero component.
/// `y` grows downwards, so `Up` is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit delta `(dx, dy)`
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The 180° reversal
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Parse direction from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_snake_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("Right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Lowercase name used by the adapter protocol
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Capitalised name for on-screen display
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

/// Actions that can be applied to the game
///
/// Used by both keyboard input and the headless adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Buffer a new heading for the next tick
    Steer(Direction),
    /// Start a new episode from the initial layout
    Restart,
}

impl GameAction {
    /// Parse action from string (for the adapter protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_snake_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("down"), Some(GameAction::Steer(Direction::Down)));
    /// assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("restart") {
            return Some(GameAction::Restart);
        }
        Direction::from_str(s).map(GameAction::Steer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameAction::Steer(dir) => dir.as_str(),
            GameAction::Restart => "restart",
        }
    }
}

/// Why a tick ended the episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collision {
    /// New head left the board
    Wall,
    /// New head landed on an existing segment
    Body,
}

impl Collision {
    pub fn as_str(self) -> &'static str {
        match self {
            Collision::Wall => "wall",
            Collision::Body => "body",
        }
    }
}

/// Result of a single engine tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickOutcome {
    /// Game not running; nothing changed
    Idle,
    /// Snake translated by one cell
    Moved,
    /// Snake grew onto the food and new food was placed
    Ate,
    /// Episode ended; snake left unchanged
    Collided(Collision),
}

impl TickOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TickOutcome::Idle => "idle",
            TickOutcome::Moved => "moved",
            TickOutcome::Ate => "ate",
            TickOutcome::Collided(_) => "collided",
        }
    }
}

/// Per-cell visual classification produced by the render projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellKind {
    #[default]
    Empty,
    Head,
    Body,
    Food,
}

impl CellKind {
    /// Numeric code used in adapter observations
    pub fn code(self) -> u8 {
        match self {
            CellKind::Empty => 0,
            CellKind::Head => 1,
            CellKind::Body => 2,
            CellKind::Food => 3,
        }
    }
}

/// Board classification, row-major: `grid[y][x]`
pub type CellGrid = [[CellKind; BOARD_SIZE as usize]; BOARD_SIZE as usize];
