use crate::types::{
    CellGrid, CellKind, Direction, Position, TickOutcome, BOARD_SIZE, INITIAL_DIRECTION,
    INITIAL_SNAKE,
};

/// Read-only, `Copy` view of a game for renderers.
///
/// `cells` is the per-cell classification; everything else is panel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub cells: CellGrid,
    pub head: Position,
    pub length: u16,
    pub food: Option<Position>,
    pub direction: Direction,
    pub pending_direction: Direction,
    pub running: bool,
    pub game_over: bool,
    pub score: u32,
    pub episode_id: u32,
    pub step: u32,
    pub seed: u32,
    pub last_event: Option<TickOutcome>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.cells = empty_grid();
        self.head = INITIAL_SNAKE[0];
        self.length = 0;
        self.food = None;
        self.direction = INITIAL_DIRECTION;
        self.pending_direction = INITIAL_DIRECTION;
        self.running = false;
        self.game_over = false;
        self.score = 0;
        self.episode_id = 0;
        self.step = 0;
        self.seed = 0;
        self.last_event = None;
    }

    pub fn playable(&self) -> bool {
        self.running && !self.game_over
    }

    pub fn cell(&self, pos: Position) -> Option<CellKind> {
        if !pos.in_bounds() {
            return None;
        }
        Some(self.cells[pos.y as usize][pos.x as usize])
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            cells: empty_grid(),
            head: INITIAL_SNAKE[0],
            length: 0,
            food: None,
            direction: INITIAL_DIRECTION,
            pending_direction: INITIAL_DIRECTION,
            running: false,
            game_over: false,
            score: 0,
            episode_id: 0,
            step: 0,
            seed: 0,
            last_event: None,
        }
    }
}

pub(crate) fn empty_grid() -> CellGrid {
    [[CellKind::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize]
}
