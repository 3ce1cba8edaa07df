//! Game state module - the Snake engine
//!
//! Owns the snake, the food, both directions and the running/game-over flags.
//! `tick` advances one cell per call; input only touches the pending direction.

use tracing::debug;

use crate::error::LayoutError;
use crate::input_buffer::DirectionBuffer;
use crate::rng::SimpleRng;
use crate::snake::Snake;
use crate::snapshot::{empty_grid, GameSnapshot};
use crate::types::*;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    snake: Snake,
    food: Option<Position>,
    /// Direction applied on the last tick.
    direction: Direction,
    input: DirectionBuffer,
    running: bool,
    game_over: bool,
    rng: SimpleRng,
    seed: u32,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Committed moves in the current episode.
    step: u32,
    last_event: Option<TickOutcome>,
}

impl GameState {
    /// Create a running game in the initial layout with the given RNG seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let snake = Snake::from_segments(&INITIAL_SNAKE);
        let food = place_food(&mut rng, &snake);

        Self {
            snake,
            food,
            direction: INITIAL_DIRECTION,
            input: DirectionBuffer::new(INITIAL_DIRECTION),
            running: true,
            game_over: false,
            rng,
            seed,
            episode_id: 0,
            step: 0,
            last_event: None,
        }
    }

    /// Create a running game from an arbitrary layout.
    ///
    /// `body` is head-first; `direction` becomes both the current and the
    /// pending direction.
    pub fn from_layout(
        body: &[Position],
        direction: Direction,
        food: Position,
        seed: u32,
    ) -> Result<Self, LayoutError> {
        if body.is_empty() {
            return Err(LayoutError::EmptySnake);
        }
        if body.len() > BOARD_CELLS {
            return Err(LayoutError::TooLong(body.len()));
        }

        let mut occupied = [false; BOARD_CELLS];
        for &p in body {
            let idx = p.index().ok_or(LayoutError::OutOfBounds(p))?;
            if occupied[idx] {
                return Err(LayoutError::Overlap(p));
            }
            occupied[idx] = true;
        }

        let food_idx = food.index().ok_or(LayoutError::OutOfBounds(food))?;
        if occupied[food_idx] {
            return Err(LayoutError::FoodOnSnake(food));
        }

        Ok(Self {
            snake: Snake::from_segments(body),
            food: Some(food),
            direction,
            input: DirectionBuffer::new(direction),
            running: true,
            game_over: false,
            rng: SimpleRng::new(seed),
            seed,
            episode_id: 0,
            step: 0,
            last_event: None,
        })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn length(&self) -> usize {
        self.snake.len()
    }

    /// `None` only once the snake covers every cell
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.input.pending()
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Growth since the start of the episode
    pub fn score(&self) -> u32 {
        self.snake.len().saturating_sub(INITIAL_LENGTH) as u32
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn last_event(&self) -> Option<TickOutcome> {
        self.last_event
    }

    /// Advance one cell in the pending direction.
    ///
    /// A no-op unless the game is running. On collision the snake is left
    /// exactly as it was and the game stops.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || self.game_over {
            return TickOutcome::Idle;
        }

        self.direction = self.input.pending();
        let new_head = self.snake.head().step(self.direction);

        let collision = if !new_head.in_bounds() {
            Some(Collision::Wall)
        } else if self.snake.occupies(new_head) {
            Some(Collision::Body)
        } else {
            None
        };

        let outcome = match collision {
            Some(kind) => {
                self.game_over = true;
                self.running = false;
                debug!(
                    collision = kind.as_str(),
                    x = new_head.x,
                    y = new_head.y,
                    score = self.score(),
                    "snake collided"
                );
                TickOutcome::Collided(kind)
            }
            None => {
                let ate = self.food == Some(new_head);
                self.snake.advance(new_head, ate);
                self.step = self.step.wrapping_add(1);

                if ate {
                    self.food = place_food(&mut self.rng, &self.snake);
                    debug!(
                        score = self.score(),
                        food = ?self.food,
                        "food eaten"
                    );
                    TickOutcome::Ate
                } else {
                    TickOutcome::Moved
                }
            }
        };

        self.last_event = Some(outcome);
        outcome
    }

    /// Buffer a direction for the next tick.
    ///
    /// Reversals of the pending direction are ignored. An accepted direction
    /// after game over resumes play from the current layout.
    pub fn submit_direction(&mut self, dir: Direction) -> bool {
        let accepted = self.input.submit(dir);
        if accepted && self.game_over {
            self.game_over = false;
            self.running = true;
            debug!(direction = dir.as_str(), "resumed after game over");
        }
        accepted
    }

    /// Start a new episode from the initial layout.
    ///
    /// The RNG is not reseeded, so successive episodes get fresh food.
    pub fn reset(&mut self) {
        self.snake = Snake::from_segments(&INITIAL_SNAKE);
        self.food = place_food(&mut self.rng, &self.snake);
        self.direction = INITIAL_DIRECTION;
        self.input.reset(INITIAL_DIRECTION);
        self.running = true;
        self.game_over = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.step = 0;
        self.last_event = None;
        debug!(episode_id = self.episode_id, "game reset");
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Steer(dir) => self.submit_direction(dir),
            GameAction::Restart => {
                self.reset();
                true
            }
        }
    }

    /// Classify every cell as empty, head, body or food.
    pub fn render_cells(&self) -> CellGrid {
        let mut grid = empty_grid();
        let mut mark = |p: Position, kind: CellKind| {
            if p.in_bounds() {
                grid[p.y as usize][p.x as usize] = kind;
            }
        };

        if let Some(food) = self.food {
            mark(food, CellKind::Food);
        }
        for &p in &self.snake.segments()[1..] {
            mark(p, CellKind::Body);
        }
        mark(self.snake.head(), CellKind::Head);
        grid
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.cells = self.render_cells();
        out.head = self.snake.head();
        out.length = self.snake.len() as u16;
        out.food = self.food;
        out.direction = self.direction;
        out.pending_direction = self.input.pending();
        out.running = self.running;
        out.game_over = self.game_over;
        out.score = self.score();
        out.episode_id = self.episode_id;
        out.step = self.step;
        out.seed = self.seed;
        out.last_event = self.last_event;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Pick a free cell uniformly at random.
///
/// Rejection sampling first; if that keeps hitting the snake, count the free
/// cells and pick one by index. `None` means the board is full.
fn place_food(rng: &mut SimpleRng, snake: &Snake) -> Option<Position> {
    let occupied = snake.occupancy();

    for _ in 0..FOOD_SAMPLE_ATTEMPTS {
        let p = rng.next_position();
        if let Some(i) = p.index() {
            if !occupied[i] {
                return Some(p);
            }
        }
    }

    let free = occupied.iter().filter(|&&o| !o).count();
    if free == 0 {
        return None;
    }

    let mut k = rng.next_range(free as u32) as usize;
    for (i, &o) in occupied.iter().enumerate() {
        if o {
            continue;
        }
        if k == 0 {
            return Some(Position::from_index(i));
        }
        k -= 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i8, y: i8) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(state.running);
        assert!(!state.game_over);
        assert_eq!(state.snake.segments(), &INITIAL_SNAKE);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.pending_direction(), Direction::Right);
        assert_eq!(state.score(), 0);
        assert_eq!(state.episode_id, 0);
        let food = state.food.unwrap();
        assert!(food.in_bounds());
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_tick_eats_forced_food() {
        let mut state = GameState::from_layout(&INITIAL_SNAKE, Direction::Right, p(9, 8), 1).unwrap();

        assert_eq!(state.tick(), TickOutcome::Ate);
        assert_eq!(
            state.snake.segments(),
            &[p(9, 8), p(8, 8), p(7, 8), p(6, 8)]
        );
        assert_eq!(state.score(), 1);

        let food = state.food.unwrap();
        assert_ne!(food, p(9, 8));
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_tick_moves_without_food() {
        let mut state = GameState::from_layout(&INITIAL_SNAKE, Direction::Right, p(0, 0), 1).unwrap();

        assert_eq!(state.tick(), TickOutcome::Moved);
        assert_eq!(state.snake.segments(), &[p(9, 8), p(8, 8), p(7, 8)]);
        assert_eq!(state.food, Some(p(0, 0)));
        assert_eq!(state.step, 1);
    }

    #[test]
    fn test_wall_collision_leaves_snake_unchanged() {
        let body = [p(0, 8), p(1, 8), p(2, 8)];
        let mut state = GameState::from_layout(&body, Direction::Left, p(5, 5), 1).unwrap();

        assert_eq!(state.tick(), TickOutcome::Collided(Collision::Wall));
        assert!(state.game_over);
        assert!(!state.running);
        assert_eq!(state.snake.segments(), &body);
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,5) curled so that moving right lands on (6,5).
        let body = [p(5, 5), p(5, 6), p(6, 6), p(6, 5)];
        let mut state = GameState::from_layout(&body, Direction::Right, p(0, 0), 1).unwrap();

        assert_eq!(state.tick(), TickOutcome::Collided(Collision::Body));
        assert!(state.game_over);
        assert_eq!(state.snake.segments(), &body);
    }

    #[test]
    fn test_tick_is_noop_after_game_over() {
        let body = [p(0, 8), p(1, 8), p(2, 8)];
        let mut state = GameState::from_layout(&body, Direction::Left, p(5, 5), 1).unwrap();
        state.tick();

        for _ in 0..5 {
            assert_eq!(state.tick(), TickOutcome::Idle);
        }
        assert_eq!(state.snake.segments(), &body);
        assert_eq!(state.last_event, Some(TickOutcome::Collided(Collision::Wall)));
    }

    #[test]
    fn test_direction_input_revives_game_over() {
        let body = [p(0, 8), p(1, 8), p(2, 8)];
        let mut state = GameState::from_layout(&body, Direction::Left, p(5, 5), 1).unwrap();
        state.tick();
        assert!(state.game_over);

        assert!(state.submit_direction(Direction::Up));
        assert!(state.running);
        assert!(!state.game_over);

        assert_eq!(state.tick(), TickOutcome::Moved);
        assert_eq!(state.head(), p(0, 7));
    }

    #[test]
    fn test_rejected_input_does_not_revive() {
        let body = [p(0, 8), p(1, 8), p(2, 8)];
        let mut state = GameState::from_layout(&body, Direction::Left, p(5, 5), 1).unwrap();
        state.tick();

        assert!(!state.submit_direction(Direction::Right));
        assert!(state.game_over);
        assert!(!state.running);
    }

    #[test]
    fn test_reversal_of_pending_is_ignored() {
        let mut state = GameState::new(1);
        assert!(!state.submit_direction(Direction::Left));
        assert_eq!(state.pending_direction(), Direction::Right);
    }

    #[test]
    fn test_pending_applied_on_next_tick_only() {
        let mut state = GameState::from_layout(&INITIAL_SNAKE, Direction::Right, p(0, 0), 1).unwrap();
        state.submit_direction(Direction::Down);
        assert_eq!(state.direction(), Direction::Right);

        state.tick();
        assert_eq!(state.direction(), Direction::Down);
        assert_eq!(state.head(), p(8, 9));
    }

    #[test]
    fn test_quick_turn_into_neck_collides() {
        // Reversal is checked against the pending direction, so two quick
        // turns between ticks can still fold the snake onto itself.
        let mut state = GameState::from_layout(&INITIAL_SNAKE, Direction::Right, p(0, 0), 1).unwrap();
        assert!(state.submit_direction(Direction::Up));
        assert!(state.submit_direction(Direction::Left));

        assert_eq!(state.tick(), TickOutcome::Collided(Collision::Body));
    }

    #[test]
    fn test_reset_restores_initial_layout() {
        let body = [p(0, 8), p(1, 8), p(2, 8)];
        let mut state = GameState::from_layout(&body, Direction::Left, p(5, 5), 1).unwrap();
        state.tick();

        state.reset();
        assert!(state.running);
        assert!(!state.game_over);
        assert_eq!(state.snake.segments(), &INITIAL_SNAKE);
        assert_eq!(state.direction, INITIAL_DIRECTION);
        assert_eq!(state.pending_direction(), INITIAL_DIRECTION);
        assert_eq!(state.episode_id, 1);
        assert_eq!(state.step, 0);
        assert!(state.last_event.is_none());
        assert!(!state.snake.occupies(state.food.unwrap()));
    }

    #[test]
    fn test_apply_action_restart() {
        let mut state = GameState::new(7);
        state.submit_direction(Direction::Up);
        state.tick();

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.snake.segments(), &INITIAL_SNAKE);
        assert_eq!(state.episode_id(), 1);
    }

    #[test]
    fn test_apply_action_steer() {
        let mut state = GameState::new(7);
        assert!(state.apply_action(GameAction::Steer(Direction::Down)));
        assert!(!state.apply_action(GameAction::Steer(Direction::Up)));
        assert_eq!(state.pending_direction(), Direction::Down);
    }

    #[test]
    fn test_from_layout_rejects_bad_input() {
        assert_eq!(
            GameState::from_layout(&[], Direction::Up, p(0, 0), 1).unwrap_err(),
            LayoutError::EmptySnake
        );
        assert_eq!(
            GameState::from_layout(&[p(16, 0)], Direction::Up, p(0, 0), 1).unwrap_err(),
            LayoutError::OutOfBounds(p(16, 0))
        );
        assert_eq!(
            GameState::from_layout(&[p(1, 1), p(1, 1)], Direction::Up, p(0, 0), 1).unwrap_err(),
            LayoutError::Overlap(p(1, 1))
        );
        assert_eq!(
            GameState::from_layout(&[p(1, 1)], Direction::Up, p(1, 1), 1).unwrap_err(),
            LayoutError::FoodOnSnake(p(1, 1))
        );
        assert_eq!(
            GameState::from_layout(&[p(1, 1)], Direction::Up, p(-1, 0), 1).unwrap_err(),
            LayoutError::OutOfBounds(p(-1, 0))
        );
    }

    #[test]
    fn test_render_cells_classification() {
        let state = GameState::from_layout(&INITIAL_SNAKE, Direction::Right, p(12, 3), 1).unwrap();
        let cells = state.render_cells();

        assert_eq!(cells[8][8], CellKind::Head);
        assert_eq!(cells[8][7], CellKind::Body);
        assert_eq!(cells[8][6], CellKind::Body);
        assert_eq!(cells[3][12], CellKind::Food);
        assert_eq!(cells[0][0], CellKind::Empty);

        let filled = cells
            .iter()
            .flatten()
            .filter(|&&c| c != CellKind::Empty)
            .count();
        assert_eq!(filled, 4);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(3);
        state.submit_direction(Direction::Down);
        state.tick();

        let snap = state.snapshot();
        assert_eq!(snap.head, state.head());
        assert_eq!(snap.length as usize, state.length());
        assert_eq!(snap.direction, Direction::Down);
        assert_eq!(snap.food, state.food());
        assert_eq!(snap.seed, 3);
        assert!(snap.playable());
        assert_eq!(snap.cell(state.head()), Some(CellKind::Head));
    }

    #[test]
    fn test_place_food_on_nearly_full_board() {
        // Fill every cell except (0, 15) with a boustrophedon snake.
        let mut body = Vec::new();
        for y in 0..BOARD_SIZE {
            if y % 2 == 0 {
                for x in 0..BOARD_SIZE {
                    body.push(p(x, y));
                }
            } else {
                for x in (0..BOARD_SIZE).rev() {
                    body.push(p(x, y));
                }
            }
        }
        body.retain(|&c| c != p(0, 15));
        let snake = Snake::from_segments(&body);

        let mut rng = SimpleRng::new(5);
        assert_eq!(place_food(&mut rng, &snake), Some(p(0, 15)));
    }

    #[test]
    fn test_place_food_full_board_is_none() {
        let body: Vec<Position> = (0..BOARD_CELLS).map(Position::from_index).collect();
        let snake = Snake::from_segments(&body);
        let mut rng = SimpleRng::new(5);
        assert_eq!(place_food(&mut rng, &snake), None);
    }

    #[test]
    fn test_same_seed_same_food() {
        let a = GameState::new(2024);
        let b = GameState::new(2024);
        assert_eq!(a.food(), b.food());
    }
}
