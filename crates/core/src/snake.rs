//! Snake body storage
//!
//! The body is an ordered, head-first list of positions held in a
//! fixed-capacity `ArrayVec`. A snake can never be longer than the board has
//! cells, so the capacity is `BOARD_CELLS` and moving never allocates.

use arrayvec::ArrayVec;

use crate::types::{Position, BOARD_CELLS};

pub type Body = ArrayVec<Position, BOARD_CELLS>;

/// The snake, head at index 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Body,
}

impl Snake {
    /// Build from head-first segments.
    ///
    /// Segments beyond `BOARD_CELLS` are dropped; callers validate layouts first.
    pub fn from_segments(segments: &[Position]) -> Self {
        let mut body = Body::new();
        for &p in segments.iter().take(BOARD_CELLS) {
            body.push(p);
        }
        Self { body }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a live snake; present for API completeness
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> &[Position] {
        &self.body
    }

    /// Whether any segment, head and tail included, occupies `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Commit a move: prepend `new_head`, then drop the tail unless growing.
    ///
    /// The caller has already ruled out collisions, so `new_head` is a free cell
    /// and the body is shorter than the board when growing.
    pub(crate) fn advance(&mut self, new_head: Position, grow: bool) {
        if !grow {
            self.body.pop();
        }
        debug_assert!(!self.body.is_full());
        self.body.insert(0, new_head);
    }

    /// Occupancy bitmap indexed by [`Position::index`]
    pub fn occupancy(&self) -> [bool; BOARD_CELLS] {
        let mut occupied = [false; BOARD_CELLS];
        for p in &self.body {
            if let Some(i) = p.index() {
                occupied[i] = true;
            }
        }
        occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INITIAL_SNAKE;

    #[test]
    fn test_initial_snake() {
        let snake = Snake::from_segments(&INITIAL_SNAKE);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(8, 8));
        assert_eq!(snake.tail(), Position::new(6, 8));
    }

    #[test]
    fn test_advance_translates() {
        let mut snake = Snake::from_segments(&INITIAL_SNAKE);
        snake.advance(Position::new(9, 8), false);
        assert_eq!(
            snake.segments(),
            &[Position::new(9, 8), Position::new(8, 8), Position::new(7, 8)]
        );
    }

    #[test]
    fn test_advance_grows() {
        let mut snake = Snake::from_segments(&INITIAL_SNAKE);
        snake.advance(Position::new(9, 8), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(9, 8));
        assert_eq!(snake.tail(), Position::new(6, 8));
    }

    #[test]
    fn test_occupies_includes_head_and_tail() {
        let snake = Snake::from_segments(&INITIAL_SNAKE);
        assert!(snake.occupies(Position::new(8, 8)));
        assert!(snake.occupies(Position::new(6, 8)));
        assert!(!snake.occupies(Position::new(9, 8)));
    }

    #[test]
    fn test_occupancy_bitmap() {
        let snake = Snake::from_segments(&INITIAL_SNAKE);
        let occupied = snake.occupancy();
        assert_eq!(occupied.iter().filter(|&&o| o).count(), 3);
        assert!(occupied[Position::new(7, 8).index().unwrap()]);
    }
}
