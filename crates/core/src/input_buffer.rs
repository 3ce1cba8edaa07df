//! Pending-direction buffer between input events and engine ticks.
//!
//! Input events only overwrite the pending direction; the next tick reads it.
//! Last write wins, there is no queue.

use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionBuffer {
    pending: Direction,
}

impl DirectionBuffer {
    pub fn new(initial: Direction) -> Self {
        Self { pending: initial }
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }

    /// Buffer `dir` unless it reverses the pending direction.
    ///
    /// Returns whether the direction was accepted.
    pub fn submit(&mut self, dir: Direction) -> bool {
        if dir.is_opposite(self.pending) {
            return false;
        }
        self.pending = dir;
        true
    }

    pub(crate) fn reset(&mut self, dir: Direction) {
        self.pending = dir;
    }
}
