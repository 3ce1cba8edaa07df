//! Key mapping from terminal events to game actions.

use crate::types::{Direction, GameAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
///
/// Keys with no meaning in the game map to `None` and are ignored.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => {
            Some(GameAction::Steer(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => {
            Some(GameAction::Steer(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => {
            Some(GameAction::Steer(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => {
            Some(GameAction::Steer(Direction::Right))
        }

        // New game
        KeyCode::Char('r' | 'R' | 'n' | 'N') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
