//! Keyboard input
//!
//! Key presses are applied immediately, not buffered until the next frame.

use glam::Vec2;

use crate::sim::GameState;

/// Movement directions (screen coordinates, up is -y)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step for this direction
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// A player action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Shoot,
}

impl Action {
    /// Map a `KeyboardEvent.key` value to an action
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Action::Move(Direction::Up)),
            "ArrowDown" => Some(Action::Move(Direction::Down)),
            "ArrowLeft" => Some(Action::Move(Direction::Left)),
            "ArrowRight" => Some(Action::Move(Direction::Right)),
            " " => Some(Action::Shoot),
            _ => None,
        }
    }
}

/// Apply an action to the state. Ignored while no run is in progress.
pub fn apply_action(state: &mut GameState, action: Action) {
    if !state.started {
        return;
    }
    match action {
        Action::Move(dir) => {
            state.player.pos += dir.unit() * state.player.speed;
        }
        Action::Shoot => state.shoot(),
    }
}
