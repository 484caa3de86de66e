//! Draw command lists

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::sim::{Bounded, GameState, Square};

/// Font used for the HUD overlay
pub const HUD_FONT: &str = "20px Arial";

/// CSS colors for game elements
pub mod colors {
    pub const PLAYER: &str = "blue";
    pub const PROJECTILE: &str = "yellow";
    pub const MONSTER: &str = "red";
    pub const HUD_TEXT: &str = "white";
    /// Used while the background image is still loading
    pub const BACKGROUND: &str = "#f7c6e0";
}

/// A single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Background image stretched over the whole canvas
    Background { width: f32, height: f32 },
    /// Filled square
    Rect { square: Square, color: &'static str },
    /// HUD text (baseline position)
    Text {
        text: String,
        x: f32,
        y: f32,
        color: &'static str,
    },
}

/// Everything to draw for one frame, back to front
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Build the frame: background, player, projectiles, monsters, HUD
    pub fn from_state(state: &GameState) -> Self {
        let mut commands = Vec::with_capacity(4 + state.projectiles.len() + state.monsters.len());

        commands.push(DrawCommand::Background {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        });
        commands.push(DrawCommand::Rect {
            square: state.player.bounds(),
            color: colors::PLAYER,
        });
        commands.extend(state.projectiles.iter().map(|p| DrawCommand::Rect {
            square: p.bounds(),
            color: colors::PROJECTILE,
        }));
        commands.extend(state.monsters.iter().map(|m| DrawCommand::Rect {
            square: m.bounds(),
            color: colors::MONSTER,
        }));
        commands.extend(
            hud_lines(state)
                .into_iter()
                .zip([20.0, 50.0, 80.0])
                .map(|(text, y)| DrawCommand::Text {
                    text,
                    x: 10.0,
                    y,
                    color: colors::HUD_TEXT,
                }),
        );

        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Lives, level and score overlay text
pub fn hud_lines(state: &GameState) -> [String; 3] {
    [
        format!("Lives: {}", state.display_lives()),
        format!("Level: {}", state.level),
        format!("Score: {}", state.score),
    ]
}
