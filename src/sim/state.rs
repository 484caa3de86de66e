//! Game state and core simulation types
//!
//! Entities are plain data. All mutation goes through `tick`, the spawner and
//! the input module.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Bounded, Square};
use crate::consts::*;

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    /// Distance moved per key press
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            size: PLAYER_SIZE,
            speed: PLAYER_START_SPEED,
        }
    }
}

impl Player {
    /// Spawn point for a projectile: top edge, horizontally centered
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size / 2.0, self.pos.y)
    }
}

/// A monster chasing the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec2,
    pub size: f32,
    /// Chase rate multiplier
    pub speed: f32,
}

impl Monster {
    /// Move a fraction of the remaining distance toward `target`
    pub fn chase(&mut self, target: Vec2) {
        self.pos += (target - self.pos) * self.speed * MONSTER_CHASE_FACTOR;
    }
}

/// A projectile flying straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Projectile {
    pub fn fired_from(player: &Player) -> Self {
        Self {
            pos: player.muzzle(),
            size: PROJECTILE_SIZE,
            speed: PROJECTILE_SPEED,
        }
    }

    /// Move up by one frame's worth of speed
    pub fn advance(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Whether the projectile has left the top of the canvas
    pub fn is_off_screen(&self) -> bool {
        self.pos.y < 0.0
    }
}

impl Bounded for Player {
    fn bounds(&self) -> Square {
        Square {
            pos: self.pos,
            size: self.size,
        }
    }
}

impl Bounded for Monster {
    fn bounds(&self) -> Square {
        Square {
            pos: self.pos,
            size: self.size,
        }
    }
}

impl Bounded for Projectile {
    fn bounds(&self) -> Square {
        Square {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Something that happened during a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile destroyed a monster
    MonsterShot { points: u64 },
    /// A monster reached the player
    PlayerHit { lives_left: f32 },
    /// Lives ran out; the run is over
    GameOver { score: u64 },
}

/// Complete game state for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub projectiles: Vec<Projectile>,
    pub score: u64,
    pub level: u32,
    pub lives: f32,
    /// True while a run is in progress
    pub started: bool,
    /// Number of score milestones already turned into level-ups
    pub levels_awarded: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            player: Player::default(),
            monsters: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            level: 1,
            lives: START_LIVES,
            started: false,
            levels_awarded: 0,
        }
    }
}

impl GameState {
    /// Fresh state for a new run (already started)
    pub fn new() -> Self {
        Self {
            started: true,
            ..Self::default()
        }
    }

    /// Fire a projectile from the player's current position
    pub fn shoot(&mut self) {
        self.projectiles.push(Projectile::fired_from(&self.player));
    }

    /// Lives as shown on the HUD
    pub fn display_lives(&self) -> f32 {
        self.lives.max(0.0)
    }

    /// Turn every score milestone passed since the last level-up into a level.
    /// Returns the number of levels gained.
    pub fn apply_level_ups(&mut self) -> u32 {
        let milestones = self.score / POINTS_PER_LEVEL;
        let mut gained = 0;
        while self.levels_awarded < milestones {
            self.levels_awarded += 1;
            self.level += 1;
            self.player.speed += PLAYER_SPEED_BOOST;
            gained += 1;
        }
        gained
    }
}
