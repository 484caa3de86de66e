//! Candy Blaster - a small Canvas 2D arcade shooter
//!
//! Core modules:
//! - `sim`: Pure simulation (entities, collisions, spawner, frame tick)
//! - `input`: Keyboard-to-action mapping
//! - `renderer`: Scene building and Canvas 2D drawing
//! - `persistence`: Key-value storage adapters (LocalStorage on web)
//! - `leaderboard`: Top-5 high score list
//! - `game`: Controller owning the state and its start/restart lifecycle
//! - `host`: Static file host for the built game (native only)

pub mod game;
#[cfg(not(target_arch = "wasm32"))]
pub mod host;
pub mod input;
pub mod instructions;
pub mod leaderboard;
pub mod persistence;
pub mod renderer;
pub mod sim;

pub use game::{FrameOutcome, Game, Standing, StartError, game_over_message};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use persistence::{KeyValueStore, MemoryStore};

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions (logical units)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 50.0;
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_START_SPEED: f32 = 5.0;
    /// Speed gained on every level-up
    pub const PLAYER_SPEED_BOOST: f32 = 0.5;

    /// Starting lives and the cost of one monster hit
    pub const START_LIVES: f32 = 5.0;
    pub const LIFE_LOSS_PER_HIT: f32 = 0.5;

    /// Monster size/speed ranges (upper bound exclusive)
    pub const MONSTER_MIN_SIZE: f32 = 20.0;
    pub const MONSTER_MAX_SIZE: f32 = 50.0;
    pub const MONSTER_MIN_SPEED: f32 = 1.0;
    pub const MONSTER_MAX_SPEED: f32 = 3.0;
    /// Fraction of the remaining distance covered per frame, per unit of speed
    pub const MONSTER_CHASE_FACTOR: f32 = 0.01;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 5.0;
    pub const PROJECTILE_SPEED: f32 = 7.0;

    /// Scoring
    pub const SPAWN_POINTS: u64 = 10;
    pub const KILL_POINTS: u64 = 10;
    pub const POINTS_PER_LEVEL: u64 = 50;

    /// Spawner interval (wall clock)
    pub const SPAWN_INTERVAL_MS: i32 = 1000;
}
