//! Simulation module
//!
//! All gameplay rules live here. This module must stay pure:
//! - No rendering, DOM or storage access
//! - Randomness only through the seeded spawner
//! - Removal of dead entities happens once per step, never mid-iteration

pub mod collision;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Bounded, Square, is_colliding};
pub use spawner::{SpawnReport, Spawner};
pub use state::{GameEvent, GameState, Monster, Player, Projectile};
pub use tick::tick;
