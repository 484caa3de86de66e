//! Timer-driven monster spawner
//!
//! Called once per spawn interval (1 s of wall clock, independent of the
//! frame loop). Every tick adds a monster and a flat score bonus, then turns
//! any score milestones into level-ups. There is no cap on live monsters.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, Monster};
use crate::consts::*;

/// What a single spawn tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnReport {
    pub score: u64,
    pub levels_gained: u32,
}

/// Seeded monster generator
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Roll a new monster anywhere on the canvas
    pub fn roll_monster(&mut self) -> Monster {
        Monster {
            pos: Vec2::new(
                self.rng.random_range(0.0..CANVAS_WIDTH),
                self.rng.random_range(0.0..CANVAS_HEIGHT),
            ),
            size: self.rng.random_range(MONSTER_MIN_SIZE..MONSTER_MAX_SIZE),
            speed: self.rng.random_range(MONSTER_MIN_SPEED..MONSTER_MAX_SPEED),
        }
    }

    /// Run one spawn tick. Does nothing while the game is not started.
    pub fn tick(&mut self, state: &mut GameState) -> Option<SpawnReport> {
        if !state.started {
            return None;
        }

        let monster = self.roll_monster();
        state.monsters.push(monster);
        state.score += SPAWN_POINTS;

        let levels_gained = state.apply_level_ups();
        if levels_gained > 0 {
            log::info!(
                "Level {} reached (score {}, speed {:.1})",
                state.level,
                state.score,
                state.player.speed
            );
        }

        Some(SpawnReport {
            score: state.score,
            levels_gained,
        })
    }
}
