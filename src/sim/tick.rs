//! Per-frame simulation step
//!
//! Advances projectiles and monsters, then resolves collisions with
//! mark-and-compact: hits are recorded against a stable view of both
//! collections and dead entities are dropped once at the end of the pass.

use super::collision::is_colliding;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Advance the game state by one frame
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.started {
        return events;
    }

    // Projectiles fly up and vanish past the top edge
    for projectile in &mut state.projectiles {
        projectile.advance();
    }
    state.projectiles.retain(|p| !p.is_off_screen());

    // Monsters close in on the player
    let target = state.player.pos;
    for monster in &mut state.monsters {
        monster.chase(target);
    }

    // Projectile vs monster: each projectile can take out at most one monster
    let mut monster_dead = vec![false; state.monsters.len()];
    let mut projectile_spent = vec![false; state.projectiles.len()];
    for (mi, monster) in state.monsters.iter().enumerate() {
        let hit = state
            .projectiles
            .iter()
            .enumerate()
            .find(|(pi, p)| !projectile_spent[*pi] && is_colliding(*p, monster))
            .map(|(pi, _)| pi);
        if let Some(pi) = hit {
            projectile_spent[pi] = true;
            monster_dead[mi] = true;
            state.score += KILL_POINTS;
            events.push(GameEvent::MonsterShot {
                points: KILL_POINTS,
            });
        }
    }

    // Player vs surviving monsters
    for (mi, monster) in state.monsters.iter().enumerate() {
        if !monster_dead[mi] && is_colliding(&state.player, monster) {
            monster_dead[mi] = true;
            state.lives -= LIFE_LOSS_PER_HIT;
            events.push(GameEvent::PlayerHit {
                lives_left: state.lives.max(0.0),
            });
        }
    }

    compact(&mut state.monsters, &monster_dead);
    compact(&mut state.projectiles, &projectile_spent);

    if state.lives <= 0.0 {
        state.lives = 0.0;
        state.started = false;
        events.push(GameEvent::GameOver { score: state.score });
    }

    events
}

/// Drop every item whose flag is set, keeping order
fn compact<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut flags = dead.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}
