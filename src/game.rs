//! Game controller
//!
//! Owns the simulation state, the spawner and the storage adapter. The browser
//! glue drives it from three independent sources (animation frames, the spawn
//! interval and key presses), all on the same thread.

use std::fmt;

use crate::input::{Action, apply_action};
use crate::instructions;
use crate::leaderboard::{self, Leaderboard};
use crate::persistence::KeyValueStore;
use crate::renderer::Scene;
use crate::sim::{GameEvent, GameState, SpawnReport, Spawner, tick};

/// Why a run could not start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    /// No player name (or only whitespace) was given
    MissingName,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::MissingName => write!(f, "a player name is required to play"),
        }
    }
}

impl std::error::Error for StartError {}

/// Result of advancing one frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No run in progress
    Idle,
    /// The run continues
    Running { events: Vec<GameEvent> },
    /// Lives ran out this frame; the score has been recorded
    GameOver {
        score: u64,
        standing: Standing,
        message: String,
        leaderboard: Vec<String>,
    },
}

/// Where a finished run lands relative to the scores stored before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standing {
    /// Beats every stored score
    NewHighScore,
    /// Makes the top entries without beating the best
    Ranked,
    /// Falls off the board
    Unranked,
}

impl Standing {
    pub fn of(board: &Leaderboard, score: u64) -> Self {
        if score > 0 && board.top_score().is_none_or(|best| score > best) {
            Standing::NewHighScore
        } else if board.qualifies(score) {
            Standing::Ranked
        } else {
            Standing::Unranked
        }
    }
}

/// Text of the game-over alert
pub fn game_over_message(score: u64, standing: Standing, best: Option<u64>) -> String {
    match standing {
        Standing::NewHighScore => format!(
            "Game Over! New high score: {} points! Click Start to play again.",
            score
        ),
        Standing::Ranked => format!(
            "Game Over! {} points made the leaderboard. Click Start to play again.",
            score
        ),
        Standing::Unranked => format!(
            "Game Over! You scored {} points (best: {}). Click Start to play again.",
            score,
            best.unwrap_or(score)
        ),
    }
}

/// Game instance holding all state
pub struct Game<S: KeyValueStore> {
    state: GameState,
    spawner: Spawner,
    store: S,
    player_name: Option<String>,
}

impl<S: KeyValueStore> Game<S> {
    pub fn new(store: S, seed: u64) -> Self {
        Self {
            state: GameState::default(),
            spawner: Spawner::new(seed),
            store,
            player_name: None,
        }
    }

    /// Begin a new run for `name`, discarding any previous state
    pub fn start(&mut self, name: &str) -> Result<(), StartError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StartError::MissingName);
        }
        self.state = GameState::new();
        self.player_name = Some(name.to_string());
        log::info!("Game started for {}", name);
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.state.started
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[cfg(test)]
    fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Advance one frame. On game over the score is written to the leaderboard.
    pub fn frame(&mut self) -> FrameOutcome {
        if !self.state.started {
            return FrameOutcome::Idle;
        }

        let events = tick(&mut self.state);
        let game_over = events.iter().find_map(|e| match e {
            GameEvent::GameOver { score } => Some(*score),
            _ => None,
        });

        match game_over {
            Some(score) => {
                let name = self.player_name.as_deref().unwrap_or("Anonymous");
                let standing = Standing::of(&Leaderboard::load(&self.store), score);
                let board = leaderboard::record_score(&mut self.store, name, score);
                log::info!("Game over for {} with {} points ({:?})", name, score, standing);
                FrameOutcome::GameOver {
                    score,
                    standing,
                    message: game_over_message(score, standing, board.top_score()),
                    leaderboard: board.lines(),
                }
            }
            None => FrameOutcome::Running { events },
        }
    }

    /// One spawner interval elapsed
    pub fn spawn_tick(&mut self) -> Option<SpawnReport> {
        self.spawner.tick(&mut self.state)
    }

    /// Apply a `KeyboardEvent.key`. Returns true if the key is bound to an
    /// action and a run is in progress.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match Action::from_key(key) {
            Some(action) if self.state.started => {
                apply_action(&mut self.state, action);
                true
            }
            _ => false,
        }
    }

    /// Draw list for the current state
    pub fn scene(&self) -> Scene {
        Scene::from_state(&self.state)
    }

    pub fn leaderboard_lines(&self) -> Vec<String> {
        leaderboard::render_leaderboard(&self.store)
    }

    pub fn should_show_instructions(&self) -> bool {
        instructions::should_show(&self.store)
    }

    pub fn dismiss_instructions(&mut self) {
        instructions::mark_seen(&mut self.store);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::Monster;

    fn game() -> Game<MemoryStore> {
        Game::new(MemoryStore::new(), 42)
    }

    fn monster_on_player() -> Monster {
        Monster {
            pos: Vec2::new(50.0, 50.0),
            size: 20.0,
            speed: 0.0,
        }
    }

    #[test]
    fn test_start_requires_name() {
        let mut game = game();
        assert_eq!(game.start(""), Err(StartError::MissingName));
        assert_eq!(game.start("   "), Err(StartError::MissingName));
        assert!(!game.is_started());

        game.start(" ann ").unwrap();
        assert!(game.is_started());
        assert_eq!(game.player_name(), Some("ann"));
    }

    #[test]
    fn test_idle_frame_and_spawn() {
        let mut game = game();
        assert_eq!(game.frame(), FrameOutcome::Idle);
        assert!(game.spawn_tick().is_none());
        assert!(!game.handle_key("ArrowUp"));
    }

    #[test]
    fn test_keys_move_player_immediately() {
        let mut game = game();
        game.start("ann").unwrap();
        assert!(game.handle_key("ArrowRight"));
        assert_eq!(game.state().player.pos, Vec2::new(55.0, 50.0));
        assert!(game.handle_key(" "));
        assert_eq!(game.state().projectiles.len(), 1);
        assert!(!game.handle_key("x"));
    }

    #[test]
    fn test_last_life_records_score() {
        let mut game = game();
        game.start("ann").unwrap();
        {
            let state = game.state_mut();
            state.lives = 0.5;
            state.score = 70;
            state.monsters.push(monster_on_player());
        }

        let outcome = game.frame();
        assert_eq!(
            outcome,
            FrameOutcome::GameOver {
                score: 70,
                standing: Standing::NewHighScore,
                message: "Game Over! New high score: 70 points! Click Start to play again."
                    .to_string(),
                leaderboard: vec!["1. ann: 70 points".to_string()],
            }
        );
        assert!(!game.is_started());
        assert_eq!(game.state().lives, 0.0);
        assert_eq!(game.leaderboard_lines(), vec!["1. ann: 70 points".to_string()]);

        // The loop halts: later frames are idle
        assert_eq!(game.frame(), FrameOutcome::Idle);
    }

    #[test]
    fn test_restart_resets_state() {
        let mut game = game();
        game.start("ann").unwrap();
        game.spawn_tick();
        game.handle_key(" ");
        assert_eq!(game.state().score, 10);

        game.start("bob").unwrap();
        let state = game.state();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 5.0);
        assert!(state.monsters.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(game.player_name(), Some("bob"));
    }

    /// Run `name` to a game over with `score` and return the outcome
    fn finish_run(game: &mut Game<MemoryStore>, name: &str, score: u64) -> FrameOutcome {
        game.start(name).unwrap();
        let state = game.state_mut();
        state.lives = 0.5;
        state.score = score;
        state.monsters.push(monster_on_player());
        game.frame()
    }

    fn standing_and_message(outcome: FrameOutcome) -> (Standing, String) {
        match outcome {
            FrameOutcome::GameOver { standing, message, .. } => (standing, message),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_game_over_message_uses_previous_board() {
        let mut game = game();
        for score in [90, 80, 70, 60, 50] {
            finish_run(&mut game, "ann", score);
        }

        let (standing, message) = standing_and_message(finish_run(&mut game, "bob", 100));
        assert_eq!(standing, Standing::NewHighScore);
        assert_eq!(message, "Game Over! New high score: 100 points! Click Start to play again.");

        let (standing, message) = standing_and_message(finish_run(&mut game, "cid", 75));
        assert_eq!(standing, Standing::Ranked);
        assert_eq!(
            message,
            "Game Over! 75 points made the leaderboard. Click Start to play again."
        );

        let (standing, message) = standing_and_message(finish_run(&mut game, "dee", 20));
        assert_eq!(standing, Standing::Unranked);
        assert_eq!(
            message,
            "Game Over! You scored 20 points (best: 100). Click Start to play again."
        );
    }

    #[test]
    fn test_standing_ties_and_zero() {
        let mut board = Leaderboard::new();
        assert_eq!(Standing::of(&board, 0), Standing::Ranked);
        assert_eq!(Standing::of(&board, 10), Standing::NewHighScore);
        board.record("ann", 40);
        // Matching the best is not a new high score
        assert_eq!(Standing::of(&board, 40), Standing::Ranked);
    }

    #[test]
    fn test_scores_accumulate_across_runs() {
        let mut game = game();
        for (name, score) in [("ann", 30), ("bob", 90), ("cid", 50)] {
            finish_run(&mut game, name, score);
        }
        assert_eq!(
            game.leaderboard_lines(),
            vec![
                "1. bob: 90 points".to_string(),
                "2. cid: 50 points".to_string(),
                "3. ann: 30 points".to_string(),
            ]
        );
    }

    #[test]
    fn test_instructions_flag() {
        let mut game = game();
        assert!(game.should_show_instructions());
        game.dismiss_instructions();
        assert!(!game.should_show_instructions());
    }

    #[test]
    fn test_running_frame_reports_events() {
        let mut game = game();
        game.start("ann").unwrap();
        game.state_mut().monsters.push(monster_on_player());
        match game.frame() {
            FrameOutcome::Running { events } => {
                assert_eq!(events, vec![GameEvent::PlayerHit { lives_left: 4.5 }]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(game.scene().len(), 1 + 1 + 3);
    }
}
