//! High score leaderboard
//!
//! Persisted as a JSON array of `{ name, score }` in a single storage slot,
//! keeps the top 5 scores in descending order.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 5;

/// Storage slot holding the serialized leaderboard
pub const STORAGE_KEY: &str = "leaderboard";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

/// Top scores, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Load from storage. An absent or unreadable slot is an empty leaderboard.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let Some(json) = store.get(STORAGE_KEY) else {
            return Self::new();
        };
        match serde_json::from_str::<Leaderboard>(&json) {
            Ok(board) => board,
            Err(e) => {
                log::warn!("Ignoring unreadable leaderboard: {}", e);
                Self::new()
            }
        }
    }

    /// Write to storage
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(STORAGE_KEY, &json);
                log::info!("Leaderboard saved ({} entries)", self.entries.len());
            }
            Err(e) => log::warn!("Failed to serialize leaderboard: {}", e),
        }
    }

    /// Add a score, re-sort and keep the top entries.
    /// Equal scores keep their insertion order.
    pub fn record(&mut self, name: &str, score: u64) {
        self.entries.push(LeaderboardEntry {
            name: name.to_string(),
            score,
        });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    /// Check if a score would make it onto the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display lines, ranked from 1
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| format!("{}. {}: {} points", i + 1, e.name, e.score))
            .collect()
    }
}

/// Load, add the score, save. Returns the updated leaderboard.
pub fn record_score(store: &mut impl KeyValueStore, name: &str, score: u64) -> Leaderboard {
    let mut board = Leaderboard::load(&*store);
    board.record(name, score);
    board.save(store);
    board
}

/// Read the persisted leaderboard as display lines
pub fn render_leaderboard(store: &impl KeyValueStore) -> Vec<String> {
    Leaderboard::load(store).lines()
}
