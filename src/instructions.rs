//! First-visit instructions flag
//!
//! Stored in its own slot, separate from the leaderboard.

use crate::persistence::KeyValueStore;

/// Storage slot for the "instructions seen" flag
pub const STORAGE_KEY: &str = "instructionsSeen";

/// Whether the instructions box should be shown
pub fn should_show(store: &impl KeyValueStore) -> bool {
    store.get(STORAGE_KEY).is_none_or(|v| v.is_empty())
}

/// Remember that the player dismissed the instructions
pub fn mark_seen(store: &mut impl KeyValueStore) {
    store.set(STORAGE_KEY, "true");
    log::debug!("Instructions marked as seen");
}
