//! Key-value persistence adapters
//!
//! Gameplay code only sees the `KeyValueStore` trait:
//! - `LocalStorage`: the browser's `window.localStorage` (wasm only)
//! - `MemoryStore`: in-process map, used natively and in tests
//!
//! Read failures are indistinguishable from "no data yet". Write failures are
//! logged and dropped.

use std::collections::HashMap;

/// A string-to-string storage slot map
pub trait KeyValueStore {
    /// Read a slot; `None` if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Write a slot
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of written slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_string(), value.to_string());
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;

    /// `window.localStorage`. Missing storage (private mode, disabled
    /// cookies) behaves like an empty store that ignores writes.
    #[derive(Debug, Clone)]
    pub struct LocalStorage {
        storage: Option<web_sys::Storage>,
    }

    impl LocalStorage {
        pub fn open() -> Self {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten();
            if storage.is_none() {
                log::warn!("LocalStorage unavailable, nothing will be persisted");
            }
            Self { storage }
        }
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.storage.as_ref()?.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) {
            if let Some(storage) = &self.storage {
                if storage.set_item(key, value).is_err() {
                    log::warn!("Failed to write LocalStorage slot '{}'", key);
                }
            }
        }
    }
}
