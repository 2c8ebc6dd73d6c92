//! Save/load persistence over a local key-value store.
//!
//! LocalStorage backs the wasm build; native builds and tests use the
//! in-memory store. The `KeyValueStore` trait keeps the core free of any
//! browser dependency.

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use crate::error::GameError;
use crate::error::GameResult;

/// Minimal key-value storage capability the core persists through.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> GameResult<Option<String>>;
    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> GameResult<()>;
}

/// In-memory store for native builds and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key before handing the store to a loader (test helper).
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only).
///
/// Storage can be absent (disabled by the user) or refuse writes (quota);
/// both surface as `Persistence` errors for the session to toast about.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> GameResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| GameError::Persistence("LocalStorage unavailable".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| GameError::Persistence(format!("failed to read key {key}")))
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| GameError::Persistence(format!("failed to write key {key}")))
    }
}
