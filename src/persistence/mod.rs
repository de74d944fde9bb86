//! Key-value persistence backends
//!
//! - `MemoryStore`: in-process, for tests and throwaway runs
//! - `JsonFileStore`: a flat JSON object on disk (native)
//! - `LocalStorage`: browser LocalStorage (wasm)
//!
//! Stores never fail loudly. A broken backend logs and behaves as empty,
//! the same way a browser without LocalStorage does.

use std::collections::BTreeMap;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// JSON object file, rewritten on every `set`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
    entries: BTreeMap<String, String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    /// Open `path`, starting empty if it is missing or unreadable
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(_) => {
                log::info!("No store at {}, starting fresh", path.display());
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        let written = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("LocalStorage rejected write to {}", key);
                }
            }
            None => log::warn!("LocalStorage unavailable, {} not saved", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        store.set("a", "1");
        store.set("a", "2");
        assert_eq!(store.get("a").as_deref(), Some("2"));
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "catch_falling_store_{}_{}.json",
            std::process::id(),
            line!()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.get("best"), None);
        store.set("best", "120");

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get("best").as_deref(), Some("120"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_store_corrupt_is_empty() {
        let path = std::env::temp_dir().join(format!(
            "catch_falling_store_{}_{}.json",
            std::process::id(),
            line!()
        ));
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert_eq!(store.get("best"), None);

        let _ = std::fs::remove_file(&path);
    }
}
