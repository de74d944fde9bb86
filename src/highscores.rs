//! Best score, persisted as a single integer

use crate::persistence::KeyValueStore;

/// Best score so far, backed by a key-value store
pub struct HighScore {
    best: i64,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "catch_falling_high_score";

    /// Read the stored best, treating a missing or garbled value as 0
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let best = match store.get(Self::STORAGE_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable high score {:?}", raw);
                0
            }),
            None => 0,
        };
        log::info!("High score: {}", best);
        Self { best, store }
    }

    pub fn best(&self) -> i64 {
        self.best
    }

    /// Record a finished round's score. Writes through only when it beats
    /// the best; returns whether it did.
    pub fn commit(&mut self, score: i64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.store.set(Self::STORAGE_KEY, &score.to_string());
        log::info!("New high score saved: {}", score);
        true
    }
}
