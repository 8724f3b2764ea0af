//! High score persistence
//!
//! The session only ever raises the stored value, once per session end.
//! Persisted to LocalStorage on the web, kept in memory elsewhere.

use serde::{Deserialize, Serialize};

use crate::tuning::GameVariant;

/// Where the best score lives between sessions
pub trait HighScoreStore {
    fn high_score(&self) -> u64;
    fn set_high_score(&mut self, score: u64);
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryHighScores {
    best: u64,
    /// Number of times the setter has been called
    #[serde(skip)]
    writes: u32,
}

impl MemoryHighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously stored score
    pub fn with_score(best: u64) -> Self {
        Self { best, writes: 0 }
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl HighScoreStore for MemoryHighScores {
    fn high_score(&self) -> u64 {
        self.best
    }

    fn set_high_score(&mut self, score: u64) {
        self.best = score;
        self.writes += 1;
    }
}

/// Stored record for one game
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// LocalStorage-backed store, one key per game (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageHighScores {
    key: String,
    entry: HighScoreEntry,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageHighScores {
    /// Load the stored record for a game, starting fresh if none or unreadable
    pub fn load(variant: GameVariant) -> Self {
        let key = storage_key(variant);
        let entry = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(&key).ok().flatten())
            .and_then(|json| serde_json::from_str::<HighScoreEntry>(&json).ok());

        match entry {
            Some(entry) => {
                log::info!("Loaded high score {} for {}", entry.score, variant.as_str());
                Self { key, entry }
            }
            None => {
                log::info!("No high score found for {}, starting fresh", variant.as_str());
                Self {
                    key,
                    entry: HighScoreEntry::default(),
                }
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageHighScores {
    fn high_score(&self) -> u64 {
        self.entry.score
    }

    fn set_high_score(&mut self, score: u64) {
        self.entry = HighScoreEntry {
            score,
            timestamp: js_sys::Date::now(),
        };

        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(&self.entry) {
                if storage.set_item(&self.key, &json).is_err() {
                    log::warn!("Failed to write high score to LocalStorage");
                } else {
                    log::info!("High score saved ({})", score);
                }
            }
        }
    }
}

/// LocalStorage key for a game's high score
pub fn storage_key(variant: GameVariant) -> String {
    format!("voice_arcade_{}_highscore", variant.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryHighScores::with_score(40);
        assert_eq!(store.high_score(), 40);
        store.set_high_score(55);
        assert_eq!(store.high_score(), 55);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_storage_keys_are_per_game() {
        assert_eq!(storage_key(GameVariant::Bird), "voice_arcade_bird_highscore");
        assert_ne!(storage_key(GameVariant::Car), storage_key(GameVariant::Spaceship));
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = HighScoreEntry {
            score: 120,
            timestamp: 0.0,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"score":120,"timestamp":0.0}"#);
        let back: HighScoreEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 120);
    }
}
