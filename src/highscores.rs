//! Best score across runs
//!
//! Persisted to LocalStorage as a plain decimal integer.

use serde::{Deserialize, Serialize};

/// The all-time best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dogRPGHighScore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Parse a stored value; anything unreadable counts as no high score
    pub fn parse(raw: &str) -> Self {
        Self {
            best: raw.trim().parse().unwrap_or(0),
        }
    }

    /// Value as written to storage
    pub fn to_storage_string(&self) -> String {
        self.best.to_string()
    }

    /// Record a score. Returns `true` if it beats the stored best.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                let score = Self::parse(&raw);
                log::info!("Loaded high score {}", score.best);
                return score;
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage {
            Some(storage) => {
                if storage
                    .set_item(Self::STORAGE_KEY, &self.to_storage_string())
                    .is_err()
                {
                    log::warn!("Could not persist high score {}", self.best);
                }
            }
            None => log::warn!("LocalStorage unavailable, high score kept in memory"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(HighScore::parse("1250").best, 1250);
        assert_eq!(HighScore::parse(" 42\n").best, 42);
        assert_eq!(HighScore::parse("").best, 0);
        assert_eq!(HighScore::parse("NaN").best, 0);
        assert_eq!(HighScore::parse("-5").best, 0);
    }

    #[test]
    fn test_record_only_improves() {
        let mut hs = HighScore::new(100);
        assert!(!hs.record(50));
        assert!(!hs.record(100));
        assert!(hs.record(101));
        assert_eq!(hs.best, 101);
        assert_eq!(hs.to_storage_string(), "101");
    }
}
