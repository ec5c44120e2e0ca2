//! Best score
//!
//! Persisted to LocalStorage as a bare number.

use serde::{Deserialize, Serialize};

use crate::platform::storage;

/// The best score achieved on this device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "highScore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Check if a score beats the current best
    pub fn is_beaten_by(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.is_beaten_by(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load the best score, 0 if nothing is stored
    pub fn load() -> Self {
        match storage::load_json::<HighScore>(Self::STORAGE_KEY) {
            Some(score) => {
                log::info!("Loaded high score {}", score.best);
                score
            }
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
        log::info!("High score saved ({})", self.best);
    }
}
