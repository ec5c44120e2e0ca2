//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform::storage;
use crate::sim::ShakeRequest;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake driven by the music
    pub screen_shake: bool,
    /// Color-cycling background driven by the music
    pub reactive_background: bool,

    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Pause music while the tab is hidden
    pub mute_when_hidden: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            reactive_background: true,
            music_volume: 0.5,
            mute_when_hidden: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tiger_run_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Filter a shake request through the player's preferences
    pub fn filter_shake(&self, shake: ShakeRequest) -> Option<ShakeRequest> {
        self.effective_screen_shake().then_some(shake)
    }

    /// Set music volume, clamped to 0.0 - 1.0
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
    }

    /// Apply a change made by the player and persist it
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) {
        change(self);
        self.save();
    }

    /// Gain the page should apply to the music element
    pub fn music_gain(&self, tab_hidden: bool) -> f32 {
        if tab_hidden && self.mute_when_hidden {
            0.0
        } else {
            self.music_volume
        }
    }

    /// Load settings from storage, defaults if missing or unreadable
    pub fn load() -> Self {
        match storage::load_json::<Settings>(Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from storage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        storage::save_json(Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }
}
