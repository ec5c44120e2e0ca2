//! Tiger Run - an endless runner with a tiger on your heels
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, spawning, tiger AI, game state)
//! - `platform`: Browser/native platform abstraction (storage, clock)
//! - `highscore`: Persisted best score
//! - `settings`: Player preferences

pub mod highscore;
pub mod platform;
pub mod settings;
pub mod sim;

pub use highscore::HighScore;
pub use settings::Settings;

/// Game configuration constants
///
/// Units are pixels and frames; the simulation advances one step per
/// display refresh.
pub mod consts {
    /// Downward acceleration applied every step
    pub const GRAVITY: f32 = 0.5;
    /// Initial vertical velocity of a jump (negative is up)
    pub const JUMP_FORCE: f32 = -12.0;

    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const TIGER_WIDTH: f32 = 40.0;
    pub const TIGER_HEIGHT: f32 = 30.0;
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_HEIGHT: f32 = 30.0;

    /// Thickness of the ground strip, centered on the floor line
    pub const GROUND_HEIGHT: f32 = 50.0;
    /// Base scroll speed (pixels per step)
    pub const BASE_SPEED: f32 = 3.0;
    /// Extra scroll speed per full `SPEED_SCORE_STEP` points
    pub const SPEED_INCREMENT: f32 = 0.5;
    pub const SPEED_SCORE_STEP: u64 = 1000;

    /// Minimum time between spawns (ms)
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Random extra delay added on top of the interval, drawn in [0, jitter)
    pub const SPAWN_JITTER_MS: f64 = 1000.0;

    /// How far behind the player the tiger starts
    pub const TIGER_START_GAP: f32 = 150.0;
}

/// Floor line for a viewport of the given height
///
/// The ground strip is centered vertically; the floor is its lower edge.
#[inline]
pub fn floor_line(viewport_height: f32) -> f32 {
    viewport_height / 2.0 + consts::GROUND_HEIGHT / 2.0
}

/// Scroll speed for a given score (step function, +0.5 per 1000 points)
#[inline]
pub fn speed_for_score(score: u64) -> f32 {
    consts::BASE_SPEED + (score / consts::SPEED_SCORE_STEP) as f32 * consts::SPEED_INCREMENT
}
