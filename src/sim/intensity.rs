//! Background intensity driven by the music volume
//!
//! The audio analyser (outside the simulation) reports an average frequency
//! magnitude in 0..=255. Louder music means a hotter background and a harder
//! screen shake.

use serde::{Deserialize, Serialize};

/// Background tier, coolest to hottest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Calm,
    Warm,
    Hot,
    Blazing,
    Inferno,
}

/// Shake the presentation layer should apply this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShakeRequest {
    /// Relative shake strength
    pub speed: f32,
    /// How long the shake lasts (ms)
    pub duration_ms: u32,
}

impl ShakeRequest {
    /// Shake strength is clamped into this range before use
    pub const MIN_SPEED: f32 = 0.1;
    pub const MAX_SPEED: f32 = 5.0;

    fn clamped_speed(&self) -> f32 {
        self.speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED)
    }

    /// Peak displacement in pixels
    pub fn amplitude_px(&self) -> u32 {
        (self.clamped_speed() * 5.0).floor() as u32
    }

    /// Length of one shake cycle in seconds
    pub fn period_secs(&self) -> f32 {
        0.6 / self.clamped_speed()
    }
}

impl Intensity {
    /// Bucket a volume level into a tier
    pub fn from_volume(volume: f32) -> Self {
        if volume < 50.0 {
            Intensity::Calm
        } else if volume < 100.0 {
            Intensity::Warm
        } else if volume < 140.0 {
            Intensity::Hot
        } else if volume < 160.0 {
            Intensity::Blazing
        } else {
            Intensity::Inferno
        }
    }

    /// CSS color for the sky and underground fill
    pub fn background_color(&self) -> &'static str {
        match self {
            Intensity::Calm => "#6495ED",
            Intensity::Warm => "#FF4D00",
            Intensity::Hot => "#FFA500",
            Intensity::Blazing => "#B22222",
            Intensity::Inferno => "#380000",
        }
    }

    pub fn shake(&self) -> ShakeRequest {
        let speed = match self {
            Intensity::Calm => 0.2,
            Intensity::Warm => 0.5,
            Intensity::Hot => 0.7,
            Intensity::Blazing => 1.0,
            Intensity::Inferno => 1.5,
        };
        ShakeRequest {
            speed,
            duration_ms: 2,
        }
    }
}
