//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One step per display frame, fixed order
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod intensity;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod tiger;

pub use collision::{Bounds, Rect, overlaps};
pub use intensity::{Intensity, ShakeRequest};
pub use physics::{Resolution, update_player};
pub use spawn::{SpawnWave, UniformSource, roll_wave, update_spawner};
pub use state::{
    AiMode, DeathCause, Footing, GameEvent, GamePhase, Hazard, HazardKind, Obstacle, ObstacleId,
    ObstacleKind, Player, Tiger, TigerState, World,
};
pub use tick::{TickInput, game_over, request_jump, restart, scroll_world, tick};
pub use tiger::{TigerAction, update_tiger};
