//! Game state and core simulation types
//!
//! The `World` owns every entity. Cross-entity links (player standing on a
//! box, hazard hanging off a box) are stored as obstacle ids, never as
//! references, so culling can't leave anything dangling.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use super::intensity::Intensity;
use crate::consts::*;
use crate::{floor_line, speed_for_score};

/// Stable handle to an obstacle in `World::obstacles`
pub type ObstacleId = u32;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Simulation advancing every frame
    Running,
    /// Player was caught; waiting for restart
    GameOver,
}

/// What the player is standing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Footing {
    Airborne,
    Floor,
    /// Standing on top of a box obstacle
    Platform(ObstacleId),
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    /// Set by a jump, cleared on landing
    pub jumping: bool,
    pub footing: Footing,
    /// Suppresses every fatal collision while set
    pub invincible: bool,
    /// Frames of invincibility remaining
    pub invincible_timer: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel_y: 0.0,
            jumping: false,
            footing: Footing::Floor,
            invincible: false,
            invincible_timer: 0,
        }
    }
}

impl Player {
    /// Put the player on the floor at the horizontal center of the viewport
    pub fn reset(&mut self, viewport_width: f32, floor_y: f32) {
        self.pos = Vec2::new(viewport_width / 2.0 - self.size.x / 2.0, floor_y - self.size.y);
        self.vel_y = 0.0;
        self.jumping = false;
        self.footing = Footing::Floor;
        self.invincible = false;
        self.invincible_timer = 0;
    }

    pub fn is_on_ground(&self) -> bool {
        !matches!(self.footing, Footing::Airborne)
    }

    pub fn current_platform(&self) -> Option<ObstacleId> {
        match self.footing {
            Footing::Platform(id) => Some(id),
            _ => None,
        }
    }

    /// Launch upward. Caller checks that a jump is allowed.
    pub fn jump(&mut self) {
        self.vel_y = JUMP_FORCE;
        self.jumping = true;
        self.footing = Footing::Airborne;
    }

    /// Count down invincibility by one frame
    pub fn tick_invincibility(&mut self) {
        if self.invincible {
            self.invincible_timer = self.invincible_timer.saturating_sub(1);
            if self.invincible_timer == 0 {
                self.invincible = false;
            }
        }
    }
}

impl Bounds for Player {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Tiger behavior mode. Only chasing exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiMode {
    #[default]
    Chasing,
}

/// Observable behavior state, derived from the tiger's counters and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TigerState {
    /// On the floor and free to act
    Grounded,
    /// In the air with no cooldown pending
    Airborne,
    /// Recovering from a jump; no movement until it expires
    CoolingDown { frames: u32 },
}

/// The chasing adversary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tiger {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub on_ground: bool,
    /// Frames until the tiger may act again
    pub jump_cooldown: u32,
    /// Prevents jumping the same obstacle twice before touching down
    pub has_jumped_current_obstacle: bool,
    pub mode: AiMode,
}

impl Default for Tiger {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(TIGER_WIDTH, TIGER_HEIGHT),
            vel_y: 0.0,
            on_ground: true,
            jump_cooldown: 0,
            has_jumped_current_obstacle: false,
            mode: AiMode::Chasing,
        }
    }
}

impl Tiger {
    /// Put the tiger on the floor a fixed gap behind the player
    pub fn reset(&mut self, player_x: f32, floor_y: f32) {
        self.pos = Vec2::new(player_x - TIGER_START_GAP, floor_y - self.size.y);
        self.vel_y = 0.0;
        self.on_ground = true;
        self.jump_cooldown = 0;
        self.has_jumped_current_obstacle = false;
        self.mode = AiMode::Chasing;
    }

    pub fn state(&self) -> TigerState {
        if self.jump_cooldown > 0 {
            TigerState::CoolingDown {
                frames: self.jump_cooldown,
            }
        } else if !self.on_ground {
            TigerState::Airborne
        } else {
            TigerState::Grounded
        }
    }
}

impl Bounds for Tiger {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Deadly on any contact
    Fire,
    /// Low strip just above the floor, deadly on contact
    Hole,
    /// Wide crate; can be landed on from above
    Box,
}

/// A scrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Part of a multi-piece cluster (fire row)
    pub grouped: bool,
}

impl Bounds for Obstacle {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// Hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Box,
}

/// A scrolling hazard; always lethal, never landable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Box this hazard was spawned with (may already be culled)
    pub parent: Option<ObstacleId>,
}

impl Bounds for Hazard {
    fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// The tiger caught up
    Tiger,
    /// Ran into an obstacle (or hit a box from the side or below)
    Obstacle(ObstacleKind),
    Hazard,
    /// Dropped below the bottom of the screen
    FellOffScreen,
}

/// Events published by the simulation for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score after this step
    Score(u64),
    GameOver {
        score: u64,
        new_high_score: bool,
        cause: DeathCause,
    },
}

/// Complete world state
#[derive(Debug, Clone)]
pub struct World {
    /// Visible area (width, height)
    pub viewport: Vec2,
    /// Ground level; entities rest with their bottom edge here
    pub floor_y: f32,
    pub player: Player,
    pub tiger: Tiger,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active hazards in spawn order
    pub hazards: Vec<Hazard>,
    pub score: u64,
    /// Best score known to this world (loaded from storage by the caller)
    pub high_score: u64,
    /// Current scroll speed (pixels per step)
    pub speed: f32,
    pub phase: GamePhase,
    /// Steps are skipped while set (tab hidden)
    pub paused: bool,
    /// Clock reading (ms) of the last spawn
    pub last_spawn_ms: f64,
    /// Latest music volume level from the audio analyser
    pub volume_level: f32,
    pub rng: Pcg32,
    /// Events not yet drained by the frontend
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Create a running world for a viewport of the given size
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let floor_y = floor_line(height);
        let mut world = Self {
            viewport: Vec2::new(width, height),
            floor_y,
            player: Player::default(),
            tiger: Tiger::default(),
            obstacles: Vec::new(),
            hazards: Vec::new(),
            score: 0,
            high_score: 0,
            speed: speed_for_score(0),
            phase: GamePhase::Running,
            paused: false,
            // First step after startup spawns right away
            last_spawn_ms: 0.0,
            volume_level: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };
        world.reset_positions();
        world
    }

    /// Builder-style high score injection (value loaded from storage)
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Re-place player and tiger on the floor, in place
    pub fn reset_positions(&mut self) {
        self.player.reset(self.viewport.x, self.floor_y);
        self.tiger.reset(self.player.pos.x, self.floor_y);
    }

    /// Adapt to a new viewport size. Entities are put back at their start
    /// positions; obstacles keep scrolling where they are.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
        self.floor_y = floor_line(height);
        self.reset_positions();
    }

    /// Stop stepping (tab hidden). Entity state is untouched.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Make the player immune to fatal hits for `frames` steps
    pub fn grant_invincibility(&mut self, frames: u32) {
        self.player.invincible = frames > 0;
        self.player.invincible_timer = frames;
    }

    pub fn obstacle(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Background tier for the latest volume level
    pub fn intensity(&self) -> Intensity {
        Intensity::from_volume(self.volume_level)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
