//! Tiger AI
//!
//! The tiger only ever chases. Each step it falls under gravity, waits out
//! any jump cooldown, hops the nearest obstacle ahead when it gets close,
//! and otherwise keeps a loose distance behind the player.

use super::collision::Bounds;
use super::state::{AiMode, Obstacle, Player, Tiger};
use crate::consts::{GRAVITY, JUMP_FORCE};

/// Obstacles farther ahead than this are ignored
pub const LOOKAHEAD: f32 = 250.0;
/// Jump once the nearest obstacle is closer than this
pub const JUMP_TRIGGER_DISTANCE: f32 = 200.0;
/// Tiger jumps are weaker than the player's
pub const JUMP_FORCE_SCALE: f32 = 0.8;
/// Frames the tiger stays inactive after jumping
pub const JUMP_COOLDOWN_FRAMES: u32 = 30;

/// Catch up when trailing the player by more than this
pub const CHASE_FAR: f32 = 100.0;
/// Back off when trailing the player by less than this
pub const CHASE_NEAR: f32 = 80.0;
pub const CHASE_SPEED: f32 = 2.0;
pub const RETREAT_SPEED: f32 = 1.0;

/// What the tiger did this step, for tests and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TigerAction {
    CoolingDown,
    Jumped,
    Advanced,
    Retreated,
    Held,
}

/// Distance to the nearest obstacle strictly ahead and within lookahead
pub fn nearest_obstacle_ahead(tiger: &Tiger, obstacles: &[Obstacle]) -> Option<f32> {
    obstacles
        .iter()
        .map(|o| o.pos.x - tiger.pos.x)
        .filter(|&d| d > 0.0 && d < LOOKAHEAD)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Gravity and floor contact, same integration as the player
fn integrate(tiger: &mut Tiger, floor_y: f32) {
    tiger.vel_y += GRAVITY;
    tiger.pos.y += tiger.vel_y;

    if tiger.rect().bottom() >= floor_y {
        tiger.pos.y = floor_y - tiger.size.y;
        tiger.vel_y = 0.0;
        tiger.on_ground = true;
        tiger.has_jumped_current_obstacle = false;
    } else {
        tiger.on_ground = false;
    }
}

/// Advance the tiger by one step
pub fn update_tiger(tiger: &mut Tiger, player: &Player, obstacles: &[Obstacle], floor_y: f32) -> TigerAction {
    integrate(tiger, floor_y);

    match tiger.mode {
        AiMode::Chasing => chase(tiger, player, obstacles),
    }
}

fn chase(tiger: &mut Tiger, player: &Player, obstacles: &[Obstacle]) -> TigerAction {
    if tiger.jump_cooldown > 0 {
        tiger.jump_cooldown -= 1;
        return TigerAction::CoolingDown;
    }

    let should_jump = nearest_obstacle_ahead(tiger, obstacles)
        .is_some_and(|d| d < JUMP_TRIGGER_DISTANCE)
        && tiger.on_ground
        && !tiger.has_jumped_current_obstacle;

    if should_jump {
        tiger.vel_y = JUMP_FORCE * JUMP_FORCE_SCALE;
        tiger.jump_cooldown = JUMP_COOLDOWN_FRAMES;
        tiger.on_ground = false;
        tiger.has_jumped_current_obstacle = true;
        return TigerAction::Jumped;
    }

    let gap = player.pos.x - tiger.pos.x;
    if gap > CHASE_FAR {
        tiger.pos.x += CHASE_SPEED;
        TigerAction::Advanced
    } else if gap < CHASE_NEAR {
        tiger.pos.x -= RETREAT_SPEED;
        TigerAction::Retreated
    } else {
        TigerAction::Held
    }
}
