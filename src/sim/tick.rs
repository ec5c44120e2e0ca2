//! Per-frame simulation step
//!
//! Core game loop that advances the world one step per display frame.

use super::collision::{Bounds, overlaps};
use super::physics::{Resolution, update_player};
use super::spawn::update_spawner;
use super::state::{DeathCause, GameEvent, GamePhase, World};
use super::tiger::update_tiger;
use crate::speed_for_score;

/// Input for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/tap)
    pub jump: bool,
    /// Clock reading for the spawn timer (ms)
    pub now_ms: f64,
    /// Music volume level from the audio analyser (0..=255)
    pub volume_level: f32,
}

/// Advance the world by one step
pub fn tick(world: &mut World, input: &TickInput) {
    // Hidden tab or finished run: nothing moves
    if world.paused || world.phase != GamePhase::Running {
        return;
    }

    if input.jump {
        request_jump(world);
    }

    world.player.tick_invincibility();

    world.score += 1;
    world.events.push(GameEvent::Score(world.score));

    if let Resolution::Killed(cause) = update_player(world) {
        game_over(world, cause);
        return;
    }

    update_tiger(&mut world.tiger, &world.player, &world.obstacles, world.floor_y);

    update_spawner(world, input.now_ms);

    scroll_world(world);

    if overlaps(&world.player, &world.tiger) && !world.player.invincible {
        game_over(world, DeathCause::Tiger);
        return;
    }

    world.speed = speed_for_score(world.score);
    world.volume_level = input.volume_level;
}

/// Jump if the run is live and the player isn't already mid-jump.
///
/// Returns whether the jump was accepted.
pub fn request_jump(world: &mut World) -> bool {
    if world.phase != GamePhase::Running || world.paused || world.player.jumping {
        return false;
    }
    world.player.jump();
    true
}

/// Move every obstacle and hazard left by the current speed and drop the
/// ones that have fully left the screen.
pub fn scroll_world(world: &mut World) {
    let speed = world.speed;

    for obstacle in &mut world.obstacles {
        obstacle.pos.x -= speed;
    }
    world.obstacles.retain(|o| o.rect().right() >= 0.0);

    for hazard in &mut world.hazards {
        hazard.pos.x -= speed;
    }
    world.hazards.retain(|h| h.rect().right() >= 0.0);
}

/// End the run. Only the first call after a (re)start has any effect.
pub fn game_over(world: &mut World, cause: DeathCause) {
    if world.phase == GamePhase::GameOver {
        return;
    }
    world.phase = GamePhase::GameOver;

    let new_high_score = world.score > world.high_score;
    if new_high_score {
        world.high_score = world.score;
        log::info!("New high score: {}", world.score);
    }
    log::info!("Game over ({:?}) with score {}", cause, world.score);

    world.events.push(GameEvent::GameOver {
        score: world.score,
        new_high_score,
        cause,
    });
}

/// Start a fresh run, keeping the high score
pub fn restart(world: &mut World, now_ms: f64) {
    world.obstacles.clear();
    world.hazards.clear();
    world.reset_positions();
    world.score = 0;
    world.speed = speed_for_score(0);
    world.last_spawn_ms = now_ms;
    world.phase = GamePhase::Running;
    world.events.clear();
    log::info!("Run restarted (high score {})", world.high_score);
}
