//! Player physics and collision resolution
//!
//! Landing on a box and being killed by it are decided by the same overlap:
//! what matters is whether the player is falling and where its feet are
//! relative to the box top.

use super::collision::{Bounds, overlaps};
use super::state::{DeathCause, Footing, Obstacle, ObstacleKind, World};
use crate::consts::GRAVITY;

/// Feet may be this far above a box top and still land on it
pub const LANDING_ABOVE_TOLERANCE: f32 = 5.0;
/// Feet may have sunk this far into a box top and still land on it
pub const LANDING_BELOW_TOLERANCE: f32 = 10.0;

/// Result of resolving one player step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Alive,
    Killed(DeathCause),
}

/// Whether a falling body with feet at `bottom` lands on `obstacle`
#[inline]
pub fn is_landing(vel_y: f32, bottom: f32, obstacle: &Obstacle) -> bool {
    let top = obstacle.rect().top();
    vel_y > 0.0
        && bottom >= top - LANDING_ABOVE_TOLERANCE
        && bottom <= top + LANDING_BELOW_TOLERANCE
}

/// Advance the player by one step and resolve every contact.
///
/// Stops at the first fatal contact; the caller turns that into game over.
pub fn update_player(world: &mut World) -> Resolution {
    let floor_y = world.floor_y;
    let player = &mut world.player;

    player.vel_y += GRAVITY;
    player.pos.y += player.vel_y;
    player.footing = Footing::Airborne;

    if player.rect().bottom() >= floor_y {
        player.pos.y = floor_y - player.size.y;
        player.vel_y = 0.0;
        player.jumping = false;
        player.footing = Footing::Floor;
    }

    for obstacle in &world.obstacles {
        if !overlaps(&*player, obstacle) {
            continue;
        }
        if obstacle.kind == ObstacleKind::Box && is_landing(player.vel_y, player.rect().bottom(), obstacle) {
            player.pos.y = obstacle.pos.y - player.size.y;
            player.vel_y = 0.0;
            player.jumping = false;
            player.footing = Footing::Platform(obstacle.id);
        } else if !player.invincible {
            // Boxes hit from the side or below kill just like fire and holes
            return Resolution::Killed(DeathCause::Obstacle(obstacle.kind));
        }
    }

    if !player.invincible && world.hazards.iter().any(|h| overlaps(&*player, h)) {
        return Resolution::Killed(DeathCause::Hazard);
    }

    if player.pos.y > world.viewport.y && !player.invincible {
        return Resolution::Killed(DeathCause::FellOffScreen);
    }

    // Platform scrolled away under the player: start falling
    if let Footing::Platform(id) = player.footing {
        let gone = world
            .obstacles
            .iter()
            .find(|o| o.id == id)
            .is_none_or(|o| o.rect().right() < 0.0);
        if gone {
            player.footing = Footing::Airborne;
        }
    }

    Resolution::Alive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Hazard, HazardKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn world() -> World {
        World::new(800.0, 600.0, 7)
    }

    fn push_obstacle(world: &mut World, kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32) -> u32 {
        let id = world.next_entity_id();
        world.obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            grouped: false,
        });
        id
    }

    #[test]
    fn test_resting_on_floor_stays_put() {
        let mut world = world();
        let y = world.player.pos.y;
        for _ in 0..10 {
            assert_eq!(update_player(&mut world), Resolution::Alive);
        }
        assert_eq!(world.player.pos.y, y);
        assert_eq!(world.player.footing, Footing::Floor);
        assert_eq!(world.player.vel_y, 0.0);
    }

    #[test]
    fn test_jump_arc_returns_to_floor() {
        let mut world = world();
        let start_y = world.player.pos.y;
        world.player.jump();

        update_player(&mut world);
        assert!(world.player.pos.y < start_y);
        assert!(!world.player.is_on_ground());
        assert!(world.player.jumping);

        for _ in 0..100 {
            update_player(&mut world);
        }
        assert_eq!(world.player.pos.y, start_y);
        assert!(!world.player.jumping);
        assert_eq!(world.player.footing, Footing::Floor);
    }

    #[test]
    fn test_lands_on_box_top() {
        let mut world = world();
        let px = world.player.pos.x;
        let top = 200.0;
        let id = push_obstacle(&mut world, ObstacleKind::Box, px - 100.0, top, 300.0, 30.0);

        // Feet 3px above the box, falling
        world.player.pos.y = top - world.player.size.y - 3.0;
        world.player.vel_y = 4.0;
        world.player.jumping = true;
        world.player.footing = Footing::Airborne;

        assert_eq!(update_player(&mut world), Resolution::Alive);
        assert_eq!(world.player.pos.y, top - world.player.size.y);
        assert_eq!(world.player.vel_y, 0.0);
        assert!(!world.player.jumping);
        assert_eq!(world.player.current_platform(), Some(id));

        // Standing still keeps re-landing on the same box
        assert_eq!(update_player(&mut world), Resolution::Alive);
        assert_eq!(world.player.current_platform(), Some(id));
    }

    #[test]
    fn test_box_from_below_is_fatal() {
        let mut world = world();
        let px = world.player.pos.x;
        // Box right above the player's head, player rising into it
        let top = world.player.pos.y - 35.0;
        push_obstacle(&mut world, ObstacleKind::Box, px - 100.0, top, 300.0, 30.0);
        world.player.jump();

        assert_eq!(
            update_player(&mut world),
            Resolution::Killed(DeathCause::Obstacle(ObstacleKind::Box))
        );
    }

    #[test]
    fn test_fire_is_fatal() {
        let mut world = world();
        let p = world.player.rect();
        push_obstacle(&mut world, ObstacleKind::Fire, p.left() + 10.0, p.top(), 30.0, 30.0);
        assert_eq!(
            update_player(&mut world),
            Resolution::Killed(DeathCause::Obstacle(ObstacleKind::Fire))
        );
    }

    #[test]
    fn test_hole_is_fatal() {
        let mut world = world();
        let p = world.player.rect();
        let floor = world.floor_y;
        push_obstacle(&mut world, ObstacleKind::Hole, p.left(), floor - 10.0, 30.0, 10.0);
        assert_eq!(
            update_player(&mut world),
            Resolution::Killed(DeathCause::Obstacle(ObstacleKind::Hole))
        );
    }

    #[test]
    fn test_hazard_is_fatal() {
        let mut world = world();
        let p = world.player.rect();
        world.hazards.push(Hazard {
            id: 99,
            kind: HazardKind::Box,
            pos: Vec2::new(p.left(), p.top()),
            size: Vec2::new(30.0, 15.0),
            parent: None,
        });
        assert_eq!(update_player(&mut world), Resolution::Killed(DeathCause::Hazard));
    }

    #[test]
    fn test_invincible_survives_everything() {
        let mut world = world();
        let p = world.player.rect();
        let floor = world.floor_y;
        push_obstacle(&mut world, ObstacleKind::Fire, p.left(), p.top(), 30.0, 30.0);
        push_obstacle(&mut world, ObstacleKind::Hole, p.left(), floor - 10.0, 30.0, 10.0);
        world.hazards.push(Hazard {
            id: 99,
            kind: HazardKind::Box,
            pos: p.pos,
            size: Vec2::new(30.0, 15.0),
            parent: None,
        });
        world.player.invincible = true;
        world.player.invincible_timer = 10;

        assert_eq!(update_player(&mut world), Resolution::Alive);
        // Physics still ran normally
        assert_eq!(world.player.footing, Footing::Floor);
    }

    #[test]
    fn test_box_side_hit_spared_when_invincible() {
        let mut world = world();
        let p = world.player.rect();
        // Box beside the player at head height, too low for a landing
        push_obstacle(&mut world, ObstacleKind::Box, p.left() + 10.0, p.top(), 300.0, 30.0);
        let mut spared = world.clone();

        assert_eq!(
            update_player(&mut world),
            Resolution::Killed(DeathCause::Obstacle(ObstacleKind::Box))
        );

        spared.grant_invincibility(10);
        assert_eq!(update_player(&mut spared), Resolution::Alive);
        assert_eq!(spared.player.current_platform(), None);
    }

    #[test]
    fn test_fall_off_screen_spared_when_invincible() {
        let mut world = World::new(800.0, 600.0, 7);
        world.floor_y = 10_000.0;
        world.player.pos.y = 590.0;
        world.player.vel_y = 20.0;
        world.player.footing = Footing::Airborne;
        world.grant_invincibility(10);

        assert_eq!(update_player(&mut world), Resolution::Alive);
        assert!(world.player.pos.y > world.viewport.y);
    }

    #[test]
    fn test_fall_off_screen() {
        let mut world = World::new(800.0, 600.0, 7);
        // Floor below the visible area so the player can drop out of view
        world.floor_y = 10_000.0;
        world.player.pos.y = 590.0;
        world.player.vel_y = 20.0;
        world.player.footing = Footing::Airborne;
        assert_eq!(
            update_player(&mut world),
            Resolution::Killed(DeathCause::FellOffScreen)
        );
    }

    #[test]
    fn test_platform_scrolled_off_detaches() {
        let mut world = world();
        // Box whose right edge is already past the left of the screen,
        // still overlapping a player we place there
        let id = push_obstacle(&mut world, ObstacleKind::Box, -320.0, 200.0, 300.0, 30.0);
        world.player.pos = Vec2::new(-40.0, 200.0 - 30.0 - 0.5);
        world.player.vel_y = 1.0;
        world.player.footing = Footing::Airborne;

        assert_eq!(update_player(&mut world), Resolution::Alive);
        assert_ne!(world.player.current_platform(), Some(id));
        assert_eq!(world.player.footing, Footing::Airborne);
    }

    proptest! {
        #[test]
        fn landing_band_always_lands(
            sink_quarters in 1i32..=40,
            vel_halves in 1i32..24,
            invincible in any::<bool>(),
        ) {
            let mut world = world();
            let px = world.player.pos.x;
            let top = 200.0;
            let id = push_obstacle(&mut world, ObstacleKind::Box, px - 100.0, top, 300.0, 30.0);

            // Quarter/half pixel steps keep the arithmetic exact. After this
            // step's integration the feet sit `sink` below the box top
            // (0 < sink <= 10), falling at `vel`.
            let sink = sink_quarters as f32 * 0.25;
            let vel = vel_halves as f32 * 0.5;
            let h = world.player.size.y;
            world.player.vel_y = vel - GRAVITY;
            world.player.pos.y = top + sink - h - vel;
            world.player.footing = Footing::Airborne;
            world.player.invincible = invincible;
            world.player.invincible_timer = if invincible { 5 } else { 0 };

            prop_assert_eq!(update_player(&mut world), Resolution::Alive);
            prop_assert_eq!(world.player.current_platform(), Some(id));
            prop_assert_eq!(world.player.pos.y, top - h);
        }

        #[test]
        fn footing_and_platform_agree(
            x in 0.0f32..800.0,
            y in 0.0f32..320.0,
            vel in -12.0f32..12.0,
        ) {
            let mut world = world();
            push_obstacle(&mut world, ObstacleKind::Box, 300.0, 200.0, 300.0, 30.0);
            world.player.pos = Vec2::new(x, y);
            world.player.vel_y = vel;
            world.player.invincible = true;
            world.player.invincible_timer = 1000;

            update_player(&mut world);
            let p = &world.player;
            if p.current_platform().is_some() {
                prop_assert!(p.is_on_ground());
            }
            if p.footing == Footing::Floor {
                prop_assert_eq!(p.current_platform(), None);
            }
        }
    }
}
