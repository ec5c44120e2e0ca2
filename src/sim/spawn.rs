//! Obstacle and hazard spawning
//!
//! A spawn is rolled in two parts: `roll_wave` decides what appears (pure,
//! driven only by the uniform source), then `commit_wave` gives the pieces
//! ids and appends them to the world. Random draws happen in a fixed order,
//! so a scripted source reproduces any wave exactly.

use glam::Vec2;
use rand::Rng;

use super::state::{Hazard, HazardKind, Obstacle, ObstacleKind, World};
use crate::consts::*;

/// Source of uniform samples in [0, 1)
pub trait UniformSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn next_f64(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Chance that a fire roll becomes a three-piece cluster
const FIRE_CLUSTER_CHANCE: f64 = 0.4;
const FIRE_CLUSTER_SIZE: usize = 3;
/// Horizontal step between cluster pieces. Negative, so pieces overlap.
const FIRE_CLUSTER_STEP: f32 = OBSTACLE_WIDTH - 50.0;
/// Height of the strip a hole occupies above the floor
const HOLE_HEIGHT: f32 = 10.0;
/// Extra random width for single fire/hole obstacles, drawn in [0, this)
const SINGLE_WIDTH_JITTER: f64 = 20.0;

/// An obstacle about to be placed
#[derive(Debug, Clone, PartialEq)]
pub struct ObstaclePlan {
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub grouped: bool,
}

/// A hazard about to be placed, attached to the wave's box
#[derive(Debug, Clone, PartialEq)]
pub struct HazardPlan {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Everything produced by one spawn event
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpawnWave {
    pub obstacles: Vec<ObstaclePlan>,
    pub hazard: Option<HazardPlan>,
}

/// Whether enough time has passed since the last spawn.
///
/// Draws the jitter every call, as the threshold is re-rolled each step.
pub fn spawn_due(rng: &mut impl UniformSource, now_ms: f64, last_spawn_ms: f64) -> bool {
    now_ms - last_spawn_ms > SPAWN_INTERVAL_MS + rng.next_f64() * SPAWN_JITTER_MS
}

/// Roll the contents of one spawn event at the right edge of the world
pub fn roll_wave(rng: &mut impl UniformSource, world_width: f32, floor_y: f32) -> SpawnWave {
    const KINDS: [ObstacleKind; 3] = [ObstacleKind::Fire, ObstacleKind::Hole, ObstacleKind::Box];
    let kind = KINDS[((rng.next_f64() * 3.0) as usize).min(2)];

    match kind {
        ObstacleKind::Fire if rng.next_f64() < FIRE_CLUSTER_CHANCE => fire_cluster(world_width, floor_y),
        ObstacleKind::Box => crate_box(rng, world_width, floor_y),
        // Hole, and fire rolls that missed the cluster chance
        _ => single(rng, kind, world_width, floor_y),
    }
}

fn fire_cluster(world_width: f32, floor_y: f32) -> SpawnWave {
    let obstacles = (0..FIRE_CLUSTER_SIZE)
        .map(|i| ObstaclePlan {
            kind: ObstacleKind::Fire,
            pos: Vec2::new(world_width + i as f32 * FIRE_CLUSTER_STEP, floor_y - OBSTACLE_HEIGHT),
            size: Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT),
            grouped: true,
        })
        .collect();
    SpawnWave {
        obstacles,
        hazard: None,
    }
}

fn crate_box(rng: &mut impl UniformSource, world_width: f32, floor_y: f32) -> SpawnWave {
    let ground_level = rng.next_f64() > 0.5;
    let y = if ground_level {
        floor_y - OBSTACLE_HEIGHT
    } else {
        let tier = 2 + (rng.next_f64() * 3.0) as u32;
        floor_y - OBSTACLE_HEIGHT * tier as f32
    };

    let plan = ObstaclePlan {
        kind: ObstacleKind::Box,
        pos: Vec2::new(world_width, y),
        size: Vec2::new(PLAYER_WIDTH * 10.0, OBSTACLE_HEIGHT),
        grouped: false,
    };

    // Only raised boxes can carry a hazard; the roll is skipped for ground boxes
    let hazard = (!ground_level && rng.next_f64() > 0.5).then(|| {
        let size = Vec2::new(OBSTACLE_WIDTH, OBSTACLE_HEIGHT / 2.0);
        HazardPlan {
            pos: Vec2::new(
                plan.pos.x + plan.size.x / 2.0 - size.x / 2.0,
                plan.pos.y - size.y,
            ),
            size,
        }
    });

    SpawnWave {
        obstacles: vec![plan],
        hazard,
    }
}

fn single(rng: &mut impl UniformSource, kind: ObstacleKind, world_width: f32, floor_y: f32) -> SpawnWave {
    let (y, height) = match kind {
        ObstacleKind::Fire => (floor_y - OBSTACLE_HEIGHT, OBSTACLE_HEIGHT),
        _ => (floor_y - HOLE_HEIGHT, HOLE_HEIGHT),
    };
    let width = OBSTACLE_WIDTH + (rng.next_f64() * SINGLE_WIDTH_JITTER) as f32;
    SpawnWave {
        obstacles: vec![ObstaclePlan {
            kind,
            pos: Vec2::new(world_width, y),
            size: Vec2::new(width, height),
            grouped: false,
        }],
        hazard: None,
    }
}

/// Append a rolled wave to the world, assigning ids
pub fn commit_wave(world: &mut World, wave: SpawnWave) {
    let mut box_id = None;
    for plan in wave.obstacles {
        let id = world.next_entity_id();
        if plan.kind == ObstacleKind::Box {
            box_id = Some(id);
        }
        log::debug!("Spawned {:?} #{} at ({}, {})", plan.kind, id, plan.pos.x, plan.pos.y);
        world.obstacles.push(Obstacle {
            id,
            kind: plan.kind,
            pos: plan.pos,
            size: plan.size,
            grouped: plan.grouped,
        });
    }

    if let Some(hazard) = wave.hazard {
        let id = world.next_entity_id();
        world.hazards.push(Hazard {
            id,
            kind: HazardKind::Box,
            pos: hazard.pos,
            size: hazard.size,
            parent: box_id,
        });
    }
}

/// Run the spawn timer for one step. Returns true if something spawned.
pub fn update_spawner(world: &mut World, now_ms: f64) -> bool {
    if !spawn_due(&mut world.rng, now_ms, world.last_spawn_ms) {
        return false;
    }
    let wave = roll_wave(&mut world.rng, world.viewport.x, world.floor_y);
    commit_wave(world, wave);
    world.last_spawn_ms = now_ms;
    true
}
