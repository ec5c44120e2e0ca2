//! Axis-aligned collision detection
//!
//! Every entity in the world is a rectangle. Overlap is strict: rectangles
//! that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

/// Anything with a collision box
pub trait Bounds {
    fn rect(&self) -> Rect;
}

impl Bounds for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

/// Check whether two boxes intersect with positive overlap on both axes
#[inline]
pub fn overlaps(a: &impl Bounds, b: &impl Bounds) -> bool {
    let a = a.rect();
    let b = b.rect();
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}
