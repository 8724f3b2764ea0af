//! Axis-aligned rectangle collision
//!
//! Every entity in all three games is a box. Boundaries are exclusive:
//! boxes that only share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
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

    /// Strict overlap test (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shrink by `amount` on every side (may produce an empty box)
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            pos: self.pos + Vec2::splat(amount),
            size: self.size - Vec2::splat(2.0 * amount),
        }
    }
}

/// Clamp a box position so it stays inside `[0, field - size]` on both axes
#[inline]
pub fn clamp_to_field(pos: Vec2, size: Vec2, field: Vec2) -> Vec2 {
    pos.clamp(Vec2::ZERO, (field - size).max(Vec2::ZERO))
}
