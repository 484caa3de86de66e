//! Axis-aligned collision detection
//!
//! Every entity is a square described by its top-left corner and edge length.
//! Entity counts stay small, so all pairs are tested each frame without any
//! spatial partitioning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned square (top-left corner + edge length)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub pos: Vec2,
    pub size: f32,
}

impl Square {
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size,
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size)
    }

    /// Check if two squares overlap on both axes.
    ///
    /// Edges that merely touch do not count as a collision.
    pub fn overlaps(&self, other: &Square) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.pos.x < b_max.x
            && a_max.x > other.pos.x
            && self.pos.y < b_max.y
            && a_max.y > other.pos.y
    }
}

/// Anything with an axis-aligned square footprint
pub trait Bounded {
    fn bounds(&self) -> Square;
}

impl Bounded for Square {
    fn bounds(&self) -> Square {
        *self
    }
}

/// Check collision between two entities
#[inline]
pub fn is_colliding<A: Bounded + ?Sized, B: Bounded + ?Sized>(a: &A, b: &B) -> bool {
    a.bounds().overlaps(&b.bounds())
}
