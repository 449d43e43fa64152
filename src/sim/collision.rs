//! Collision detection and response on the rectangular playfield
//!
//! Everything here is axis-aligned: walls are lines at fixed coordinates,
//! the paddle is a 1-D interval along its wall, and the dodging game tests
//! axis-aligned boxes.

use glam::Vec2;

/// Which boundary or actor an entity was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Top or bottom wall (vertical velocity flipped)
    HorizontalWall,
    /// Wall opposite the paddle (horizontal velocity flipped)
    FarWall,
    /// The player's paddle
    Paddle,
}

/// Result of a collision check for one entity in one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionResult {
    /// Nothing touched
    Clear,
    /// Entity was reflected off a surface
    Bounce(Contact),
    /// Entity crossed the defended edge without touching the actor
    Miss,
}

impl CollisionResult {
    pub fn is_miss(&self) -> bool {
        matches!(self, CollisionResult::Miss)
    }
}

/// Axis-aligned bounding box (min corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Square box of side `side` at `min`
    pub fn square(min: Vec2, side: f32) -> Self {
        Self::new(min, Vec2::splat(side))
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: boxes that only share an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Reflect a velocity component off a wall at `limit`, clamping the position.
///
/// `low` selects which side of the limit is outside the field. The component
/// always ends up pointing back into the field, so an entity resting on the
/// wall is never flipped outward again. Returns true when the wall was touched.
pub fn reflect_axis(pos: &mut f32, vel: &mut f32, limit: f32, low: bool) -> bool {
    let outside = if low { *pos <= limit } else { *pos >= limit };
    if outside {
        *vel = if low { vel.abs() } else { -vel.abs() };
        *pos = limit;
    }
    outside
}

/// A paddle lying along a vertical wall, described by its span in y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleSpan {
    pub top: f32,
    pub height: f32,
}

impl PaddleSpan {
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Whether `y` lies within the paddle (inclusive)
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y <= self.bottom()
    }

    /// Where along the paddle `y` lands, 0 at the top edge and 1 at the bottom
    pub fn hit_fraction(&self, y: f32) -> f32 {
        ((y - self.top) / self.height).clamp(0.0, 1.0)
    }
}

/// Lateral velocity change for an off-center paddle hit
#[inline]
pub fn spin(hit_fraction: f32, spin_factor: f32) -> f32 {
    (hit_fraction - 0.5) * spin_factor
}
