//! Math utilities and types
//!
//! Provides fundamental math types for 2D simulation and game development.

use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner of the rectangle
    pub min: Vec2,
    /// Maximum corner of the rectangle
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a rectangle centered at a point with given extents (half-size)
    pub fn from_center_extents(center: Vec2, extents: Vec2) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the rectangle
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size of the rectangle
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Check if this rectangle contains a point (boundary inclusive)
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Check if a circle lies entirely inside this rectangle (boundary inclusive)
    pub fn contains_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x - radius >= self.min.x && center.x + radius <= self.max.x &&
        center.y - radius >= self.min.y && center.y + radius <= self.max.y
    }

    /// Check if this rectangle intersects another rectangle
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Get the point inside this rectangle closest to the given point
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Get a copy of this rectangle grown by a uniform margin on all sides
    ///
    /// A negative margin shrinks the rectangle; callers are responsible for
    /// keeping the result non-degenerate.
    pub fn expanded(&self, margin: f32) -> Self {
        let m = Vec2::new(margin, margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Split this rectangle into four equal quadrants
    ///
    /// Quadrant order matches the child indexing used by the spatial index:
    /// index bit 0 selects +x, bit 1 selects +y.
    pub fn quadrants(&self) -> [Rect; 4] {
        let center = self.center();
        [
            Rect::new(self.min, center),
            Rect::new(Vec2::new(center.x, self.min.y), Vec2::new(self.max.x, center.y)),
            Rect::new(Vec2::new(self.min.x, center.y), Vec2::new(center.x, self.max.y)),
            Rect::new(center, self.max),
        ]
    }

    /// Index of the quadrant the point falls in, using the same bit layout
    /// as [`Rect::quadrants`]
    ///
    /// Points exactly on a split line are assigned to the +x / +y side so
    /// that every point maps to exactly one quadrant.
    pub fn quadrant_index(&self, point: Vec2) -> usize {
        let center = self.center();
        let mut index = 0;
        if point.x >= center.x { index |= 1; }
        if point.y >= center.y { index |= 2; }
        index
    }

    /// Test ray intersection with this rectangle using the slab method
    ///
    /// Returns the distance to the entry point (zero when the origin is
    /// inside), None if the ray misses. A zero direction component is
    /// handled as its own case; multiplying through an infinite inverse
    /// turns into NaN when the origin sits exactly on a slab boundary.
    pub fn intersect_ray(&self, ray_origin: Vec2, ray_dir: Vec2) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..2 {
            if ray_dir[axis] == 0.0 {
                // Parallel to this slab: hit only if the origin lies in it
                if ray_origin[axis] < self.min[axis] || ray_origin[axis] > self.max[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / ray_dir[axis];
                let t1 = (self.min[axis] - ray_origin[axis]) * inv;
                let t2 = (self.max[axis] - ray_origin[axis]) * inv;
                tmin = tmin.max(t1.min(t2));
                tmax = tmax.min(t1.max(t2));
            }
        }

        // Ray intersects if tmax >= tmin and tmax >= 0
        if tmax >= tmin && tmax >= 0.0 {
            // Return entry point distance (or 0 if we're inside the box)
            Some(tmin.max(0.0))
        } else {
            None
        }
    }
}
