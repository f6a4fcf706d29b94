//! Primitive collision shapes and intersection algorithms
//!
//! Provides the 2D geometric primitives (circles, rays) with intersection
//! testing used by the narrow phase and by ray queries.

use crate::foundation::math::Vec2;
use crate::world::EntityId;

/// A ray for ray casting and line-of-sight tests
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec2,
    /// The direction of the ray (should be normalized)
    pub direction: Vec2,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized; callers must not pass a zero vector.
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    /// The entity that was hit
    pub entity: EntityId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec2,
    /// The surface normal at the intersection point
    pub normal: Vec2,
}

/// A circular bound for collision detection
#[derive(Debug, Clone, Copy)]
pub struct Circle {
    /// The center position of the circle in world space
    pub center: Vec2,
    /// The radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Creates a new circle with the given center and radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this circle overlaps another
    ///
    /// Exactly touching circles (center distance equal to the radius sum)
    /// do not count as overlapping.
    pub fn overlaps(&self, other: &Circle) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared < radius_sum * radius_sum
    }

    /// Get the penetration depth if overlapping (0.0 if not overlapping)
    pub fn penetration_depth(&self, other: &Circle) -> f32 {
        let distance = (self.center - other.center).magnitude();
        let radius_sum = self.radius + other.radius;
        if distance < radius_sum {
            radius_sum - distance
        } else {
            0.0
        }
    }

    /// Test ray intersection with this circle
    /// Returns (distance, hit_point, normal) if hit, None otherwise
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec2, Vec2)> {
        // Vector from ray origin to circle center
        let oc = ray.origin - self.center;

        // Quadratic formula coefficients for ray-circle intersection
        // Solve: |origin + t*direction - center|^2 = radius^2
        let a = ray.direction.dot(&ray.direction); // Should be 1.0 if normalized
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;

        if discriminant < 0.0 {
            return None; // No intersection
        }

        // Calculate both intersection points
        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        // Use the closest positive intersection; an origin inside the circle
        // reports the exit point
        let t = if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            return None; // Ray pointing away from circle
        };

        // Calculate hit point and normal
        let hit_point = ray.point_at(t);
        let normal = if self.radius > 0.0 {
            (hit_point - self.center) / self.radius
        } else {
            -ray.direction
        };

        Some((t, hit_point, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_circle_overlap() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        let c = Circle::new(Vec2::new(30.0, 0.0), 5.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_exactly_touching_is_not_overlap() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 10.0);
        let b = Circle::new(Vec2::new(20.0, 0.0), 10.0);
        assert!(!a.overlaps(&b));
        assert_eq!(a.penetration_depth(&b), 0.0);
    }

    #[test]
    fn test_penetration_depth() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 10.0);
        let b = Circle::new(Vec2::new(15.0, 0.0), 10.0);
        assert_relative_eq!(a.penetration_depth(&b), 5.0);
    }

    #[test]
    fn test_ray_circle_hit_from_outside() {
        let circle = Circle::new(Vec2::new(10.0, 0.0), 2.0);
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let (t, point, normal) = circle.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 8.0);
        assert_relative_eq!(point.x, 8.0);
        assert_relative_eq!(point.y, 0.0);
        assert_relative_eq!(normal.x, -1.0);
    }

    #[test]
    fn test_ray_circle_from_inside_reports_exit() {
        let circle = Circle::new(Vec2::new(0.0, 0.0), 5.0);
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0));
        let (t, _, normal) = circle.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 5.0);
        assert_relative_eq!(normal.y, 1.0);
    }

    #[test]
    fn test_ray_circle_miss() {
        let circle = Circle::new(Vec2::new(10.0, 10.0), 1.0);
        let ray = Ray::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        assert!(circle.intersect_ray(&ray).is_none());
        // Behind the origin
        let behind = Circle::new(Vec2::new(-10.0, 0.0), 1.0);
        assert!(behind.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_point_at() {
        let ray = Ray::new(Vec2::new(1.0, 2.0), Vec2::new(0.0, 2.0));
        let p = ray.point_at(3.0);
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 5.0);
    }
}
