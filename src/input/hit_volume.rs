//! Invisible collision volume that click rays are tested against.

use glam::Vec3;

use crate::input::camera::Ray;

/// Scene geometry a pointer ray can hit
pub trait HitVolume {
    /// Nearest hit point in front of the ray origin
    fn intersect(&self, ray: &Ray) -> Option<Vec3>;
}

/// Sphere surrounding the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl HitVolume for BoundingSphere {
    fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let direction = ray.direction.normalize_or_zero();
        if direction == Vec3::ZERO || self.radius <= 0.0 {
            return None;
        }

        let offset = ray.origin - self.center;
        let b = offset.dot(direction);
        let c = offset.length_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        // Origin inside the sphere: the exit point is the only hit ahead
        let t = if near >= 0.0 {
            near
        } else if far >= 0.0 {
            far
        } else {
            return None;
        };

        Some(ray.origin + direction * t)
    }
}
