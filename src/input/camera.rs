//! Camera source used for ray construction.
//!
//! Orbit controls live outside the core; whoever owns them pushes the current
//! camera into the [`crate::input::InputProjector`] each frame.

use glam::{Mat3, Quat, Vec2, Vec3};

/// Half-line starting at `origin` with a unit-length `direction`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Perspective camera: world position, orientation, vertical FOV and aspect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotates camera-space axes into world space; the camera looks down -Z
    pub rotation: Quat,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height of the viewport
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Vec3::new(0.0, 0.0, 25.0), Vec3::ZERO, 45.0, 16.0 / 9.0)
    }
}

impl Camera {
    pub fn new(position: Vec3, rotation: Quat, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            rotation: rotation.normalize(),
            fov_y: fov_y_degrees.to_radians(),
            aspect,
        }
    }

    /// Camera at `position` looking at `target` with +Y as the up hint
    pub fn look_at(position: Vec3, target: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        let forward = (target - position).normalize_or_zero();
        let forward = if forward == Vec3::ZERO { Vec3::NEG_Z } else { forward };

        // Looking straight up or down: any horizontal right axis will do
        let right = forward.cross(Vec3::Y);
        let right = if right.length_squared() < 1e-6 {
            Vec3::X
        } else {
            right.normalize()
        };
        let up = right.cross(forward).normalize();

        let rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
        Self::new(position, rotation, fov_y_degrees, aspect)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn ndc_to_ray(&self, ndc: Vec2) -> Ray {
        let tan_half_fov = (self.fov_y / 2.0).tan();
        let ray_view = Vec3::new(ndc.x * self.aspect * tan_half_fov, ndc.y * tan_half_fov, -1.0);
        Ray::new(self.position, self.rotation * ray_view)
    }
}

/// Convert window pixel coordinates (origin top-left, y down) to NDC (y up)
pub fn screen_to_ndc(screen_x: f32, screen_y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (2.0 * screen_x / width) - 1.0,
        1.0 - (2.0 * screen_y / height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_at_forward() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 25.0), Vec3::ZERO, 45.0, 1.0);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);

        let camera = Camera::look_at(Vec3::new(10.0, 5.0, 0.0), Vec3::new(0.0, 5.0, 0.0), 45.0, 1.0);
        assert!((camera.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_look_at_straight_down() {
        let camera = Camera::look_at(Vec3::new(0.0, 30.0, 0.0), Vec3::ZERO, 45.0, 1.0);
        assert!((camera.forward() - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_center_ray_follows_forward() {
        let camera = Camera::default();
        let ray = camera.ndc_to_ray(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!((ray.direction - camera.forward()).length() < 1e-5);
    }

    #[test]
    fn test_corner_rays_diverge() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 25.0), Vec3::ZERO, 90.0, 1.0);

        // tan(45°) = 1, so the top-right corner ray is (1, 1, -1) normalized
        let ray = camera.ndc_to_ray(Vec2::new(1.0, 1.0));
        let expected = Vec3::new(1.0, 1.0, -1.0).normalize();
        assert!((ray.direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_screen_to_ndc() {
        assert_eq!(screen_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(screen_to_ndc(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }
}
