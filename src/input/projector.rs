//! Screen-to-world projection for pointer and gesture input.
//!
//! A ray from the camera through an NDC point is intersected with a plane
//! whose normal is the direction from the origin to the camera. With the
//! default constant the plane sits 10 units in front of the tree, facing the
//! viewer, wherever the orbit controls have moved the camera.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::camera::{Camera, Ray};

/// Below this |n·d| the ray counts as parallel to the plane
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Plane constant `c` in `n·p + c = 0`
    pub plane_constant: f32,
    /// Initial camera position, looking at the origin
    pub camera_position: [f32; 3],
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Radius of the invisible sphere clicks are hit-tested against
    pub hit_volume_radius: f32,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            plane_constant: -10.0,
            camera_position: [0.0, 0.0, 25.0],
            field_of_view: 45.0,
            hit_volume_radius: 10.0,
        }
    }
}

/// Plane `normal · p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPlane {
    pub normal: Vec3,
    pub constant: f32,
}

impl DepthPlane {
    /// Signed distance from the plane (exact when `normal` is unit length)
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Intersection of the ray's supporting line with the plane.
    ///
    /// `None` only when the ray direction is parallel to the plane.
    pub fn intersect(&self, ray: &Ray) -> Option<Vec3> {
        let denominator = self.normal.dot(ray.direction);
        if denominator.abs() < PARALLEL_EPSILON {
            return None;
        }
        let t = -(self.normal.dot(ray.origin) + self.constant) / denominator;
        Some(ray.at(t))
    }
}

/// Projects NDC input points onto the camera-facing depth plane
pub struct InputProjector {
    camera: Camera,
    plane_constant: f32,
}

impl InputProjector {
    pub fn new(camera: Camera, plane_constant: f32) -> Self {
        Self {
            camera,
            plane_constant,
        }
    }

    pub fn from_config(config: &ProjectorConfig, aspect: f32) -> Self {
        let camera = Camera::look_at(
            Vec3::from_array(config.camera_position),
            Vec3::ZERO,
            config.field_of_view,
            aspect,
        );
        Self::new(camera, config.plane_constant)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Replace the camera, e.g. after orbit controls moved it
    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// The plane for the current camera position
    pub fn plane(&self) -> DepthPlane {
        DepthPlane {
            normal: self.camera.position.normalize_or_zero(),
            constant: self.plane_constant,
        }
    }

    /// World point under `(ndc_x, ndc_y)`, or `None` when the ray is parallel
    /// to the plane. `None` means "no spawn", not an error.
    pub fn project(&self, ndc_x: f32, ndc_y: f32) -> Option<Vec3> {
        let ray = self.camera.ndc_to_ray(Vec2::new(ndc_x, ndc_y));
        self.plane().intersect(&ray)
    }
}
