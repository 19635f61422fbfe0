//! Scene trait definition.

use crate::input::camera::Camera;
use glam::Vec3;

/// Common interface for a simulated scene driven by a render loop.
///
/// The driver calls [`Scene::update`] once per rendered frame and hands the
/// resulting instance data to whatever draws it.
pub trait Scene {
    /// Advance the scene by one rendered frame of `dt` seconds.
    fn update(&mut self, dt: f32);

    /// Camera used for input rays.
    fn camera(&self) -> &Camera;

    /// Replace the camera, e.g. after orbit controls or a window resize.
    fn set_camera(&mut self, camera: Camera);

    fn is_paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    /// Seconds simulated so far.
    fn current_time(&self) -> f32;

    /// Live particles in the scene.
    fn particle_count(&self) -> usize;

    fn camera_position(&self) -> Vec3 {
        self.camera().position
    }
}
