//! Per-slot instance data handed to the external renderer.
//!
//! The renderer draws one instanced primitive per slot every frame, dead slots
//! included, so the buffer length always equals the pool capacity. Dead slots
//! are parked far outside the visible volume with zero scale.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Where dead slots are parked, well outside any camera frustum
pub const PARKED_POSITION: Vec3 = Vec3::new(0.0, -10_000.0, 0.0);

/// Instance data for one particle (must match the renderer's vertex layout)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Column-major world transform: translation + uniform scale, no rotation
    pub transform: [[f32; 4]; 4],
    /// RGB color, alpha always 1.0
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub fn new(position: Vec3, scale: f32, color: Vec3) -> Self {
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            glam::Quat::IDENTITY,
            position,
        );
        Self {
            transform: transform.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }

    pub fn parked() -> Self {
        Self::new(PARKED_POSITION, 0.0, Vec3::ZERO)
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.transform[3][0],
            self.transform[3][1],
            self.transform[3][2],
        )
    }

    /// Uniform scale stored on the transform diagonal
    pub fn scale(&self) -> f32 {
        self.transform[0][0]
    }
}

/// Fixed-length array of [`ParticleInstance`] rewritten every frame
pub struct InstanceBuffer {
    instances: Vec<ParticleInstance>,
}

impl InstanceBuffer {
    /// Create a buffer of `len` parked instances
    pub fn new(len: usize) -> Self {
        Self {
            instances: vec![ParticleInstance::parked(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Match the slot count of the producer. Only allocates when it changes.
    pub fn resize(&mut self, len: usize) {
        if self.instances.len() != len {
            self.instances.resize(len, ParticleInstance::parked());
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize, position: Vec3, scale: f32, color: Vec3) {
        self.instances[index] = ParticleInstance::new(position, scale, color);
    }

    #[inline]
    pub fn park(&mut self, index: usize) {
        self.instances[index] = ParticleInstance::parked();
    }

    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Raw bytes for a GPU vertex/storage buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}
