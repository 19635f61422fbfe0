pub mod color;
pub mod instance_builder;

pub use color::hsl_to_rgb;
pub use instance_builder::{InstanceBuffer, ParticleInstance, PARKED_POSITION};
