pub mod particle_pool;
pub mod physics;
pub mod physics_config;
pub mod snow;
pub mod tree_shape;

pub use particle_pool::{ParticleKind, ParticlePool};
pub use physics::{PhysicsStep, StepStats};
pub use physics_config::PhysicsConfig;
pub use snow::{SnowConfig, SnowField};
pub use tree_shape::TreeShape;
