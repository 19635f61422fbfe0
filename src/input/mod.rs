//! Input handling: camera rays, plane projection, click hit testing, spawn
//! gestures and the spawn-request channel.

pub mod camera;
pub mod gestures;
pub mod hit_volume;
pub mod projector;
pub mod requests;

pub use camera::{screen_to_ndc, Camera, Ray};
pub use gestures::{emit_trail, gesture_spawn_count, spawn_firework_burst, spawn_gesture, SpawnConfig};
pub use hit_volume::{BoundingSphere, HitVolume};
pub use projector::{DepthPlane, InputProjector, ProjectorConfig};
pub use requests::{spawn_channel, SpawnRequest, SpawnRequestReceiver, SpawnRequestSender};
