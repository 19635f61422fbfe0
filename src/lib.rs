//! # Tree Ornament: interactive particle decoration
//!
//! A fixed pool of glowing particles is spawned by pointer movement, clicks
//! and webcam gestures, falls under per-frame gravity and drag, is pulled
//! toward the trunk of an implicit cone-shaped tree, and sticks to its
//! surface where it slowly fades.
//!
//! ## Architecture Overview
//!
//! ### 1. Simulation ([`simulation`])
//! - [`simulation::ParticlePool`] - fixed-capacity Structure-of-Arrays arena
//! - [`simulation::PhysicsStep`] - integration, trunk attraction, cone
//!   collision and aging, once per rendered frame
//! - [`simulation::TreeShape`] - the implicit collision cone
//! - [`simulation::SnowField`] - ambient falling snow
//!
//! ### 2. Input ([`input`])
//! - [`input::InputProjector`] - NDC → world point on a camera-facing plane
//! - [`input::gestures`] - trail, gesture and firework spawning
//! - [`input::requests`] - channel carrying spawn requests into the frame
//!
//! ### 3. Motion detection ([`motion`])
//! - [`motion::MotionDetector`] - frame differencing on a 64×48 buffer,
//!   Idle/Active lifecycle around a [`motion::CaptureBackend`]
//!
//! ### 4. Output ([`rendering`], [`scene`])
//! - [`rendering::InstanceBuffer`] - per-slot transform + color for the
//!   external renderer
//! - [`scene::OrnamentScene`] - owns all render-domain state
//!
//! ## Data Flow
//!
//! ```text
//! MotionDetector / pointer → InputProjector → ParticlePool::spawn
//!     → PhysicsStep each frame → InstanceBuffer → renderer
//! ```
//!
//! ## Dependencies
//!
//! - **Math**: `glam` (vector math), `bytemuck` (instance upload)
//! - **Randomness**: `rand`
//! - **Serialization**: `serde` + `ron` (human-readable config files)
//! - **Diagnostics**: `log` + `env_logger`, `thiserror`

pub mod app;
pub mod config;
pub mod input;
pub mod motion;
pub mod rendering;
pub mod scene;
pub mod simulation;
