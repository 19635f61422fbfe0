//! Scene management.
//!
//! A scene owns the simulation state for one view and is driven by the
//! render loop through the [`Scene`] trait.

pub mod ornament_scene;
pub mod traits;

pub use ornament_scene::OrnamentScene;
pub use traits::Scene;
