use serde::{Deserialize, Serialize};

use crate::simulation::tree_shape::TreeShape;

/// Physics configuration for the ornament particle field
///
/// Gravity and drag are applied once per rendered frame and are NOT scaled by
/// the frame delta, so free particles move faster on high refresh-rate
/// displays. Only aging uses the real frame delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward velocity change applied every frame
    pub gravity: f32,

    /// Velocity multiplier applied every frame
    pub drag: f32,

    /// Radial distance from the trunk axis inside which particles are pulled in
    pub attraction_radius: f32,

    /// Magnitude of the per-frame impulse toward the trunk axis
    pub attraction_strength: f32,

    /// Life assigned to a particle when it sticks to the tree surface
    pub stuck_life: f32,

    /// Aging multiplier for stuck particles (free particles age at 1.0)
    pub stuck_age_rate: f32,

    /// Tree cone height, centred on y = 0
    pub tree_height: f32,

    /// Tree cone radius at its base
    pub tree_base_radius: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.005,
            drag: 0.98,
            attraction_radius: 10.0,
            attraction_strength: 0.01,
            stuck_life: 2.0,
            stuck_age_rate: 0.3,
            tree_height: 12.0,
            tree_base_radius: 5.0,
        }
    }
}

impl PhysicsConfig {
    /// Build the implicit collision cone described by this configuration
    pub fn tree_shape(&self) -> TreeShape {
        TreeShape::new(self.tree_height, self.tree_base_radius)
    }
}
