//! Implicit cone used for attraction and collision against the tree.

use glam::Vec3;

/// Downward-pointing cone centred on the Y axis.
///
/// The apex sits at `+height / 2` and the base, of radius `base_radius`, at
/// `-height / 2`. Nothing about the visual point cloud of the tree is stored
/// here; the cone only exists for physics queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeShape {
    height: f32,
    base_radius: f32,
}

impl TreeShape {
    pub fn new(height: f32, base_radius: f32) -> Self {
        Self {
            height,
            base_radius,
        }
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn base_radius(&self) -> f32 {
        self.base_radius
    }

    /// Y coordinate of the cone base
    pub fn bottom(&self) -> f32 {
        -self.height / 2.0
    }

    /// Y coordinate of the cone apex
    pub fn top(&self) -> f32 {
        self.height / 2.0
    }

    /// Whether `y` lies within the vertical extent of the tree (inclusive)
    pub fn spans_height(&self, y: f32) -> bool {
        y >= self.bottom() && y <= self.top()
    }

    /// Radius of the cone at height `y`, or `None` outside the vertical extent.
    pub fn radius_at(&self, y: f32) -> Option<f32> {
        if self.height <= 0.0 {
            return None;
        }
        let rel_y = y - self.bottom();
        if (0.0..=self.height).contains(&rel_y) {
            Some(self.base_radius * (1.0 - rel_y / self.height))
        } else {
            None
        }
    }

    /// Whether `point` is strictly inside the cone surface
    pub fn contains(&self, point: Vec3) -> bool {
        self.radius_at(point.y)
            .is_some_and(|radius| radial_distance(point) < radius)
    }
}

/// Distance from the vertical (trunk) axis
#[inline]
pub fn radial_distance(point: Vec3) -> f32 {
    (point.x * point.x + point.z * point.z).sqrt()
}
