//! Ambient snow around the tree.
//!
//! Flakes fall through a square column centred on the trunk, sway sideways,
//! and wrap back to the ceiling when they pass the floor. Unlike the
//! interactive particles, snow motion is scaled by the frame delta.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::rendering::instance_builder::InstanceBuffer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowConfig {
    /// Number of flakes; fixed for the lifetime of the field
    pub count: usize,
    /// Half the side length of the square column flakes fall through
    pub half_extent: f32,
    pub floor: f32,
    pub ceiling: f32,
    /// Fall speed range, world units per second
    pub min_speed: f32,
    pub max_speed: f32,
    pub sway_amplitude: f32,
    pub sway_frequency: f32,
    pub flake_scale: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            half_extent: 25.0,
            floor: -15.0,
            ceiling: 25.0,
            min_speed: 0.5,
            max_speed: 2.0,
            sway_amplitude: 0.5,
            sway_frequency: 1.2,
            flake_scale: 0.08,
        }
    }
}

pub struct SnowField {
    config: SnowConfig,
    /// Horizontal anchor each flake sways around; y is the current height
    anchors: Vec<Vec3>,
    speeds: Vec<f32>,
    phases: Vec<f32>,
    time: f32,
    rng: StdRng,
}

impl SnowField {
    pub fn new(config: SnowConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: SnowConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SnowConfig, mut rng: StdRng) -> Self {
        let (low, high) = ordered(config.floor, config.ceiling);
        let half = config.half_extent.abs();
        let (min_speed, max_speed) = ordered(config.min_speed, config.max_speed);

        let mut anchors = Vec::with_capacity(config.count);
        let mut speeds = Vec::with_capacity(config.count);
        let mut phases = Vec::with_capacity(config.count);
        for _ in 0..config.count {
            anchors.push(Vec3::new(
                rng.random_range(-half..=half),
                rng.random_range(low..=high),
                rng.random_range(-half..=half),
            ));
            speeds.push(rng.random_range(min_speed..=max_speed));
            phases.push(rng.random_range(0.0..std::f32::consts::TAU));
        }

        Self {
            config,
            anchors,
            speeds,
            phases,
            time: 0.0,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Current world position of flake `index`, sway included
    pub fn position(&self, index: usize) -> Vec3 {
        let anchor = self.anchors[index];
        let angle = self.time * self.config.sway_frequency + self.phases[index];
        Vec3::new(
            anchor.x + angle.sin() * self.config.sway_amplitude,
            anchor.y,
            anchor.z + angle.cos() * self.config.sway_amplitude,
        )
    }

    pub fn update(&mut self, delta: f32) {
        self.time += delta;
        let (floor, ceiling) = ordered(self.config.floor, self.config.ceiling);
        let half = self.config.half_extent.abs();

        for i in 0..self.anchors.len() {
            self.anchors[i].y -= self.speeds[i] * delta;
            if self.anchors[i].y < floor {
                self.anchors[i] = Vec3::new(
                    self.rng.random_range(-half..=half),
                    ceiling,
                    self.rng.random_range(-half..=half),
                );
            }
        }
    }

    pub fn write_instances(&self, instances: &mut InstanceBuffer) {
        instances.resize(self.len());
        for i in 0..self.len() {
            instances.set(i, self.position(i), self.config.flake_scale, Vec3::ONE);
        }
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SnowConfig {
        SnowConfig {
            count: 200,
            ..SnowConfig::default()
        }
    }

    #[test]
    fn test_flakes_stay_inside_column() {
        let config = small_config();
        let mut snow = SnowField::with_seed(config.clone(), 1);
        let limit = config.half_extent + config.sway_amplitude + 1e-4;

        for _ in 0..2000 {
            snow.update(1.0 / 30.0);
            for i in 0..snow.len() {
                let p = snow.position(i);
                assert!(p.x.abs() <= limit && p.z.abs() <= limit);
                assert!(p.y >= config.floor && p.y <= config.ceiling);
            }
        }
    }

    #[test]
    fn test_flakes_fall_and_wrap() {
        let config = SnowConfig {
            count: 1,
            min_speed: 10.0,
            max_speed: 10.0,
            ..SnowConfig::default()
        };
        let mut snow = SnowField::with_seed(config.clone(), 2);

        let start = snow.position(0).y;
        snow.update(0.1);
        let after = snow.position(0).y;
        if start - 1.0 >= config.floor {
            assert!((start - after - 1.0).abs() < 1e-4);
        } else {
            assert_eq!(after, config.ceiling);
        }

        // Long enough to guarantee at least one wrap
        snow.update(5.0);
        assert_eq!(snow.position(0).y, config.ceiling);
    }

    #[test]
    fn test_instances_cover_every_flake() {
        let snow = SnowField::with_seed(small_config(), 3);
        let mut instances = InstanceBuffer::new(0);
        snow.write_instances(&mut instances);

        assert_eq!(instances.len(), 200);
        for (i, instance) in instances.instances().iter().enumerate() {
            assert_eq!(instance.position(), snow.position(i));
            assert_eq!(instance.color, [1.0, 1.0, 1.0, 1.0]);
        }
    }
}
