//! Turning pointer, click and webcam input into particle spawns.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::input::projector::InputProjector;
use crate::motion::MotionEvent;
use crate::simulation::particle_pool::{ParticleKind, ParticlePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Chance per frame that the pointer leaves a trail particle
    pub trail_probability: f64,
    /// Motion intensity (active pixel count) per gesture spawn
    pub intensity_per_spawn: f32,
    /// Cap on spawns from a single motion event
    pub max_gesture_spawns: usize,
    /// Per-axis jitter applied to each gesture spawn, uniform in [-j, j]
    pub gesture_jitter: f32,
    /// Fireworks spawned by one click
    pub firework_burst: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            trail_probability: 0.5,
            intensity_per_spawn: 10.0,
            max_gesture_spawns: 5,
            gesture_jitter: 1.0,
            firework_burst: 20,
        }
    }
}

/// `min(floor(intensity / intensity_per_spawn), max_gesture_spawns)`
pub fn gesture_spawn_count(intensity: f32, config: &SpawnConfig) -> usize {
    if !(intensity > 0.0) || config.intensity_per_spawn <= 0.0 {
        return 0;
    }
    let count = (intensity / config.intensity_per_spawn).floor();
    (count as usize).min(config.max_gesture_spawns)
}

/// Continuous pointer trail: project the pointer and, with
/// `trail_probability`, spawn one trail particle there.
///
/// Returns whether a particle was spawned.
pub fn emit_trail<R: Rng>(
    pool: &mut ParticlePool,
    projector: &InputProjector,
    pointer: Vec2,
    config: &SpawnConfig,
    rng: &mut R,
) -> bool {
    let Some(point) = projector.project(pointer.x, pointer.y) else {
        return false;
    };
    if !rng.random_bool(config.trail_probability.clamp(0.0, 1.0)) {
        return false;
    }
    pool.spawn(point, ParticleKind::Trail)
}

/// Webcam gesture: project the event position and spawn a jittered cluster
/// of trail particles sized by the event intensity.
///
/// Returns how many particles were actually spawned.
pub fn spawn_gesture<R: Rng>(
    pool: &mut ParticlePool,
    projector: &InputProjector,
    event: &MotionEvent,
    config: &SpawnConfig,
    rng: &mut R,
) -> usize {
    let Some(center) = projector.project(event.x, event.y) else {
        return 0;
    };

    let jitter = config.gesture_jitter.abs();
    let mut spawned = 0;
    for _ in 0..gesture_spawn_count(event.intensity, config) {
        let offset = if jitter > 0.0 {
            Vec3::new(
                rng.random_range(-jitter..=jitter),
                rng.random_range(-jitter..=jitter),
                rng.random_range(-jitter..=jitter),
            )
        } else {
            Vec3::ZERO
        };
        if pool.spawn(center + offset, ParticleKind::Trail) {
            spawned += 1;
        }
    }
    spawned
}

/// Click: spawn `firework_burst` fireworks at one point, no jitter.
///
/// Every spawn is attempted even when the pool fills up part way; returns
/// how many succeeded.
pub fn spawn_firework_burst(pool: &mut ParticlePool, point: Vec3, config: &SpawnConfig) -> usize {
    (0..config.firework_burst)
        .filter(|_| pool.spawn(point, ParticleKind::Firework))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::camera::Camera;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn projector() -> InputProjector {
        InputProjector::new(Camera::default(), -10.0)
    }

    #[test]
    fn test_gesture_spawn_count() {
        let config = SpawnConfig::default();
        assert_eq!(gesture_spawn_count(0.0, &config), 0);
        assert_eq!(gesture_spawn_count(9.9, &config), 0);
        assert_eq!(gesture_spawn_count(16.0, &config), 1);
        assert_eq!(gesture_spawn_count(39.0, &config), 3);
        assert_eq!(gesture_spawn_count(50.0, &config), 5);
        assert_eq!(gesture_spawn_count(3072.0, &config), 5);
        assert_eq!(gesture_spawn_count(f32::NAN, &config), 0);
    }

    #[test]
    fn test_firework_burst_at_point() {
        let mut pool = ParticlePool::with_seed(100, 1);
        let config = SpawnConfig::default();
        let point = Vec3::new(1.0, 2.0, 3.0);

        assert_eq!(spawn_firework_burst(&mut pool, point, &config), 20);
        assert_eq!(pool.live_count(), 20);
        for i in 0..20 {
            assert_eq!(pool.positions[i], point);
        }
    }

    #[test]
    fn test_firework_burst_with_five_free_slots() {
        let mut pool = ParticlePool::with_seed(25, 2);
        for _ in 0..20 {
            pool.spawn(Vec3::ZERO, ParticleKind::Trail);
        }

        let spawned = spawn_firework_burst(&mut pool, Vec3::new(1.0, 2.0, 3.0), &SpawnConfig::default());

        assert_eq!(spawned, 5);
        assert_eq!(pool.live_count(), 25);
    }

    #[test]
    fn test_gesture_spawns_jittered_trail_cluster() {
        let projector = projector();
        let mut pool = ParticlePool::with_seed(64, 3);
        let mut rng = StdRng::seed_from_u64(4);
        let config = SpawnConfig::default();
        let event = MotionEvent { x: 0.2, y: -0.4, intensity: 42.0 };

        let center = projector.project(event.x, event.y).expect("hits plane");
        let spawned = spawn_gesture(&mut pool, &projector, &event, &config, &mut rng);

        assert_eq!(spawned, 4);
        assert_eq!(pool.live_count(), 4);
        for i in 0..4 {
            let offset = pool.positions[i] - center;
            assert!(offset.abs().max_element() <= 1.0 + 1e-5);
        }
        // Independent jitter: not all at the same point
        assert_ne!(pool.positions[0], pool.positions[1]);
    }

    #[test]
    fn test_weak_gesture_spawns_nothing() {
        let mut pool = ParticlePool::with_seed(8, 5);
        let mut rng = StdRng::seed_from_u64(6);
        let event = MotionEvent { x: 0.0, y: 0.0, intensity: 9.0 };

        let spawned = spawn_gesture(&mut pool, &projector(), &event, &SpawnConfig::default(), &mut rng);
        assert_eq!(spawned, 0);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_trail_emission_rate_is_about_half() {
        let projector = projector();
        let mut pool = ParticlePool::with_seed(20_000, 7);
        let mut rng = StdRng::seed_from_u64(8);
        let config = SpawnConfig::default();

        let frames = 10_000;
        let spawned = (0..frames)
            .filter(|_| emit_trail(&mut pool, &projector, Vec2::new(0.1, 0.1), &config, &mut rng))
            .count();

        assert!((4_500..=5_500).contains(&spawned), "spawned {} of {}", spawned, frames);
        assert_eq!(pool.live_count(), spawned);
    }

    #[test]
    fn test_trail_skipped_without_intersection() {
        let camera = Camera::new(Vec3::ZERO, glam::Quat::IDENTITY, 45.0, 1.0);
        let projector = InputProjector::new(camera, -10.0);
        let mut pool = ParticlePool::with_seed(8, 9);
        let mut rng = StdRng::seed_from_u64(10);
        let config = SpawnConfig {
            trail_probability: 1.0,
            ..SpawnConfig::default()
        };

        assert!(!emit_trail(&mut pool, &projector, Vec2::ZERO, &config, &mut rng));
        assert_eq!(pool.live_count(), 0);
    }
}
