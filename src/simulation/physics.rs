// Per-frame particle physics: integration, trunk attraction, cone collision,
// aging and render-instance output.
//
// Gravity and drag are per-frame constants. A 144 Hz display therefore moves
// free particles faster than a 60 Hz one; aging uses the real frame delta.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rendering::color::hsl_to_rgb;
use crate::rendering::instance_builder::InstanceBuffer;
use crate::simulation::particle_pool::ParticlePool;
use crate::simulation::physics_config::PhysicsConfig;
use crate::simulation::tree_shape::{radial_distance, TreeShape};

/// Saturation/lightness of the hue assigned when a particle sticks to the tree
const STUCK_SATURATION: f32 = 0.9;
const STUCK_LIGHTNESS: f32 = 0.6;

/// Counters from one physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Slots still live after aging
    pub live: usize,
    /// Particles that collided with the tree this step
    pub newly_stuck: usize,
    /// Particles whose life ran out this step
    pub expired: usize,
}

// ============================================================================
// Per-particle stages
// ============================================================================

/// Move a free particle by its velocity, then apply gravity and drag
#[inline]
pub fn integrate_free_particle(position: &mut Vec3, velocity: &mut Vec3, config: &PhysicsConfig) {
    *position += *velocity;
    velocity.y -= config.gravity;
    *velocity *= config.drag;
}

/// Nudge a particle's velocity toward the trunk axis at its own height.
///
/// Applies only within `attraction_radius` of the axis and within the vertical
/// extent of the tree. Returns whether an impulse was applied.
#[inline]
pub fn apply_trunk_attraction(
    position: Vec3,
    velocity: &mut Vec3,
    tree: &TreeShape,
    config: &PhysicsConfig,
) -> bool {
    let distance = radial_distance(position);
    if distance >= config.attraction_radius || !tree.spans_height(position.y) {
        return false;
    }
    // Already on the axis: no direction to pull in
    if distance <= f32::EPSILON {
        return false;
    }

    let toward_axis = Vec3::new(-position.x, 0.0, -position.z) / distance;
    *velocity += toward_axis * config.attraction_strength;
    true
}

/// Whether a particle at `position` has penetrated the tree cone
#[inline]
pub fn collides_with_tree(position: Vec3, tree: &TreeShape) -> bool {
    tree.contains(position)
}

/// Remaining life after one frame of aging
#[inline]
pub fn aged_life(life: f32, delta: f32, stuck: bool, config: &PhysicsConfig) -> f32 {
    let rate = if stuck { config.stuck_age_rate } else { 1.0 };
    life - delta * rate
}

/// Render scale: base scale faded linearly by remaining life
#[inline]
pub fn render_scale(scale: f32, life: f32, max_life: f32) -> f32 {
    if max_life <= 0.0 || life <= 0.0 {
        return 0.0;
    }
    scale * (life / max_life)
}

// ============================================================================
// Physics Step
// ============================================================================

/// Runs once per rendered frame over every slot of a [`ParticlePool`]
pub struct PhysicsStep {
    config: PhysicsConfig,
    tree: TreeShape,
    rng: StdRng,
}

impl PhysicsStep {
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_seed(config: PhysicsConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PhysicsConfig, rng: StdRng) -> Self {
        let tree = config.tree_shape();
        Self { config, tree, rng }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn tree(&self) -> &TreeShape {
        &self.tree
    }

    /// Advance every live particle by one frame and rewrite `instances`.
    ///
    /// `instances` is resized to the pool capacity if needed; every slot gets
    /// an entry, dead ones parked with zero scale.
    pub fn step(
        &mut self,
        pool: &mut ParticlePool,
        delta: f32,
        instances: &mut InstanceBuffer,
    ) -> StepStats {
        let mut stats = StepStats::default();
        instances.resize(pool.capacity());

        for i in 0..pool.capacity() {
            if pool.lives[i] <= 0.0 {
                instances.park(i);
                continue;
            }

            if !pool.stuck[i] {
                // 1. Integration
                integrate_free_particle(&mut pool.positions[i], &mut pool.velocities[i], &self.config);

                // 2. Magnetic attraction toward the trunk
                apply_trunk_attraction(pool.positions[i], &mut pool.velocities[i], &self.tree, &self.config);

                // 3. Cone collision (terminal)
                if collides_with_tree(pool.positions[i], &self.tree) {
                    pool.stuck[i] = true;
                    pool.velocities[i] = Vec3::ZERO;
                    pool.colors[i] = hsl_to_rgb(self.rng.random::<f32>(), STUCK_SATURATION, STUCK_LIGHTNESS);
                    pool.lives[i] = self.config.stuck_life;
                    stats.newly_stuck += 1;
                }
            }

            // 4. Aging
            pool.lives[i] = aged_life(pool.lives[i], delta, pool.stuck[i], &self.config);

            // 5. Render transform
            if pool.lives[i] > 0.0 {
                stats.live += 1;
                let scale = render_scale(pool.scales[i], pool.lives[i], pool.max_lives[i]);
                instances.set(i, pool.positions[i], scale, pool.colors[i]);
            } else {
                stats.expired += 1;
                instances.park(i);
            }
        }

        if stats.newly_stuck > 0 {
            log::trace!("{} particles stuck to the tree", stats.newly_stuck);
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::instance_builder::PARKED_POSITION;
    use crate::simulation::particle_pool::ParticleKind;

    const DT: f32 = 1.0 / 60.0;

    fn setup(capacity: usize) -> (ParticlePool, PhysicsStep, InstanceBuffer) {
        (
            ParticlePool::with_seed(capacity, 11),
            PhysicsStep::with_seed(PhysicsConfig::default(), 12),
            InstanceBuffer::new(capacity),
        )
    }

    #[test]
    fn test_particle_at_origin_sticks_on_next_step() {
        let (mut pool, mut physics, mut instances) = setup(1);
        assert!(pool.spawn(Vec3::ZERO, ParticleKind::Trail));

        // relY = 6, cone radius = 2.5 at y = 0
        let tree = physics.tree();
        assert_eq!(tree.radius_at(0.0), Some(2.5));

        let stats = physics.step(&mut pool, DT, &mut instances);

        assert!(pool.stuck[0]);
        assert_eq!(pool.velocities[0], Vec3::ZERO);
        assert_eq!(stats.newly_stuck, 1);
        assert!((pool.lives[0] - (2.0 - DT * 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_stuck_particle_never_moves_and_fades_slowly() {
        let (mut pool, mut physics, mut instances) = setup(1);
        pool.spawn(Vec3::new(0.5, 0.0, 0.0), ParticleKind::Firework);
        physics.step(&mut pool, DT, &mut instances);
        assert!(pool.stuck[0]);

        let stuck_position = pool.positions[0];
        let mut previous_life = pool.lives[0];
        let mut frames = 0;
        while pool.lives[0] > 0.0 {
            physics.step(&mut pool, DT, &mut instances);
            frames += 1;
            assert!(pool.stuck[0]);
            assert_eq!(pool.velocities[0], Vec3::ZERO);
            assert_eq!(pool.positions[0], stuck_position);
            let expected = previous_life - DT * 0.3;
            assert!((pool.lives[0] - expected).abs() < 1e-5);
            previous_life = pool.lives[0];
            assert!(frames < 10_000);
        }
        // 2.0 / (0.3 / 60) = 400 frames in total
        assert!((395..=401).contains(&frames), "frames = {}", frames);
    }

    #[test]
    fn test_free_particle_integration_and_gravity() {
        let (mut pool, mut physics, mut instances) = setup(1);
        // Far from the tree: no attraction, no collision
        pool.spawn(Vec3::new(50.0, 20.0, 0.0), ParticleKind::Trail);
        pool.velocities[0] = Vec3::new(0.01, 0.0, 0.0);

        physics.step(&mut pool, DT, &mut instances);

        assert!((pool.positions[0] - Vec3::new(50.01, 20.0, 0.0)).length() < 1e-5);
        let expected = Vec3::new(0.01, -0.005, 0.0) * 0.98;
        assert!((pool.velocities[0] - expected).length() < 1e-7);
        assert!((pool.lives[0] - (1.0 - DT)).abs() < 1e-6);
        assert!(!pool.stuck[0]);
    }

    #[test]
    fn test_gravity_is_not_scaled_by_delta() {
        let (mut pool, mut physics, mut instances) = setup(2);
        pool.spawn(Vec3::new(50.0, 0.0, 0.0), ParticleKind::Trail);
        pool.spawn(Vec3::new(-50.0, 0.0, 0.0), ParticleKind::Trail);
        pool.velocities[0] = Vec3::ZERO;
        pool.velocities[1] = Vec3::ZERO;

        physics.step(&mut pool, 0.001, &mut instances);
        let slow_frame = pool.velocities[0];
        pool.velocities[0] = Vec3::ZERO;
        physics.step(&mut pool, 0.1, &mut instances);

        assert_eq!(slow_frame, pool.velocities[0]);
    }

    #[test]
    fn test_attraction_pulls_toward_axis() {
        let tree = TreeShape::new(12.0, 5.0);
        let config = PhysicsConfig::default();

        let mut velocity = Vec3::ZERO;
        assert!(apply_trunk_attraction(Vec3::new(6.0, 0.0, 0.0), &mut velocity, &tree, &config));
        assert!((velocity - Vec3::new(-0.01, 0.0, 0.0)).length() < 1e-7);

        // Outside the attraction radius
        let mut velocity = Vec3::ZERO;
        assert!(!apply_trunk_attraction(Vec3::new(10.0, 0.0, 0.0), &mut velocity, &tree, &config));
        assert_eq!(velocity, Vec3::ZERO);

        // Above the tree
        let mut velocity = Vec3::ZERO;
        assert!(!apply_trunk_attraction(Vec3::new(3.0, 7.0, 0.0), &mut velocity, &tree, &config));
        assert_eq!(velocity, Vec3::ZERO);

        // Diagonal direction stays horizontal with unit magnitude 0.01
        let mut velocity = Vec3::ZERO;
        apply_trunk_attraction(Vec3::new(3.0, 1.0, 4.0), &mut velocity, &tree, &config);
        assert_eq!(velocity.y, 0.0);
        assert!((velocity.length() - 0.01).abs() < 1e-7);
        assert!(velocity.x < 0.0 && velocity.z < 0.0);
    }

    #[test]
    fn test_collision_happens_in_the_frame_it_becomes_true() {
        let (mut pool, mut physics, mut instances) = setup(1);
        // Just outside the cone at y = 0 (radius 2.5), moving inward
        pool.spawn(Vec3::new(2.55, 0.0, 0.0), ParticleKind::Trail);
        pool.velocities[0] = Vec3::new(-0.1, 0.0, 0.0);

        physics.step(&mut pool, DT, &mut instances);

        assert!(pool.positions[0].x < 2.5);
        assert!(pool.stuck[0]);
    }

    #[test]
    fn test_dead_slots_are_parked() {
        let (mut pool, mut physics, mut instances) = setup(3);
        pool.spawn(Vec3::new(40.0, 0.0, 0.0), ParticleKind::Trail);

        let stats = physics.step(&mut pool, DT, &mut instances);
        assert_eq!(stats.live, 1);

        let items = instances.instances();
        assert!(items[0].scale() > 0.0);
        for dead in &items[1..] {
            assert_eq!(dead.position(), PARKED_POSITION);
            assert_eq!(dead.scale(), 0.0);
        }
    }

    #[test]
    fn test_free_particle_expires_and_is_parked() {
        let (mut pool, mut physics, mut instances) = setup(1);
        pool.spawn(Vec3::new(40.0, 100.0, 0.0), ParticleKind::Trail);

        let stats = physics.step(&mut pool, 1.5, &mut instances);

        assert_eq!(stats.expired, 1);
        assert_eq!(stats.live, 0);
        assert!(!pool.is_alive(0));
        assert_eq!(instances.instances()[0].position(), PARKED_POSITION);
        assert_eq!(pool.find_free_slot(), Some(0));
    }

    #[test]
    fn test_render_scale_fades_linearly() {
        assert_eq!(render_scale(0.4, 1.0, 2.0), 0.2);
        assert_eq!(render_scale(0.4, 0.5, 2.0), 0.1);
        assert_eq!(render_scale(0.4, 0.0, 2.0), 0.0);
        assert_eq!(render_scale(0.4, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_instances_follow_pool_capacity() {
        let (mut pool, mut physics, _) = setup(5);
        let mut instances = InstanceBuffer::new(0);
        physics.step(&mut pool, DT, &mut instances);
        assert_eq!(instances.len(), 5);
    }
}
