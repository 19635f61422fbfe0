//! The interactive ornament scene.
//!
//! Owns everything the render-frame domain mutates: the particle pool, the
//! physics step, input projection, the snow field and the instance buffers
//! handed to the renderer. Input from other threads arrives only through the
//! spawn-request channel and is applied at the start of [`Scene::update`].

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::OrnamentConfig;
use crate::input::camera::Camera;
use crate::input::gestures::{emit_trail, gesture_spawn_count, spawn_firework_burst, spawn_gesture, SpawnConfig};
use crate::input::hit_volume::{BoundingSphere, HitVolume};
use crate::input::projector::InputProjector;
use crate::input::requests::{SpawnRequest, SpawnRequestReceiver};
use crate::rendering::instance_builder::InstanceBuffer;
use crate::scene::Scene;
use crate::simulation::{ParticlePool, PhysicsStep, SnowField, StepStats};

pub struct OrnamentScene {
    pool: ParticlePool,
    physics: PhysicsStep,
    projector: InputProjector,
    hit_volume: BoundingSphere,
    spawn_config: SpawnConfig,
    rng: StdRng,
    requests: SpawnRequestReceiver,
    /// Pointer position in NDC while it is over the view
    pointer: Option<Vec2>,
    particle_instances: InstanceBuffer,
    snow: SnowField,
    snow_instances: InstanceBuffer,
    last_stats: StepStats,
    paused: bool,
    time: f32,
}

impl OrnamentScene {
    pub fn new(config: &OrnamentConfig, aspect: f32, requests: SpawnRequestReceiver) -> Self {
        Self::build(
            config,
            aspect,
            requests,
            ParticlePool::new(config.pool_capacity),
            PhysicsStep::new(config.physics.clone()),
            SnowField::new(config.snow.clone()),
            StdRng::from_os_rng(),
        )
    }

    /// Fully deterministic scene for tests and replays
    pub fn with_seed(config: &OrnamentConfig, aspect: f32, requests: SpawnRequestReceiver, seed: u64) -> Self {
        Self::build(
            config,
            aspect,
            requests,
            ParticlePool::with_seed(config.pool_capacity, seed),
            PhysicsStep::with_seed(config.physics.clone(), seed.wrapping_add(1)),
            SnowField::with_seed(config.snow.clone(), seed.wrapping_add(2)),
            StdRng::seed_from_u64(seed.wrapping_add(3)),
        )
    }

    fn build(
        config: &OrnamentConfig,
        aspect: f32,
        requests: SpawnRequestReceiver,
        pool: ParticlePool,
        physics: PhysicsStep,
        snow: SnowField,
        rng: StdRng,
    ) -> Self {
        let capacity = pool.capacity();
        let mut snow_instances = InstanceBuffer::new(snow.len());
        snow.write_instances(&mut snow_instances);

        Self {
            pool,
            physics,
            projector: InputProjector::from_config(&config.projector, aspect),
            hit_volume: BoundingSphere::new(Vec3::ZERO, config.projector.hit_volume_radius),
            spawn_config: config.spawn.clone(),
            rng,
            requests,
            pointer: None,
            particle_instances: InstanceBuffer::new(capacity),
            snow,
            snow_instances,
            last_stats: StepStats::default(),
            paused: false,
            time: 0.0,
        }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn projector(&self) -> &InputProjector {
        &self.projector
    }

    /// Pointer moved over the view (`Some`) or left it (`None`)
    pub fn set_pointer(&mut self, ndc: Option<Vec2>) {
        self.pointer = ndc;
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Click at `ndc`: a firework burst where the ray meets the hit volume.
    ///
    /// Returns the number of fireworks spawned; 0 on a miss.
    pub fn handle_click(&mut self, ndc: Vec2) -> usize {
        let ray = self.projector.camera().ndc_to_ray(ndc);
        let Some(point) = self.hit_volume.intersect(&ray) else {
            return 0;
        };

        let spawned = spawn_firework_burst(&mut self.pool, point, &self.spawn_config);
        if spawned < self.spawn_config.firework_burst {
            log::debug!(
                "Particle pool full, dropped {} fireworks",
                self.spawn_config.firework_burst - spawned
            );
        }
        spawned
    }

    /// Apply one queued spawn request. Returns the number of particles spawned.
    pub fn handle_request(&mut self, request: SpawnRequest) -> usize {
        match request {
            SpawnRequest::Click(ndc) => self.handle_click(ndc),
            SpawnRequest::Motion(event) => {
                let requested = gesture_spawn_count(event.intensity, &self.spawn_config);
                let spawned = spawn_gesture(
                    &mut self.pool,
                    &self.projector,
                    &event,
                    &self.spawn_config,
                    &mut self.rng,
                );
                if spawned < requested && self.pool.find_free_slot().is_none() {
                    log::debug!("Particle pool full, dropped {} gesture spawns", requested - spawned);
                }
                spawned
            }
        }
    }

    /// Stats of the most recent physics step
    pub fn last_stats(&self) -> StepStats {
        self.last_stats
    }

    pub fn live_particles(&self) -> usize {
        self.pool.live_count()
    }

    pub fn stuck_particles(&self) -> usize {
        self.pool.stuck_count()
    }

    /// One entry per pool slot, dead slots parked
    pub fn particle_instances(&self) -> &InstanceBuffer {
        &self.particle_instances
    }

    pub fn snow_instances(&self) -> &InstanceBuffer {
        &self.snow_instances
    }
}

impl Scene for OrnamentScene {
    fn update(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        let pending: Vec<SpawnRequest> = self.requests.drain().collect();
        for request in pending {
            self.handle_request(request);
        }

        if let Some(pointer) = self.pointer {
            emit_trail(
                &mut self.pool,
                &self.projector,
                pointer,
                &self.spawn_config,
                &mut self.rng,
            );
        }

        self.last_stats = self.physics.step(&mut self.pool, dt, &mut self.particle_instances);

        self.snow.update(dt);
        self.snow.write_instances(&mut self.snow_instances);

        self.time += dt;
    }

    fn camera(&self) -> &Camera {
        self.projector.camera()
    }

    fn set_camera(&mut self, camera: Camera) {
        self.projector.set_camera(camera);
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn current_time(&self) -> f32 {
        self.time
    }

    fn particle_count(&self) -> usize {
        self.pool.live_count()
    }
}
