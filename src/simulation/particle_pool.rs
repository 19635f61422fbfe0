//! # Particle Pool - Fixed-Capacity Structure-of-Arrays Storage
//!
//! [`ParticlePool`] holds every interactive particle of the ornament: the trail
//! left by the pointer, webcam gesture sparks, click fireworks and the
//! "decorations" that stick to the tree.
//!
//! ## Slots
//!
//! - `capacity` slots are allocated once and never grow or shrink. The backing
//!   arrays are boxed slices, so their length cannot change after creation.
//! - A slot is **live** while `lives[i] > 0` and **dead** (reusable) otherwise.
//! - A slot index identifies a particle for one life only. Respawning silently
//!   reassigns the slot, so nothing outside the render frame should keep an
//!   index across a spawn.
//!
//! ## Backpressure
//!
//! When every slot is live, [`ParticlePool::spawn`] drops the request and
//! returns `false`. Requests are never queued; under load the newest spawns
//! are the ones lost.
//!
//! ## Data Organization
//!
//! - `positions`, `velocities` - physical state, read and written by
//!   [`crate::simulation::physics`]
//! - `colors`, `scales` - visual state, consumed when building render instances
//! - `lives`, `max_lives` - aging; the render scale fades with `life / max_life`
//! - `stuck` - terminal "stuck to the tree" flag

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rendering::color::hsl_to_rgb;

/// Which spawn distribution a new particle is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Slow, short-lived gold sparkle left by pointer and webcam motion
    Trail,
    /// Fast, colorful burst particle from a click
    Firework,
}

/// Random ranges used to initialize a slot for one [`ParticleKind`]
#[derive(Debug, Clone, Copy)]
struct SpawnProfile {
    /// Each velocity component is drawn from `[-speed, speed]`
    speed: f32,
    max_life: (f32, f32),
    scale: (f32, f32),
    hue: (f32, f32),
    saturation: f32,
    lightness: f32,
}

impl ParticleKind {
    fn profile(self) -> SpawnProfile {
        match self {
            ParticleKind::Trail => SpawnProfile {
                speed: 0.05,
                max_life: (1.0, 1.5),
                scale: (0.1, 0.4),
                // Warm gold band
                hue: (0.08, 0.14),
                saturation: 1.0,
                lightness: 0.55,
            },
            ParticleKind::Firework => SpawnProfile {
                speed: 0.25,
                max_life: (1.5, 2.5),
                scale: (0.2, 0.6),
                hue: (0.0, 1.0),
                saturation: 1.0,
                lightness: 0.6,
            },
        }
    }
}

/// Fixed-capacity particle arena using Structure-of-Arrays layout
///
/// All arrays have exactly `capacity` elements. Dead slots keep their last
/// values; only `lives` decides whether a slot takes part in the simulation.
pub struct ParticlePool {
    capacity: usize,

    /// World positions
    pub positions: Box<[Vec3]>,

    /// Per-frame displacement (not scaled by delta)
    pub velocities: Box<[Vec3]>,

    /// Linear RGB colors
    pub colors: Box<[Vec3]>,

    /// Base uniform scale before life fade
    pub scales: Box<[f32]>,

    /// Remaining life; the slot is dead when this is <= 0
    pub lives: Box<[f32]>,

    /// Life the render fade is measured against
    pub max_lives: Box<[f32]>,

    /// Terminal flag: the particle collided with the tree and no longer moves
    pub stuck: Box<[bool]>,

    rng: StdRng,
}

impl ParticlePool {
    /// Create a pool with `capacity` dead slots, seeded from the OS
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_os_rng())
    }

    /// Create a pool with a deterministic random sequence
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            capacity,
            positions: vec![Vec3::ZERO; capacity].into_boxed_slice(),
            velocities: vec![Vec3::ZERO; capacity].into_boxed_slice(),
            colors: vec![Vec3::ONE; capacity].into_boxed_slice(),
            scales: vec![0.0; capacity].into_boxed_slice(),
            lives: vec![0.0; capacity].into_boxed_slice(),
            max_lives: vec![1.0; capacity].into_boxed_slice(),
            stuck: vec![false; capacity].into_boxed_slice(),
            rng,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn is_alive(&self, index: usize) -> bool {
        self.lives.get(index).is_some_and(|&life| life > 0.0)
    }

    /// Number of slots currently live
    pub fn live_count(&self) -> usize {
        self.lives.iter().filter(|&&life| life > 0.0).count()
    }

    /// Number of live slots that are stuck to the tree
    pub fn stuck_count(&self) -> usize {
        self.lives
            .iter()
            .zip(self.stuck.iter())
            .filter(|(&life, &stuck)| life > 0.0 && stuck)
            .count()
    }

    /// Index of some dead slot, if any.
    ///
    /// Linear scan; only "some dead slot" is guaranteed, not the oldest one.
    pub fn find_free_slot(&self) -> Option<usize> {
        self.lives.iter().position(|&life| life <= 0.0)
    }

    /// Spawn a particle of `kind` at `point`.
    ///
    /// Returns `false` without touching any slot when the pool is full.
    pub fn spawn(&mut self, point: Vec3, kind: ParticleKind) -> bool {
        let Some(index) = self.find_free_slot() else {
            return false;
        };

        let profile = kind.profile();
        let speed = profile.speed;

        self.positions[index] = point;
        self.velocities[index] = Vec3::new(
            self.rng.random_range(-speed..=speed),
            self.rng.random_range(-speed..=speed),
            self.rng.random_range(-speed..=speed),
        );
        self.lives[index] = 1.0;
        self.max_lives[index] = self.rng.random_range(profile.max_life.0..=profile.max_life.1);
        self.scales[index] = self.rng.random_range(profile.scale.0..=profile.scale.1);

        let hue = self.rng.random_range(profile.hue.0..profile.hue.1);
        self.colors[index] = hsl_to_rgb(hue, profile.saturation, profile.lightness);
        self.stuck[index] = false;

        true
    }

    /// Kill every particle, leaving all slots free
    pub fn clear(&mut self) {
        self.lives.fill(0.0);
        self.stuck.fill(false);
    }
}
