//! Fixed-capacity particle pools.
//!
//! A pool is a boxed slice allocated once. Particles are never removed:
//! a dead slot is reinitialized in place by its [`SpawnDistribution`].

use rand::Rng;

use super::ParticleRng;

/// Kind-specific particle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Pulled toward the origin while swirling around it.
    Spiral {
        /// Signed swirl rate (rad/s scale).
        angular_velocity: f32,
    },
    /// Flies in a straight line (plus constant acceleration).
    Ballistic,
}

/// One pool slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position.
    pub position: [f32; 3],
    /// Velocity (units per second).
    pub velocity: [f32; 3],
    /// Remaining life, decays toward 0.
    pub life: f32,
    /// Kind-specific extra.
    pub kind: ParticleKind,
}

impl Particle {
    /// A zeroed particle of the given kind. Only used before the first spawn.
    #[must_use]
    pub const fn dormant(kind: ParticleKind) -> Self {
        Self {
            position: [0.0; 3],
            velocity: [0.0; 3],
            life: 0.0,
            kind,
        }
    }

    /// Is this particle alive?
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Distance from the vertical axis, in the x/z plane.
    #[inline]
    #[must_use]
    pub fn planar_radius(&self) -> f32 {
        let [x, _, z] = self.position;
        (x * x + z * z).sqrt()
    }
}

/// Closed interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Span {
    /// Creates a span.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A degenerate span that always samples `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    /// Uniform sample. Degenerate or inverted spans return `min`.
    #[inline]
    pub fn sample(&self, rng: &mut ParticleRng) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// True if `value` lies within the span (inclusive).
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Plane particles are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionPlane {
    /// World x/z plane, `y` is the thin axis.
    Horizontal,
    /// Normalized screen x/y plane, `z` is the thin axis.
    Screen,
}

impl EmissionPlane {
    /// Unit vector at `angle` within the plane.
    #[inline]
    #[must_use]
    pub fn direction(self, angle: f32) -> [f32; 3] {
        let (s, c) = angle.sin_cos();
        match self {
            Self::Horizontal => [c, 0.0, s],
            Self::Screen => [c, s, 0.0],
        }
    }

    /// Index of the axis perpendicular to the plane.
    #[must_use]
    pub const fn normal_axis(self) -> usize {
        match self {
            Self::Horizontal => 1,
            Self::Screen => 2,
        }
    }
}

/// How a particle kind (re)enters its pool.
pub trait SpawnDistribution {
    /// Reinitializes `particle`.
    ///
    /// `scatter` selects the initial wide distribution used when a pool is
    /// (re)built; otherwise the steady-state respawn distribution is used.
    fn spawn(&self, particle: &mut Particle, scatter: bool, power: f32, rng: &mut ParticleRng);
}

/// Per-pool statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Fixed capacity.
    pub capacity: u32,
    /// Particles with life remaining after the last tick.
    pub live: u32,
    /// Slots reinitialized during the last tick.
    pub respawned_this_tick: u32,
}

/// Fixed-capacity particle storage.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Box<[Particle]>,
    stats: PoolStats,
}

impl ParticlePool {
    /// Allocates `capacity` dormant particles.
    #[must_use]
    pub fn new(capacity: usize, kind: ParticleKind) -> Self {
        Self {
            particles: vec![Particle::dormant(kind); capacity].into_boxed_slice(),
            stats: PoolStats {
                capacity: capacity as u32,
                ..PoolStats::default()
            },
        }
    }

    /// Fixed capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// All slots.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// All slots, mutably. The slice length cannot change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Statistics from the last tick or reset.
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Records the outcome of a tick.
    pub(crate) fn finish_tick(&mut self, respawned: u32) {
        self.stats.live = self.particles.iter().filter(|p| p.is_alive()).count() as u32;
        self.stats.respawned_this_tick = respawned;
    }
}

/// Re-scatters every slot with the initial spawn distribution.
pub fn reset_pool<D: SpawnDistribution>(pool: &mut ParticlePool, distribution: &D, power: f32, rng: &mut ParticleRng) {
    for particle in pool.particles_mut() {
        distribution.spawn(particle, true, power, rng);
    }
    let capacity = pool.stats.capacity;
    pool.finish_tick(capacity);
}
