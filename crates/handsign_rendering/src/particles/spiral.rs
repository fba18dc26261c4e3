//! Inward-spiral kind.
//!
//! Particles live on the x/z plane around a central core:
//!
//! ```text
//! r     = |(x, z)| + epsilon
//! v    += -p_hat * (G / r^2) * dt          radial pull
//! s     = omega * dt / (r + swirl_damping)
//! vx   += -z * s ; vz += x * s             tangential swirl
//! p    += v * dt
//! life -= decay * dt
//! ```
//!
//! A particle is consumed (respawned on the outer ring) once it falls inside
//! the capture radius or runs out of life.

use std::f32::consts::TAU;

use rand::Rng;

use super::pool::{Particle, ParticleKind, ParticlePool, Span, SpawnDistribution};
use super::{sim_dt, ParticleRng};

/// Spiral pool parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Gravitational constant of the core.
    pub gravity: f32,
    /// Added to the radius before dividing, keeps the pull finite at the origin.
    pub epsilon: f32,
    /// Softens the swirl near the core.
    pub swirl_damping: f32,
    /// Radius below which a particle is consumed.
    pub capture_radius: f32,
    /// Life lost per second.
    pub decay: f32,
    /// Respawn ring.
    pub spawn_radius: Span,
    /// Initial ring used by [`reset_pool`](super::reset_pool).
    pub scatter_radius: Span,
    /// Half thickness of the disk.
    pub height_jitter: f32,
    /// Life at (re)spawn.
    pub life: Span,
    /// Swirl magnitude; the sign is chosen at random.
    pub angular_speed: Span,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            gravity: 3.8,
            epsilon: 0.001,
            swirl_damping: 0.15,
            capture_radius: 0.2,
            decay: 0.08,
            spawn_radius: Span::new(1.4, 2.2),
            scatter_radius: Span::new(0.4, 2.2),
            height_jitter: 0.03,
            life: Span::new(0.6, 1.0),
            angular_speed: Span::new(0.9, 2.3),
        }
    }
}

impl SpawnDistribution for SpiralParams {
    fn spawn(&self, particle: &mut Particle, scatter: bool, _power: f32, rng: &mut ParticleRng) {
        let r = if scatter {
            self.scatter_radius.sample(rng)
        } else {
            self.spawn_radius.sample(rng)
        };
        let theta = rng.gen_range(0.0..TAU);
        let (s, c) = theta.sin_cos();
        let y = Span::new(-self.height_jitter, self.height_jitter).sample(rng);

        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        particle.position = [c * r, y, s * r];
        particle.velocity = [0.0; 3];
        particle.life = self.life.sample(rng);
        particle.kind = ParticleKind::Spiral {
            angular_velocity: sign * self.angular_speed.sample(rng),
        };
    }
}

/// Advances a spiral pool by `dt` seconds.
pub fn step_spiral(pool: &mut ParticlePool, params: &SpiralParams, dt: f32, rng: &mut ParticleRng) {
    let dt = sim_dt(dt);
    let mut respawned = 0u32;

    for p in pool.particles_mut() {
        let [px, _, pz] = p.position;
        let r = (px * px + pz * pz).sqrt() + params.epsilon;

        let pull = params.gravity / (r * r);
        p.velocity[0] += (-px / r) * pull * dt;
        p.velocity[2] += (-pz / r) * pull * dt;

        let omega = match p.kind {
            ParticleKind::Spiral { angular_velocity } => angular_velocity,
            ParticleKind::Ballistic => 0.0,
        };
        let swirl = omega * dt / (r + params.swirl_damping);
        p.velocity[0] += -pz * swirl;
        p.velocity[2] += px * swirl;

        for axis in 0..3 {
            p.position[axis] += p.velocity[axis] * dt;
        }

        p.life -= params.decay * dt;
        if r < params.capture_radius || p.life <= 0.0 || !p.position.iter().all(|v| v.is_finite()) {
            params.spawn(p, false, 0.0, rng);
            respawned += 1;
        }
    }

    pool.finish_tick(respawned);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::reset_pool;
    use rand::SeedableRng;

    fn within(span: Span, value: f32) -> bool {
        value >= span.min - 1e-4 && value <= span.max + 1e-4
    }

    fn pool(capacity: usize) -> (ParticlePool, SpiralParams, ParticleRng) {
        let params = SpiralParams::default();
        let mut rng = ParticleRng::seed_from_u64(42);
        let mut pool = ParticlePool::new(capacity, ParticleKind::Spiral { angular_velocity: 0.0 });
        reset_pool(&mut pool, &params, 0.0, &mut rng);
        (pool, params, rng)
    }

    #[test]
    fn test_scatter_within_ring() {
        let (pool, params, _) = pool(2000);
        for p in pool.particles() {
            assert!(within(params.scatter_radius, p.planar_radius()));
            assert!(p.position[1].abs() <= params.height_jitter);
            assert!(params.life.contains(p.life));
            assert_eq!(p.velocity, [0.0; 3]);
        }
    }

    #[test]
    fn test_particles_fall_inward() {
        let (mut pool, params, mut rng) = pool(1);
        pool.particles_mut()[0] = Particle {
            position: [1.0, 0.0, 0.0],
            velocity: [0.0; 3],
            life: 1.0,
            kind: ParticleKind::Spiral { angular_velocity: 1.0 },
        };
        step_spiral(&mut pool, &params, 0.016, &mut rng);
        let p = pool.particles()[0];
        assert!(p.velocity[0] < 0.0, "pulled toward origin");
        assert!(p.velocity[2] > 0.0, "positive swirl turns counter-clockwise");
        assert!(p.planar_radius() < 1.0);
    }

    #[test]
    fn test_capture_respawns_on_outer_ring() {
        let (mut pool, params, mut rng) = pool(1);
        pool.particles_mut()[0].position = [0.05, 0.0, 0.0];
        step_spiral(&mut pool, &params, 0.016, &mut rng);
        let p = pool.particles()[0];
        assert!(within(params.spawn_radius, p.planar_radius()));
        assert_eq!(pool.stats().respawned_this_tick, 1);
    }

    #[test]
    fn test_origin_is_finite() {
        let (mut pool, params, mut rng) = pool(1);
        pool.particles_mut()[0].position = [0.0; 3];
        step_spiral(&mut pool, &params, 0.016, &mut rng);
        assert!(pool.particles()[0].position.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_capacity_constant_over_ticks() {
        let (mut pool, params, mut rng) = pool(500);
        for _ in 0..600 {
            step_spiral(&mut pool, &params, 1.0 / 60.0, &mut rng);
            assert_eq!(pool.capacity(), 500);
            assert_eq!(pool.stats().live, 500);
        }
    }
}
