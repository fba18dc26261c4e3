//! Outward-ballistic kind.
//!
//! Splatter, embers, shadows and wisps: launched once from near an origin,
//! then integrated with constant acceleration until their life runs out.

use std::f32::consts::TAU;

use rand::Rng;

use super::pool::{EmissionPlane, Particle, ParticleKind, ParticlePool, Span, SpawnDistribution};
use super::{sim_dt, ParticleRng};

/// Ballistic pool parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticParams {
    /// Plane the launch direction is sampled in.
    pub plane: EmissionPlane,
    /// Emission center.
    pub origin: [f32; 3],
    /// Respawn distance from the origin.
    pub spawn_radius: Span,
    /// Initial distance from the origin used by [`reset_pool`](super::reset_pool).
    pub scatter_radius: Span,
    /// Outward launch speed.
    pub speed: Span,
    /// Constant velocity added at launch.
    pub drift: [f32; 3],
    /// Per-axis uniform jitter (half width) added to `drift`.
    pub drift_jitter: [f32; 3],
    /// Half thickness along the plane normal.
    pub normal_jitter: f32,
    /// Half range of launch velocity along the plane normal.
    pub normal_speed: f32,
    /// Applied every tick (gravity). Zero for pure splatter.
    pub acceleration: [f32; 3],
    /// Life at (re)spawn.
    pub life: Span,
    /// Life lost per second.
    pub decay: f32,
    /// When set, launch velocity is scaled by `bias + power`.
    pub power_bias: Option<f32>,
}

impl Default for BallisticParams {
    fn default() -> Self {
        Self {
            plane: EmissionPlane::Horizontal,
            origin: [0.0; 3],
            spawn_radius: Span::new(0.25, 0.35),
            scatter_radius: Span::new(0.0, 2.2),
            speed: Span::new(0.6, 1.8),
            drift: [0.0; 3],
            drift_jitter: [0.0; 3],
            normal_jitter: 0.15,
            normal_speed: 0.075,
            acceleration: [0.0; 3],
            life: Span::new(0.4, 1.0),
            decay: 0.22,
            power_bias: None,
        }
    }
}

impl BallisticParams {
    /// Launch velocity multiplier at the given power.
    #[inline]
    #[must_use]
    pub fn power_factor(&self, power: f32) -> f32 {
        self.power_bias.map_or(1.0, |bias| bias + power.clamp(0.0, 1.0))
    }
}

impl SpawnDistribution for BallisticParams {
    fn spawn(&self, particle: &mut Particle, scatter: bool, power: f32, rng: &mut ParticleRng) {
        let angle = rng.gen_range(0.0..TAU);
        let dir = self.plane.direction(angle);
        let r0 = if scatter {
            self.scatter_radius.sample(rng)
        } else {
            self.spawn_radius.sample(rng)
        };
        let speed = self.speed.sample(rng);
        let factor = self.power_factor(power);
        let normal = self.plane.normal_axis();

        for axis in 0..3 {
            particle.position[axis] = self.origin[axis] + dir[axis] * r0;
            let jitter = Span::new(-self.drift_jitter[axis], self.drift_jitter[axis]).sample(rng);
            particle.velocity[axis] = (dir[axis] * speed + self.drift[axis] + jitter) * factor;
        }
        particle.position[normal] += Span::new(-self.normal_jitter, self.normal_jitter).sample(rng);
        particle.velocity[normal] += Span::new(-self.normal_speed, self.normal_speed).sample(rng);

        particle.life = self.life.sample(rng);
        particle.kind = ParticleKind::Ballistic;
    }
}

/// Advances a ballistic pool by `dt` seconds. Respawns use the current power.
pub fn step_ballistic(pool: &mut ParticlePool, params: &BallisticParams, power: f32, dt: f32, rng: &mut ParticleRng) {
    let dt = sim_dt(dt);
    let mut respawned = 0u32;

    for p in pool.particles_mut() {
        for axis in 0..3 {
            p.velocity[axis] += params.acceleration[axis] * dt;
            p.position[axis] += p.velocity[axis] * dt;
        }
        p.life -= params.decay * dt;
        if p.life <= 0.0 {
            params.spawn(p, false, power, rng);
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

    fn launched(params: &BallisticParams, power: f32) -> Particle {
        let mut rng = ParticleRng::seed_from_u64(3);
        let mut p = Particle::dormant(ParticleKind::Ballistic);
        params.spawn(&mut p, false, power, &mut rng);
        p
    }

    #[test]
    fn test_launch_is_outward() {
        let params = BallisticParams::default();
        for seed in 0..64 {
            let mut rng = ParticleRng::seed_from_u64(seed);
            let mut p = Particle::dormant(ParticleKind::Ballistic);
            params.spawn(&mut p, false, 0.5, &mut rng);
            let radial = p.position[0] * p.velocity[0] + p.position[2] * p.velocity[2];
            assert!(radial > 0.0);
            assert!(p.planar_radius() >= 0.25 - 1e-4 && p.planar_radius() <= 0.35 + 1e-4);
        }
    }

    #[test]
    fn test_power_scales_launch() {
        let params = BallisticParams {
            plane: EmissionPlane::Screen,
            normal_speed: 0.0,
            power_bias: Some(0.5),
            ..BallisticParams::default()
        };
        let slow = launched(&params, 0.0);
        let fast = launched(&params, 1.0);
        // Same seed, same direction: speed ratio is (0.5 + 1) / (0.5 + 0)
        assert!((fast.velocity[0] - slow.velocity[0] * 3.0).abs() < 1e-5);
        assert_eq!(fast.velocity[2], 0.0);
    }

    #[test]
    fn test_gravity_bends_path() {
        let params = BallisticParams {
            acceleration: [0.0, 0.15, 0.0],
            decay: 0.0,
            ..BallisticParams::default()
        };
        let mut rng = ParticleRng::seed_from_u64(9);
        let mut pool = ParticlePool::new(1, ParticleKind::Ballistic);
        reset_pool(&mut pool, &params, 0.5, &mut rng);
        let vy = pool.particles()[0].velocity[1];
        step_ballistic(&mut pool, &params, 0.5, 1.0, &mut rng);
        assert!((pool.particles()[0].velocity[1] - (vy + 0.15)).abs() < 1e-6);
    }

    #[test]
    fn test_expired_particles_respawn() {
        let params = BallisticParams::default();
        let mut rng = ParticleRng::seed_from_u64(11);
        let mut pool = ParticlePool::new(64, ParticleKind::Ballistic);
        reset_pool(&mut pool, &params, 0.5, &mut rng);
        // Long enough for every particle to expire at least once.
        for _ in 0..400 {
            step_ballistic(&mut pool, &params, 0.5, 1.0 / 60.0, &mut rng);
        }
        assert_eq!(pool.stats().live, 64);
        for p in pool.particles() {
            assert!(p.life > 0.0 && p.life <= 1.0);
        }
    }
}
