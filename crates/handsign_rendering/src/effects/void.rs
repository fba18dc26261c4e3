//! Unlimited Void.
//!
//! A vibrating black core inside a swirling ink disk. Thousands of ink
//! particles spiral into the core, black blobs splatter outward and short
//! white arcs crackle around the event horizon. World space, camera at
//! `z = 5`.

use handsign_core::Technique;

use super::{arc_lines, EffectClock, EffectSettings, EffectStats, TechniqueEffect};
use crate::compositor::{FaceSide, Material, PointInstance, Primitive, SceneGraphs, SceneObject};
use crate::particles::{
    reset_pool, step_ballistic, step_spiral, technique_rng, ArcField, ArcParams, BallisticParams, ParticleKind,
    ParticlePool, ParticleRng, SpiralParams,
};
use crate::shaders::ShaderKind;

/// Spiral ink particles.
pub const INK_PARTICLES: usize = 5000;
/// Outward splatter blobs.
pub const BLOB_PARTICLES: usize = 420;

const CORE_RADIUS: f32 = 0.22;
const HALO_RADIUS: f32 = 0.55;
const VORTEX_SIZE: f32 = 3.6;
const INK_SIZE: f32 = 0.014;
const BLOB_SIZE: f32 = 0.09;

/// Irregular scale wobble of the core.
#[must_use]
pub fn core_vibration(time: f32) -> f32 {
    1.0 + (time * 28.3).sin() * 0.025 + (time * 47.1).sin() * 0.012 + (time * 11.7).sin() * 0.018
}

/// Unlimited Void effect.
#[derive(Debug)]
pub struct UnlimitedVoidEffect {
    seed: u64,
    ramp_rate: f32,
    rng: ParticleRng,
    clock: EffectClock,
    ink: ParticlePool,
    ink_params: SpiralParams,
    blobs: ParticlePool,
    blob_params: BallisticParams,
    arcs: ArcField,
}

impl UnlimitedVoidEffect {
    /// Builds the effect with its pools scattered.
    #[must_use]
    pub fn new(settings: EffectSettings) -> Self {
        let mut effect = Self {
            seed: settings.seed,
            ramp_rate: settings.age_ramp_rate,
            rng: technique_rng(settings.seed, Technique::UnlimitedVoid),
            clock: EffectClock::default(),
            ink: ParticlePool::new(INK_PARTICLES, ParticleKind::Spiral { angular_velocity: 0.0 }),
            ink_params: SpiralParams::default(),
            blobs: ParticlePool::new(BLOB_PARTICLES, ParticleKind::Ballistic),
            blob_params: BallisticParams::default(),
            arcs: ArcField::new(ArcParams::default()),
        };
        effect.restore();
        effect
    }

    /// Ink pool.
    #[must_use]
    pub const fn ink(&self) -> &ParticlePool {
        &self.ink
    }

    /// Blob pool.
    #[must_use]
    pub const fn blobs(&self) -> &ParticlePool {
        &self.blobs
    }

    /// Electric arcs.
    #[must_use]
    pub const fn arcs(&self) -> &ArcField {
        &self.arcs
    }

    /// Lifecycle clock.
    #[must_use]
    pub const fn clock(&self) -> &EffectClock {
        &self.clock
    }

    fn restore(&mut self) {
        self.rng = technique_rng(self.seed, Technique::UnlimitedVoid);
        reset_pool(&mut self.ink, &self.ink_params, 0.0, &mut self.rng);
        reset_pool(&mut self.blobs, &self.blob_params, 0.0, &mut self.rng);
        self.arcs.clear();
        self.clock.reset();
    }
}

impl TechniqueEffect for UnlimitedVoidEffect {
    fn technique(&self) -> Technique {
        Technique::UnlimitedVoid
    }

    fn spawn(&mut self, power: f32) {
        if self.clock.activate(power) {
            tracing::debug!("{} effect activated at power {:.2}", Technique::UnlimitedVoid, self.clock.power);
        }
    }

    fn update(&mut self, dt: f32) {
        if !self.clock.active {
            return;
        }
        self.clock.advance(dt, self.ramp_rate);
        let power = self.clock.power;
        step_spiral(&mut self.ink, &self.ink_params, dt, &mut self.rng);
        step_ballistic(&mut self.blobs, &self.blob_params, power, dt, &mut self.rng);
        self.arcs.update(dt, power, &mut self.rng);
    }

    fn draw(&self, scenes: &mut SceneGraphs) {
        if !self.clock.active {
            return;
        }
        let age = self.clock.age;
        let vib = core_vibration(self.clock.time);
        scenes.uniforms = self.clock.uniforms();

        let main = &mut scenes.main;
        main.add(
            SceneObject::mesh(
                Primitive::Disk { size: VORTEX_SIZE },
                ShaderKind::InkVortex,
                Material::normal([1.0; 4]).with_side(FaceSide::Double),
            )
            .order(2),
        );
        main.add_points(
            SceneObject::points(Material::normal([0.0, 0.0, 0.0, age])).order(3),
            self.blobs
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, BLOB_SIZE, [0.0, 0.0, 0.0, p.life.min(1.0)])),
        );
        main.add_points(
            SceneObject::points(Material::additive([1.0, 1.0, 1.0, 0.9 * age])).order(4),
            self.ink
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, INK_SIZE, [1.0, 1.0, 1.0, p.life.min(1.0)])),
        );
        main.add(
            SceneObject::mesh(
                Primitive::Sphere { radius: CORE_RADIUS },
                ShaderKind::VoidCore,
                Material::normal([0.0, 0.0, 0.0, 1.0]).with_depth_write(),
            )
            .scaled(vib)
            .order(5),
        );
        main.add_lines(
            SceneObject::lines(Material::additive([1.0, 1.0, 1.0, age])).order(8),
            arc_lines(self.arcs.arcs(), 1.0, 1.0),
        );

        scenes.glow.add(
            SceneObject::mesh(
                Primitive::Sphere { radius: HALO_RADIUS },
                ShaderKind::GlowHalo,
                Material::additive([0.75, 0.85, 1.0, age * self.clock.power]).with_side(FaceSide::Back),
            )
            .scaled(vib * 2.0),
        );
    }

    fn clear(&mut self) {
        if self.clock.active {
            tracing::debug!("{} effect cleared after {:.2}s", Technique::UnlimitedVoid, self.clock.time);
        }
        self.restore();
    }

    fn is_active(&self) -> bool {
        self.clock.active
    }

    fn stats(&self) -> EffectStats {
        EffectStats::default()
            .with_pool(&self.ink)
            .with_pool(&self.blobs)
            .with_arcs(self.arcs.arcs())
    }
}
