//! Self-Embodiment of Perfection.
//!
//! Green souls drift out of the center, distortion waves expand as rings and
//! glitch bars tear across the frame. Normalized screen space.

use std::f32::consts::TAU;

use handsign_core::Technique;

use super::{arc_lines, EffectClock, EffectSettings, EffectStats, TechniqueEffect};
use crate::compositor::{Material, PointInstance, Primitive, SceneGraphs, SceneObject};
use crate::particles::{
    reset_pool, step_ballistic, technique_rng, ArcField, ArcParams, ArcShape, BallisticParams, EmissionPlane,
    ParticleKind, ParticlePool, ParticleRng, Span,
};
use crate::shaders::ShaderKind;

/// Soul particles.
pub const SOUL_PARTICLES: usize = 250;

const CENTER: [f32; 3] = [0.5, 0.5, 0.0];
const GREEN_TINT: [f32; 4] = [5.0 / 255.0, 15.0 / 255.0, 5.0 / 255.0, 35.0 / 255.0];
const SOUL_SIZE: f32 = 0.012;
const SOUL_GLOW_SIZE: f32 = 0.04;
const HALO_SIZE: f32 = 0.6;

fn soul_params() -> BallisticParams {
    BallisticParams {
        plane: EmissionPlane::Screen,
        origin: CENTER,
        spawn_radius: Span::new(0.028, 0.28),
        scatter_radius: Span::new(0.028, 0.28),
        speed: Span::new(0.05, 0.2),
        drift: [0.0; 3],
        drift_jitter: [0.04, 0.04, 0.0],
        normal_jitter: 0.0,
        normal_speed: 0.0,
        acceleration: [0.0; 3],
        life: Span::new(0.5, 1.0),
        decay: 0.5,
        power_bias: Some(0.5),
    }
}

fn wave_params() -> ArcParams {
    ArcParams {
        shape: ArcShape::Ring,
        plane: EmissionPlane::Screen,
        origin: CENTER,
        origin_spread: [0.1, 0.1, 0.0],
        count: (1, 2),
        interval: 0.4,
        interval_jitter: 0.3,
        base_angle: Span::new(0.0, TAU),
        inner_radius: Span::new(0.05, 0.12),
        outer_radius: Span::fixed(0.12),
        power_bias: Some(0.5),
        segments: (15, 15),
        jitter: 0.01,
        angle_wander: 0.0,
        normal_jitter: 0.0,
        ttl: Span::new(0.6, 1.0),
        peak_opacity: 0.7,
        tint: [0.3, 1.0, 0.5],
        alt_tint: [0.7, 1.0, 0.8],
        tint_bias: 0.7,
        width: Span::new(1.0, 2.0),
        expansion: Span::new(0.25, 0.58),
    }
}

fn glitch_params() -> ArcParams {
    ArcParams {
        shape: ArcShape::Bar,
        plane: EmissionPlane::Screen,
        origin: CENTER,
        origin_spread: [0.5, 0.5, 0.0],
        count: (2, 5),
        interval: 0.06,
        interval_jitter: 0.1,
        base_angle: Span::fixed(0.0),
        inner_radius: Span::fixed(0.0),
        outer_radius: Span::new(0.03, 0.2),
        power_bias: None,
        segments: (1, 1),
        jitter: 0.0,
        angle_wander: 0.0,
        normal_jitter: 0.0,
        ttl: Span::new(0.03, 0.09),
        peak_opacity: 0.85,
        tint: [0.4, 1.0, 0.5],
        alt_tint: [1.0, 1.0, 1.0],
        tint_bias: 0.6,
        width: Span::new(2.0, 6.0),
        expansion: Span::fixed(0.0),
    }
}

/// Scale of the central halo at `time`.
#[must_use]
pub fn halo_pulse(time: f32) -> f32 {
    1.0 + 0.15 * (time * 4.0).sin()
}

/// Self-Embodiment effect.
#[derive(Debug)]
pub struct SelfEmbodimentEffect {
    seed: u64,
    ramp_rate: f32,
    rng: ParticleRng,
    clock: EffectClock,
    souls: ParticlePool,
    soul_params: BallisticParams,
    waves: ArcField,
    glitches: ArcField,
}

impl SelfEmbodimentEffect {
    /// Builds the effect with its pools scattered.
    #[must_use]
    pub fn new(settings: EffectSettings) -> Self {
        let mut effect = Self {
            seed: settings.seed,
            ramp_rate: settings.age_ramp_rate,
            rng: technique_rng(settings.seed, Technique::SelfEmbodiment),
            clock: EffectClock::default(),
            souls: ParticlePool::new(SOUL_PARTICLES, ParticleKind::Ballistic),
            soul_params: soul_params(),
            waves: ArcField::new(wave_params()),
            glitches: ArcField::new(glitch_params()),
        };
        effect.restore();
        effect
    }

    /// Soul pool.
    #[must_use]
    pub const fn souls(&self) -> &ParticlePool {
        &self.souls
    }

    /// Distortion waves.
    #[must_use]
    pub const fn waves(&self) -> &ArcField {
        &self.waves
    }

    /// Glitch bars.
    #[must_use]
    pub const fn glitches(&self) -> &ArcField {
        &self.glitches
    }

    fn restore(&mut self) {
        self.rng = technique_rng(self.seed, Technique::SelfEmbodiment);
        reset_pool(&mut self.souls, &self.soul_params, 0.0, &mut self.rng);
        self.waves.clear();
        self.glitches.clear();
        self.clock.reset();
    }
}

impl TechniqueEffect for SelfEmbodimentEffect {
    fn technique(&self) -> Technique {
        Technique::SelfEmbodiment
    }

    fn spawn(&mut self, power: f32) {
        if self.clock.activate(power) {
            tracing::debug!("{} effect activated at power {:.2}", Technique::SelfEmbodiment, self.clock.power);
        }
    }

    fn update(&mut self, dt: f32) {
        if !self.clock.active {
            return;
        }
        self.clock.advance(dt, self.ramp_rate);
        let power = self.clock.power;
        step_ballistic(&mut self.souls, &self.soul_params, power, dt, &mut self.rng);
        self.waves.update(dt, power, &mut self.rng);
        self.glitches.update(dt, power, &mut self.rng);
    }

    fn draw(&self, scenes: &mut SceneGraphs) {
        if !self.clock.active {
            return;
        }
        let age = self.clock.age;
        scenes.uniforms = self.clock.uniforms();

        let main = &mut scenes.main;
        main.add(SceneObject::tint(GREEN_TINT).order(-10));
        main.add(
            SceneObject::mesh(
                Primitive::Disk { size: 0.22 },
                ShaderKind::EnergySurface,
                Material::additive([0.3, 1.0, 0.4, 0.5 * age]),
            )
            .at(CENTER)
            .screen()
            .order(1),
        );
        main.add_lines(
            SceneObject::lines(Material::additive([1.0, 1.0, 1.0, age])).screen().order(2),
            arc_lines(self.waves.arcs(), 1.0, 1.0),
        );
        main.add_points(
            SceneObject::points(Material::additive([1.0, 1.0, 1.0, age])).screen().order(3),
            self.souls
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, SOUL_GLOW_SIZE, [0.2, 1.0, 0.3, p.life.min(1.0) * 0.3])),
        );
        main.add_points(
            SceneObject::points(Material::normal([1.0, 1.0, 1.0, age])).screen().order(4),
            self.souls
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, SOUL_SIZE, [0.3, 1.0, 0.4, p.life.min(1.0)])),
        );
        main.add_lines(
            SceneObject::lines(Material::additive([1.0, 1.0, 1.0, age])).screen().order(5),
            arc_lines(self.glitches.arcs(), 1.0, 1.0),
        );

        scenes.glow.add(
            SceneObject::mesh(
                Primitive::Disk { size: HALO_SIZE },
                ShaderKind::GlowHalo,
                Material::additive([0.3, 1.0, 0.4, age * self.clock.power]),
            )
            .at(CENTER)
            .scaled(halo_pulse(self.clock.time))
            .screen(),
        );
    }

    fn clear(&mut self) {
        if self.clock.active {
            tracing::debug!("{} effect cleared after {:.2}s", Technique::SelfEmbodiment, self.clock.time);
        }
        self.restore();
    }

    fn is_active(&self) -> bool {
        self.clock.active
    }

    fn stats(&self) -> EffectStats {
        EffectStats::default()
            .with_pool(&self.souls)
            .with_arcs(self.waves.arcs())
            .with_arcs(self.glitches.arcs())
    }
}
