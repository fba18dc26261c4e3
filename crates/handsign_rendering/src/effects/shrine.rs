//! Malevolent Shrine.
//!
//! Rising embers, radial slashes that grow with power and cracks creeping up
//! from the bottom of the frame over a pulsing crimson tint. The glow pass
//! carries a wide crimson halo and oversized copies of the slashes.
//! Normalized screen space.

use std::f32::consts::{PI, TAU};

use handsign_core::Technique;

use super::{arc_lines, index_hash, EffectClock, EffectSettings, EffectStats, TechniqueEffect};
use crate::compositor::{Material, PointInstance, Primitive, SceneGraphs, SceneObject};
use crate::particles::{
    reset_pool, step_ballistic, technique_rng, ArcField, ArcParams, ArcShape, BallisticParams, EmissionPlane,
    ParticleKind, ParticlePool, ParticleRng, Span,
};
use crate::shaders::ShaderKind;

/// Ember particles.
pub const EMBER_PARTICLES: usize = 300;

const CRIMSON_TINT: [f32; 4] = [18.0 / 255.0, 2.0 / 255.0, 2.0 / 255.0, 35.0 / 255.0];
const EMBER_SIZE: f32 = 0.006;

fn ember_params() -> BallisticParams {
    BallisticParams {
        plane: EmissionPlane::Screen,
        origin: [0.5, 0.5, 0.0],
        spawn_radius: Span::new(0.0, 0.7),
        scatter_radius: Span::new(0.0, 0.7),
        speed: Span::new(0.0, 0.05),
        drift: [0.0, -0.12, 0.0],
        drift_jitter: [0.03, 0.04, 0.0],
        normal_jitter: 0.0,
        normal_speed: 0.0,
        acceleration: [0.0; 3],
        life: Span::new(0.3, 1.0),
        decay: 0.36,
        power_bias: Some(0.5),
    }
}

fn slash_params() -> ArcParams {
    ArcParams {
        shape: ArcShape::Radial,
        plane: EmissionPlane::Screen,
        origin: [0.5, 0.5, 0.0],
        origin_spread: [0.0; 3],
        count: (1, 3),
        interval: 0.1,
        interval_jitter: 0.12,
        base_angle: Span::new(0.0, TAU),
        inner_radius: Span::new(0.03, 0.28),
        outer_radius: Span::new(0.4, 0.95),
        power_bias: Some(0.5),
        segments: (1, 1),
        jitter: 0.0,
        angle_wander: 0.4,
        normal_jitter: 0.0,
        ttl: Span::new(0.08, 0.18),
        peak_opacity: 0.95,
        tint: [1.0, 0.1, 0.1],
        alt_tint: [1.0, 0.85, 0.85],
        tint_bias: 0.8,
        width: Span::new(2.0, 5.0),
        expansion: Span::fixed(0.0),
    }
}

fn crack_params() -> ArcParams {
    ArcParams {
        shape: ArcShape::Radial,
        plane: EmissionPlane::Screen,
        origin: [0.5, 0.83, 0.0],
        origin_spread: [0.5, 0.17, 0.0],
        count: (2, 5),
        interval: 0.25,
        interval_jitter: 0.2,
        base_angle: Span::new(-0.8 * PI, -0.2 * PI),
        inner_radius: Span::fixed(0.0),
        outer_radius: Span::new(0.04, 0.17),
        power_bias: None,
        segments: (3, 6),
        jitter: 0.02,
        angle_wander: 0.6,
        normal_jitter: 0.0,
        ttl: Span::new(0.3, 0.6),
        peak_opacity: 0.8,
        tint: [0.55, 0.02, 0.02],
        alt_tint: [1.0, 0.3, 0.1],
        tint_bias: 0.7,
        width: Span::new(1.0, 2.5),
        expansion: Span::fixed(0.0),
    }
}

/// Red channel of the pulse tint at `time`, `[80/255, 110/255]`.
#[must_use]
pub fn pulse_red(time: f32) -> f32 {
    (80.0 + ((time * 3.0).sin() * 0.5 + 0.5) * 30.0) / 255.0
}

/// Malevolent Shrine effect.
#[derive(Debug)]
pub struct MalevolentShrineEffect {
    seed: u64,
    ramp_rate: f32,
    rng: ParticleRng,
    clock: EffectClock,
    embers: ParticlePool,
    ember_params: BallisticParams,
    slashes: ArcField,
    cracks: ArcField,
}

impl MalevolentShrineEffect {
    /// Builds the effect with its pools scattered.
    #[must_use]
    pub fn new(settings: EffectSettings) -> Self {
        let mut effect = Self {
            seed: settings.seed,
            ramp_rate: settings.age_ramp_rate,
            rng: technique_rng(settings.seed, Technique::MalevolentShrine),
            clock: EffectClock::default(),
            embers: ParticlePool::new(EMBER_PARTICLES, ParticleKind::Ballistic),
            ember_params: ember_params(),
            slashes: ArcField::new(slash_params()),
            cracks: ArcField::new(crack_params()),
        };
        effect.restore();
        effect
    }

    /// Ember pool.
    #[must_use]
    pub const fn embers(&self) -> &ParticlePool {
        &self.embers
    }

    /// Slash arcs.
    #[must_use]
    pub const fn slashes(&self) -> &ArcField {
        &self.slashes
    }

    /// Ground cracks.
    #[must_use]
    pub const fn cracks(&self) -> &ArcField {
        &self.cracks
    }

    fn restore(&mut self) {
        self.rng = technique_rng(self.seed, Technique::MalevolentShrine);
        reset_pool(&mut self.embers, &self.ember_params, 0.0, &mut self.rng);
        self.slashes.clear();
        self.cracks.clear();
        self.clock.reset();
    }
}

impl TechniqueEffect for MalevolentShrineEffect {
    fn technique(&self) -> Technique {
        Technique::MalevolentShrine
    }

    fn spawn(&mut self, power: f32) {
        if self.clock.activate(power) {
            tracing::debug!("{} effect activated at power {:.2}", Technique::MalevolentShrine, self.clock.power);
        }
    }

    fn update(&mut self, dt: f32) {
        if !self.clock.active {
            return;
        }
        self.clock.advance(dt, self.ramp_rate);
        let power = self.clock.power;
        step_ballistic(&mut self.embers, &self.ember_params, power, dt, &mut self.rng);
        self.slashes.update(dt, power, &mut self.rng);
        self.cracks.update(dt, power, &mut self.rng);
    }

    fn draw(&self, scenes: &mut SceneGraphs) {
        if !self.clock.active {
            return;
        }
        let age = self.clock.age;
        scenes.uniforms = self.clock.uniforms();

        let main = &mut scenes.main;
        main.add(SceneObject::tint(CRIMSON_TINT).order(-10));
        main.add(SceneObject::tint([pulse_red(self.clock.time), 0.0, 0.0, 15.0 / 255.0]).order(-9));
        main.add_lines(
            SceneObject::lines(Material::normal([1.0, 1.0, 1.0, age])).screen().order(1),
            arc_lines(self.cracks.arcs(), 1.0, 1.0),
        );
        main.add_points(
            SceneObject::points(Material::additive([1.0, 1.0, 1.0, age])).screen().order(2),
            self.embers.particles().iter().enumerate().filter(|(_, p)| p.is_alive()).map(|(i, p)| {
                let life = p.life.min(1.0);
                let green = 0.16 + 0.31 * index_hash(i);
                PointInstance::new(p.position, EMBER_SIZE * (0.5 + life), [1.0, green, 0.12, life])
            }),
        );
        main.add_lines(
            SceneObject::lines(Material::additive([1.0, 1.0, 1.0, age])).screen().order(3),
            arc_lines(self.slashes.arcs(), 1.0, 1.0),
        );

        let glow_alpha = age * self.clock.power;
        scenes.glow.add(
            SceneObject::mesh(
                Primitive::Disk { size: 1.2 },
                ShaderKind::GlowHalo,
                Material::additive([1.0, 0.1, 0.05, glow_alpha * 0.5]),
            )
            .at([0.5, 0.5, 0.0])
            .screen(),
        );
        scenes.glow.add_lines(
            SceneObject::lines(Material::additive([1.0, 1.0, 1.0, glow_alpha])).screen(),
            arc_lines(self.slashes.arcs(), 3.0, 0.5),
        );
    }

    fn clear(&mut self) {
        if self.clock.active {
            tracing::debug!("{} effect cleared after {:.2}s", Technique::MalevolentShrine, self.clock.time);
        }
        self.restore();
    }

    fn is_active(&self) -> bool {
        self.clock.active
    }

    fn stats(&self) -> EffectStats {
        EffectStats::default()
            .with_pool(&self.embers)
            .with_arcs(self.slashes.arcs())
            .with_arcs(self.cracks.arcs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Space;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_embers_rise() {
        let mut effect = MalevolentShrineEffect::new(EffectSettings::default());
        effect.spawn(1.0);
        effect.update(DT);
        // Drift dominates the launch speed: nearly every ember moves up.
        let rising = effect.embers().particles().iter().filter(|p| p.velocity[1] < 0.0).count();
        assert!(rising > EMBER_PARTICLES * 9 / 10);
    }

    #[test]
    fn test_slashes_reach_farther_at_full_power() {
        fn reach(power: f32) -> f32 {
            let mut effect = MalevolentShrineEffect::new(EffectSettings::default());
            let mut best = 0.0f32;
            for _ in 0..120 {
                effect.spawn(power);
                effect.update(DT);
                for arc in effect.slashes().arcs() {
                    let [x, y, _] = arc.points()[arc.points().len() - 1];
                    best = best.max(((x - 0.5).powi(2) + (y - 0.5).powi(2)).sqrt());
                }
            }
            best
        }
        assert!(reach(1.0) > reach(0.0));
    }

    #[test]
    fn test_cracks_point_upward() {
        let mut effect = MalevolentShrineEffect::new(EffectSettings::default());
        effect.spawn(0.5);
        effect.update(DT);
        assert!(!effect.cracks().arcs().is_empty());
        for arc in effect.cracks().arcs() {
            let pts = arc.points();
            assert!(pts[pts.len() - 1][1] < arc.center[1] + 0.03);
        }
    }

    #[test]
    fn test_draw_tints_under_everything() {
        let mut effect = MalevolentShrineEffect::new(EffectSettings::default());
        effect.spawn(0.5);
        effect.update(DT);
        let mut scenes = SceneGraphs::new();
        effect.draw(&mut scenes);
        scenes.finish();

        let objects = scenes.main.objects();
        assert_eq!(objects[0].primitive, Primitive::FullScreen);
        assert_eq!(objects[0].material.color, CRIMSON_TINT);
        assert_eq!(objects[1].primitive, Primitive::FullScreen);
        assert!(objects.iter().all(|o| o.space == Space::Screen));
        // Glow duplicates the slashes only, the cracks stay in the main scene.
        assert!(scenes.glow.lines().len() <= scenes.main.lines().len());
        assert!(scenes.glow.lines().iter().all(|v| v.width >= 6.0));
        assert_eq!(scenes.glow.objects()[0].shader, ShaderKind::GlowHalo);
    }

    #[test]
    fn test_pulse_range() {
        for i in 0..200 {
            let r = pulse_red(i as f32 * 0.05);
            assert!((80.0 / 255.0 - 1e-6..=110.0 / 255.0 + 1e-6).contains(&r));
        }
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut a = MalevolentShrineEffect::new(EffectSettings::default());
        a.spawn(0.8);
        for _ in 0..50 {
            a.update(DT);
        }
        a.clear();
        let once = a.embers().particles().to_vec();
        a.clear();
        assert_eq!(a.embers().particles(), once.as_slice());
        assert!(a.slashes().arcs().is_empty());
        assert_eq!(a.stats().live, EMBER_PARTICLES as u32);
    }
}
