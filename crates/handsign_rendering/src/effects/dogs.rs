//! Divine Dogs.
//!
//! Shadow particles burst from below the hands and sink under a light
//! gravity, cyan wisps trail upward and sigil rings flicker around the
//! summoning point. Normalized screen space.

use handsign_core::Technique;

use super::{arc_lines, EffectClock, EffectSettings, EffectStats, TechniqueEffect};
use crate::compositor::{Material, PointInstance, Primitive, SceneGraphs, SceneObject};
use crate::particles::{
    reset_pool, step_ballistic, technique_rng, ArcField, ArcParams, ArcShape, BallisticParams, EmissionPlane,
    ParticleKind, ParticlePool, ParticleRng, Span,
};
use crate::shaders::ShaderKind;

/// Shadow particles.
pub const SHADOW_PARTICLES: usize = 80;
/// Trail wisps.
pub const TRAIL_PARTICLES: usize = 200;

const SUMMON_POINT: [f32; 3] = [0.5, 0.6, 0.0];
const DARK_BLUE_TINT: [f32; 4] = [4.0 / 255.0, 4.0 / 255.0, 20.0 / 255.0, 35.0 / 255.0];
const CYAN: [f32; 3] = [0.0, 0.9, 1.0];
const SHADOW_SIZE: f32 = 0.05;
const TRAIL_SIZE: f32 = 0.006;

fn shadow_params() -> BallisticParams {
    BallisticParams {
        plane: EmissionPlane::Screen,
        origin: SUMMON_POINT,
        spawn_radius: Span::new(0.08, 0.28),
        scatter_radius: Span::new(0.08, 0.28),
        speed: Span::new(0.17, 0.5),
        drift: [0.0, -0.083, 0.0],
        drift_jitter: [0.0; 3],
        normal_jitter: 0.0,
        normal_speed: 0.0,
        acceleration: [0.0, 0.15, 0.0],
        life: Span::new(0.5, 1.0),
        decay: 0.85,
        power_bias: Some(0.5),
    }
}

fn trail_params() -> BallisticParams {
    BallisticParams {
        plane: EmissionPlane::Screen,
        origin: [0.5, 0.75, 0.0],
        spawn_radius: Span::new(0.0, 0.35),
        scatter_radius: Span::new(0.0, 0.35),
        speed: Span::new(0.0, 0.03),
        drift: [0.0, -0.2, 0.0],
        drift_jitter: [0.02, 0.05, 0.0],
        normal_jitter: 0.0,
        normal_speed: 0.0,
        acceleration: [0.0; 3],
        life: Span::new(0.4, 1.0),
        decay: 0.7,
        power_bias: None,
    }
}

fn sigil_params() -> ArcParams {
    ArcParams {
        shape: ArcShape::Ring,
        plane: EmissionPlane::Screen,
        origin: SUMMON_POINT,
        origin_spread: [0.25, 0.15, 0.0],
        count: (1, 2),
        interval: 0.35,
        interval_jitter: 0.25,
        base_angle: Span::new(0.0, std::f32::consts::TAU),
        inner_radius: Span::new(0.055, 0.14),
        outer_radius: Span::fixed(0.14),
        power_bias: None,
        segments: (15, 15),
        jitter: 0.006,
        angle_wander: 0.0,
        normal_jitter: 0.0,
        ttl: Span::new(0.4, 0.8),
        peak_opacity: 0.8,
        tint: [0.2, 0.85, 1.0],
        alt_tint: [0.55, 0.35, 1.0],
        tint_bias: 0.75,
        width: Span::new(1.5, 2.5),
        expansion: Span::fixed(0.0),
    }
}

/// Divine Dogs effect.
#[derive(Debug)]
pub struct DivineDogsEffect {
    seed: u64,
    ramp_rate: f32,
    rng: ParticleRng,
    clock: EffectClock,
    shadows: ParticlePool,
    shadow_params: BallisticParams,
    trails: ParticlePool,
    trail_params: BallisticParams,
    sigils: ArcField,
}

impl DivineDogsEffect {
    /// Builds the effect with its pools scattered.
    #[must_use]
    pub fn new(settings: EffectSettings) -> Self {
        let mut effect = Self {
            seed: settings.seed,
            ramp_rate: settings.age_ramp_rate,
            rng: technique_rng(settings.seed, Technique::DivineDogs),
            clock: EffectClock::default(),
            shadows: ParticlePool::new(SHADOW_PARTICLES, ParticleKind::Ballistic),
            shadow_params: shadow_params(),
            trails: ParticlePool::new(TRAIL_PARTICLES, ParticleKind::Ballistic),
            trail_params: trail_params(),
            sigils: ArcField::new(sigil_params()),
        };
        effect.restore();
        effect
    }

    /// Shadow pool.
    #[must_use]
    pub const fn shadows(&self) -> &ParticlePool {
        &self.shadows
    }

    /// Trail pool.
    #[must_use]
    pub const fn trails(&self) -> &ParticlePool {
        &self.trails
    }

    /// Sigil rings.
    #[must_use]
    pub const fn sigils(&self) -> &ArcField {
        &self.sigils
    }

    fn restore(&mut self) {
        self.rng = technique_rng(self.seed, Technique::DivineDogs);
        reset_pool(&mut self.shadows, &self.shadow_params, 0.0, &mut self.rng);
        reset_pool(&mut self.trails, &self.trail_params, 0.0, &mut self.rng);
        self.sigils.clear();
        self.clock.reset();
    }
}

impl TechniqueEffect for DivineDogsEffect {
    fn technique(&self) -> Technique {
        Technique::DivineDogs
    }

    fn spawn(&mut self, power: f32) {
        if self.clock.activate(power) {
            tracing::debug!("{} effect activated at power {:.2}", Technique::DivineDogs, self.clock.power);
        }
    }

    fn update(&mut self, dt: f32) {
        if !self.clock.active {
            return;
        }
        self.clock.advance(dt, self.ramp_rate);
        let power = self.clock.power;
        step_ballistic(&mut self.shadows, &self.shadow_params, power, dt, &mut self.rng);
        step_ballistic(&mut self.trails, &self.trail_params, power, dt, &mut self.rng);
        self.sigils.update(dt, power, &mut self.rng);
    }

    fn draw(&self, scenes: &mut SceneGraphs) {
        if !self.clock.active {
            return;
        }
        let age = self.clock.age;
        let [r, g, b] = CYAN;
        scenes.uniforms = self.clock.uniforms();

        let main = &mut scenes.main;
        main.add(SceneObject::tint(DARK_BLUE_TINT).order(-10));
        main.add_points(
            SceneObject::points(Material::additive([1.0, 1.0, 1.0, age])).screen().order(1),
            self.trails
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, TRAIL_SIZE, [r, g, b, p.life.min(1.0) * 0.6])),
        );
        // Cyan rim first, the dark body covers its center.
        main.add_points(
            SceneObject::points(Material::additive([1.0, 1.0, 1.0, age])).screen().order(2),
            self.shadows
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, SHADOW_SIZE * 1.4, [r, g, b, p.life.min(1.0) * 0.35])),
        );
        main.add_points(
            SceneObject::points(Material::normal([1.0, 1.0, 1.0, age])).screen().order(3),
            self.shadows
                .particles()
                .iter()
                .filter(|p| p.is_alive())
                .map(|p| PointInstance::new(p.position, SHADOW_SIZE, [0.02, 0.02, 0.08, p.life.min(1.0) * 0.85])),
        );
        main.add_lines(
            SceneObject::lines(Material::additive([1.0, 1.0, 1.0, age])).screen().order(4),
            arc_lines(self.sigils.arcs(), 1.0, 1.0),
        );

        scenes.glow.add(
            SceneObject::mesh(
                Primitive::Disk { size: 0.9 },
                ShaderKind::GlowHalo,
                Material::additive([r, g, b, age * self.clock.power * 0.6]),
            )
            .at(SUMMON_POINT)
            .screen(),
        );
    }

    fn clear(&mut self) {
        if self.clock.active {
            tracing::debug!("{} effect cleared after {:.2}s", Technique::DivineDogs, self.clock.time);
        }
        self.restore();
    }

    fn is_active(&self) -> bool {
        self.clock.active
    }

    fn stats(&self) -> EffectStats {
        EffectStats::default()
            .with_pool(&self.shadows)
            .with_pool(&self.trails)
            .with_arcs(self.sigils.arcs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{BlendMode, Space};

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_shadows_fall_back() {
        let mut effect = DivineDogsEffect::new(EffectSettings::default());
        effect.spawn(0.5);
        effect.update(DT);
        let before: Vec<f32> = effect.shadows().particles().iter().map(|p| p.velocity[1]).collect();
        effect.update(DT);
        // Minimum life outlasts two frames of decay.
        assert_eq!(effect.shadows().stats().respawned_this_tick, 0);
        for (p, vy) in effect.shadows().particles().iter().zip(before) {
            assert!(p.velocity[1] > vy);
        }
    }

    #[test]
    fn test_sigils_are_closed_rings() {
        let mut effect = DivineDogsEffect::new(EffectSettings::default());
        effect.spawn(0.5);
        effect.update(DT);
        let arcs = effect.sigils().arcs();
        assert!(!arcs.is_empty());
        for arc in arcs {
            assert!(arc.closed);
            assert_eq!(arc.points().len(), 16);
            for p in arc.points() {
                let d = ((p[0] - arc.center[0]).powi(2) + (p[1] - arc.center[1]).powi(2)).sqrt();
                assert!((0.05..=0.15).contains(&d));
            }
        }
    }

    #[test]
    fn test_draw_layers() {
        let mut effect = DivineDogsEffect::new(EffectSettings::default());
        effect.spawn(0.9);
        effect.update(DT);
        let mut scenes = SceneGraphs::new();
        effect.draw(&mut scenes);
        scenes.finish();

        let main = scenes.main.objects();
        assert_eq!(main[0].shader, ShaderKind::ScreenTint);
        assert_eq!(main[0].material.color, DARK_BLUE_TINT);
        assert_eq!(main[3].material.blend, BlendMode::Normal);
        assert!(main.iter().all(|o| o.space == Space::Screen));

        let halo = &scenes.glow.objects()[0];
        assert_eq!(halo.shader, ShaderKind::GlowHalo);
        assert_eq!(halo.position, SUMMON_POINT);
    }

    #[test]
    fn test_clear_restores_initial_pools() {
        let fresh = DivineDogsEffect::new(EffectSettings::default());
        let mut used = DivineDogsEffect::new(EffectSettings::default());
        used.spawn(0.3);
        for _ in 0..90 {
            used.update(DT);
        }
        used.clear();
        assert_eq!(used.shadows().particles(), fresh.shadows().particles());
        assert_eq!(used.trails().particles(), fresh.trails().particles());
        assert_eq!(used.stats(), fresh.stats());
    }
}
