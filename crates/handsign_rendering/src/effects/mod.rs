//! # Technique Effects
//!
//! One owned context per technique. Each effect keeps its pools, arc fields
//! and generator for the whole session; nothing is allocated after
//! construction.
//!
//! ```text
//!            spawn(power)          update(dt)            draw(scenes)
//! dormant ────────────────▶ active ──────────▶ active ──────────────▶ main + glow
//!    ▲                                                                    │
//!    └──────────────────────────── clear() ◀──────────────────────────────┘
//! ```
//!
//! `clear()` reseeds the effect's generator and re-scatters its pools, so a
//! cleared effect is indistinguishable from a freshly built one.

mod dogs;
mod embodiment;
mod shrine;
mod void;

pub use dogs::DivineDogsEffect;
pub use embodiment::SelfEmbodimentEffect;
pub use shrine::MalevolentShrineEffect;
pub use void::UnlimitedVoidEffect;

use handsign_core::Technique;

use crate::compositor::{ramp_age, EffectUniforms, LineVertex, SceneGraphs};
use crate::particles::{sim_dt, ArcSegment, ParticlePool};

/// Default activation ramp, per second.
pub const DEFAULT_AGE_RAMP_RATE: f32 = 0.55;

/// Construction settings shared by every effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    /// Session seed; each technique derives its own stream from it.
    pub seed: u64,
    /// Activation ramp rate, per second.
    pub age_ramp_rate: f32,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            seed: 7,
            age_ramp_rate: DEFAULT_AGE_RAMP_RATE,
        }
    }
}

/// Lifecycle shared by the four technique effects.
pub trait TechniqueEffect {
    /// Technique this effect renders.
    fn technique(&self) -> Technique;

    /// Activates the effect (if dormant) and stores the current power.
    fn spawn(&mut self, power: f32);

    /// Advances the simulation. Does nothing while dormant.
    fn update(&mut self, dt: f32);

    /// Appends the effect's objects to both scenes and sets the uniforms.
    /// Does nothing while dormant.
    fn draw(&self, scenes: &mut SceneGraphs);

    /// Hides the effect and restores its initial simulation state. Idempotent.
    fn clear(&mut self);

    /// True between `spawn` and `clear`.
    fn is_active(&self) -> bool;

    /// Particle and arc counts.
    fn stats(&self) -> EffectStats;
}

/// Statistics of one effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectStats {
    /// Pool slots across every pool.
    pub capacity: u32,
    /// Live particles after the last tick.
    pub live: u32,
    /// Slots respawned during the last tick.
    pub respawned: u32,
    /// Live arcs.
    pub arcs: u32,
}

impl EffectStats {
    /// Accumulates a pool.
    #[must_use]
    pub fn with_pool(mut self, pool: &ParticlePool) -> Self {
        let s = pool.stats();
        self.capacity += s.capacity;
        self.live += s.live;
        self.respawned += s.respawned_this_tick;
        self
    }

    /// Accumulates an arc set.
    #[must_use]
    pub fn with_arcs(mut self, arcs: &[ArcSegment]) -> Self {
        self.arcs += arcs.len() as u32;
        self
    }
}

/// Time, activation ramp and power of one effect.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectClock {
    /// Seconds since activation.
    pub time: f32,
    /// Activation ramp, `[0, 1]`.
    pub age: f32,
    /// Power from the latest spawn.
    pub power: f32,
    /// Between spawn and clear.
    pub active: bool,
}

impl EffectClock {
    /// Stores `power`; returns true if this call activated the effect.
    pub fn activate(&mut self, power: f32) -> bool {
        let first = !self.active;
        self.active = true;
        self.power = if power.is_finite() { power.clamp(0.0, 1.0) } else { 0.0 };
        first
    }

    /// Advances time and the activation ramp.
    pub fn advance(&mut self, dt: f32, rate: f32) {
        let dt = sim_dt(dt);
        self.time += dt;
        self.age = ramp_age(self.age, rate, dt);
    }

    /// Uniforms for the shaders.
    #[must_use]
    pub const fn uniforms(&self) -> EffectUniforms {
        EffectUniforms::new(self.time, self.power, self.age)
    }

    /// Back to dormant.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Line-list vertices for a set of arcs.
pub(crate) fn arc_lines(arcs: &[ArcSegment], width_scale: f32, opacity_scale: f32) -> impl Iterator<Item = LineVertex> + '_ {
    arcs.iter().flat_map(move |arc| {
        let n = arc.points().len();
        let [r, g, b] = arc.tint;
        let color = [r, g, b, arc.opacity() * opacity_scale];
        let width = arc.width * width_scale;
        let edges = if arc.closed { n } else { n.saturating_sub(1) };
        (0..edges).flat_map(move |i| {
            [
                LineVertex::new(arc.point_at(i), width, color),
                LineVertex::new(arc.point_at((i + 1) % n), width, color),
            ]
        })
    })
}

/// Cheap per-index hash in `[0, 1)` for stable per-particle variation.
#[inline]
pub(crate) fn index_hash(i: usize) -> f32 {
    let mut x = (i as u32).wrapping_mul(0x9E37_79B9);
    x ^= x >> 15;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

/// Owns the four effects and dispatches by technique.
#[derive(Debug)]
pub struct EffectSet {
    void: UnlimitedVoidEffect,
    shrine: MalevolentShrineEffect,
    dogs: DivineDogsEffect,
    embodiment: SelfEmbodimentEffect,
}

impl Default for EffectSet {
    fn default() -> Self {
        Self::new(EffectSettings::default())
    }
}

impl EffectSet {
    /// Builds every effect. All pools are allocated here.
    #[must_use]
    pub fn new(settings: EffectSettings) -> Self {
        let set = Self {
            void: UnlimitedVoidEffect::new(settings),
            shrine: MalevolentShrineEffect::new(settings),
            dogs: DivineDogsEffect::new(settings),
            embodiment: SelfEmbodimentEffect::new(settings),
        };
        tracing::debug!(
            "Effect set ready: {} particle slots, seed {}",
            Technique::ALL.iter().map(|&t| set.get(t).stats().capacity).sum::<u32>(),
            settings.seed
        );
        set
    }

    /// The effect of `technique`.
    #[must_use]
    pub fn get(&self, technique: Technique) -> &dyn TechniqueEffect {
        match technique {
            Technique::UnlimitedVoid => &self.void,
            Technique::MalevolentShrine => &self.shrine,
            Technique::DivineDogs => &self.dogs,
            Technique::SelfEmbodiment => &self.embodiment,
        }
    }

    /// The effect of `technique`, mutably.
    pub fn get_mut(&mut self, technique: Technique) -> &mut dyn TechniqueEffect {
        match technique {
            Technique::UnlimitedVoid => &mut self.void,
            Technique::MalevolentShrine => &mut self.shrine,
            Technique::DivineDogs => &mut self.dogs,
            Technique::SelfEmbodiment => &mut self.embodiment,
        }
    }

    /// Spawns, updates and draws `technique` for one frame.
    pub fn run(&mut self, technique: Technique, power: f32, dt: f32, scenes: &mut SceneGraphs) {
        let effect = self.get_mut(technique);
        effect.spawn(power);
        effect.update(dt);
        effect.draw(scenes);
    }

    /// Clears one effect.
    pub fn clear(&mut self, technique: Technique) {
        self.get_mut(technique).clear();
    }

    /// Clears every effect.
    pub fn clear_all(&mut self) {
        for technique in Technique::ALL {
            self.clear(technique);
        }
    }

    /// Techniques whose effect is currently active.
    pub fn active(&self) -> impl Iterator<Item = Technique> + '_ {
        Technique::ALL.into_iter().filter(move |&t| self.get(t).is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::{ArcField, ArcParams, ArcShape, ParticleRng, Span};
    use rand::SeedableRng;

    #[test]
    fn test_clock_ramp_and_reset() {
        let mut clock = EffectClock::default();
        assert!(clock.activate(0.4));
        assert!(!clock.activate(0.6));
        assert_eq!(clock.power, 0.6);
        clock.advance(1.0, DEFAULT_AGE_RAMP_RATE);
        assert_eq!(clock.uniforms(), EffectUniforms::new(1.0, 0.6, 0.55));
        clock.reset();
        assert!(!clock.active);
        assert_eq!(clock.age, 0.0);
    }

    #[test]
    fn test_clock_rejects_bad_power() {
        let mut clock = EffectClock::default();
        clock.activate(f32::NAN);
        assert_eq!(clock.power, 0.0);
        clock.activate(3.0);
        assert_eq!(clock.power, 1.0);
    }

    #[test]
    fn test_closed_arcs_wrap() {
        let mut rng = ParticleRng::seed_from_u64(5);
        let mut field = ArcField::new(ArcParams {
            shape: ArcShape::Ring,
            count: (1, 1),
            segments: (4, 4),
            ttl: Span::fixed(1.0),
            ..ArcParams::default()
        });
        field.update(0.01, 0.5, &mut rng);
        let lines: Vec<_> = arc_lines(field.arcs(), 1.0, 1.0).collect();
        // 5 points, closed: 5 edges.
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[9].position, lines[0].position);
    }

    #[test]
    fn test_index_hash_range() {
        for i in 0..1000 {
            let h = index_hash(i);
            assert!((0.0..1.0).contains(&h));
        }
        assert_ne!(index_hash(1), index_hash(2));
    }

    #[test]
    fn test_only_spawned_effect_is_active() {
        let mut set = EffectSet::new(EffectSettings::default());
        let mut scenes = SceneGraphs::new();
        set.run(Technique::DivineDogs, 0.5, 1.0 / 60.0, &mut scenes);
        assert_eq!(set.active().collect::<Vec<_>>(), vec![Technique::DivineDogs]);
        assert!(!scenes.main.is_empty());

        set.clear_all();
        assert_eq!(set.active().count(), 0);
    }

    #[test]
    fn test_dormant_effect_draws_nothing() {
        let set = EffectSet::default();
        let mut scenes = SceneGraphs::new();
        for t in Technique::ALL {
            set.get(t).draw(&mut scenes);
        }
        assert!(scenes.main.is_empty());
        assert!(scenes.glow.is_empty());
    }

    #[test]
    fn test_set_capacities() {
        let set = EffectSet::default();
        assert_eq!(set.get(Technique::UnlimitedVoid).stats().capacity, 5420);
        assert_eq!(set.get(Technique::MalevolentShrine).stats().capacity, 300);
        assert_eq!(set.get(Technique::DivineDogs).stats().capacity, 280);
        assert_eq!(set.get(Technique::SelfEmbodiment).stats().capacity, 250);
    }
}
