//! Transient-arc kind.
//!
//! Short-lived polylines (lightning, slashes, cracks, rings) regenerated in
//! batches. A batch never survives its successor: when the spawn timer fires
//! every current arc is dropped and a new batch is built.

use std::f32::consts::TAU;

use rand::Rng;

use super::pool::{EmissionPlane, Span};
use super::{sim_dt, ParticleRng};

/// Maximum points per arc polyline.
pub const MAX_ARC_POINTS: usize = 16;

/// Geometry of one arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcShape {
    /// From an inner radius outward along a wandering angle.
    Radial,
    /// A closed ring around the arc center.
    Ring,
    /// A straight bar along the plane's first axis, centered on the arc center.
    Bar,
}

/// Arc batch parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcParams {
    /// Geometry.
    pub shape: ArcShape,
    /// Plane the arc is drawn in.
    pub plane: EmissionPlane,
    /// Batch center.
    pub origin: [f32; 3],
    /// Per-arc uniform offset (half width) of the center from `origin`.
    pub origin_spread: [f32; 3],
    /// Arcs per batch (inclusive).
    pub count: (u32, u32),
    /// Mean spacing between batches in seconds.
    pub interval: f32,
    /// Extra random spacing, uniform in `[0, interval_jitter)`.
    pub interval_jitter: f32,
    /// Base direction of a radial arc.
    pub base_angle: Span,
    /// Start radius (radial) or ring radius (ring).
    pub inner_radius: Span,
    /// End radius of a radial arc, half length of a bar.
    pub outer_radius: Span,
    /// When set, the outer extent and the expansion rate are scaled by
    /// `bias + power`.
    pub power_bias: Option<f32>,
    /// Polyline segments (inclusive). Points = segments + 1.
    pub segments: (u32, u32),
    /// Positional jitter at the inner end, shrinking to zero at the outer end.
    pub jitter: f32,
    /// Angular wander at the inner end, shrinking to zero at the outer end.
    pub angle_wander: f32,
    /// Jitter along the plane normal, shrinking toward the outer end.
    pub normal_jitter: f32,
    /// Lifetime in seconds.
    pub ttl: Span,
    /// Opacity at age 0.
    pub peak_opacity: f32,
    /// Primary tint.
    pub tint: [f32; 3],
    /// Secondary tint.
    pub alt_tint: [f32; 3],
    /// Probability of the primary tint.
    pub tint_bias: f64,
    /// Stroke width (screen) or thickness (world).
    pub width: Span,
    /// Growth of the arc away from its center, units per second.
    pub expansion: Span,
}

impl Default for ArcParams {
    fn default() -> Self {
        Self {
            shape: ArcShape::Radial,
            plane: EmissionPlane::Horizontal,
            origin: [0.0; 3],
            origin_spread: [0.0; 3],
            count: (2, 4),
            interval: 0.08,
            interval_jitter: 0.12,
            base_angle: Span::new(0.0, TAU),
            inner_radius: Span::fixed(0.25),
            outer_radius: Span::new(0.5, 1.1),
            power_bias: None,
            segments: (8, 15),
            jitter: 0.18,
            angle_wander: 0.8,
            normal_jitter: 0.06,
            ttl: Span::new(0.05, 0.13),
            peak_opacity: 0.9,
            tint: [1.0, 1.0, 1.0],
            alt_tint: [0.867, 0.867, 0.867],
            tint_bias: 0.7,
            width: Span::fixed(1.0),
            expansion: Span::fixed(0.0),
        }
    }
}

/// One ephemeral polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    points: [[f32; 3]; MAX_ARC_POINTS],
    point_count: usize,
    /// Center the arc expands away from.
    pub center: [f32; 3],
    /// Seconds since the arc was built.
    pub age: f32,
    /// Lifetime in seconds.
    pub ttl: f32,
    /// Opacity at age 0.
    pub peak_opacity: f32,
    /// RGB tint.
    pub tint: [f32; 3],
    /// Stroke width.
    pub width: f32,
    /// Growth away from `center`, units per second.
    pub expansion: f32,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

impl ArcSegment {
    /// Built polyline points, ignoring expansion.
    #[must_use]
    pub fn points(&self) -> &[[f32; 3]] {
        &self.points[..self.point_count]
    }

    /// Point `i` displaced by the current expansion.
    #[must_use]
    pub fn point_at(&self, i: usize) -> [f32; 3] {
        let p = self.points[i.min(self.point_count.saturating_sub(1))];
        if self.expansion == 0.0 {
            return p;
        }
        let d = [p[0] - self.center[0], p[1] - self.center[1], p[2] - self.center[2]];
        let len = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
        if len <= f32::EPSILON {
            return p;
        }
        let grow = self.expansion * self.age / len;
        [p[0] + d[0] * grow, p[1] + d[1] * grow, p[2] + d[2] * grow]
    }

    /// `1 - age / ttl`, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn fade(&self) -> f32 {
        if self.ttl <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.ttl).clamp(0.0, 1.0)
    }

    /// Current opacity.
    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.fade() * self.peak_opacity
    }

    /// True once the arc has outlived its ttl.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.age >= self.ttl
    }
}

/// A set of arcs plus the timer that regenerates them.
#[derive(Debug, Clone)]
pub struct ArcField {
    params: ArcParams,
    arcs: Vec<ArcSegment>,
    timer: f32,
    batches: u64,
}

impl ArcField {
    /// Creates an empty field. The first batch is built on the first update.
    #[must_use]
    pub fn new(params: ArcParams) -> Self {
        Self {
            arcs: Vec::with_capacity(params.count.1.max(1) as usize),
            params,
            timer: 0.0,
            batches: 0,
        }
    }

    /// Parameters.
    #[must_use]
    pub const fn params(&self) -> &ArcParams {
        &self.params
    }

    /// Live arcs.
    #[must_use]
    pub fn arcs(&self) -> &[ArcSegment] {
        &self.arcs
    }

    /// Seconds until the next batch.
    #[must_use]
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Batches generated since construction or the last clear.
    #[must_use]
    pub const fn batches(&self) -> u64 {
        self.batches
    }

    /// Advances the field by `dt` seconds.
    pub fn update(&mut self, dt: f32, power: f32, rng: &mut ParticleRng) {
        let dt = sim_dt(dt);
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.regenerate(power, rng);
            self.timer = self.params.interval + Span::new(0.0, self.params.interval_jitter).sample(rng);
        }

        for arc in &mut self.arcs {
            arc.age += dt;
        }
        self.arcs.retain(|a| !a.is_expired());
    }

    /// Drops every arc and rearms the timer so the next update spawns.
    pub fn clear(&mut self) {
        self.arcs.clear();
        self.timer = 0.0;
        self.batches = 0;
    }

    fn regenerate(&mut self, power: f32, rng: &mut ParticleRng) {
        self.arcs.clear();
        let (lo, hi) = self.params.count;
        let count = if hi > lo { rng.gen_range(lo..=hi) } else { lo };
        let cap = self.arcs.capacity();
        for _ in 0..count.min(cap as u32) {
            let arc = build_arc(&self.params, power, rng);
            self.arcs.push(arc);
        }
        self.batches += 1;
        tracing::trace!("Arc batch {}: {} arcs", self.batches, self.arcs.len());
    }
}

fn build_arc(params: &ArcParams, power: f32, rng: &mut ParticleRng) -> ArcSegment {
    let mut center = params.origin;
    for (axis, c) in center.iter_mut().enumerate() {
        *c += Span::new(-params.origin_spread[axis], params.origin_spread[axis]).sample(rng);
    }

    let (lo, hi) = params.segments;
    let max_segments = (MAX_ARC_POINTS - 1) as u32;
    let segments = if hi > lo { rng.gen_range(lo..=hi) } else { lo }.clamp(1, max_segments);

    let factor = params.power_bias.map_or(1.0, |b| b + power.clamp(0.0, 1.0));
    let base = params.base_angle.sample(rng);
    let r0 = params.inner_radius.sample(rng);
    let r1 = r0 + (params.outer_radius.sample(rng) - r0) * factor;
    let normal = params.plane.normal_axis();

    let mut points = [[0.0f32; 3]; MAX_ARC_POINTS];
    for s in 0..=segments as usize {
        let t = s as f32 / segments as f32;
        let falloff = 1.0 - t;
        let mut p = match params.shape {
            ArcShape::Radial => {
                let r = r0 + (r1 - r0) * t;
                let angle = base + Span::new(-0.5, 0.5).sample(rng) * params.angle_wander * falloff;
                let dir = params.plane.direction(angle);
                let jitter = falloff * params.jitter * rng.gen::<f32>();
                let mut p = [dir[0] * r, dir[1] * r, dir[2] * r];
                let (a, b) = in_plane_axes(params.plane);
                p[a] += Span::new(-0.5, 0.5).sample(rng) * jitter;
                p[b] += Span::new(-0.5, 0.5).sample(rng) * jitter;
                p
            }
            ArcShape::Ring => {
                let angle = base + t * TAU;
                let r = r0 + Span::new(-0.5, 0.5).sample(rng) * params.jitter;
                let dir = params.plane.direction(angle);
                [dir[0] * r, dir[1] * r, dir[2] * r]
            }
            ArcShape::Bar => {
                let dir = params.plane.direction(0.0);
                let x = -r1 + 2.0 * r1 * t;
                [dir[0] * x, dir[1] * x, dir[2] * x]
            }
        };
        p[normal] += Span::new(-0.5, 0.5).sample(rng) * params.normal_jitter * falloff;
        for axis in 0..3 {
            p[axis] += center[axis];
        }
        points[s] = p;
    }

    let tint = if rng.gen_bool(params.tint_bias.clamp(0.0, 1.0)) {
        params.tint
    } else {
        params.alt_tint
    };

    ArcSegment {
        points,
        point_count: segments as usize + 1,
        center,
        age: 0.0,
        ttl: params.ttl.sample(rng),
        peak_opacity: params.peak_opacity,
        tint,
        width: params.width.sample(rng),
        expansion: params.expansion.sample(rng) * factor,
        closed: params.shape == ArcShape::Ring,
    }
}

const fn in_plane_axes(plane: EmissionPlane) -> (usize, usize) {
    match plane {
        EmissionPlane::Horizontal => (0, 2),
        EmissionPlane::Screen => (0, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> (ArcField, ParticleRng) {
        (ArcField::new(ArcParams::default()), ParticleRng::seed_from_u64(5))
    }

    #[test]
    fn test_first_update_spawns_batch() {
        let (mut field, mut rng) = field();
        assert!(field.arcs().is_empty());
        field.update(0.016, 0.5, &mut rng);
        let n = field.arcs().len();
        assert!((2..=4).contains(&n), "batch of {n}");
        assert!(field.timer() >= 0.08 && field.timer() < 0.2);
        assert_eq!(field.batches(), 1);
    }

    #[test]
    fn test_negative_dt_neither_ages_nor_rearms() {
        let (mut field, mut rng) = field();
        field.update(0.016, 0.5, &mut rng);
        let timer = field.timer();
        let ages: Vec<f32> = field.arcs().iter().map(|a| a.age).collect();

        field.update(-5.0, 0.5, &mut rng);
        assert_eq!(field.timer(), timer);
        assert_eq!(field.batches(), 1);
        let after: Vec<f32> = field.arcs().iter().map(|a| a.age).collect();
        assert_eq!(after, ages);
    }

    #[test]
    fn test_arc_geometry_bounds() {
        let (mut field, mut rng) = field();
        for _ in 0..50 {
            field.clear();
            field.update(0.0, 0.5, &mut rng);
            for arc in field.arcs() {
                let n = arc.points().len();
                assert!((9..=16).contains(&n));
                let [x, _, z] = arc.points()[0];
                let r_inner = (x * x + z * z).sqrt();
                assert!((r_inner - 0.25).abs() <= 0.18, "inner end near r0: {r_inner}");
                let [x, y, z] = arc.points()[n - 1];
                let r_outer = (x * x + z * z).sqrt();
                assert!((0.5..=1.1 + 1e-4).contains(&r_outer));
                assert!(y.abs() < 1e-6, "no height jitter at the outer end");
                assert!((0.05..=0.13).contains(&arc.ttl));
            }
        }
    }

    #[test]
    fn test_regeneration_discards_old_batch() {
        let (mut field, mut rng) = field();
        field.update(0.0, 0.5, &mut rng);
        let first = field.arcs().to_vec();
        let wait = field.timer();
        field.update(wait, 0.5, &mut rng);
        assert_eq!(field.batches(), 2);
        for arc in field.arcs() {
            assert!(!first.contains(arc));
            assert!(arc.age <= wait);
        }
    }

    #[test]
    fn test_arcs_expire_and_fade() {
        let params = ArcParams {
            interval: 10.0,
            interval_jitter: 0.0,
            ..ArcParams::default()
        };
        let mut field = ArcField::new(params);
        let mut rng = ParticleRng::seed_from_u64(8);
        field.update(0.0, 0.5, &mut rng);
        let arc = field.arcs()[0];
        assert_eq!(arc.fade(), 1.0);

        field.update(0.04, 0.5, &mut rng);
        for arc in field.arcs() {
            assert!(arc.opacity() < 0.9);
            assert!((arc.fade() - (1.0 - arc.age / arc.ttl)).abs() < 1e-6);
        }
        field.update(0.2, 0.5, &mut rng);
        assert!(field.arcs().is_empty());
    }

    #[test]
    fn test_ring_is_closed_and_expands() {
        let params = ArcParams {
            shape: ArcShape::Ring,
            plane: EmissionPlane::Screen,
            origin: [0.5, 0.5, 0.0],
            count: (1, 1),
            segments: (15, 15),
            inner_radius: Span::fixed(0.1),
            jitter: 0.0,
            normal_jitter: 0.0,
            ttl: Span::fixed(2.0),
            expansion: Span::fixed(0.5),
            ..ArcParams::default()
        };
        let mut field = ArcField::new(params);
        let mut rng = ParticleRng::seed_from_u64(2);
        field.update(0.0, 0.5, &mut rng);
        field.update(1.0, 0.5, &mut rng);
        let arc = field.arcs()[0];
        assert!(arc.closed);
        let p = arc.point_at(0);
        let r = ((p[0] - 0.5).powi(2) + (p[1] - 0.5).powi(2)).sqrt();
        assert!((r - 0.6).abs() < 1e-4, "ring radius {r}");
    }

    #[test]
    fn test_power_extends_outer_radius() {
        let params = ArcParams {
            shape: ArcShape::Radial,
            count: (1, 1),
            segments: (1, 1),
            jitter: 0.0,
            angle_wander: 0.0,
            normal_jitter: 0.0,
            inner_radius: Span::fixed(0.0),
            outer_radius: Span::fixed(1.0),
            power_bias: Some(0.5),
            ..ArcParams::default()
        };
        let mut field = ArcField::new(params);
        let mut rng = ParticleRng::seed_from_u64(4);
        field.update(0.0, 1.0, &mut rng);
        let [x, _, z] = field.arcs()[0].points()[1];
        assert!(((x * x + z * z).sqrt() - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_power_scales_expansion() {
        let params = ArcParams {
            shape: ArcShape::Ring,
            count: (1, 1),
            expansion: Span::fixed(0.4),
            power_bias: Some(0.5),
            ..ArcParams::default()
        };
        let mut rng = ParticleRng::seed_from_u64(9);
        let mut weak = ArcField::new(params);
        weak.update(0.0, 0.0, &mut rng);
        let mut strong = ArcField::new(params);
        strong.update(0.0, 1.0, &mut rng);
        assert!((weak.arcs()[0].expansion - 0.2).abs() < 1e-6);
        assert!((strong.arcs()[0].expansion - 0.6).abs() < 1e-6);
    }
}
