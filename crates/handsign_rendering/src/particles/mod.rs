//! # Particle Simulation
//!
//! Data-oriented pools plus free functions that step a whole pool at once.
//!
//! ```text
//! ┌──────────────┬───────────────────────────┬─────────────────────────────┐
//! │ Kind         │ Storage                   │ Step                        │
//! ├──────────────┼───────────────────────────┼─────────────────────────────┤
//! │ Spiral       │ ParticlePool (fixed)      │ step_spiral                 │
//! │ Ballistic    │ ParticlePool (fixed)      │ step_ballistic              │
//! │ Transient    │ ArcField (batch, bounded) │ ArcField::update            │
//! └──────────────┴───────────────────────────┴─────────────────────────────┘
//! ```
//!
//! All randomness comes from a [`ParticleRng`] seeded per technique, so a
//! given seed replays the exact same simulation.

mod arcs;
mod ballistic;
mod pool;
mod spiral;

pub use arcs::{ArcField, ArcParams, ArcSegment, ArcShape, MAX_ARC_POINTS};
pub use ballistic::{step_ballistic, BallisticParams};
pub use pool::{reset_pool, EmissionPlane, Particle, ParticleKind, ParticlePool, PoolStats, Span, SpawnDistribution};
pub use spiral::{step_spiral, SpiralParams};

use handsign_core::Technique;
use rand::SeedableRng;

/// Random generator used by every simulation step.
pub type ParticleRng = rand_chacha::ChaCha8Rng;

/// Derives a technique's generator from the session seed.
#[must_use]
pub fn technique_rng(seed: u64, technique: Technique) -> ParticleRng {
    ParticleRng::seed_from_u64(technique_seed(seed, technique))
}

/// Time step actually simulated: negative, NaN and infinite steps become 0.
#[inline]
#[must_use]
pub fn sim_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt
    } else {
        0.0
    }
}

/// Mixes the session seed with the technique index.
#[must_use]
pub const fn technique_seed(seed: u64, technique: Technique) -> u64 {
    seed ^ (technique.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
