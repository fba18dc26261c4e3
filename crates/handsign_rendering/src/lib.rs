//! # HANDSIGN Rendering
//!
//! Particle simulation, technique effects and the two-pass compositor that
//! lays them over a live camera feed.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ONE FRAME                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  EffectSet::run(technique, power, dt)                        │
//! │       ↓ step pools (spiral / ballistic) + arc fields         │
//! │  draw → SceneGraphs { main, glow, uniforms }                 │
//! │       ↓ overlay::draw_hands (main)                           │
//! │  Compositor::composite → RenderTarget                        │
//! │       clear all → main → clear depth → glow (additive)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Pools are sized at construction and never grow
//! - Scene buffers are cleared, not reallocated, every frame
//! - The output is never opaque on its own: clears go to transparent zero

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod compositor;
pub mod effects;
pub mod error;
pub mod overlay;
pub mod particles;
pub mod shaders;

pub use compositor::{
    BlendMode, ClearFlags, CommandRecorder, CompositeStats, Compositor, EffectUniforms, FaceSide, Material,
    RenderPass, RenderTarget, Scene, SceneGraphs, SceneObject,
};
pub use effects::{
    DivineDogsEffect, EffectSet, EffectSettings, EffectStats, MalevolentShrineEffect, SelfEmbodimentEffect,
    TechniqueEffect, UnlimitedVoidEffect,
};
pub use error::{RenderError, RenderResult};
pub use overlay::draw_hands;
pub use particles::{ArcField, ParticlePool, ParticleRng, PoolStats};
pub use shaders::{EffectShaders, ShaderKind};
