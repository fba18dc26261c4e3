//! # Render Compositor
//!
//! Scenes, materials and the two-pass plan that lays an effect over the
//! camera feed without ever producing an opaque pixel on its own.
//!
//! The GPU backend lives outside this crate behind [`RenderTarget`]; what is
//! here is everything it needs: blend/cull state as `wgpu` descriptors, vertex
//! layouts, load/store ops per pass and the byte buffers to upload.

mod blend;
mod passes;
mod recorder;
mod scene;
mod uniforms;
mod vertex;

pub use blend::{BlendFactor, BlendMode, BlendOp, BlendStateConfig, FaceSide, Material};
pub use passes::{ClearFlags, CompositeStats, Compositor, PassStep, RenderPass, RenderTarget, COMPOSITE_PLAN};
pub use recorder::{CommandRecorder, RecordedCommand};
pub use scene::{Primitive, Scene, SceneGraphs, SceneKind, SceneObject, Space};
pub use uniforms::{ramp_age, EffectUniforms, ObjectUniforms};
pub use vertex::{LineVertex, PointInstance};
