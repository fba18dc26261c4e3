//! Two-pass compositing.
//!
//! ```text
//! clear(color + depth + alpha → 0)   transparent, never opaque
//!        │
//!   draw main scene                  core geometry, particles, overlay
//!        │
//! clear(depth only)                  color/alpha accumulated so far survive
//!        │
//!   draw glow scene (additive)       oversized halos, cannot be depth-occluded
//! ```
//!
//! No offscreen targets and no blur: bloom is faked by the glow geometry, so
//! the result can be laid over the camera feed as is.

use super::scene::{Scene, SceneGraphs};
use super::uniforms::EffectUniforms;
use crate::error::RenderResult;

/// Which pass is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderPass {
    /// Main scene.
    Main,
    /// Additive glow scene.
    Glow,
}

/// Buffers reset by a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearFlags {
    /// RGB.
    pub color: bool,
    /// Alpha channel.
    pub alpha: bool,
    /// Depth buffer.
    pub depth: bool,
}

impl ClearFlags {
    /// Color, alpha and depth.
    pub const ALL: Self = Self {
        color: true,
        alpha: true,
        depth: true,
    };

    /// Depth only.
    pub const DEPTH: Self = Self {
        color: false,
        alpha: false,
        depth: true,
    };
}

/// The external drawing surface.
pub trait RenderTarget {
    /// Clears the selected buffers. Color and alpha clear to transparent zero,
    /// depth to the far plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is lost.
    fn clear(&mut self, flags: ClearFlags) -> RenderResult<()>;

    /// Draws every object of `scene`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface is lost.
    fn draw_scene(&mut self, scene: &Scene, pass: RenderPass, uniforms: &EffectUniforms) -> RenderResult<()>;
}

/// One step of the compositing plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassStep {
    /// Buffers cleared before drawing.
    pub clear: ClearFlags,
    /// Scene drawn.
    pub pass: RenderPass,
}

impl PassStep {
    /// Color attachment operations for a GPU render pass doing this step.
    #[must_use]
    pub const fn color_ops(&self) -> wgpu::Operations<wgpu::Color> {
        let load = if self.clear.color || self.clear.alpha {
            wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT)
        } else {
            wgpu::LoadOp::Load
        };
        wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        }
    }

    /// Depth attachment operations for a GPU render pass doing this step.
    #[must_use]
    pub const fn depth_ops(&self) -> wgpu::Operations<f32> {
        let load = if self.clear.depth {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };
        wgpu::Operations {
            load,
            store: wgpu::StoreOp::Store,
        }
    }
}

/// The fixed plan: full clear + main, then depth clear + glow.
pub const COMPOSITE_PLAN: [PassStep; 2] = [
    PassStep {
        clear: ClearFlags::ALL,
        pass: RenderPass::Main,
    },
    PassStep {
        clear: ClearFlags::DEPTH,
        pass: RenderPass::Glow,
    },
];

/// Statistics from one composite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeStats {
    /// Objects in the main scene.
    pub main_objects: u32,
    /// Objects in the glow scene.
    pub glow_objects: u32,
    /// Point instances across both scenes.
    pub points: u32,
    /// Line vertices across both scenes.
    pub line_vertices: u32,
    /// Clears issued.
    pub clears: u32,
    /// Draw calls issued (one per scene).
    pub scene_draws: u32,
}

/// Runs [`COMPOSITE_PLAN`] against a target.
#[derive(Debug, Default)]
pub struct Compositor {
    frames: u64,
    last: CompositeStats,
}

impl Compositor {
    /// Creates a compositor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The compositing plan.
    #[must_use]
    pub const fn plan(&self) -> &'static [PassStep] {
        &COMPOSITE_PLAN
    }

    /// Composites one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if either scene is inconsistent or the target fails.
    pub fn composite<T: RenderTarget + ?Sized>(&mut self, scenes: &SceneGraphs, target: &mut T) -> RenderResult<CompositeStats> {
        scenes.main.validate()?;
        scenes.glow.validate()?;

        let mut stats = CompositeStats::default();
        for step in &COMPOSITE_PLAN {
            target.clear(step.clear)?;
            stats.clears += 1;

            let scene = match step.pass {
                RenderPass::Main => &scenes.main,
                RenderPass::Glow => &scenes.glow,
            };
            target.draw_scene(scene, step.pass, &scenes.uniforms)?;
            stats.scene_draws += 1;

            let objects = scene.objects().len() as u32;
            match step.pass {
                RenderPass::Main => stats.main_objects = objects,
                RenderPass::Glow => stats.glow_objects = objects,
            }
            stats.points += scene.points().len() as u32;
            stats.line_vertices += scene.lines().len() as u32;
        }

        self.frames += 1;
        self.last = stats;
        Ok(stats)
    }

    /// Frames composited.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Statistics of the last composite.
    #[must_use]
    pub const fn last_stats(&self) -> CompositeStats {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_order() {
        assert_eq!(COMPOSITE_PLAN[0].clear, ClearFlags::ALL);
        assert_eq!(COMPOSITE_PLAN[0].pass, RenderPass::Main);
        assert_eq!(COMPOSITE_PLAN[1].clear, ClearFlags::DEPTH);
        assert_eq!(COMPOSITE_PLAN[1].pass, RenderPass::Glow);
    }

    #[test]
    fn test_gpu_ops() {
        let main = COMPOSITE_PLAN[0];
        assert_eq!(main.color_ops().load, wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT));
        assert_eq!(main.depth_ops().load, wgpu::LoadOp::Clear(1.0));

        let glow = COMPOSITE_PLAN[1];
        assert_eq!(glow.color_ops().load, wgpu::LoadOp::Load);
        assert_eq!(glow.depth_ops().load, wgpu::LoadOp::Clear(1.0));
        assert_eq!(glow.color_ops().store, wgpu::StoreOp::Store);
    }
}
