//! Blend and material model.
//!
//! Everything is drawn over a transparent target that is later composited
//! over the camera feed, so every mode must produce meaningful alpha:
//!
//! ```text
//! Normal:        color = src.rgb * src.a + dst.rgb * (1 - src.a)
//!                alpha = src.a           + dst.a   * (1 - src.a)
//! Additive:      color = src.rgb * src.a + dst.rgb
//!                alpha = src.a           + dst.a
//! Premultiplied: color = src.rgb         + dst.rgb * (1 - src.a)
//!                alpha = src.a           + dst.a   * (1 - src.a)
//! ```
//!
//! Alpha always uses the ONE / ONE_MINUS_SRC_ALPHA ("over") form for normal
//! blending, so a half-transparent object leaves half-transparent pixels and
//! the camera keeps showing through.

/// Blend mode for a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Standard "over" blending. Dark objects occlude what is behind them.
    #[default]
    Normal,
    /// `ONE`-destination blending. Order independent, only ever brightens.
    /// Forced for everything in the glow scene.
    Additive,
    /// Source color already multiplied by alpha.
    Premultiplied,
}

/// Blend factor (mirrors WGPU).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    /// 0
    Zero,
    /// 1
    One,
    /// src.a
    SrcAlpha,
    /// 1 - src.a
    OneMinusSrcAlpha,
}

impl BlendFactor {
    /// WGPU equivalent.
    #[must_use]
    pub const fn to_wgpu(self) -> wgpu::BlendFactor {
        match self {
            Self::Zero => wgpu::BlendFactor::Zero,
            Self::One => wgpu::BlendFactor::One,
            Self::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
            Self::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
        }
    }

    #[inline]
    fn weight(self, src_alpha: f32) -> f32 {
        match self {
            Self::Zero => 0.0,
            Self::One => 1.0,
            Self::SrcAlpha => src_alpha,
            Self::OneMinusSrcAlpha => 1.0 - src_alpha,
        }
    }
}

/// Blend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// src + dst
    Add,
}

impl BlendOp {
    /// WGPU equivalent.
    #[must_use]
    pub const fn to_wgpu(self) -> wgpu::BlendOperation {
        match self {
            Self::Add => wgpu::BlendOperation::Add,
        }
    }
}

/// Complete blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendStateConfig {
    /// Source factor for color.
    pub color_src: BlendFactor,
    /// Destination factor for color.
    pub color_dst: BlendFactor,
    /// Operation for color.
    pub color_op: BlendOp,
    /// Source factor for alpha.
    pub alpha_src: BlendFactor,
    /// Destination factor for alpha.
    pub alpha_dst: BlendFactor,
    /// Operation for alpha.
    pub alpha_op: BlendOp,
}

impl BlendStateConfig {
    /// WGPU blend state.
    #[must_use]
    pub const fn to_wgpu(&self) -> wgpu::BlendState {
        wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: self.color_src.to_wgpu(),
                dst_factor: self.color_dst.to_wgpu(),
                operation: self.color_op.to_wgpu(),
            },
            alpha: wgpu::BlendComponent {
                src_factor: self.alpha_src.to_wgpu(),
                dst_factor: self.alpha_dst.to_wgpu(),
                operation: self.alpha_op.to_wgpu(),
            },
        }
    }
}

impl BlendMode {
    /// Blend state for this mode.
    #[must_use]
    pub const fn blend_state(&self) -> BlendStateConfig {
        match self {
            Self::Normal => BlendStateConfig {
                color_src: BlendFactor::SrcAlpha,
                color_dst: BlendFactor::OneMinusSrcAlpha,
                color_op: BlendOp::Add,
                alpha_src: BlendFactor::One,
                alpha_dst: BlendFactor::OneMinusSrcAlpha,
                alpha_op: BlendOp::Add,
            },
            Self::Additive => BlendStateConfig {
                color_src: BlendFactor::SrcAlpha,
                color_dst: BlendFactor::One,
                color_op: BlendOp::Add,
                alpha_src: BlendFactor::One,
                alpha_dst: BlendFactor::One,
                alpha_op: BlendOp::Add,
            },
            Self::Premultiplied => BlendStateConfig {
                color_src: BlendFactor::One,
                color_dst: BlendFactor::OneMinusSrcAlpha,
                color_op: BlendOp::Add,
                alpha_src: BlendFactor::One,
                alpha_dst: BlendFactor::OneMinusSrcAlpha,
                alpha_op: BlendOp::Add,
            },
        }
    }

    /// WGPU blend state for this mode.
    #[must_use]
    pub const fn to_wgpu(&self) -> wgpu::BlendState {
        self.blend_state().to_wgpu()
    }

    /// True if draw order matters for this mode.
    #[must_use]
    pub const fn requires_sorting(&self) -> bool {
        !matches!(self, Self::Additive)
    }

    /// CPU reference of the blend equation, channels clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(&self, src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
        let state = self.blend_state();
        let sa = src[3];
        let mut out = [0.0; 4];
        for c in 0..3 {
            out[c] = (src[c] * state.color_src.weight(sa) + dst[c] * state.color_dst.weight(sa)).clamp(0.0, 1.0);
        }
        out[3] = (sa * state.alpha_src.weight(sa) + dst[3] * state.alpha_dst.weight(sa)).clamp(0.0, 1.0);
        out
    }
}

/// Which faces of closed geometry are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FaceSide {
    /// Front faces only.
    #[default]
    Front,
    /// Back faces only (inside of a halo sphere).
    Back,
    /// Both faces.
    Double,
}

impl FaceSide {
    /// Face culled by the rasterizer.
    #[must_use]
    pub const fn cull_mode(self) -> Option<wgpu::Face> {
        match self {
            Self::Front => Some(wgpu::Face::Back),
            Self::Back => Some(wgpu::Face::Front),
            Self::Double => None,
        }
    }
}

/// Per-object render state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Blend mode.
    pub blend: BlendMode,
    /// Drawn faces.
    pub side: FaceSide,
    /// Writes depth.
    pub depth_write: bool,
    /// RGBA multiplier; alpha is the object's opacity.
    pub color: [f32; 4],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            blend: BlendMode::Normal,
            side: FaceSide::Front,
            depth_write: false,
            color: [1.0; 4],
        }
    }
}

impl Material {
    /// Transparent material, normal blending, no depth write.
    #[must_use]
    pub const fn normal(color: [f32; 4]) -> Self {
        Self {
            blend: BlendMode::Normal,
            side: FaceSide::Front,
            depth_write: false,
            color,
        }
    }

    /// Additive material, no depth write.
    #[must_use]
    pub const fn additive(color: [f32; 4]) -> Self {
        Self {
            blend: BlendMode::Additive,
            side: FaceSide::Front,
            depth_write: false,
            color,
        }
    }

    /// Replaces the face side.
    #[must_use]
    pub const fn with_side(mut self, side: FaceSide) -> Self {
        self.side = side;
        self
    }

    /// Enables depth writes.
    #[must_use]
    pub const fn with_depth_write(mut self) -> Self {
        self.depth_write = true;
        self
    }

    /// Color target description for a pipeline rendering this material.
    #[must_use]
    pub const fn color_target(&self, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend: Some(self.blend.to_wgpu()),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    /// Primitive state (culling) for a pipeline rendering this material.
    #[must_use]
    pub fn primitive_state(&self, topology: wgpu::PrimitiveTopology) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology,
            cull_mode: self.side.cull_mode(),
            ..wgpu::PrimitiveState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAR: [f32; 4] = [0.0; 4];

    #[test]
    fn test_additive_is_order_independent() {
        let a = [0.4, 0.1, 0.2, 0.5];
        let b = [0.1, 0.3, 0.0, 0.25];
        let ab = BlendMode::Additive.apply(b, BlendMode::Additive.apply(a, CLEAR));
        let ba = BlendMode::Additive.apply(a, BlendMode::Additive.apply(b, CLEAR));
        for c in 0..4 {
            assert!((ab[c] - ba[c]).abs() < 1e-6);
        }
        assert!(!BlendMode::Additive.requires_sorting());
        assert!(BlendMode::Normal.requires_sorting());
    }

    #[test]
    fn test_normal_over_transparent_keeps_alpha() {
        let out = BlendMode::Normal.apply([0.0, 0.0, 0.0, 0.6], CLEAR);
        assert_eq!(out, [0.0, 0.0, 0.0, 0.6]);
    }

    #[test]
    fn test_premultiplied() {
        let out = BlendMode::Premultiplied.apply([0.25, 0.0, 0.0, 0.5], [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(out, [0.25, 0.5, 0.0, 1.0]);
    }

    #[test]
    fn test_wgpu_mapping() {
        let state = BlendMode::Additive.to_wgpu();
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert_eq!(state.alpha.src_factor, wgpu::BlendFactor::One);
        assert_eq!(FaceSide::Back.cull_mode(), Some(wgpu::Face::Front));
        assert_eq!(FaceSide::Double.cull_mode(), None);
        let target = Material::default().color_target(wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(target.blend, Some(BlendMode::Normal.to_wgpu()));
    }
}
