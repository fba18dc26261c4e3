//! GPU instance and vertex formats.

use bytemuck::{Pod, Zeroable};

/// One point sprite (particle, landmark dot).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// Center position.
    pub position: [f32; 3],
    /// Diameter (world units, or screen heights for screen-space objects).
    pub size: f32,
    /// RGBA.
    pub color: [f32; 4],
}

impl PointInstance {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Vertex attributes.
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32,    // size
        2 => Float32x4,  // color
    ];

    /// Creates an instance.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 3], size: f32, color: [f32; 4]) -> Self {
        Self { position, size, color }
    }

    /// Instance buffer layout descriptor.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// One polyline vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Position.
    pub position: [f32; 3],
    /// Stroke width.
    pub width: f32,
    /// RGBA.
    pub color: [f32; 4],
}

impl LineVertex {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Vertex attributes.
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,  // position
        1 => Float32,    // width
        2 => Float32x4,  // color
    ];

    /// Creates a vertex.
    #[inline]
    #[must_use]
    pub const fn new(position: [f32; 3], width: f32, color: [f32; 4]) -> Self {
        Self { position, width, color }
    }

    /// Vertex buffer layout descriptor.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(PointInstance::SIZE, 32);
        assert_eq!(LineVertex::SIZE, 32);
    }

    #[test]
    fn test_layout_offsets() {
        let layout = PointInstance::desc();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 16);
        assert_eq!(LineVertex::desc().step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn test_bytes() {
        let points = [PointInstance::new([1.0, 2.0, 3.0], 0.5, [1.0; 4]); 4];
        let bytes: &[u8] = bytemuck::cast_slice(&points);
        assert_eq!(bytes.len(), 128);
    }
}
