//! Per-frame shader uniforms.

use bytemuck::{Pod, Zeroable};

use super::scene::{SceneObject, Space};

/// Uniforms shared by every shader of the active effect.
///
/// Matches the WGSL `EffectUniforms` struct (16 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EffectUniforms {
    /// Seconds since the effect was activated.
    pub time: f32,
    /// Current power level, `[0, 1]`.
    pub power: f32,
    /// Activation ramp, `[0, 1]`.
    pub age: f32,
    /// Padding to 16 bytes.
    pub _pad: f32,
}

impl EffectUniforms {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates uniforms.
    #[must_use]
    pub const fn new(time: f32, power: f32, age: f32) -> Self {
        Self { time, power, age, _pad: 0.0 }
    }

    /// Bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Per-object uniforms, matching the WGSL `ObjectUniforms` struct (96 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    /// Column-major model matrix (uniform scale then translation).
    pub model: [[f32; 4]; 4],
    /// Material color.
    pub color: [f32; 4],
    /// `x`: 1.0 for screen space, 0.0 for world.
    pub flags: [f32; 4],
}

impl ObjectUniforms {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Uniforms for one scene object.
    #[must_use]
    pub fn for_object(object: &SceneObject) -> Self {
        let s = object.scale;
        let [x, y, z] = object.position;
        Self {
            model: [
                [s, 0.0, 0.0, 0.0],
                [0.0, s, 0.0, 0.0],
                [0.0, 0.0, s, 0.0],
                [x, y, z, 1.0],
            ],
            color: object.material.color,
            flags: [
                if object.space == Space::Screen { 1.0 } else { 0.0 },
                0.0,
                0.0,
                0.0,
            ],
        }
    }

    /// Bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Advances an activation ramp: `min(1, age + rate * dt)`.
#[inline]
#[must_use]
pub fn ramp_age(age: f32, rate: f32, dt: f32) -> f32 {
    (age + rate * dt).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(EffectUniforms::SIZE, 16);
        assert_eq!(EffectUniforms::new(1.0, 0.5, 0.25).as_bytes().len(), 16);
    }

    #[test]
    fn test_object_uniforms() {
        use crate::compositor::Material;
        let obj = SceneObject::tint([0.1, 0.0, 0.0, 0.2]).at([0.5, 0.25, 0.0]).scaled(2.0);
        let u = ObjectUniforms::for_object(&obj);
        assert_eq!(ObjectUniforms::SIZE, 96);
        assert_eq!(u.model[3], [0.5, 0.25, 0.0, 1.0]);
        assert_eq!(u.model[1][1], 2.0);
        assert_eq!(u.color, [0.1, 0.0, 0.0, 0.2]);
        assert_eq!(u.flags[0], 1.0);

        let world = SceneObject::points(Material::default());
        assert_eq!(ObjectUniforms::for_object(&world).flags[0], 0.0);
    }

    #[test]
    fn test_age_ramp_caps_at_one() {
        let mut age = 0.0;
        for _ in 0..60 {
            age = ramp_age(age, 0.55, 1.0 / 60.0);
        }
        assert!((age - 0.55).abs() < 1e-4);
        for _ in 0..120 {
            age = ramp_age(age, 0.55, 1.0 / 60.0);
        }
        assert_eq!(age, 1.0);
    }
}
