//! Effect Shaders
//!
//! WGSL sources for every program a scene object can use. All programs share
//! one bind-group layout:
//!
//! ```text
//! @group(0) @binding(0)  Camera          view_proj + viewport
//! @group(0) @binding(1)  EffectUniforms  time, power, age (16 bytes)
//! @group(1) @binding(0)  ObjectUniforms  model, color, flags
//! ```
//!
//! Mesh programs take position + normal + uv; point sprites take one
//! [`PointInstance`](crate::compositor::PointInstance) per instance and
//! expand it to a quad; lines take
//! [`LineVertex`](crate::compositor::LineVertex) pairs.

/// Shader program of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Black core sphere with violent vertex vibration and a white rim.
    VoidCore,
    /// Swirling fbm ink disk.
    InkVortex,
    /// Fresnel halo, drawn back-face and additive in the glow scene.
    GlowHalo,
    /// Turbulent emissive surface (rings, soul glow).
    EnergySurface,
    /// Soft round point sprites.
    PointSprite,
    /// Flat colored lines.
    Line,
    /// Full-screen translucent tint.
    ScreenTint,
}

impl ShaderKind {
    /// Every program.
    pub const ALL: [Self; 7] = [
        Self::VoidCore,
        Self::InkVortex,
        Self::GlowHalo,
        Self::EnergySurface,
        Self::PointSprite,
        Self::Line,
        Self::ScreenTint,
    ];

    /// WGSL source.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::VoidCore => VOID_CORE_WGSL,
            Self::InkVortex => INK_VORTEX_WGSL,
            Self::GlowHalo => GLOW_HALO_WGSL,
            Self::EnergySurface => ENERGY_SURFACE_WGSL,
            Self::PointSprite => POINT_SPRITE_WGSL,
            Self::Line => LINE_WGSL,
            Self::ScreenTint => SCREEN_TINT_WGSL,
        }
    }

    /// Debug label for pipeline creation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VoidCore => "void_core",
            Self::InkVortex => "ink_vortex",
            Self::GlowHalo => "glow_halo",
            Self::EnergySurface => "energy_surface",
            Self::PointSprite => "point_sprite",
            Self::Line => "line",
            Self::ScreenTint => "screen_tint",
        }
    }

    /// Primitive topology the program expects.
    #[must_use]
    pub const fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            Self::Line => wgpu::PrimitiveTopology::LineList,
            _ => wgpu::PrimitiveTopology::TriangleList,
        }
    }
}

/// Container for all effect shaders.
pub struct EffectShaders;

impl EffectShaders {
    /// Returns the WGSL source of a program.
    #[must_use]
    pub const fn source(kind: ShaderKind) -> &'static str {
        kind.source()
    }

    /// Shader module descriptor ready for `Device::create_shader_module`.
    #[must_use]
    pub fn descriptor(kind: ShaderKind) -> wgpu::ShaderModuleDescriptor<'static> {
        wgpu::ShaderModuleDescriptor {
            label: Some(kind.label()),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(kind.source())),
        }
    }
}

/// Bindings and helpers prepended to every program.
macro_rules! wgsl_common {
    () => {
        r#"
struct Camera {
    view_proj: mat4x4<f32>,
    // width, height, 1/width, 1/height
    viewport: vec4<f32>,
}

struct EffectUniforms {
    time: f32,
    power: f32,
    age: f32,
    _pad: f32,
}

struct ObjectUniforms {
    model: mat4x4<f32>,
    color: vec4<f32>,
    // x = screen space (1.0) or world (0.0)
    flags: vec4<f32>,
}

@group(0) @binding(0) var<uniform> camera: Camera;
@group(0) @binding(1) var<uniform> effect: EffectUniforms;
@group(1) @binding(0) var<uniform> object: ObjectUniforms;

fn to_clip(world: vec4<f32>) -> vec4<f32> {
    if object.flags.x > 0.5 {
        // Normalized screen: x right, y down, [0, 1]
        return vec4<f32>(world.x * 2.0 - 1.0, 1.0 - world.y * 2.0, 0.0, 1.0);
    }
    return camera.view_proj * world;
}

fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(127.1, 311.7))) * 43758.545);
}

fn noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    var f = fract(p);
    f = f * f * (3.0 - 2.0 * f);
    return mix(
        mix(hash(i), hash(i + vec2<f32>(1.0, 0.0)), f.x),
        mix(hash(i + vec2<f32>(0.0, 1.0)), hash(i + vec2<f32>(1.0, 1.0)), f.x),
        f.y,
    );
}

fn fbm(p_in: vec2<f32>) -> f32 {
    var p = p_in;
    var v = 0.0;
    var a = 0.5;
    for (var i = 0; i < 6; i = i + 1) {
        v = v + a * noise(p);
        p = p * 2.1;
        a = a * 0.5;
    }
    return v;
}

struct MeshInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct MeshOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) normal: vec3<f32>,
    @location(1) uv: vec2<f32>,
}
"#
    };
}

/// Void core: pitch black, white event-horizon rim, vibrating surface.
const VOID_CORE_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
@vertex
fn vs_main(in: MeshInput) -> MeshOutput {
    var out: MeshOutput;
    let t = effect.time;
    // High frequency, irregular displacement along the normal
    let vib = sin(t * 28.0) * 0.012 + sin(t * 47.3) * 0.007
            + sin(t * 13.1 + in.position.x * 9.0) * 0.009;
    let p = in.position + in.normal * vib;
    out.clip = to_clip(object.model * vec4<f32>(p, 1.0));
    out.normal = normalize((object.model * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: MeshOutput) -> @location(0) vec4<f32> {
    let rim = pow(1.0 - abs(dot(in.normal, vec3<f32>(0.0, 0.0, 1.0))), 4.5);
    let horizon = mix(vec3<f32>(0.12), vec3<f32>(1.0), rim);
    let color = mix(vec3<f32>(0.0), horizon, rim * (0.6 + effect.power * 0.4));
    let alpha = mix(0.96, 1.0, rim);
    return vec4<f32>(color, alpha);
}
"#
);

/// Ink vortex disk: two fbm layers in swirled coordinates.
const INK_VORTEX_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
@vertex
fn vs_main(in: MeshInput) -> MeshOutput {
    var out: MeshOutput;
    out.clip = to_clip(object.model * vec4<f32>(in.position, 1.0));
    out.normal = in.normal;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: MeshOutput) -> @location(0) vec4<f32> {
    let uv = in.uv * 2.0 - 1.0;
    let dist = length(uv);
    if dist > 1.0 {
        discard;
    }
    let t = effect.time;

    // Swirl tightens toward the center
    let angle = atan2(uv.y, uv.x);
    let swirl = angle + t * 2.2 - dist * 9.0;
    let suv = vec2<f32>(cos(swirl) * dist, sin(swirl) * dist) * 2.5;

    let n1 = fbm(suv + vec2<f32>(t * 0.18));
    let n2 = fbm(suv * 1.7 - vec2<f32>(t * 0.12));
    let ink = n1 * n2 * 2.5;

    let arm = smoothstep(0.3, 0.85, ink) * smoothstep(1.0, 0.1, dist);
    let horizon = smoothstep(0.7, 0.0, dist);
    let color = mix(vec3<f32>(0.0), vec3<f32>(1.0), arm) + vec3<f32>(1.0) * horizon * 0.45;

    let edge = smoothstep(1.0, 0.55, dist);
    let inner = smoothstep(0.18, 0.28, dist);
    let alpha = edge * inner * (arm * 0.9 + horizon * 0.25) * (0.4 + effect.age * 0.6);
    return vec4<f32>(color, alpha * effect.age);
}
"#
);

/// Halo: fresnel rim tinted by the object color. Alpha carries the rim only,
/// the glow pass adds it without ever reaching an opaque pixel by itself.
const GLOW_HALO_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
@vertex
fn vs_main(in: MeshInput) -> MeshOutput {
    var out: MeshOutput;
    out.clip = to_clip(object.model * vec4<f32>(in.position, 1.0));
    out.normal = normalize((object.model * vec4<f32>(in.normal, 0.0)).xyz);
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: MeshOutput) -> @location(0) vec4<f32> {
    var rim: f32;
    if object.flags.x > 0.5 {
        // Flat disk in screen space: radial falloff instead of fresnel
        rim = pow(clamp(1.0 - length(in.uv * 2.0 - 1.0), 0.0, 1.0), 1.6);
    } else {
        rim = pow(1.0 - abs(dot(in.normal, vec3<f32>(0.0, 0.0, 1.0))), 1.6);
    }
    return vec4<f32>(object.color.rgb * rim * object.color.a, rim * 0.6);
}
"#
);

/// Energy surface: noisy emissive band used by rings and soul glows.
const ENERGY_SURFACE_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
@vertex
fn vs_main(in: MeshInput) -> MeshOutput {
    var out: MeshOutput;
    let wobble = sin(atan2(in.position.y, in.position.x) * 6.0 + effect.time * 6.0) * 0.02;
    let p = in.position * (1.0 + wobble);
    out.clip = to_clip(object.model * vec4<f32>(p, 1.0));
    out.normal = in.normal;
    out.uv = in.uv;
    return out;
}

@fragment
fn fs_main(in: MeshOutput) -> @location(0) vec4<f32> {
    let uv = in.uv * 2.0 - 1.0;
    let dist = length(uv);
    if dist > 1.0 {
        discard;
    }
    let n = fbm(uv * 3.0 + vec2<f32>(effect.time * 0.4, -effect.time * 0.3));
    let band = smoothstep(1.0, 0.6, dist) * (0.5 + n * 0.8);
    let pulse = 0.75 + 0.25 * sin(effect.time * 3.6);
    let a = band * object.color.a * pulse * (0.5 + effect.power * 0.5);
    return vec4<f32>(object.color.rgb, a);
}
"#
);

/// Point sprites expanded from one instance to a quad.
const POINT_SPRITE_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
struct PointInput {
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec4<f32>,
}

struct PointOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
}

const CORNERS: array<vec2<f32>, 6> = array<vec2<f32>, 6>(
    vec2<f32>(-0.5, -0.5),
    vec2<f32>(0.5, -0.5),
    vec2<f32>(0.5, 0.5),
    vec2<f32>(-0.5, -0.5),
    vec2<f32>(0.5, 0.5),
    vec2<f32>(-0.5, 0.5),
);

@vertex
fn vs_main(@builtin(vertex_index) vertex_idx: u32, in: PointInput) -> PointOutput {
    var out: PointOutput;
    var corners = CORNERS;
    let corner = corners[vertex_idx % 6u];
    let center = to_clip(object.model * vec4<f32>(in.position, 1.0));
    var extent = corner * in.size * object.model[0].x;
    if object.flags.x > 0.5 {
        // Screen-space sizes are in screen heights
        extent = extent * vec2<f32>(2.0 * camera.viewport.y * camera.viewport.z, -2.0);
    } else {
        // Perspective size attenuation
        extent = extent * vec2<f32>(camera.view_proj[0].x, camera.view_proj[1].y);
    }
    out.clip = center + vec4<f32>(extent, 0.0, 0.0);
    out.uv = corner + vec2<f32>(0.5);
    out.color = in.color * object.color;
    return out;
}

@fragment
fn fs_main(in: PointOutput) -> @location(0) vec4<f32> {
    let d = length(in.uv - vec2<f32>(0.5)) * 2.0;
    if d > 1.0 {
        discard;
    }
    let soft = 1.0 - smoothstep(0.6, 1.0, d);
    return vec4<f32>(in.color.rgb, in.color.a * soft);
}
"#
);

/// Line list.
const LINE_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) width: f32,
    @location(2) color: vec4<f32>,
}

struct LineOutput {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(in: LineInput) -> LineOutput {
    var out: LineOutput;
    out.clip = to_clip(object.model * vec4<f32>(in.position, 1.0));
    out.color = in.color * object.color;
    return out;
}

@fragment
fn fs_main(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#
);

/// Full-screen tint, three vertices, no vertex buffer.
const SCREEN_TINT_WGSL: &str = concat!(
    wgsl_common!(),
    r#"
@vertex
fn vs_main(@builtin(vertex_index) vertex_idx: u32) -> @builtin(position) vec4<f32> {
    let x = f32(i32(vertex_idx & 1u) * 4 - 1);
    let y = f32(i32(vertex_idx >> 1u) * 4 - 1);
    return vec4<f32>(x, y, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return object.color;
}
"#
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_program_has_entry_points() {
        for kind in ShaderKind::ALL {
            let src = kind.source();
            assert!(src.contains("fn vs_main"), "{} vertex", kind.label());
            assert!(src.contains("fn fs_main"), "{} fragment", kind.label());
            assert!(src.contains("struct EffectUniforms"));
        }
    }

    #[test]
    fn test_uniform_layout_matches_rust() {
        // Four f32 fields, same order as crate::compositor::EffectUniforms
        let src = ShaderKind::GlowHalo.source();
        let start = src.find("struct EffectUniforms").unwrap();
        let body = &src[start..start + 100];
        let order: Vec<usize> = ["time", "power", "age", "_pad"]
            .iter()
            .map(|f| body.find(f).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_every_program_validates() {
        for kind in ShaderKind::ALL {
            let module = naga::front::wgsl::parse_str(kind.source())
                .unwrap_or_else(|e| panic!("{} parse: {}", kind.label(), e.emit_to_string(kind.source())));
            let mut validator = naga::valid::Validator::new(
                naga::valid::ValidationFlags::all(),
                naga::valid::Capabilities::all(),
            );
            if let Err(e) = validator.validate(&module) {
                panic!("{} validation: {:?}", kind.label(), e);
            }
        }
    }

    #[test]
    fn test_topology() {
        assert_eq!(ShaderKind::Line.topology(), wgpu::PrimitiveTopology::LineList);
        assert_eq!(ShaderKind::PointSprite.topology(), wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(EffectShaders::descriptor(ShaderKind::InkVortex).label, Some("ink_vortex"));
    }
}
