//! Scene graphs.
//!
//! A scene is a flat, render-ordered list of objects plus the instance
//! buffers they reference. Buffers are cleared every frame and refilled, so
//! after warm-up a frame allocates nothing.

use std::ops::Range;

use super::blend::{BlendMode, Material};
use super::uniforms::EffectUniforms;
use super::vertex::{LineVertex, PointInstance};
use crate::error::{RenderError, RenderResult};
use crate::shaders::ShaderKind;

/// Coordinate space of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Space {
    /// 3-D world, viewed by the effect camera (origin at screen center).
    #[default]
    World,
    /// Normalized screen `[0, 1]`, `y` down, drawn without projection.
    Screen,
}

/// What an object draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// UV sphere.
    Sphere {
        /// Radius before `scale`.
        radius: f32,
    },
    /// Flat square facing the camera, shaders cut it to a disk.
    Disk {
        /// Edge length before `scale`.
        size: f32,
    },
    /// Point sprites from the scene's point buffer.
    Points(Range<u32>),
    /// Line list (vertex pairs) from the scene's line buffer.
    Lines(Range<u32>),
    /// Full-screen quad.
    FullScreen,
}

/// One draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Geometry.
    pub primitive: Primitive,
    /// Shader program.
    pub shader: ShaderKind,
    /// Render state.
    pub material: Material,
    /// Coordinate space.
    pub space: Space,
    /// Translation.
    pub position: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
    /// Lower draws first.
    pub render_order: i32,
}

impl SceneObject {
    /// A mesh object at the origin.
    #[must_use]
    pub const fn mesh(primitive: Primitive, shader: ShaderKind, material: Material) -> Self {
        Self {
            primitive,
            shader,
            material,
            space: Space::World,
            position: [0.0; 3],
            scale: 1.0,
            render_order: 0,
        }
    }

    /// A point-sprite object; the range is filled by [`Scene::add_points`].
    #[must_use]
    pub const fn points(material: Material) -> Self {
        Self::mesh(Primitive::Points(0..0), ShaderKind::PointSprite, material)
    }

    /// A line object; the range is filled by [`Scene::add_lines`].
    #[must_use]
    pub const fn lines(material: Material) -> Self {
        Self::mesh(Primitive::Lines(0..0), ShaderKind::Line, material)
    }

    /// A full-screen tint.
    #[must_use]
    pub const fn tint(color: [f32; 4]) -> Self {
        let mut obj = Self::mesh(Primitive::FullScreen, ShaderKind::ScreenTint, Material::normal(color));
        obj.space = Space::Screen;
        obj
    }

    /// Moves the object.
    #[must_use]
    pub const fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Scales the object.
    #[must_use]
    pub const fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the render order.
    #[must_use]
    pub const fn order(mut self, render_order: i32) -> Self {
        self.render_order = render_order;
        self
    }

    /// Places the object in normalized screen space.
    #[must_use]
    pub const fn screen(mut self) -> Self {
        self.space = Space::Screen;
        self
    }
}

/// Which pass a scene is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Core geometry, any blend mode.
    Main,
    /// Oversized additive duplicates.
    Glow,
}

/// Reusable scene.
#[derive(Debug, Clone)]
pub struct Scene {
    kind: SceneKind,
    objects: Vec<SceneObject>,
    points: Vec<PointInstance>,
    lines: Vec<LineVertex>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new(kind: SceneKind) -> Self {
        Self {
            kind,
            objects: Vec::with_capacity(32),
            points: Vec::with_capacity(8192),
            lines: Vec::with_capacity(1024),
        }
    }

    /// Scene kind.
    #[must_use]
    pub const fn kind(&self) -> SceneKind {
        self.kind
    }

    /// Empties the scene, keeping its buffers.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.points.clear();
        self.lines.clear();
    }

    /// Adds a mesh or tint object.
    pub fn add(&mut self, mut object: SceneObject) {
        if self.kind == SceneKind::Glow {
            object.material.blend = BlendMode::Additive;
            object.material.depth_write = false;
        }
        self.objects.push(object);
    }

    /// Appends point instances and an object drawing them. Empty input adds nothing.
    pub fn add_points<I>(&mut self, mut object: SceneObject, points: I)
    where
        I: IntoIterator<Item = PointInstance>,
    {
        let start = self.points.len() as u32;
        self.points.extend(points);
        let end = self.points.len() as u32;
        if end > start {
            object.primitive = Primitive::Points(start..end);
            self.add(object);
        }
    }

    /// Appends line-list vertices (pairs) and an object drawing them.
    pub fn add_lines<I>(&mut self, mut object: SceneObject, vertices: I)
    where
        I: IntoIterator<Item = LineVertex>,
    {
        let start = self.lines.len() as u32;
        self.lines.extend(vertices);
        // A dangling vertex cannot form a segment.
        if (self.lines.len() as u32 - start) % 2 == 1 {
            self.lines.pop();
        }
        let end = self.lines.len() as u32;
        if end > start {
            object.primitive = Primitive::Lines(start..end);
            self.add(object);
        }
    }

    /// Stable sort by render order.
    pub fn finish(&mut self) {
        self.objects.sort_by_key(|o| o.render_order);
    }

    /// Objects in draw order (after [`Scene::finish`]).
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Point buffer.
    #[must_use]
    pub fn points(&self) -> &[PointInstance] {
        &self.points
    }

    /// Line buffer.
    #[must_use]
    pub fn lines(&self) -> &[LineVertex] {
        &self.lines
    }

    /// Point buffer as bytes for upload.
    #[must_use]
    pub fn point_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }

    /// Line buffer as bytes for upload.
    #[must_use]
    pub fn line_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lines)
    }

    /// True when there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Checks every object's range against the buffers.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidScene`] for the first out-of-range object.
    pub fn validate(&self) -> RenderResult<()> {
        let points = self.points.len() as u32;
        let lines = self.lines.len() as u32;
        for (i, obj) in self.objects.iter().enumerate() {
            let check = match &obj.primitive {
                Primitive::Points(r) => Some((r, "points", points)),
                Primitive::Lines(r) => Some((r, "line vertices", lines)),
                _ => None,
            };
            if let Some((range, kind, available)) = check {
                if range.end > available || range.start > range.end {
                    return Err(RenderError::InvalidScene {
                        object: i,
                        kind,
                        end: range.end,
                        available,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Both scenes of one frame plus their uniforms.
#[derive(Debug, Clone)]
pub struct SceneGraphs {
    /// Main pass.
    pub main: Scene,
    /// Glow pass.
    pub glow: Scene,
    /// Uniforms of the active effect.
    pub uniforms: EffectUniforms,
}

impl Default for SceneGraphs {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraphs {
    /// Creates empty scenes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            main: Scene::new(SceneKind::Main),
            glow: Scene::new(SceneKind::Glow),
            uniforms: EffectUniforms::default(),
        }
    }

    /// Empties both scenes and zeroes the uniforms.
    pub fn begin_frame(&mut self) {
        self.main.clear();
        self.glow.clear();
        self.uniforms = EffectUniforms::default();
    }

    /// Sorts both scenes for drawing.
    pub fn finish(&mut self) {
        self.main.finish();
        self.glow.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glow_forces_additive() {
        let mut scene = Scene::new(SceneKind::Glow);
        let obj = SceneObject::mesh(
            Primitive::Sphere { radius: 0.55 },
            ShaderKind::GlowHalo,
            Material::normal([1.0; 4]).with_depth_write(),
        );
        scene.add(obj);
        let m = scene.objects()[0].material;
        assert_eq!(m.blend, BlendMode::Additive);
        assert!(!m.depth_write);
    }

    #[test]
    fn test_ranges_and_order() {
        let mut scene = Scene::new(SceneKind::Main);
        let p = PointInstance::new([0.0; 3], 1.0, [1.0; 4]);
        scene.add_points(SceneObject::points(Material::default()).order(4), [p; 3]);
        scene.add_points(SceneObject::points(Material::default()).order(3), [p; 2]);
        scene.add_points(SceneObject::points(Material::default()), std::iter::empty());
        scene.finish();
        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.objects()[0].primitive, Primitive::Points(3..5));
        assert_eq!(scene.objects()[1].primitive, Primitive::Points(0..3));
        assert!(scene.validate().is_ok());
        assert_eq!(scene.point_bytes().len(), 5 * PointInstance::SIZE);
    }

    #[test]
    fn test_odd_line_vertex_dropped() {
        let mut scene = Scene::new(SceneKind::Main);
        let v = LineVertex::new([0.0; 3], 1.0, [1.0; 4]);
        scene.add_lines(SceneObject::lines(Material::default()), [v; 3]);
        assert_eq!(scene.lines().len(), 2);
    }

    #[test]
    fn test_validate_catches_bad_range() {
        let mut scene = Scene::new(SceneKind::Main);
        scene.add(SceneObject::mesh(Primitive::Points(0..4), ShaderKind::PointSprite, Material::default()));
        assert!(matches!(
            scene.validate(),
            Err(RenderError::InvalidScene { object: 0, end: 4, available: 0, .. })
        ));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut graphs = SceneGraphs::new();
        let cap = graphs.main.points.capacity();
        graphs.main.add_points(
            SceneObject::points(Material::default()),
            [PointInstance::default(); 16],
        );
        graphs.begin_frame();
        assert!(graphs.main.is_empty());
        assert_eq!(graphs.main.points.capacity(), cap);
    }
}
