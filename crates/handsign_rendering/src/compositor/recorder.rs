//! Headless render target that records the command stream.

use super::passes::{ClearFlags, RenderPass, RenderTarget};
use super::scene::Scene;
use super::uniforms::EffectUniforms;
use crate::error::{RenderError, RenderResult};

/// One recorded command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordedCommand {
    /// A clear.
    Clear(ClearFlags),
    /// A scene draw.
    Draw {
        /// Pass drawn.
        pass: RenderPass,
        /// Objects in the scene.
        objects: u32,
        /// Point instances in the scene.
        points: u32,
        /// Line vertices in the scene.
        line_vertices: u32,
        /// Uniforms bound for the draw.
        uniforms: EffectUniforms,
    },
}

/// A [`RenderTarget`] that keeps the commands of the most recent frame.
#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<RecordedCommand>,
    frames: u64,
    lose_context_after: Option<u64>,
}

impl CommandRecorder {
    /// Creates a recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(8),
            frames: 0,
            lose_context_after: None,
        }
    }

    /// A recorder whose context is lost after `frames` completed frames.
    #[must_use]
    pub fn losing_context_after(frames: u64) -> Self {
        Self {
            lose_context_after: Some(frames),
            ..Self::new()
        }
    }

    /// Commands of the current (or last) frame.
    #[must_use]
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Frames started (full clears seen).
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// The last draw of `pass` in the current frame.
    #[must_use]
    pub fn draw_of(&self, pass: RenderPass) -> Option<&RecordedCommand> {
        self.commands
            .iter()
            .rev()
            .find(|c| matches!(c, RecordedCommand::Draw { pass: p, .. } if *p == pass))
    }
}

impl RenderTarget for CommandRecorder {
    fn clear(&mut self, flags: ClearFlags) -> RenderResult<()> {
        if flags.color {
            // A color clear starts a new frame.
            self.commands.clear();
            self.frames += 1;
        }
        self.commands.push(RecordedCommand::Clear(flags));
        Ok(())
    }

    fn draw_scene(&mut self, scene: &Scene, pass: RenderPass, uniforms: &EffectUniforms) -> RenderResult<()> {
        if self.lose_context_after.is_some_and(|n| self.frames > n) {
            return Err(RenderError::ContextLost { pass });
        }
        self.commands.push(RecordedCommand::Draw {
            pass,
            objects: scene.objects().len() as u32,
            points: scene.points().len() as u32,
            line_vertices: scene.lines().len() as u32,
            uniforms: *uniforms,
        });
        Ok(())
    }
}
