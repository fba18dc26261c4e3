//! # Render Error Types
//!
//! Simulation never fails; only the drawing surface can. Every variant here
//! is fatal for the session that hit it.

use thiserror::Error;

use crate::compositor::RenderPass;

/// Errors raised by a [`RenderTarget`](crate::compositor::RenderTarget).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The drawing surface could not be created.
    #[error("render surface unavailable: {reason}")]
    SurfaceUnavailable {
        /// Backend-supplied reason.
        reason: String,
    },

    /// The graphics context was lost mid-session.
    #[error("graphics context lost during {pass:?} pass")]
    ContextLost {
        /// Pass that was being recorded.
        pass: RenderPass,
    },

    /// A scene references instance data it does not own.
    #[error("scene object {object} references {kind} {end} but only {available} exist")]
    InvalidScene {
        /// Index of the offending object.
        object: usize,
        /// `"points"` or `"line vertices"`.
        kind: &'static str,
        /// End of the referenced range.
        end: u32,
        /// Number of instances in the scene buffer.
        available: u32,
    },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
