//! # Session Error Types
//!
//! Configuration problems are caught before the first frame; render errors
//! end the session.

use std::path::PathBuf;

use handsign_rendering::RenderError;
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has wrong field types.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Top-level session errors.
#[derive(Error, Debug)]
pub enum HandsignError {
    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Drawing surface failure.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for session operations.
pub type HandsignResult<T> = Result<T, HandsignError>;
