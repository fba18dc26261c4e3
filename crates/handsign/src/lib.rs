//! # HANDSIGN
//!
//! Hand signs in, domain expansions out. Ties the landmark pipeline of
//! [`handsign_core`] to the effects and compositor of
//! [`handsign_rendering`] behind one host-driven [`Session`].
//!
//! ## Example
//!
//! ```rust
//! use handsign::{HandsignConfig, Session};
//! use handsign_core::{poses, LandmarkFrame, Technique};
//! use handsign_rendering::CommandRecorder;
//!
//! let (mut session, mut target) =
//!     Session::start(HandsignConfig::default(), || Ok(CommandRecorder::new())).unwrap();
//!
//! session.slot().publish(LandmarkFrame::single(poses::open_palm()));
//! let report = session.tick(1.0 / 60.0, &mut target).unwrap();
//! assert_eq!(report.technique, Some(Technique::MalevolentShrine));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod session;

pub use config::{FrameConfig, GestureConfig, HandsignConfig, HysteresisConfig, PowerConfig};
pub use error::{ConfigError, HandsignError, HandsignResult};
pub use session::{clamp_dt, FrameReport, HudState, Session, BACKDROP_DIM_ACTIVE, BACKDROP_DIM_IDLE};
