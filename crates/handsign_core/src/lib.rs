//! # HANDSIGN Core
//!
//! Turns a frame of hand landmarks into a selected technique:
//!
//! ```text
//! LandmarkSlot ──snapshot──> GestureClassifier ──Option<Technique>──> TechniqueStateMachine
//!      ▲                                                                     │
//!  detector callback                                              Transition { changed, .. }
//! ```
//!
//! ## Architecture Rules
//!
//! 1. **The classifier is pure** - one frame in, one answer out, no memory
//! 2. **Missing input is not an error** - absent hands or joints mean "no sign"
//! 3. **Only the state machine remembers** - hysteresis lives in one place
//!
//! ## Example
//!
//! ```rust
//! use handsign_core::{GestureClassifier, LandmarkFrame, Technique, TechniqueStateMachine, poses};
//!
//! let classifier = GestureClassifier::default();
//! let mut machine = TechniqueStateMachine::default();
//!
//! let frame = LandmarkFrame::single(poses::open_palm());
//! let transition = machine.advance(classifier.classify(&frame));
//! assert_eq!(transition.active, Some(Technique::MalevolentShrine));
//! assert!(transition.changed);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod gesture;
pub mod landmarks;
pub mod poses;
pub mod power;
pub mod slot;
pub mod state_machine;
pub mod technique;

pub use error::{LandmarkError, LandmarkResult};
pub use gesture::{GestureClassifier, GestureThresholds};
pub use landmarks::{joint, Hand, Handedness, Landmark, LandmarkFrame, HAND_CONNECTIONS, LANDMARK_COUNT};
pub use power::PowerCalibration;
pub use slot::LandmarkSlot;
pub use state_machine::{TechniqueState, TechniqueStateMachine, Transition, DEFAULT_IDLE_THRESHOLD};
pub use technique::Technique;
