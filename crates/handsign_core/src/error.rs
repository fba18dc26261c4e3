//! # Landmark Error Types
//!
//! Errors raised while ingesting raw detector output. Classification itself
//! never fails: a malformed frame is rejected here, before it reaches the slot.

use thiserror::Error;

/// Errors that can occur while converting raw detector output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    /// A landmark did not have 2 or 3 coordinates.
    #[error("landmark {joint} of hand {hand} has {found} coordinates, expected 2 or 3")]
    BadCoordinateCount {
        /// Hand index within the frame.
        hand: usize,
        /// Joint index within the hand.
        joint: usize,
        /// Number of coordinates received.
        found: usize,
    },

    /// A coordinate was NaN or infinite.
    #[error("landmark {joint} of hand {hand} is not finite")]
    NonFinite {
        /// Hand index within the frame.
        hand: usize,
        /// Joint index within the hand.
        joint: usize,
    },
}

/// Result type for landmark ingestion.
pub type LandmarkResult<T> = Result<T, LandmarkError>;
