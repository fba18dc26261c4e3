//! # Power Level
//!
//! Proximity of the primary hand to the camera, used as a visual intensity
//! scalar. The wrist to middle-MCP span grows as the hand approaches:
//!
//! ```text
//! power = clamp((|wrist - middle_mcp| - min_distance) / range, 0, 1)
//! ```

use crate::landmarks::{joint, LandmarkFrame};

/// Maps hand span to a `[0, 1]` power level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerCalibration {
    /// Span (3-D) that maps to zero power.
    pub min_distance: f32,
    /// Additional span over which power ramps to 1.
    pub range: f32,
}

impl Default for PowerCalibration {
    fn default() -> Self {
        Self {
            min_distance: 0.12,
            range: 0.30,
        }
    }
}

impl PowerCalibration {
    /// Creates a calibration.
    #[must_use]
    pub const fn new(min_distance: f32, range: f32) -> Self {
        Self { min_distance, range }
    }

    /// Power of the primary hand. Zero when there is no hand or the span
    /// joints are missing.
    #[must_use]
    pub fn power(&self, frame: &LandmarkFrame) -> f32 {
        let Some(hand) = frame.primary() else {
            return 0.0;
        };
        match (hand.get(joint::WRIST), hand.get(joint::MIDDLE_MCP)) {
            (Some(w), Some(m)) => self.normalize(w.distance_3d(m)),
            _ => 0.0,
        }
    }

    /// Maps a raw span to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn normalize(&self, span: f32) -> f32 {
        if self.range <= f32::EPSILON || !span.is_finite() {
            return 0.0;
        }
        ((span - self.min_distance) / self.range).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Hand, Handedness, Landmark, LANDMARK_COUNT};

    fn hand_with_span(dy: f32, dz: f32) -> Hand {
        let mut lm = vec![Landmark::default(); LANDMARK_COUNT];
        lm[joint::WRIST] = Landmark::new(0.5, 0.8, 0.0);
        lm[joint::MIDDLE_MCP] = Landmark::new(0.5, 0.8 - dy, dz);
        Hand::new(lm, Handedness::Right)
    }

    #[test]
    fn test_no_hand_is_zero() {
        assert_eq!(PowerCalibration::default().power(&LandmarkFrame::empty()), 0.0);
    }

    #[test]
    fn test_clamped_range() {
        let cal = PowerCalibration::default();
        assert_eq!(cal.power(&LandmarkFrame::single(hand_with_span(0.05, 0.0))), 0.0);
        assert_eq!(cal.power(&LandmarkFrame::single(hand_with_span(0.60, 0.0))), 1.0);
        let mid = cal.power(&LandmarkFrame::single(hand_with_span(0.27, 0.0)));
        assert!((mid - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_depth_contributes() {
        let cal = PowerCalibration::default();
        // 3-4-5 triangle: planar 0.18, depth 0.24, span 0.30
        let p = cal.power(&LandmarkFrame::single(hand_with_span(0.18, 0.24)));
        assert!((p - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_range() {
        assert_eq!(PowerCalibration::new(0.1, 0.0).normalize(0.5), 0.0);
    }
}
