//! # Gesture Classifier
//!
//! Stateless rule evaluation over one landmark frame.
//!
//! ## Rule Priority
//!
//! ```text
//! >= 2 hands:  both crossed AND wrists close      -> SelfEmbodiment
//!              thumbs touching AND all fingers up -> DivineDogs
//! primary:     index/middle crossed               -> UnlimitedVoid
//!              open palm                          -> MalevolentShrine
//! otherwise                                       -> None
//! ```
//!
//! Two-hand rules are checked first so that a two-handed sign is never
//! reported as the single-hand sign one of its hands also happens to make.

use crate::landmarks::{joint, Hand, LandmarkFrame};
use crate::technique::Technique;

/// Distance thresholds used by the rules. All distances are planar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Max index/middle tip distance for "crossed".
    pub cross_tip_distance: f32,
    /// Max wrist distance for the two-hand crossed rule.
    pub wrist_distance: f32,
    /// Max thumb-tip distance for the thumb-touch rule.
    pub thumb_touch_distance: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            cross_tip_distance: 0.07,
            wrist_distance: 0.25,
            thumb_touch_distance: 0.06,
        }
    }
}

/// Pure classifier: same frame, same answer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
}

impl GestureClassifier {
    /// Creates a classifier with custom thresholds.
    #[must_use]
    pub const fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    /// Active thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    /// Classifies a frame.
    #[must_use]
    pub fn classify(&self, frame: &LandmarkFrame) -> Option<Technique> {
        if let [first, second, ..] = frame.hands() {
            if let Some(t) = self.classify_pair(first, second) {
                return Some(t);
            }
        }

        let hand = frame.primary()?;
        if self.is_crossed(hand) {
            Some(Technique::UnlimitedVoid)
        } else if hand.all_fingers_up() {
            Some(Technique::MalevolentShrine)
        } else {
            None
        }
    }

    fn classify_pair(&self, a: &Hand, b: &Hand) -> Option<Technique> {
        let wrists_close = distance_between(a, b, joint::WRIST)
            .is_some_and(|d| d < self.thresholds.wrist_distance);
        if wrists_close && self.is_crossed(a) && self.is_crossed(b) {
            return Some(Technique::SelfEmbodiment);
        }

        let thumbs_touch = distance_between(a, b, joint::THUMB_TIP)
            .is_some_and(|d| d < self.thresholds.thumb_touch_distance);
        if thumbs_touch && a.all_fingers_up() && b.all_fingers_up() {
            return Some(Technique::DivineDogs);
        }
        None
    }

    /// Index and middle finger crossed: tips close, x-order of the tips
    /// opposite to the x-order of the knuckles, both fingers extended.
    #[must_use]
    pub fn is_crossed(&self, hand: &Hand) -> bool {
        let (Some(index_tip), Some(middle_tip), Some(index_mcp), Some(middle_mcp)) = (
            hand.get(joint::INDEX_TIP),
            hand.get(joint::MIDDLE_TIP),
            hand.get(joint::INDEX_MCP),
            hand.get(joint::MIDDLE_MCP),
        ) else {
            return false;
        };

        let close = index_tip.distance_2d(middle_tip) <= self.thresholds.cross_tip_distance;
        let knuckles_left = index_mcp.x < middle_mcp.x;
        let tips_left = index_tip.x < middle_tip.x;

        close
            && knuckles_left != tips_left
            && hand.finger_up(joint::INDEX_TIP, joint::INDEX_PIP)
            && hand.finger_up(joint::MIDDLE_TIP, joint::MIDDLE_PIP)
    }
}

fn distance_between(a: &Hand, b: &Hand, j: usize) -> Option<f32> {
    Some(a.get(j)?.distance_2d(b.get(j)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Handedness, Landmark};
    use crate::poses;

    fn classify(frame: &LandmarkFrame) -> Option<Technique> {
        GestureClassifier::default().classify(frame)
    }

    #[test]
    fn test_empty_frame_is_none() {
        assert_eq!(classify(&LandmarkFrame::empty()), None);
    }

    #[test]
    fn test_open_palm() {
        let frame = LandmarkFrame::single(poses::open_palm());
        assert_eq!(classify(&frame), Some(Technique::MalevolentShrine));
    }

    #[test]
    fn test_fist_and_peace_are_none() {
        assert_eq!(classify(&LandmarkFrame::single(poses::fist())), None);
        assert_eq!(classify(&LandmarkFrame::single(poses::peace_sign())), None);
    }

    #[test]
    fn test_crossed_takes_priority_over_open_palm() {
        // Crossed index/middle with ring and pinky also up satisfies both rules.
        let mut hand = poses::crossed_fingers();
        let open = poses::open_palm();
        let mut lm = hand.landmarks().to_vec();
        for j in joint::RING_MCP..=joint::PINKY_TIP {
            lm[j] = *open.get(j).unwrap();
        }
        hand = Hand::new(lm, Handedness::Right);
        assert!(hand.all_fingers_up());

        let frame = LandmarkFrame::single(hand);
        assert_eq!(classify(&frame), Some(Technique::UnlimitedVoid));
    }

    #[test]
    fn test_thumb_touch_pair() {
        let (a, b) = poses::thumb_touch_pair();
        assert_eq!(classify(&LandmarkFrame::pair(a, b)), Some(Technique::DivineDogs));
    }

    #[test]
    fn test_crossed_pair_needs_close_wrists() {
        let (a, b) = poses::crossed_pair();
        assert_eq!(
            classify(&LandmarkFrame::pair(a.clone(), b)),
            Some(Technique::SelfEmbodiment)
        );

        // Far apart: falls back to the primary hand's single-hand sign.
        let far = poses::crossed_fingers_at(0.9);
        assert_eq!(classify(&LandmarkFrame::pair(a, far)), Some(Technique::UnlimitedVoid));
    }

    #[test]
    fn test_two_open_palms_apart_is_shrine() {
        let frame = LandmarkFrame::pair(poses::open_palm_at(0.2), poses::open_palm_at(0.8));
        assert_eq!(classify(&frame), Some(Technique::MalevolentShrine));
    }

    #[test]
    fn test_missing_joints_never_match() {
        let partial: Vec<Landmark> = poses::open_palm().landmarks()[..10].to_vec();
        let frame = LandmarkFrame::single(Hand::new(partial, Handedness::Left));
        assert_eq!(classify(&frame), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = GestureClassifier::new(GestureThresholds {
            cross_tip_distance: 0.01,
            ..GestureThresholds::default()
        });
        let frame = LandmarkFrame::single(poses::crossed_fingers());
        assert_eq!(strict.classify(&frame), None);
    }

    #[test]
    fn test_deterministic() {
        let (a, b) = poses::thumb_touch_pair();
        let frame = LandmarkFrame::pair(a, b);
        let c = GestureClassifier::default();
        assert_eq!(c.classify(&frame), c.classify(&frame));
    }
}
