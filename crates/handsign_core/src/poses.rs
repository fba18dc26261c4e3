//! Synthetic hand poses.
//!
//! Anatomically plausible landmark sets for scripted replays, benches and
//! tests. Every pose is built around a horizontal center `cx`; the wrist sits
//! at `y = 0.8` and extended fingertips at `y = 0.35`.

use crate::landmarks::{joint, Hand, Handedness, Landmark, LANDMARK_COUNT};

const WRIST_Y: f32 = 0.8;
const MCP_Y: f32 = 0.6;
const PIP_Y: f32 = 0.5;
const DIP_UP_Y: f32 = 0.42;
const TIP_UP_Y: f32 = 0.35;
const DIP_DOWN_Y: f32 = 0.58;
const TIP_DOWN_Y: f32 = 0.65;

/// MCP x offsets for index, middle, ring, pinky.
const MCP_DX: [f32; 4] = [-0.06, -0.02, 0.02, 0.06];
/// Spread fingertip x offsets for index, middle, ring, pinky.
const TIP_DX: [f32; 4] = [-0.09, -0.01, 0.04, 0.09];

fn build(cx: f32, up: [bool; 4], crossed: bool, handedness: Handedness) -> Hand {
    let mut lm = vec![Landmark::default(); LANDMARK_COUNT];
    lm[joint::WRIST] = Landmark::new(cx, WRIST_Y, 0.0);
    lm[joint::THUMB_CMC] = Landmark::new(cx - 0.08, 0.75, -0.01);
    lm[joint::THUMB_MCP] = Landmark::new(cx - 0.12, 0.70, -0.02);
    lm[joint::THUMB_IP] = Landmark::new(cx - 0.15, 0.65, -0.03);
    lm[joint::THUMB_TIP] = Landmark::new(cx - 0.18, 0.60, -0.03);

    let mut tip_dx = TIP_DX;
    if crossed {
        // Index tip swings over the middle finger.
        tip_dx[0] = 0.0;
        tip_dx[1] = -0.03;
    }

    for finger in 0..4 {
        let mcp = joint::INDEX_MCP + finger * 4;
        let (dip_y, tip_y) = if up[finger] {
            (DIP_UP_Y, TIP_UP_Y)
        } else {
            (DIP_DOWN_Y, TIP_DOWN_Y)
        };
        let mcp_x = cx + MCP_DX[finger];
        let tip_x = cx + tip_dx[finger];
        lm[mcp] = Landmark::new(mcp_x, MCP_Y, 0.0);
        lm[mcp + 1] = Landmark::new((mcp_x * 2.0 + tip_x) / 3.0, PIP_Y, -0.02);
        lm[mcp + 2] = Landmark::new((mcp_x + tip_x * 2.0) / 3.0, dip_y, -0.03);
        lm[mcp + 3] = Landmark::new(tip_x, tip_y, -0.04);
    }

    Hand::new(lm, handedness)
}

/// All four fingers extended and spread, centered at `cx`.
#[must_use]
pub fn open_palm_at(cx: f32) -> Hand {
    build(cx, [true; 4], false, Handedness::Right)
}

/// Open palm in the middle of the frame.
#[must_use]
pub fn open_palm() -> Hand {
    open_palm_at(0.5)
}

/// Every finger curled.
#[must_use]
pub fn fist() -> Hand {
    build(0.5, [false; 4], false, Handedness::Right)
}

/// Index and middle extended and crossed, ring and pinky curled.
#[must_use]
pub fn crossed_fingers_at(cx: f32) -> Hand {
    build(cx, [true, true, false, false], true, Handedness::Right)
}

/// Crossed fingers in the middle of the frame.
#[must_use]
pub fn crossed_fingers() -> Hand {
    crossed_fingers_at(0.5)
}

/// Index and middle extended side by side, not crossed.
#[must_use]
pub fn peace_sign() -> Hand {
    build(0.5, [true, true, false, false], false, Handedness::Right)
}

/// Reflects a hand horizontally about `axis_x`, swapping its handedness.
#[must_use]
pub fn mirrored(hand: &Hand, axis_x: f32) -> Hand {
    let handedness = match hand.handedness() {
        Handedness::Left => Handedness::Right,
        Handedness::Right => Handedness::Left,
        Handedness::Unknown => Handedness::Unknown,
    };
    let mut out = Hand::new(hand.landmarks().to_vec(), handedness);
    for j in 0..hand.landmarks().len() {
        if let Some(lm) = out.landmark_mut(j) {
            lm.x = 2.0 * axis_x - lm.x;
        }
    }
    out
}

/// Scales a hand about its wrist. Factors above 1 read as "closer to the
/// camera" and raise the power level.
#[must_use]
pub fn scaled(hand: &Hand, factor: f32) -> Hand {
    let Some(wrist) = hand.get(joint::WRIST).copied() else {
        return hand.clone();
    };
    let mut out = hand.clone();
    for j in 0..hand.landmarks().len() {
        if let Some(lm) = out.landmark_mut(j) {
            lm.x = wrist.x + (lm.x - wrist.x) * factor;
            lm.y = wrist.y + (lm.y - wrist.y) * factor;
            lm.z = wrist.z + (lm.z - wrist.z) * factor;
        }
    }
    out
}

/// Two open palms with thumb tips touching.
#[must_use]
pub fn thumb_touch_pair() -> (Hand, Hand) {
    // Left hand is mirrored so its thumb points right, toward the other one.
    let left = mirrored(&open_palm_at(0.30), 0.30);
    let right = open_palm_at(0.30 + 0.36 + 0.02);
    (left, right)
}

/// Crossed fingers on both hands, wrists close together.
#[must_use]
pub fn crossed_pair() -> (Hand, Hand) {
    let left = mirrored(&crossed_fingers_at(0.42), 0.42);
    let right = crossed_fingers_at(0.58);
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_palm_has_all_fingers_up() {
        let hand = open_palm();
        assert!(hand.is_complete());
        assert!(hand.all_fingers_up());
    }

    #[test]
    fn test_fist_has_no_fingers_up() {
        let hand = fist();
        for (tip, pip) in joint::FINGERS {
            assert!(!hand.finger_up(tip, pip));
        }
    }

    #[test]
    fn test_mirror_is_involution() {
        let hand = crossed_fingers();
        let back = mirrored(&mirrored(&hand, 0.3), 0.3);
        for (a, b) in hand.landmarks().iter().zip(back.landmarks()) {
            assert!((a.x - b.x).abs() < 1e-5);
        }
        assert_eq!(back.handedness(), hand.handedness());
    }

    #[test]
    fn test_thumb_pair_touches() {
        let (a, b) = thumb_touch_pair();
        let d = a
            .get(joint::THUMB_TIP)
            .unwrap()
            .distance_2d(b.get(joint::THUMB_TIP).unwrap());
        assert!(d < 0.06, "thumb distance {d}");
    }

    #[test]
    fn test_scaled_keeps_wrist() {
        let hand = scaled(&open_palm(), 2.0);
        assert_eq!(hand.get(joint::WRIST), open_palm().get(joint::WRIST));
    }
}
