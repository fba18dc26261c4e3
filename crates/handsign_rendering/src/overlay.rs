//! Landmark overlay.
//!
//! Draws the detected hand skeleton on top of the effect in normalized
//! screen space. The camera feed is shown mirrored, so `x` is flipped.

use handsign_core::{joint, Hand, LandmarkFrame, HAND_CONNECTIONS};

use crate::compositor::{LineVertex, Material, PointInstance, Scene, SceneObject};

const BONE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 80.0 / 255.0];
const JOINT_COLOR: [f32; 4] = [124.0 / 255.0, 77.0 / 255.0, 1.0, 180.0 / 255.0];
const TIP_OUTER_COLOR: [f32; 4] = [124.0 / 255.0, 77.0 / 255.0, 1.0, 120.0 / 255.0];
const TIP_INNER_COLOR: [f32; 4] = [179.0 / 255.0, 136.0 / 255.0, 1.0, 220.0 / 255.0];

const BONE_WIDTH: f32 = 2.0;
const JOINT_SIZE: f32 = 0.008;
const TIP_OUTER_SIZE: f32 = 0.02;
const TIP_INNER_SIZE: f32 = 0.008;

/// Overlay draws after every effect object.
pub const OVERLAY_ORDER: i32 = 100;

#[inline]
fn mirrored(hand: &Hand, j: usize) -> Option<[f32; 3]> {
    hand.get(j).map(|l| [1.0 - l.x, l.y, 0.0])
}

/// Appends bones, joints and fingertip highlights for every hand.
///
/// Joints missing from a hand are skipped together with their bones.
pub fn draw_hands(frame: &LandmarkFrame, scene: &mut Scene) {
    if frame.is_empty() {
        return;
    }

    scene.add_lines(
        SceneObject::lines(Material::normal([1.0; 4])).screen().order(OVERLAY_ORDER),
        frame.hands().iter().flat_map(|hand| {
            HAND_CONNECTIONS.iter().filter_map(move |&(a, b)| {
                Some([
                    LineVertex::new(mirrored(hand, a)?, BONE_WIDTH, BONE_COLOR),
                    LineVertex::new(mirrored(hand, b)?, BONE_WIDTH, BONE_COLOR),
                ])
            })
        })
        .flatten(),
    );

    scene.add_points(
        SceneObject::points(Material::normal([1.0; 4])).screen().order(OVERLAY_ORDER + 1),
        frame.hands().iter().flat_map(|hand| {
            (0..hand.landmarks().len()).filter_map(move |j| {
                let p = mirrored(hand, j)?;
                Some(PointInstance::new(p, JOINT_SIZE, JOINT_COLOR))
            })
        }),
    );

    scene.add_points(
        SceneObject::points(Material::normal([1.0; 4])).screen().order(OVERLAY_ORDER + 2),
        frame.hands().iter().flat_map(|hand| {
            joint::TIPS.iter().filter_map(move |&tip| mirrored(hand, tip)).flat_map(|p| {
                [
                    PointInstance::new(p, TIP_OUTER_SIZE, TIP_OUTER_COLOR),
                    PointInstance::new(p, TIP_INNER_SIZE, TIP_INNER_COLOR),
                ]
            })
        }),
    );
}
