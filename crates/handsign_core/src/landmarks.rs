//! Hand landmark data model.
//!
//! Landmarks are normalized to `[0, 1]` screen space with `y` growing
//! downward. A frame is produced fresh by every detector callback and is
//! never mutated afterwards; the next frame replaces it wholesale.

use crate::error::{LandmarkError, LandmarkResult};

/// Number of landmarks the detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Anatomical joint indices.
pub mod joint {
    /// Wrist.
    pub const WRIST: usize = 0;
    /// Thumb carpometacarpal joint.
    pub const THUMB_CMC: usize = 1;
    /// Thumb metacarpophalangeal joint.
    pub const THUMB_MCP: usize = 2;
    /// Thumb interphalangeal joint.
    pub const THUMB_IP: usize = 3;
    /// Thumb tip.
    pub const THUMB_TIP: usize = 4;
    /// Index finger MCP.
    pub const INDEX_MCP: usize = 5;
    /// Index finger PIP.
    pub const INDEX_PIP: usize = 6;
    /// Index finger DIP.
    pub const INDEX_DIP: usize = 7;
    /// Index finger tip.
    pub const INDEX_TIP: usize = 8;
    /// Middle finger MCP.
    pub const MIDDLE_MCP: usize = 9;
    /// Middle finger PIP.
    pub const MIDDLE_PIP: usize = 10;
    /// Middle finger DIP.
    pub const MIDDLE_DIP: usize = 11;
    /// Middle finger tip.
    pub const MIDDLE_TIP: usize = 12;
    /// Ring finger MCP.
    pub const RING_MCP: usize = 13;
    /// Ring finger PIP.
    pub const RING_PIP: usize = 14;
    /// Ring finger DIP.
    pub const RING_DIP: usize = 15;
    /// Ring finger tip.
    pub const RING_TIP: usize = 16;
    /// Pinky MCP.
    pub const PINKY_MCP: usize = 17;
    /// Pinky PIP.
    pub const PINKY_PIP: usize = 18;
    /// Pinky DIP.
    pub const PINKY_DIP: usize = 19;
    /// Pinky tip.
    pub const PINKY_TIP: usize = 20;

    /// All five finger tips, thumb first.
    pub const TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

    /// (tip, pip) pairs of the four non-thumb fingers.
    pub const FINGERS: [(usize, usize); 4] = [
        (INDEX_TIP, INDEX_PIP),
        (MIDDLE_TIP, MIDDLE_PIP),
        (RING_TIP, RING_PIP),
        (PINKY_TIP, PINKY_PIP),
    ];
}

/// Skeleton connections used by the landmark overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = {
    use joint::*;
    [
        (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
        (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
        (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
        (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
        (RING_MCP, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
        (WRIST, PINKY_MCP),
    ]
};

/// A single tracked point on a hand.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    /// Horizontal position, `0` = left edge of the camera image.
    pub x: f32,
    /// Vertical position, `0` = top edge, grows downward.
    pub y: f32,
    /// Approximate depth relative to the wrist. `0` when the detector omits it.
    pub z: f32,
}

impl Landmark {
    /// Creates a landmark.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Planar (x, y) distance. Gesture proximity rules use this.
    #[inline]
    #[must_use]
    pub fn distance_2d(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Full 3-D distance. Power calibration uses this.
    #[inline]
    #[must_use]
    pub fn distance_3d(&self, other: &Self) -> f32 {
        let dz = self.z - other.z;
        let planar = self.distance_2d(other);
        (planar * planar + dz * dz).sqrt()
    }
}

/// Which hand the detector believes it is looking at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Handedness {
    /// Left hand.
    Left,
    /// Right hand.
    Right,
    /// Label missing or unrecognized.
    #[default]
    Unknown,
}

impl Handedness {
    /// Parses the detector's label (`"Left"` / `"Right"`, case-insensitive).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.eq_ignore_ascii_case("left") {
            Self::Left
        } else if label.eq_ignore_ascii_case("right") {
            Self::Right
        } else {
            Self::Unknown
        }
    }
}

/// One detected hand: landmarks ordered by joint id, plus handedness.
///
/// Normally holds [`LANDMARK_COUNT`] points, but shorter lists are accepted;
/// [`Hand::get`] returns `None` for absent joints and every rule built on it
/// treats that as "does not match".
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: Vec<Landmark>,
    handedness: Handedness,
}

impl Hand {
    /// Creates a hand from ordered landmarks.
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        Self { landmarks, handedness }
    }

    /// Returns the landmark for `joint`, if the detector reported it.
    #[inline]
    #[must_use]
    pub fn get(&self, joint: usize) -> Option<&Landmark> {
        self.landmarks.get(joint)
    }

    /// All landmarks in joint order.
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Handedness label.
    #[must_use]
    pub const fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// True when every joint is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }

    /// Planar distance between two joints of this hand.
    #[must_use]
    pub fn joint_distance(&self, a: usize, b: usize) -> Option<f32> {
        Some(self.get(a)?.distance_2d(self.get(b)?))
    }

    /// Finger extended: tip strictly above (smaller y than) its PIP joint.
    #[must_use]
    pub fn finger_up(&self, tip: usize, pip: usize) -> bool {
        match (self.get(tip), self.get(pip)) {
            (Some(t), Some(p)) => t.y < p.y,
            _ => false,
        }
    }

    /// All four non-thumb fingers extended.
    #[must_use]
    pub fn all_fingers_up(&self) -> bool {
        joint::FINGERS.iter().all(|&(tip, pip)| self.finger_up(tip, pip))
    }

    /// Mutable access for building poses.
    pub(crate) fn landmark_mut(&mut self, joint: usize) -> Option<&mut Landmark> {
        self.landmarks.get_mut(joint)
    }
}

/// Everything the detector reported in one callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    hands: Vec<Hand>,
}

impl LandmarkFrame {
    /// A frame with no hands.
    #[must_use]
    pub const fn empty() -> Self {
        Self { hands: Vec::new() }
    }

    /// A frame with exactly one hand.
    #[must_use]
    pub fn single(hand: Hand) -> Self {
        Self { hands: vec![hand] }
    }

    /// A frame with two hands, `first` being the primary one.
    #[must_use]
    pub fn pair(first: Hand, second: Hand) -> Self {
        Self { hands: vec![first, second] }
    }

    /// Creates a frame from already-built hands.
    #[must_use]
    pub fn new(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// Builds a frame from raw detector output.
    ///
    /// `hands[h][j]` holds 2 or 3 coordinates of joint `j` of hand `h`;
    /// `labels` runs parallel to `hands` (missing labels become
    /// [`Handedness::Unknown`]).
    ///
    /// # Errors
    ///
    /// Returns [`LandmarkError`] when a landmark has the wrong number of
    /// coordinates or a non-finite value.
    pub fn from_raw<S: AsRef<str>>(hands: &[Vec<Vec<f32>>], labels: &[S]) -> LandmarkResult<Self> {
        let mut built = Vec::with_capacity(hands.len());
        for (h, raw) in hands.iter().enumerate() {
            let mut landmarks = Vec::with_capacity(raw.len());
            for (j, coords) in raw.iter().enumerate() {
                let lm = match coords.as_slice() {
                    [x, y] => Landmark::new(*x, *y, 0.0),
                    [x, y, z] => Landmark::new(*x, *y, *z),
                    other => {
                        return Err(LandmarkError::BadCoordinateCount {
                            hand: h,
                            joint: j,
                            found: other.len(),
                        })
                    }
                };
                if !(lm.x.is_finite() && lm.y.is_finite() && lm.z.is_finite()) {
                    return Err(LandmarkError::NonFinite { hand: h, joint: j });
                }
                landmarks.push(lm);
            }
            let handedness = labels
                .get(h)
                .map_or(Handedness::Unknown, |l| Handedness::from_label(l.as_ref()));
            built.push(Hand::new(landmarks, handedness));
        }
        Ok(Self { hands: built })
    }

    /// All hands, primary first.
    #[must_use]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// The first hand, used by single-hand rules and power.
    #[must_use]
    pub fn primary(&self) -> Option<&Hand> {
        self.hands.first()
    }

    /// Number of hands in the frame.
    #[must_use]
    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }

    /// True when no hand was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handedness_labels() {
        assert_eq!(Handedness::from_label("Left"), Handedness::Left);
        assert_eq!(Handedness::from_label("RIGHT"), Handedness::Right);
        assert_eq!(Handedness::from_label(""), Handedness::Unknown);
    }

    #[test]
    fn test_from_raw_accepts_missing_z() {
        let raw = vec![vec![vec![0.5, 0.5]; LANDMARK_COUNT]];
        let frame = LandmarkFrame::from_raw(&raw, &["Right"]).unwrap();
        assert_eq!(frame.hand_count(), 1);
        let hand = frame.primary().unwrap();
        assert!(hand.is_complete());
        assert_eq!(hand.handedness(), Handedness::Right);
        assert_eq!(hand.get(joint::WRIST).unwrap().z, 0.0);
    }

    #[test]
    fn test_from_raw_rejects_bad_coordinates() {
        let mut raw = vec![vec![vec![0.5, 0.5, 0.0]; LANDMARK_COUNT]];
        raw[0][7] = vec![0.5];
        let err = LandmarkFrame::from_raw::<&str>(&raw, &[]).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::BadCoordinateCount { hand: 0, joint: 7, found: 1 }
        );

        raw[0][7] = vec![f32::NAN, 0.5];
        assert!(matches!(
            LandmarkFrame::from_raw::<&str>(&raw, &[]),
            Err(LandmarkError::NonFinite { hand: 0, joint: 7 })
        ));
    }

    #[test]
    fn test_missing_joints_are_not_extended() {
        let hand = Hand::new(vec![Landmark::default(); 7], Handedness::Unknown);
        assert!(!hand.is_complete());
        assert!(!hand.finger_up(joint::INDEX_TIP, joint::INDEX_PIP));
        assert!(!hand.all_fingers_up());
        assert!(hand.joint_distance(joint::WRIST, joint::MIDDLE_MCP).is_none());
    }

    #[test]
    fn test_distances() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 1.2);
        assert!((a.distance_2d(&b) - 0.5).abs() < 1e-6);
        assert!((a.distance_3d(&b) - 1.3).abs() < 1e-6);
    }
}
