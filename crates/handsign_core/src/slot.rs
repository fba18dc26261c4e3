//! Latest-landmarks slot shared between the detector and the frame loop.
//!
//! The detector overwrites the slot whenever it finishes a frame; the frame
//! loop takes a snapshot once per tick. There is no queue: a reader may see
//! the same frame twice, or skip frames, and that is fine.
//!
//! ```text
//! Detector callback → publish() → [RwLock<Arc<LandmarkFrame>>] → snapshot() ← Frame loop
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::landmarks::LandmarkFrame;

/// Single-value slot holding the most recent landmark frame.
#[derive(Debug)]
pub struct LandmarkSlot {
    latest: RwLock<Arc<LandmarkFrame>>,
    /// Number of publishes so far. Zero means the detector never reported.
    generation: AtomicU64,
}

impl Default for LandmarkSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(Arc::new(LandmarkFrame::empty())),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the current frame.
    pub fn publish(&self, frame: LandmarkFrame) {
        let frame = Arc::new(frame);
        *self.latest.write() = frame;
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Returns the current frame. Never blocks for longer than a pointer swap.
    #[must_use]
    pub fn snapshot(&self) -> Arc<LandmarkFrame> {
        Arc::clone(&self.latest.read())
    }

    /// Number of frames published so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// True once the detector has published at least once.
    #[must_use]
    pub fn has_published(&self) -> bool {
        self.generation() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poses;

    #[test]
    fn test_empty_until_published() {
        let slot = LandmarkSlot::new();
        assert!(!slot.has_published());
        assert!(slot.snapshot().is_empty());
    }

    #[test]
    fn test_publish_overwrites() {
        let slot = LandmarkSlot::new();
        slot.publish(LandmarkFrame::single(poses::fist()));
        slot.publish(LandmarkFrame::single(poses::open_palm()));
        assert_eq!(slot.generation(), 2);
        assert_eq!(*slot.snapshot(), LandmarkFrame::single(poses::open_palm()));
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let slot = LandmarkSlot::new();
        slot.publish(LandmarkFrame::single(poses::fist()));
        let held = slot.snapshot();
        slot.publish(LandmarkFrame::empty());
        assert_eq!(held.hand_count(), 1);
        assert!(slot.snapshot().is_empty());
    }

    #[test]
    fn test_publish_from_other_thread() {
        let slot = Arc::new(LandmarkSlot::new());
        let writer = Arc::clone(&slot);
        std::thread::spawn(move || {
            for _ in 0..10 {
                writer.publish(LandmarkFrame::single(poses::open_palm()));
            }
        })
        .join()
        .unwrap();
        assert_eq!(slot.generation(), 10);
        assert_eq!(slot.snapshot().hand_count(), 1);
    }
}
