//! # Technique State Machine
//!
//! Turns the per-frame (noisy) classifier output into a stable selection.
//!
//! ## States
//!
//! - **Idle**: no technique active.
//! - **Active(t)**: technique `t` is active and its effect is alive.
//!
//! ## Rules
//!
//! - A detection activates its technique immediately, pre-empting whatever
//!   was active. There is no cooldown and no cross-fade.
//! - A frame without detection increments a miss counter. Only after more
//!   than `idle_threshold` consecutive misses does the machine fall back to
//!   Idle. Short tracking dropouts therefore never flicker the effect.

use crate::technique::Technique;

/// Consecutive misses tolerated before returning to Idle.
pub const DEFAULT_IDLE_THRESHOLD: u32 = 40;

/// Snapshot of the machine's memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TechniqueState {
    /// Currently active technique, `None` when idle.
    pub active: Option<Technique>,
    /// Consecutive frames without a detection.
    pub frames_since_detected: u32,
}

/// Result of one [`TechniqueStateMachine::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Active technique before this frame.
    pub previous: Option<Technique>,
    /// Active technique after this frame.
    pub active: Option<Technique>,
    /// True iff `active != previous`.
    pub changed: bool,
}

impl Transition {
    /// The outgoing technique whose effect must be cleared, if any.
    ///
    /// Same-technique redetection never reports a clear.
    #[must_use]
    pub fn cleared(&self) -> Option<Technique> {
        if self.changed {
            self.previous
        } else {
            None
        }
    }

    /// The incoming technique whose effect starts this frame, if any.
    #[must_use]
    pub fn started(&self) -> Option<Technique> {
        if self.changed {
            self.active
        } else {
            None
        }
    }
}

/// Hysteresis state machine over [`Technique`] selections.
#[derive(Debug, Clone)]
pub struct TechniqueStateMachine {
    state: TechniqueState,
    idle_threshold: u32,
    /// Frames advanced since construction or the last reset.
    frame: u64,
}

impl Default for TechniqueStateMachine {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_THRESHOLD)
    }
}

impl TechniqueStateMachine {
    /// Creates an idle machine.
    #[must_use]
    pub fn new(idle_threshold: u32) -> Self {
        Self {
            state: TechniqueState::default(),
            idle_threshold,
            frame: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> TechniqueState {
        self.state
    }

    /// Currently active technique.
    #[must_use]
    pub const fn active(&self) -> Option<Technique> {
        self.state.active
    }

    /// Configured miss tolerance.
    #[must_use]
    pub const fn idle_threshold(&self) -> u32 {
        self.idle_threshold
    }

    /// Feeds one frame's classification.
    pub fn advance(&mut self, detected: Option<Technique>) -> Transition {
        self.frame += 1;
        let previous = self.state.active;

        match detected {
            Some(t) => {
                self.state.active = Some(t);
                self.state.frames_since_detected = 0;
            }
            None => {
                self.state.frames_since_detected = self.state.frames_since_detected.saturating_add(1);
                if self.state.frames_since_detected > self.idle_threshold {
                    self.state.active = None;
                }
            }
        }

        let active = self.state.active;
        let changed = active != previous;
        if changed {
            tracing::info!(
                "Technique transition: {} -> {} at frame {} (misses: {})",
                name(previous),
                name(active),
                self.frame,
                self.state.frames_since_detected
            );
        }

        Transition { previous, active, changed }
    }

    /// Returns to Idle and forgets the miss counter.
    pub fn reset(&mut self) {
        if let Some(t) = self.state.active {
            tracing::info!("Technique state reset while {} was active", t);
        }
        self.state = TechniqueState::default();
        self.frame = 0;
    }
}

fn name(t: Option<Technique>) -> &'static str {
    t.map_or("Idle", Technique::label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn misses(m: &mut TechniqueStateMachine, n: u32) -> Transition {
        let mut last = m.advance(None);
        for _ in 1..n {
            last = m.advance(None);
        }
        last
    }

    #[test]
    fn test_starts_idle() {
        let m = TechniqueStateMachine::default();
        assert_eq!(m.active(), None);
        assert_eq!(m.state().frames_since_detected, 0);
    }

    #[test]
    fn test_detection_activates_immediately() {
        let mut m = TechniqueStateMachine::default();
        let t = m.advance(Some(Technique::UnlimitedVoid));
        assert!(t.changed);
        assert_eq!(t.previous, None);
        assert_eq!(t.active, Some(Technique::UnlimitedVoid));
        assert_eq!(t.cleared(), None);
        assert_eq!(t.started(), Some(Technique::UnlimitedVoid));
    }

    #[test]
    fn test_hysteresis_boundary() {
        for (n, still_active) in [(39, true), (40, true), (41, false)] {
            let mut m = TechniqueStateMachine::default();
            m.advance(Some(Technique::MalevolentShrine));
            let t = misses(&mut m, n);
            assert_eq!(m.active().is_some(), still_active, "after {n} misses");
            assert_eq!(t.changed, !still_active);
            if !still_active {
                assert_eq!(t.cleared(), Some(Technique::MalevolentShrine));
            }
        }
    }

    #[test]
    fn test_redetection_resets_counter() {
        let mut m = TechniqueStateMachine::default();
        m.advance(Some(Technique::DivineDogs));
        misses(&mut m, 30);
        let t = m.advance(Some(Technique::DivineDogs));
        assert!(!t.changed);
        assert_eq!(t.cleared(), None);
        misses(&mut m, 40);
        assert_eq!(m.active(), Some(Technique::DivineDogs));
    }

    #[test]
    fn test_override_clears_previous() {
        let mut m = TechniqueStateMachine::default();
        m.advance(Some(Technique::UnlimitedVoid));
        let t = m.advance(Some(Technique::SelfEmbodiment));
        assert!(t.changed);
        assert_eq!(t.cleared(), Some(Technique::UnlimitedVoid));
        assert_eq!(t.active, Some(Technique::SelfEmbodiment));
    }

    #[test]
    fn test_idle_misses_are_not_changes() {
        let mut m = TechniqueStateMachine::default();
        for _ in 0..100 {
            assert!(!m.advance(None).changed);
        }
    }

    #[test]
    fn test_counter_saturates() {
        let mut m = TechniqueStateMachine::new(u32::MAX);
        m.state.frames_since_detected = u32::MAX - 1;
        m.state.active = Some(Technique::UnlimitedVoid);
        m.advance(None);
        m.advance(None);
        assert_eq!(m.state().frames_since_detected, u32::MAX);
        assert_eq!(m.active(), Some(Technique::UnlimitedVoid));
    }

    #[test]
    fn test_reset() {
        let mut m = TechniqueStateMachine::new(5);
        m.advance(Some(Technique::DivineDogs));
        m.reset();
        assert_eq!(m.state(), TechniqueState::default());
        assert_eq!(m.idle_threshold(), 5);
    }
}
