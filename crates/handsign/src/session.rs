//! # Frame Session
//!
//! The host calls [`Session::tick`] once per displayed frame:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │ 1. clamp dt                                                      │
//! │ 2. snapshot LandmarkSlot (never published → no hands)            │
//! │ 3. classify + power                                              │
//! │ 4. hysteresis: on change, clear the outgoing effect              │
//! │ 5. active effect: spawn(power) → update(dt) → draw               │
//! │ 6. overlay → composite (clear all, main, clear depth, glow)      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the caller's thread. The only shared state is the
//! landmark slot the detector writes into.

use std::sync::Arc;

use handsign_core::{GestureClassifier, LandmarkSlot, PowerCalibration, Technique, TechniqueStateMachine};
use handsign_rendering::effects::EffectStats;
use handsign_rendering::{draw_hands, CompositeStats, Compositor, EffectSet, RenderResult, RenderTarget, SceneGraphs};

use crate::config::HandsignConfig;
use crate::error::HandsignResult;

/// Backdrop dim alpha while a technique is active.
pub const BACKDROP_DIM_ACTIVE: f32 = 100.0 / 255.0;
/// Backdrop dim alpha while idle.
pub const BACKDROP_DIM_IDLE: f32 = 40.0 / 255.0;

/// What the HUD shows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HudState {
    /// Active technique, if any.
    pub technique: Option<Technique>,
    /// Title text. Empty when idle.
    pub label: &'static str,
    /// Subtitle text. Empty when idle.
    pub subtitle: &'static str,
    /// Accent style class. Empty when idle.
    pub accent: &'static str,
    /// Power bar fill, `[0, 1]`. Zero when idle.
    pub power_bar: f32,
}

impl HudState {
    /// Idle HUD.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            technique: None,
            label: "",
            subtitle: "",
            accent: "",
            power_bar: 0.0,
        }
    }

    /// HUD for an active technique.
    #[must_use]
    pub const fn active(technique: Technique, power: f32) -> Self {
        Self {
            technique: Some(technique),
            label: technique.label(),
            subtitle: technique.subtitle(),
            accent: technique.accent(),
            power_bar: power,
        }
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Active technique after hysteresis.
    pub technique: Option<Technique>,
    /// Raw classifier output for this frame.
    pub detected: Option<Technique>,
    /// The active technique changed this frame.
    pub changed: bool,
    /// Technique whose effect was cleared this frame.
    pub cleared: Option<Technique>,
    /// Power estimated from this frame's hands.
    pub power: f32,
    /// The `dt` actually simulated.
    pub dt: f32,
    /// HUD.
    pub hud: HudState,
    /// Backdrop dim alpha.
    pub backdrop_dim: f32,
    /// Compositor counts.
    pub stats: CompositeStats,
    /// Active effect counts (default when idle).
    pub effect: EffectStats,
}

/// Negative and NaN become 0, values above `max` are capped.
#[must_use]
pub fn clamp_dt(dt: f32, max: f32) -> f32 {
    if dt.is_nan() || dt < 0.0 {
        0.0
    } else {
        dt.min(max)
    }
}

/// One running HANDSIGN session.
#[derive(Debug)]
pub struct Session {
    config: HandsignConfig,
    classifier: GestureClassifier,
    calibration: PowerCalibration,
    machine: TechniqueStateMachine,
    effects: EffectSet,
    scenes: SceneGraphs,
    compositor: Compositor,
    slot: Arc<LandmarkSlot>,
    frame: u64,
    clears: u64,
    clamped_frames: u64,
    clamping: bool,
    hud: HudState,
}

impl Session {
    /// Builds a session. Every pool is allocated here.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: HandsignConfig) -> HandsignResult<Self> {
        config.validate()?;
        Ok(Self {
            classifier: GestureClassifier::new(config.gesture.thresholds()),
            calibration: config.power.calibration(),
            machine: TechniqueStateMachine::new(config.hysteresis.idle_threshold),
            effects: EffectSet::new(config.effect_settings()),
            scenes: SceneGraphs::new(),
            compositor: Compositor::new(),
            slot: Arc::new(LandmarkSlot::new()),
            frame: 0,
            clears: 0,
            clamped_frames: 0,
            clamping: false,
            hud: HudState::idle(),
            config,
        })
    }

    /// Creates the drawing surface, then the session.
    ///
    /// A surface failure is fatal: it is logged once and returned, never
    /// retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the surface
    /// factory fails.
    pub fn start<T, F>(config: HandsignConfig, surface_factory: F) -> HandsignResult<(Self, T)>
    where
        F: FnOnce() -> RenderResult<T>,
    {
        let session = Self::new(config)?;
        let surface = surface_factory().map_err(|e| {
            tracing::error!("Failed to create render surface: {}", e);
            e
        })?;
        tracing::info!(
            "HANDSIGN session started: seed {}, idle threshold {} frames",
            config.seed,
            config.hysteresis.idle_threshold
        );
        Ok((session, surface))
    }

    /// Handle the detector publishes landmarks into.
    #[must_use]
    pub fn slot(&self) -> Arc<LandmarkSlot> {
        Arc::clone(&self.slot)
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &HandsignConfig {
        &self.config
    }

    /// Active technique.
    #[must_use]
    pub const fn active(&self) -> Option<Technique> {
        self.machine.active()
    }

    /// Current HUD.
    #[must_use]
    pub const fn hud(&self) -> HudState {
        self.hud
    }

    /// Frames ticked so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frame
    }

    /// Effect clears issued on technique changes.
    #[must_use]
    pub const fn clears(&self) -> u64 {
        self.clears
    }

    /// Frames whose `dt` had to be clamped.
    #[must_use]
    pub const fn clamped_frames(&self) -> u64 {
        self.clamped_frames
    }

    /// The effects.
    #[must_use]
    pub const fn effects(&self) -> &EffectSet {
        &self.effects
    }

    /// Scenes built by the last tick.
    #[must_use]
    pub const fn scenes(&self) -> &SceneGraphs {
        &self.scenes
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the render target fails. The session should be
    /// dropped afterwards.
    pub fn tick<T: RenderTarget + ?Sized>(&mut self, dt: f32, target: &mut T) -> HandsignResult<FrameReport> {
        let max_dt = self.config.frame.max_frame_dt;
        let clamped = clamp_dt(dt, max_dt);
        // One warning per run of clamped frames.
        if clamped == dt {
            self.clamping = false;
        } else {
            self.clamped_frames += 1;
            if self.clamping {
                tracing::debug!("Frame dt {} clamped to {}", dt, clamped);
            } else {
                tracing::warn!("Frame dt {} clamped to {} (further clamps logged at debug)", dt, clamped);
                self.clamping = true;
            }
        }
        self.frame += 1;

        let landmarks = self.slot.snapshot();
        let detected = self.classifier.classify(&landmarks);
        let power = self.calibration.power(&landmarks);

        let transition = self.machine.advance(detected);
        let cleared = transition.cleared();
        if let Some(outgoing) = cleared {
            self.effects.clear(outgoing);
            self.clears += 1;
        }
        if transition.changed {
            self.hud = HudState::idle();
        }

        self.scenes.begin_frame();
        let mut effect = EffectStats::default();
        if let Some(technique) = transition.active {
            self.effects.run(technique, power, clamped, &mut self.scenes);
            effect = self.effects.get(technique).stats();
            self.hud = HudState::active(technique, power);
        }
        draw_hands(&landmarks, &mut self.scenes.main);
        self.scenes.finish();

        let stats = self.compositor.composite(&self.scenes, target).map_err(|e| {
            tracing::error!("Frame {} failed: {}", self.frame, e);
            e
        })?;

        Ok(FrameReport {
            frame: self.frame,
            technique: transition.active,
            detected,
            changed: transition.changed,
            cleared,
            power,
            dt: clamped,
            hud: self.hud,
            backdrop_dim: if transition.active.is_some() {
                BACKDROP_DIM_ACTIVE
            } else {
                BACKDROP_DIM_IDLE
            },
            stats,
            effect,
        })
    }

    /// Back to idle with every effect cleared.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.effects.clear_all();
        self.scenes.begin_frame();
        self.hud = HudState::idle();
        tracing::info!("Session reset after {} frames", self.frame);
    }
}
