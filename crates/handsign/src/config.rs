//! # Session Configuration
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! seed = 7
//!
//! [gesture]
//! cross_tip_distance = 0.07
//! wrist_distance = 0.25
//! thumb_touch_distance = 0.06
//!
//! [hysteresis]
//! idle_threshold = 40
//!
//! [power]
//! min_distance = 0.12
//! range = 0.30
//!
//! [frame]
//! max_frame_dt = 0.1
//! age_ramp_rate = 0.55
//! ```

use std::fs;
use std::path::Path;

use handsign_core::{GestureThresholds, PowerCalibration, DEFAULT_IDLE_THRESHOLD};
use handsign_rendering::effects::{EffectSettings, DEFAULT_AGE_RAMP_RATE};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Gesture proximity thresholds, in normalized image units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Index tip to middle tip, crossed fingers.
    pub cross_tip_distance: f32,
    /// Wrist to wrist, two-hand techniques.
    pub wrist_distance: f32,
    /// Thumb tip to thumb tip, two-hand techniques.
    pub thumb_touch_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        let t = GestureThresholds::default();
        Self {
            cross_tip_distance: t.cross_tip_distance,
            wrist_distance: t.wrist_distance,
            thumb_touch_distance: t.thumb_touch_distance,
        }
    }
}

impl GestureConfig {
    /// Classifier thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> GestureThresholds {
        GestureThresholds {
            cross_tip_distance: self.cross_tip_distance,
            wrist_distance: self.wrist_distance,
            thumb_touch_distance: self.thumb_touch_distance,
        }
    }
}

/// Technique hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HysteresisConfig {
    /// Frames without detection tolerated before going idle.
    pub idle_threshold: u32,
}

impl Default for HysteresisConfig {
    fn default() -> Self {
        Self {
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
        }
    }
}

/// Power calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Hand span mapped to power 0.
    pub min_distance: f32,
    /// Span range mapped onto `[0, 1]`.
    pub range: f32,
}

impl Default for PowerConfig {
    fn default() -> Self {
        let p = PowerCalibration::default();
        Self {
            min_distance: p.min_distance,
            range: p.range,
        }
    }
}

impl PowerConfig {
    /// Calibration for the power estimator.
    #[must_use]
    pub const fn calibration(&self) -> PowerCalibration {
        PowerCalibration::new(self.min_distance, self.range)
    }
}

/// Frame timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on a single tick's `dt`, in seconds.
    pub max_frame_dt: f32,
    /// Effect activation ramp, per second.
    pub age_ramp_rate: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            age_ramp_rate: DEFAULT_AGE_RAMP_RATE,
        }
    }
}

/// Full session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandsignConfig {
    /// Seed for every particle generator.
    pub seed: u64,
    /// Gesture thresholds.
    pub gesture: GestureConfig,
    /// Hysteresis.
    pub hysteresis: HysteresisConfig,
    /// Power calibration.
    pub power: PowerConfig,
    /// Frame timing.
    pub frame: FrameConfig,
}

impl Default for HandsignConfig {
    fn default() -> Self {
        Self {
            seed: EffectSettings::default().seed,
            gesture: GestureConfig::default(),
            hysteresis: HysteresisConfig::default(),
            power: PowerConfig::default(),
            frame: FrameConfig::default(),
        }
    }
}

impl HandsignConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("gesture.cross_tip_distance", self.gesture.cross_tip_distance),
            ("gesture.wrist_distance", self.gesture.wrist_distance),
            ("gesture.thumb_touch_distance", self.gesture.thumb_touch_distance),
            ("power.min_distance", self.power.min_distance),
            ("frame.age_ramp_rate", self.frame.age_ramp_rate),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a non-negative number",
                });
            }
        }

        let positive = [("power.range", self.power.range), ("frame.max_frame_dt", self.frame.max_frame_dt)];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be positive",
                });
            }
        }
        Ok(())
    }

    /// Settings for the effect set.
    #[must_use]
    pub const fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            seed: self.seed,
            age_ramp_rate: self.frame.age_ramp_rate,
        }
    }
}
