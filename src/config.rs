//! Environmental-control configuration
//!
//! All tunable parameters for the greenhouse controller.  Defaults match the
//! thresholds the board shipped with; a build-time JSON override can replace
//! any subset of them (see [`ControlConfig::from_json`]).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on samples held for one correction window (stack-allocated).
pub const MAX_WINDOW_SAMPLES: usize = 120;

/// Core control configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    // --- Fan thresholds ---
    /// Air temperature (°C) above which the fan correction may start
    pub temp_threshold_c: f32,
    /// Relative humidity (%RH) above which the fan correction may start
    pub humidity_threshold_pct: f32,

    // --- UV dose thresholds (accumulated µW/cm² per daylight period) ---
    pub uv_a_threshold: f32,
    pub uv_b_threshold: f32,
    pub uv_c_threshold: f32,

    // --- Daylight window ---
    /// First local hour of daylight (0-23, inclusive)
    pub daylight_start_hour: u8,
    /// Local hour at which daylight ends (0-23, exclusive)
    pub daylight_end_hour: u8,
    /// Offset from UTC applied to reading timestamps (seconds)
    pub utc_offset_secs: i32,

    // --- Demo mode (compressed day/night cycling) ---
    pub demo_mode: bool,
    /// Length of the compressed "day" (seconds)
    pub demo_daylight_secs: u32,
    /// Length of one full compressed day/night cycle (seconds)
    pub demo_cycle_secs: u32,

    // --- Fan correction ---
    /// Correction timer period (seconds)
    pub correction_period_secs: u32,
    /// Timer re-arms allowed before giving up
    pub max_retries: u32,
    /// Minimum time after a give-up before a new attempt (seconds)
    pub giveup_cooldown_secs: u32,
    /// Identity token carried by correction timer fires
    pub correction_timer_id: u32,

    // --- Timing ---
    /// Sampling loop interval (seconds)
    pub sample_interval_secs: u32,
    /// Telemetry report interval (seconds)
    pub telemetry_interval_secs: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            // Fan
            temp_threshold_c: 90.0,
            humidity_threshold_pct: 80.0,

            // UV
            uv_a_threshold: 1000.0,
            uv_b_threshold: 500.0,
            uv_c_threshold: 500.0,

            // Daylight: 06:00 – 18:00 Pacific
            daylight_start_hour: 6,
            daylight_end_hour: 18,
            utc_offset_secs: -8 * 3600,

            // Demo
            demo_mode: false,
            demo_daylight_secs: 300, // 5 min
            demo_cycle_secs: 600,    // 10 min

            // Fan correction
            correction_period_secs: 60,
            max_retries: 5,
            giveup_cooldown_secs: 3600, // 1 h
            correction_timer_id: 1337,

            // Timing
            sample_interval_secs: 1,     // 1 Hz
            telemetry_interval_secs: 10,
        }
    }
}

/// Errors from loading or validating a [`ControlConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The override text was not valid JSON for this schema.
    Parse,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config override is not valid JSON"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl ControlConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults and
    /// validate the result.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with an optional override applied.  A rejected override is
    /// logged and the defaults are kept.
    pub fn with_override(json: Option<&str>) -> Self {
        let Some(text) = json else {
            return Self::default();
        };
        match Self::from_json(text) {
            Ok(config) => {
                log::info!("Config: override applied");
                config
            }
            Err(e) => {
                log::warn!("Config: override rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject configurations the engine cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !self.temp_threshold_c.is_finite() {
            return Err(ConfigError::ValidationFailed("temp_threshold_c must be finite"));
        }
        if !positive(self.humidity_threshold_pct) {
            return Err(ConfigError::ValidationFailed("humidity_threshold_pct must be > 0"));
        }
        if !positive(self.uv_a_threshold)
            || !positive(self.uv_b_threshold)
            || !positive(self.uv_c_threshold)
        {
            return Err(ConfigError::ValidationFailed("uv thresholds must be > 0"));
        }
        if self.daylight_start_hour > 23 || self.daylight_end_hour > 23 {
            return Err(ConfigError::ValidationFailed("daylight hours must be 0-23"));
        }
        if self.utc_offset_secs.abs() > 14 * 3600 {
            return Err(ConfigError::ValidationFailed("utc_offset_secs out of range"));
        }
        if self.demo_cycle_secs == 0 || self.demo_daylight_secs >= self.demo_cycle_secs {
            return Err(ConfigError::ValidationFailed(
                "demo_daylight_secs must be shorter than demo_cycle_secs",
            ));
        }
        if self.sample_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("sample_interval_secs must be > 0"));
        }
        if self.correction_period_secs < self.sample_interval_secs {
            return Err(ConfigError::ValidationFailed(
                "correction window must span at least one sample interval",
            ));
        }
        if self.window_samples() > MAX_WINDOW_SAMPLES {
            return Err(ConfigError::ValidationFailed(
                "correction window needs more samples than MAX_WINDOW_SAMPLES",
            ));
        }
        if self.max_retries == 0 {
            return Err(ConfigError::ValidationFailed("max_retries must be > 0"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed("telemetry_interval_secs must be > 0"));
        }
        Ok(())
    }

    /// Sample buffer capacity for one correction window: one sample per
    /// expected tick (never fewer than the two a slope needs).
    pub fn window_samples(&self) -> usize {
        let ticks = self.correction_period_secs / self.sample_interval_secs.max(1);
        (ticks as usize).max(2)
    }
}
