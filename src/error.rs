//! Unified error types for the greenhouse firmware.
//!
//! Only the fallible edges produce these: configuration loading, GPIO
//! setup and timer creation or start.  The control engine itself never fails; it
//! degrades to safe defaults and logs.

use core::fmt;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
    /// An actuator GPIO could not be configured or driven.
    Actuator(ActuatorError),
    /// `esp_timer` creation or start failed (raw `esp_err_t`).
    Timer(i32),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Timer(code) => write!(f, "timer: esp_err {code}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// `gpio_config` rejected the output configuration.
    GpioConfigFailed { gpio: i32, code: i32 },
    /// `gpio_set_level` failed.
    GpioWriteFailed { gpio: i32, code: i32 },
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioConfigFailed { gpio, code } => {
                write!(f, "GPIO{gpio} config failed (esp_err {code})")
            }
            Self::GpioWriteFailed { gpio, code } => {
                write!(f, "GPIO{gpio} write failed (esp_err {code})")
            }
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
