//! Outbound application events.
//!
//! The [`EnvironmentalEngine`](super::engine::EnvironmentalEngine) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to serial, queue for the
//! telemetry uploader, etc.

use serde::Serialize;

use crate::control::daylight::UvDose;
use crate::control::fan::GiveUpReason;

use super::ports::{ActuatorState, TimerToken};
use super::reading::SensorReading;

/// The three devices the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Actuator {
    Fan,
    Lights,
    Pdlc,
}

/// Current state of every actuator, as returned by `get_statuses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statuses {
    pub fan: ActuatorState,
    pub lights: ActuatorState,
    pub pdlc: ActuatorState,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// An actuator was switched.
    ActuatorChanged { actuator: Actuator, state: ActuatorState },

    /// The daylight flag flipped (true = day began).
    DaylightChanged(bool),

    /// A fan correction attempt began.
    CorrectionStarted { temperature_c: f32, humidity_pct: f32 },

    /// The correction timer was re-armed for another window.
    CorrectionExtended { fires: u32 },

    /// Readings came back under threshold; attempt finished.
    CorrectionResolved,

    /// The attempt was abandoned; cool-down running.
    CorrectionGaveUp(GiveUpReason),

    /// A timer fire was rejected (foreign token or no attempt running).
    TimerFireRejected { token: TimerToken },

    /// Per-cycle telemetry record for the uploader.
    Telemetry(TelemetryRecord),
}

/// A point-in-time record suitable for logging or transmission: the reading
/// that drove this cycle plus the resulting actuator states.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub reading: SensorReading,
    pub statuses: Statuses,
    pub uv_dose: UvDose,
    pub daylight: bool,
    pub correcting: bool,
    pub fires: u32,
}
