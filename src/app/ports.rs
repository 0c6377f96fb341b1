//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EnvironmentalEngine (domain)
//! ```
//!
//! Driven adapters (GPIO switches, timers, sensor acquisition, event sinks)
//! implement these traits.  The [`EnvironmentalEngine`](super::engine::EnvironmentalEngine)
//! owns them via generics, so the domain core never touches hardware directly.

use serde::Serialize;

use crate::error::Error;

use super::reading::SensorReading;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// On/off state of a single actuator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActuatorState {
    #[default]
    Off,
    On,
}

impl ActuatorState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for ActuatorState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// A single on/off device (fan, grow-lights, PDLC film).
///
/// `turn_on`/`turn_off` are idempotent, never fail (hardware faults are
/// the adapter's problem) and update `current_state` before returning.
pub trait ActuatorPort {
    fn turn_on(&mut self);

    fn turn_off(&mut self);

    /// Pure read, no side effects.
    fn current_state(&self) -> ActuatorState;
}

// ───────────────────────────────────────────────────────────────
// Correction timer port (driven adapter: domain → host scheduler)
// ───────────────────────────────────────────────────────────────

/// Identity carried by every correction timer fire.
pub type TimerToken = u32;

/// One-shot, restartable countdown.
///
/// When it elapses the host must deliver the token it was armed with to
/// [`EnvironmentalEngine::on_correction_timer`](super::engine::EnvironmentalEngine::on_correction_timer),
/// serialised with `process_reading` (same task or same lock).
pub trait CorrectionTimer {
    /// Arm the timer; re-arming replaces any pending countdown.
    ///
    /// An `Err` means no countdown is pending and no fire will arrive.
    fn arm(&mut self, token: TimerToken, period_secs: u32) -> Result<(), Error>;

    /// Drop any pending countdown.
    fn cancel(&mut self);

    fn is_armed(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Acquisition-side port.  Returning `None` means "no valid reading this
/// cycle"; the caller then skips `process_reading` for that cycle.
pub trait SensorPort {
    fn read(&mut self, timestamp: i64) -> Option<SensorReading>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, HTTP
/// publisher, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
