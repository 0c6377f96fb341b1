//! Stateless per-cycle rules for the grow-lights and the PDLC film.
//!
//! Each rule issues at most one actuator call per cycle, and only on a
//! state change.  The returned value is the new state when a call was made.

use crate::app::ports::{ActuatorPort, ActuatorState};
use crate::config::ControlConfig;

use super::daylight::UvDose;

/// Lights mirror the daylight flag directly (no hysteresis).
pub fn apply_lights(lights: &mut impl ActuatorPort, daylight: bool) -> Option<ActuatorState> {
    drive(lights, ActuatorState::from(daylight))
}

/// PDLC is opaque (On) during daylight once any accumulated UV dose
/// exceeds its threshold, clear (Off) otherwise.  Always Off at night.
pub fn apply_pdlc(
    pdlc: &mut impl ActuatorPort,
    daylight: bool,
    dose: &UvDose,
    config: &ControlConfig,
) -> Option<ActuatorState> {
    let want_on = daylight && dose.above_threshold(config);
    drive(pdlc, ActuatorState::from(want_on))
}

/// Move `port` to `target` if it is not already there.
pub fn drive(port: &mut impl ActuatorPort, target: ActuatorState) -> Option<ActuatorState> {
    if port.current_state() == target {
        return None;
    }
    match target {
        ActuatorState::On => port.turn_on(),
        ActuatorState::Off => port.turn_off(),
    }
    Some(target)
}
