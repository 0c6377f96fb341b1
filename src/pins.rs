//! GPIO pin assignments for the greenhouse controller board.
//!
//! Every driver references this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Actuators (relay / MOSFET driven, active HIGH)
// ---------------------------------------------------------------------------

/// Ventilation fan relay.
pub const FAN_GPIO: i32 = 4;
/// Grow-light relay.
pub const LIGHTS_GPIO: i32 = 5;
/// PDLC smart-film driver enable. HIGH = opaque (protective).
pub const PDLC_GPIO: i32 = 6;

/// Every actuator output, configured together at boot.
pub const ACTUATOR_GPIOS: [i32; 3] = [FAN_GPIO, LIGHTS_GPIO, PDLC_GPIO];

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Heartbeat LED, toggled on every processed sample.
pub const STATUS_LED_GPIO: i32 = 2;
