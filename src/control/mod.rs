//! Control rules: daylight/UV policy, the fan retry state machine and its
//! sample window, and the stateless lights/PDLC rules.

pub mod daylight;
pub mod fan;
pub mod rules;
pub mod samples;
