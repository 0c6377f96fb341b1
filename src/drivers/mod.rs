//! Actuator drivers, hardware initialisation, and timers.

pub mod hw_init;
pub mod hw_timer;
pub mod switch;
pub mod watchdog;
