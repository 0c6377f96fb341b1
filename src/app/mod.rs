//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the business rules for the greenhouse controller:
//! daylight/UV tracking, the lights and PDLC rules, and the fan correction
//! retry loop.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable without
//! real peripherals.

pub mod engine;
pub mod events;
pub mod ports;
pub mod reading;
