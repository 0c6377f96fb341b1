//! Greenhouse environmental-control firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod pins;

// Hardware-facing modules compile on the host too; the esp-idf calls
// inside are cfg-gated and fall back to no-ops.
pub mod adapters;
pub mod drivers;
