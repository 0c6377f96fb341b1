//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements  | Connects to                         |
//! |------------|-------------|-------------------------------------|
//! | `log_sink` | EventSink   | Serial log output (JSON telemetry)  |
//! | `sim_env`  | SensorPort  | Deterministic greenhouse day curve  |
//! | `time`     |             | esp_timer uptime, wall clock (NTP)  |
//!
//! Actuator ports are implemented by [`crate::drivers::switch::GpioSwitch`].

pub mod log_sink;
pub mod sim_env;
pub mod time;
