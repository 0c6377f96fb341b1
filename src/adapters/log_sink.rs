//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  Telemetry records go out as a
//! single JSON line so a serial bridge can forward them to the cloud
//! unchanged.

use log::{info, warn};

use crate::app::events::{AppEvent, TelemetryRecord};
use crate::app::ports::EventSink;

/// Render a telemetry record as compact JSON.
pub fn telemetry_json(record: &TelemetryRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events logged since construction.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Telemetry(record) => match telemetry_json(record) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | serialise failed: {}", e),
            },
            AppEvent::ActuatorChanged { actuator, state } => {
                info!("ACT   | {:?} -> {:?}", actuator, state);
            }
            AppEvent::DaylightChanged(daylight) => {
                info!("SUN   | {}", if *daylight { "day" } else { "night" });
            }
            AppEvent::CorrectionStarted {
                temperature_c,
                humidity_pct,
            } => {
                info!(
                    "FAN   | correction started at T={:.1}\u{00b0}C RH={:.1}%",
                    temperature_c, humidity_pct
                );
            }
            AppEvent::CorrectionExtended { fires } => {
                info!("FAN   | window extended, fires={}", fires);
            }
            AppEvent::CorrectionResolved => {
                info!("FAN   | resolved");
            }
            AppEvent::CorrectionGaveUp(reason) => {
                info!("FAN   | gave up: {:?}", reason);
            }
            AppEvent::TimerFireRejected { token } => {
                info!("TIMER | rejected fire, token={}", token);
            }
        }
    }
}
