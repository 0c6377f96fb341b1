//! Greenhouse controller firmware, main entry point.
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  GpioSwitch ×3     EspCorrectionTimer   SimulatedEnvironment │
//! │  (ActuatorPort)    (CorrectionTimer)    (SensorPort)         │
//! │  LogEventSink      SystemClock                               │
//! │  (EventSink)                                                 │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │          EnvironmentalEngine (pure logic)              │  │
//! │  │  daylight · UV dose · lights · PDLC · fan correction   │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  esp_timer callbacks ──▶ SPSC event queue ──▶ this loop      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use greenhouse::adapters::log_sink::LogEventSink;
use greenhouse::adapters::sim_env::SimulatedEnvironment;
use greenhouse::adapters::time::SystemClock;
use greenhouse::app::engine::EnvironmentalEngine;
use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::{EventSink, SensorPort};
use greenhouse::config::ControlConfig;
use greenhouse::drivers::hw_init;
use greenhouse::drivers::hw_timer::{self, EspCorrectionTimer};
use greenhouse::drivers::switch::GpioSwitch;
use greenhouse::drivers::watchdog::{Watchdog, WATCHDOG_TIMEOUT_MS};
use greenhouse::error::Error;
use greenhouse::events::{self, Event};
use greenhouse::pins;

/// Sleep between queue drains; well under the 1 s sample tick.
const LOOP_IDLE_MS: u64 = 20;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Greenhouse v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = ControlConfig::with_override(option_env!("GREENHOUSE_CONFIG_JSON"));

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_outputs().map_err(Error::from)?;
    let watchdog = Watchdog::subscribe(WATCHDOG_TIMEOUT_MS);
    let correction_timer = EspCorrectionTimer::new()?;
    let clock = SystemClock::new();
    if clock.epoch_secs().is_none() {
        warn!("Clock: wall clock not synced, timestamps fall back to uptime");
    }

    // ── 4. Adapters + engine ──────────────────────────────────
    let mut sensors = SimulatedEnvironment::new(&config);
    let mut sink = LogEventSink::new();
    let mut engine = EnvironmentalEngine::new(
        GpioSwitch::fan(),
        GpioSwitch::lights(),
        GpioSwitch::pdlc(),
        correction_timer,
        config.clone(),
    );
    if config.demo_mode {
        engine.set_demo_anchor(clock.timestamp());
    }

    hw_timer::start_ticks(config.sample_interval_secs, config.telemetry_interval_secs)?;
    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    let mut led_on = false;
    loop {
        events::drain_events(|event| match event {
            Event::SampleTick => match sensors.read(clock.timestamp()) {
                Some(reading) => {
                    engine.process_reading(reading, &mut sink);
                    led_on = !led_on;
                    if let Err(e) = hw_init::gpio_write(pins::STATUS_LED_GPIO, led_on) {
                        warn!("Status LED: {}", e);
                    }
                }
                None => warn!("Sensors: no valid reading, cycle skipped"),
            },

            Event::CorrectionTimerFired => {
                engine.on_correction_timer(hw_timer::fired_token(), &mut sink);
            }

            Event::TelemetryTick => {
                if let Some(record) = engine.telemetry() {
                    sink.emit(&AppEvent::Telemetry(record));
                }
            }
        });

        watchdog.feed();
        std::thread::sleep(Duration::from_millis(LOOP_IDLE_MS));
    }
}
