//! Fuzz target: `EnvironmentalEngine` under arbitrary input sequences
//!
//! Decodes the input into readings, timer fires (matching and foreign
//! tokens), clock jumps and timer start failures, then checks after every
//! step:
//! - No panics
//! - `fires_counter` never exceeds `max_retries`
//! - The fan is on exactly while a correction attempt is running
//! - The sample window never exceeds its capacity
//!
//! cargo fuzz run fuzz_engine_ops

#![no_main]

use greenhouse::app::engine::EnvironmentalEngine;
use greenhouse::app::events::AppEvent;
use greenhouse::app::ports::{ActuatorPort, ActuatorState, CorrectionTimer, EventSink, TimerToken};
use greenhouse::app::reading::SensorReading;
use greenhouse::config::ControlConfig;
use greenhouse::control::fan::FanPhase;
use greenhouse::error::Error;
use libfuzzer_sys::fuzz_target;

#[derive(Default)]
struct Port(ActuatorState);

impl ActuatorPort for Port {
    fn turn_on(&mut self) {
        self.0 = ActuatorState::On;
    }
    fn turn_off(&mut self) {
        self.0 = ActuatorState::Off;
    }
    fn current_state(&self) -> ActuatorState {
        self.0
    }
}

#[derive(Default)]
struct Timer {
    armed: Option<TimerToken>,
    broken: bool,
}

impl CorrectionTimer for Timer {
    fn arm(&mut self, token: TimerToken, _period_secs: u32) -> Result<(), Error> {
        if self.broken {
            self.armed = None;
            return Err(Error::Timer(-1));
        }
        self.armed = Some(token);
        Ok(())
    }
    fn cancel(&mut self) {
        self.armed = None;
    }
    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let config = ControlConfig::default();
    let token = config.correction_timer_id;
    let max_retries = config.max_retries;
    let capacity = config.window_samples();
    let mut engine = EnvironmentalEngine::new(
        Port::default(),
        Port::default(),
        Port::default(),
        Timer::default(),
        config,
    );
    let mut now: i64 = 1_700_000_000;

    for chunk in data.chunks_exact(4) {
        match chunk[0] % 8 {
            0 => engine.on_correction_timer(token, &mut Discard),
            1 => engine.on_correction_timer(u32::from(chunk[1]), &mut Discard),
            2 => now += i64::from(u16::from_le_bytes([chunk[1], chunk[2]])),
            3 => engine.timer_mut().broken = chunk[1] & 1 == 1,
            _ => {
                let reading = SensorReading {
                    temperature_c: f32::from(chunk[1]) - 20.0,
                    humidity_pct: f32::from(chunk[2]) * 0.5,
                    uv_a: f32::from(chunk[3]) * 10.0,
                    timestamp: now,
                    ..SensorReading::default()
                };
                engine.process_reading(reading, &mut Discard);
                now += 1;
            }
        }

        assert!(engine.fires_counter() <= max_retries);
        assert_eq!(
            engine.get_statuses().fan.is_on(),
            engine.fan_phase() == FanPhase::Correcting
        );
        assert!(engine.window_len() <= capacity);
    }
});
