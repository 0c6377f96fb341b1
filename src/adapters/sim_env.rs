//! Simulated greenhouse environment.
//!
//! Deterministic [`SensorPort`] used by the host demo and the integration
//! tests, and on the device until the BME280 / AS7331 acquisition drivers
//! are wired.  Temperature, humidity and UV follow a half-sine "sun" over
//! local 06:00-18:00; heat spikes and read dropouts can be injected.

use core::f32::consts::PI;

use crate::app::ports::SensorPort;
use crate::app::reading::SensorReading;
use crate::config::ControlConfig;

const SECS_PER_DAY: i64 = 86_400;
const SUNRISE_SECS: i64 = 6 * 3600;
const DAY_LENGTH_SECS: i64 = 12 * 3600;

/// Night-time baseline.
const BASE_TEMP_C: f32 = 55.0;
const BASE_HUMIDITY_PCT: f32 = 65.0;

pub struct SimulatedEnvironment {
    utc_offset_secs: i32,
    heat_delta_c: f32,
    heat_from: i64,
    heat_until: i64,
    humidity_delta_pct: f32,
    dropout_every: u64,
    reads: u64,
}

impl SimulatedEnvironment {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            utc_offset_secs: config.utc_offset_secs,
            heat_delta_c: 0.0,
            heat_from: 0,
            heat_until: 0,
            humidity_delta_pct: 0.0,
            dropout_every: 0,
            reads: 0,
        }
    }

    /// Add `delta_c` to temperature readings in `[from, until)`.
    pub fn inject_heat(&mut self, delta_c: f32, from: i64, until: i64) {
        self.heat_delta_c = delta_c;
        self.heat_from = from;
        self.heat_until = until;
    }

    /// Constant humidity offset (e.g. a misting system left on).
    pub fn set_humidity_offset(&mut self, delta_pct: f32) {
        self.humidity_delta_pct = delta_pct;
    }

    /// Fail every `n`th read; 0 disables.
    pub fn set_dropout_every(&mut self, n: u64) {
        self.dropout_every = n;
    }

    /// Solar intensity 0..=1 at `timestamp` (local time).
    pub fn sun(&self, timestamp: i64) -> f32 {
        let local = (timestamp.rem_euclid(SECS_PER_DAY)
            + i64::from(self.utc_offset_secs).rem_euclid(SECS_PER_DAY))
            % SECS_PER_DAY;
        let since_sunrise = local - SUNRISE_SECS;
        if !(0..DAY_LENGTH_SECS).contains(&since_sunrise) {
            return 0.0;
        }
        (PI * since_sunrise as f32 / DAY_LENGTH_SECS as f32).sin().max(0.0)
    }
}

impl SensorPort for SimulatedEnvironment {
    fn read(&mut self, timestamp: i64) -> Option<SensorReading> {
        self.reads += 1;
        if self.dropout_every > 0 && self.reads % self.dropout_every == 0 {
            return None;
        }

        let sun = self.sun(timestamp);
        let heat = if (self.heat_from..self.heat_until).contains(&timestamp) {
            self.heat_delta_c
        } else {
            0.0
        };

        Some(SensorReading {
            temperature_c: BASE_TEMP_C + 30.0 * sun + heat,
            humidity_pct: (BASE_HUMIDITY_PCT - 20.0 * sun + self.humidity_delta_pct).clamp(0.0, 100.0),
            pressure_hpa: 1013.25,
            uv_a: 40.0 * sun,
            uv_b: 12.0 * sun,
            uv_c: 0.5 * sun,
            soil_wetness: 2100,
            timestamp,
        })
    }
}
