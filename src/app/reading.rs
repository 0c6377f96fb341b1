//! One cycle's worth of environmental readings.

use serde::Serialize;

use crate::control::samples::Sample;

/// Produced by the acquisition layer once per cycle and consumed by the
/// engine.  Only the (temperature, humidity) pair outlives the cycle, inside
/// the correction sample window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorReading {
    /// Air temperature (°C)
    pub temperature_c: f32,
    /// Relative humidity (%RH)
    pub humidity_pct: f32,
    /// Barometric pressure (hPa), telemetry only
    pub pressure_hpa: f32,
    /// UV-A irradiance for this cycle (µW/cm²)
    pub uv_a: f32,
    /// UV-B irradiance for this cycle (µW/cm²)
    pub uv_b: f32,
    /// UV-C irradiance for this cycle (µW/cm²)
    pub uv_c: f32,
    /// Raw soil moisture ADC count, telemetry only
    pub soil_wetness: u16,
    /// Unix epoch seconds
    pub timestamp: i64,
}

impl SensorReading {
    pub fn sample(&self) -> Sample {
        Sample {
            temperature_c: self.temperature_c,
            humidity_pct: self.humidity_pct,
        }
    }
}
