//! Environmental control engine, the hexagonal core.
//!
//! [`EnvironmentalEngine`] owns the three actuator ports, the correction
//! timer, and every piece of mutable control state (UV accumulators, fan
//! retry state, sample window).  It has exactly two entry points that
//! mutate state, and the host must serialise them:
//!
//! ```text
//!  sampling loop ──▶ process_reading(reading) ──┐
//!                                               ├──▶ ┌──────────────────────┐ ──▶ Fan
//!  timer fire ────▶ on_correction_timer(token) ─┘    │ EnvironmentalEngine  │ ──▶ Lights
//!                                                    │ daylight · UV · fan  │ ──▶ PDLC
//!  telemetry ◀───── get_statuses() / telemetry() ◀── └──────────────────────┘ ──▶ CorrectionTimer
//! ```

use log::{error, info, warn};

use crate::config::ControlConfig;
use crate::control::daylight::{DaylightPolicy, UvDose};
use crate::control::fan::{Breach, FanCorrection, FanPhase, FireOutcome, GiveUpReason};
use crate::control::rules;

use super::events::{Actuator, AppEvent, Statuses, TelemetryRecord};
use super::ports::{ActuatorPort, ActuatorState, CorrectionTimer, EventSink, TimerToken};
use super::reading::SensorReading;

// ───────────────────────────────────────────────────────────────
// EnvironmentalEngine
// ───────────────────────────────────────────────────────────────

pub struct EnvironmentalEngine<F, L, P, T> {
    fan: F,
    lights: L,
    pdlc: P,
    timer: T,
    config: ControlConfig,
    daylight_policy: DaylightPolicy,
    /// `None` until the first reading has been processed.
    daylight: Option<bool>,
    uv: UvDose,
    correction: FanCorrection,
    /// Most recent reading; the snapshot a timer fire is judged against.
    last_reading: Option<SensorReading>,
    cycles: u64,
}

impl<F, L, P, T> EnvironmentalEngine<F, L, P, T>
where
    F: ActuatorPort,
    L: ActuatorPort,
    P: ActuatorPort,
    T: CorrectionTimer,
{
    /// Build the engine and force every actuator off.
    pub fn new(mut fan: F, mut lights: L, mut pdlc: P, mut timer: T, config: ControlConfig) -> Self {
        fan.turn_off();
        lights.turn_off();
        pdlc.turn_off();
        timer.cancel();

        info!(
            "Engine ready: T>{:.1}°C RH>{:.1}% | daylight {:02}:00-{:02}:00{} | \
             window {}s x{} retries",
            config.temp_threshold_c,
            config.humidity_threshold_pct,
            config.daylight_start_hour,
            config.daylight_end_hour,
            if config.demo_mode { " (demo)" } else { "" },
            config.correction_period_secs,
            config.max_retries,
        );

        Self {
            fan,
            lights,
            pdlc,
            timer,
            daylight_policy: DaylightPolicy::new(&config),
            correction: FanCorrection::new(&config),
            config,
            daylight: None,
            uv: UvDose::default(),
            last_reading: None,
            cycles: 0,
        }
    }

    /// Anchor the compressed demo day to a recorded process-start time.
    pub fn set_demo_anchor(&mut self, epoch_secs: i64) {
        self.daylight_policy.set_demo_anchor(epoch_secs);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Consume one reading: daylight → UV dose → lights → PDLC → fan.
    pub fn process_reading(&mut self, reading: SensorReading, sink: &mut impl EventSink) {
        self.cycles += 1;

        // 1. Daylight
        let daylight = self.daylight_policy.is_daylight(reading.timestamp);
        if self.daylight != Some(daylight) {
            info!("Daylight {}", if daylight { "began" } else { "ended" });
            sink.emit(&AppEvent::DaylightChanged(daylight));
        }
        self.daylight = Some(daylight);

        // 2. UV dose (resets to zero the instant daylight is false)
        self.uv.update(reading.uv_a, reading.uv_b, reading.uv_c, daylight);

        // 3. Lights
        if let Some(state) = rules::apply_lights(&mut self.lights, daylight) {
            sink.emit(&AppEvent::ActuatorChanged {
                actuator: Actuator::Lights,
                state,
            });
        }

        // 4. PDLC
        if let Some(state) = rules::apply_pdlc(&mut self.pdlc, daylight, &self.uv, &self.config) {
            info!(
                "PDLC {:?}: UV dose A={:.0} B={:.0} C={:.0}",
                state, self.uv.uv_a, self.uv.uv_b, self.uv.uv_c
            );
            sink.emit(&AppEvent::ActuatorChanged {
                actuator: Actuator::Pdlc,
                state,
            });
        }

        // 5. Fan
        let sample = reading.sample();
        let breach = Breach::assess(&sample, &self.config);
        if self.correction.on_reading(sample, breach, reading.timestamp) {
            match self
                .timer
                .arm(self.config.correction_timer_id, self.config.correction_period_secs)
            {
                Ok(()) => {
                    sink.emit(&AppEvent::CorrectionStarted {
                        temperature_c: sample.temperature_c,
                        humidity_pct: sample.humidity_pct,
                    });
                    self.set_fan(ActuatorState::On, sink);
                }
                Err(e) => {
                    // Without a pending fire nothing would ever stop the fan.
                    error!("FAN: correction timer failed to start ({}), fan stays off", e);
                    self.correction.abort_start();
                }
            }
        }

        self.last_reading = Some(reading);
    }

    // ── Timer fire ────────────────────────────────────────────

    /// Correction timer callback.  Fires carrying a foreign token, or
    /// arriving while no attempt is running, are ignored.
    pub fn on_correction_timer(&mut self, token: TimerToken, sink: &mut impl EventSink) {
        if token != self.config.correction_timer_id {
            warn!(
                "Correction timer: rejected fire from foreign timer id {} (expected {})",
                token, self.config.correction_timer_id
            );
            sink.emit(&AppEvent::TimerFireRejected { token });
            return;
        }

        let latest = self.last_reading.map(|r| r.sample());
        let now = self.last_reading.map_or(0, |r| r.timestamp);

        match self.correction.on_timer_fire(latest, &self.config, now) {
            FireOutcome::Ignored => {
                warn!("Correction timer: fire with no attempt running, ignored");
                sink.emit(&AppEvent::TimerFireRejected { token });
            }
            FireOutcome::Resolved => {
                info!("FAN: back under threshold, correction finished");
                self.timer.cancel();
                self.set_fan(ActuatorState::Off, sink);
                sink.emit(&AppEvent::CorrectionResolved);
            }
            FireOutcome::Extended { fires } => {
                match self
                    .timer
                    .arm(self.config.correction_timer_id, self.config.correction_period_secs)
                {
                    Ok(()) => {
                        info!(
                            "FAN: improving, re-arming correction window ({}/{})",
                            fires, self.config.max_retries
                        );
                        sink.emit(&AppEvent::CorrectionExtended { fires });
                    }
                    Err(e) => {
                        error!("FAN: correction timer re-arm failed ({}), giving up", e);
                        self.correction.abandon(now);
                        self.timer.cancel();
                        self.set_fan(ActuatorState::Off, sink);
                        sink.emit(&AppEvent::CorrectionGaveUp(GiveUpReason::TimerUnavailable));
                    }
                }
            }
            FireOutcome::GaveUp(reason) => {
                warn!(
                    "FAN: giving up ({:?}), next attempt after {}s cool-down",
                    reason, self.config.giveup_cooldown_secs
                );
                self.timer.cancel();
                self.set_fan(ActuatorState::Off, sink);
                sink.emit(&AppEvent::CorrectionGaveUp(reason));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current state of all three actuators.
    pub fn get_statuses(&self) -> Statuses {
        Statuses {
            fan: self.fan.current_state(),
            lights: self.lights.current_state(),
            pdlc: self.pdlc.current_state(),
        }
    }

    /// Telemetry for the last processed cycle (`None` before the first reading).
    pub fn telemetry(&self) -> Option<TelemetryRecord> {
        let reading = self.last_reading?;
        Some(TelemetryRecord {
            reading,
            statuses: self.get_statuses(),
            uv_dose: self.uv,
            daylight: self.is_daylight(),
            correcting: self.correction.is_correcting(),
            fires: self.correction.fires_counter(),
        })
    }

    pub fn is_daylight(&self) -> bool {
        self.daylight.unwrap_or(false)
    }

    pub fn uv_dose(&self) -> UvDose {
        self.uv
    }

    pub fn fan_phase(&self) -> FanPhase {
        self.correction.phase()
    }

    /// Whether a correction attempt (and therefore its timer) is live.
    pub fn timer_running(&self) -> bool {
        self.correction.is_correcting()
    }

    pub fn fires_counter(&self) -> u32 {
        self.correction.fires_counter()
    }

    pub fn last_giveup(&self) -> Option<i64> {
        self.correction.last_giveup()
    }

    pub fn window_len(&self) -> usize {
        self.correction.samples().len()
    }

    /// Readings processed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn fan(&self) -> &F {
        &self.fan
    }

    pub fn lights(&self) -> &L {
        &self.lights
    }

    pub fn pdlc(&self) -> &P {
        &self.pdlc
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Mutable access for hosts whose timer needs polling.
    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_fan(&mut self, target: ActuatorState, sink: &mut impl EventSink) {
        if let Some(state) = rules::drive(&mut self.fan, target) {
            sink.emit(&AppEvent::ActuatorChanged {
                actuator: Actuator::Fan,
                state,
            });
        }
    }
}
