//! Mock hardware for integration tests.
//!
//! Records every actuator call and every emitted event so tests can
//! assert on the full command history without touching real GPIO.
//! [`Greenhouse`] wires the mocks to a real engine and the host-side
//! polled correction timer, advancing simulated time one sample interval
//! per reading.

use greenhouse::app::engine::EnvironmentalEngine;
use greenhouse::app::events::{Actuator, AppEvent};
use greenhouse::app::ports::{ActuatorPort, ActuatorState, EventSink};
use greenhouse::app::reading::SensorReading;
use greenhouse::config::ControlConfig;
use greenhouse::drivers::hw_timer::SimCorrectionTimer;

/// 00:00 local on 1970-01-02 at the default UTC-8 offset.
pub const LOCAL_MIDNIGHT: i64 = 115_200;
/// 12:00 local, same day.
#[allow(dead_code)]
pub const LOCAL_NOON: i64 = LOCAL_MIDNIGHT + 12 * 3600;
/// 20:00 local, same day.
#[allow(dead_code)]
pub const LOCAL_EVENING: i64 = LOCAL_MIDNIGHT + 20 * 3600;

// ── MockActuator ──────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockActuator {
    pub calls: Vec<ActuatorState>,
    state: ActuatorState,
}

#[allow(dead_code)]
impl MockActuator {
    /// Starts On so the engine's forced-off at construction is observable.
    pub fn powered() -> Self {
        Self {
            calls: Vec::new(),
            state: ActuatorState::On,
        }
    }

    pub fn on_count(&self) -> usize {
        self.calls.iter().filter(|s| s.is_on()).count()
    }

    pub fn off_count(&self) -> usize {
        self.calls.iter().filter(|s| !s.is_on()).count()
    }

    /// True when two consecutive calls requested the same state.
    pub fn has_duplicate_calls(&self) -> bool {
        self.calls.windows(2).any(|w| w[0] == w[1])
    }
}

impl ActuatorPort for MockActuator {
    fn turn_on(&mut self) {
        self.calls.push(ActuatorState::On);
        self.state = ActuatorState::On;
    }

    fn turn_off(&mut self) {
        self.calls.push(ActuatorState::Off);
        self.state = ActuatorState::Off;
    }

    fn current_state(&self) -> ActuatorState {
        self.state
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn switched(&self, which: Actuator, to: ActuatorState) -> usize {
        self.count(|e| {
            matches!(e, AppEvent::ActuatorChanged { actuator, state }
                if *actuator == which && *state == to)
        })
    }

    pub fn starts(&self) -> usize {
        self.count(|e| matches!(e, AppEvent::CorrectionStarted { .. }))
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Greenhouse harness ────────────────────────────────────────

pub type TestEngine = EnvironmentalEngine<MockActuator, MockActuator, MockActuator, SimCorrectionTimer>;

pub struct Greenhouse {
    pub engine: TestEngine,
    pub sink: RecordingSink,
    /// Timestamp the next reading will carry.
    pub now: i64,
    /// Timer fires delivered to the engine so far.
    pub fires: usize,
}

#[allow(dead_code)]
impl Greenhouse {
    pub fn new(config: ControlConfig) -> Self {
        Self::starting_at(config, LOCAL_MIDNIGHT)
    }

    pub fn starting_at(config: ControlConfig, now: i64) -> Self {
        let engine = EnvironmentalEngine::new(
            MockActuator::powered(),
            MockActuator::powered(),
            MockActuator::powered(),
            SimCorrectionTimer::new(),
            config,
        );
        Self {
            engine,
            sink: RecordingSink::default(),
            now,
            fires: 0,
        }
    }

    fn interval(&self) -> i64 {
        i64::from(self.engine.config().sample_interval_secs)
    }

    /// Process `reading` stamped with the current time, then let one
    /// sample interval elapse, delivering the correction timer if it
    /// expires.  Returns `true` if the timer fired.
    pub fn step_reading(&mut self, mut reading: SensorReading) -> bool {
        reading.timestamp = self.now;
        self.engine.process_reading(reading, &mut self.sink);

        let interval = self.engine.config().sample_interval_secs;
        let fired = self.engine.timer_mut().advance(interval);
        self.now += self.interval();
        match fired {
            Some(token) => {
                self.engine.on_correction_timer(token, &mut self.sink);
                self.fires += 1;
                true
            }
            None => false,
        }
    }

    /// One climate-only reading (no UV).
    pub fn step(&mut self, temperature_c: f32, humidity_pct: f32) -> bool {
        self.step_reading(SensorReading {
            temperature_c,
            humidity_pct,
            ..SensorReading::default()
        })
    }

    /// Hold a constant climate for `n` readings; returns timer fires seen.
    pub fn hold(&mut self, temperature_c: f32, humidity_pct: f32, n: usize) -> usize {
        (0..n).filter(|_| self.step(temperature_c, humidity_pct)).count()
    }

    /// Deliver a timer fire with the configured identity right now.
    pub fn fire_now(&mut self) {
        let token = self.engine.config().correction_timer_id;
        self.engine.on_correction_timer(token, &mut self.sink);
        self.fires += 1;
    }

    pub fn fan(&self) -> ActuatorState {
        self.engine.get_statuses().fan
    }
}
