//! Fan correction retry state machine.
//!
//! ```text
//!        [over threshold && (first attempt || cool-down elapsed)]
//!  IDLE ─────────────────────────────────────────────────────────▶ CORRECTING
//!    ▲                                                                 │
//!    │  timer fire:                                                    │ timer fire:
//!    │   · back under threshold          → resolved                    │  slope favorable
//!    │   · slope not favorable           → give up (cool-down starts)  │  && fires < max
//!    │   · fires == max_retries          → give up (cool-down starts)  │  → re-arm, fires += 1
//!    │  re-arm failed                    → give up (cool-down starts)  │
//!    └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pure decision logic.  The engine applies the returned outcomes to the
//! fan port and the correction timer.

use log::{debug, info};

use crate::config::ControlConfig;

use super::samples::{Sample, SampleBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanPhase {
    Idle,
    Correcting,
}

/// Which thresholds a reading breaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Breach {
    pub over_temp: bool,
    pub over_humidity: bool,
}

impl Breach {
    pub fn assess(sample: &Sample, config: &ControlConfig) -> Self {
        Self {
            over_temp: sample.temperature_c > config.temp_threshold_c,
            over_humidity: sample.humidity_pct > config.humidity_threshold_pct,
        }
    }

    pub fn any(&self) -> bool {
        self.over_temp || self.over_humidity
    }
}

/// Why an attempt was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveUpReason {
    /// The window did not trend downward (or had too few samples).
    SlopeUnfavorable,
    /// The bounded retry budget is spent.
    RetriesExhausted,
    /// The correction timer could not be re-armed.
    TimerUnavailable,
}

/// Result of evaluating a correction timer fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// No attempt was running; nothing to do.
    Ignored,
    /// Readings are back under threshold; fan off.
    Resolved,
    /// Still over threshold but improving; re-arm the timer.
    Extended { fires: u32 },
    /// Stop trying; fan off until the cool-down elapses.
    GaveUp(GiveUpReason),
}

/// Sign check over a completed window.
///
/// Compares the first and last samples for the channels currently in
/// breach; both must fall when both are breached.  Fewer than two samples
/// is never favorable.
pub fn slope_favorable(samples: &[Sample], breach: Breach) -> bool {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return false;
    };
    if samples.len() < 2 {
        return false;
    }

    let temp_falling = last.temperature_c < first.temperature_c;
    let humidity_falling = last.humidity_pct < first.humidity_pct;

    match (breach.over_temp, breach.over_humidity) {
        (true, true) => temp_falling && humidity_falling,
        (true, false) => temp_falling,
        (false, true) => humidity_falling,
        (false, false) => false,
    }
}

/// Fan retry state: phase, bounded fire counter, give-up time and the
/// sample window of the running attempt.
#[derive(Debug, Clone)]
pub struct FanCorrection {
    phase: FanPhase,
    fires_counter: u32,
    last_giveup: Option<i64>,
    samples: SampleBuffer,
    max_retries: u32,
    cooldown_secs: i64,
}

impl FanCorrection {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            phase: FanPhase::Idle,
            fires_counter: 0,
            last_giveup: None,
            samples: SampleBuffer::with_capacity(config.window_samples()),
            max_retries: config.max_retries,
            cooldown_secs: config.giveup_cooldown_secs as i64,
        }
    }

    /// Feed one cycle's sample.  Returns `true` when a new correction
    /// attempt starts on this cycle.
    pub fn on_reading(&mut self, sample: Sample, breach: Breach, now: i64) -> bool {
        match self.phase {
            FanPhase::Idle => {
                if !breach.any() {
                    return false;
                }
                if !self.eligible(now) {
                    debug!("FAN: over threshold but cooling down after give-up");
                    return false;
                }
                self.samples.clear();
                self.samples.push(sample);
                self.phase = FanPhase::Correcting;
                info!(
                    "FAN: correction started (T={:.1}°C RH={:.1}%)",
                    sample.temperature_c, sample.humidity_pct
                );
                true
            }
            FanPhase::Correcting => {
                if !self.samples.push(sample) {
                    debug!("FAN: sample window full, dropping sample");
                }
                false
            }
        }
    }

    /// Evaluate a correction timer fire against the most recent sample.
    ///
    /// `latest` is `None` only if no reading was ever processed, which is
    /// treated as "not over threshold".
    pub fn on_timer_fire(
        &mut self,
        latest: Option<Sample>,
        config: &ControlConfig,
        now: i64,
    ) -> FireOutcome {
        if self.phase == FanPhase::Idle {
            return FireOutcome::Ignored;
        }

        let breach = latest.map(|s| Breach::assess(&s, config)).unwrap_or_default();

        let outcome = if !breach.any() {
            self.fires_counter = 0;
            self.phase = FanPhase::Idle;
            FireOutcome::Resolved
        } else if !slope_favorable(self.samples.as_slice(), breach) {
            self.give_up(now);
            FireOutcome::GaveUp(GiveUpReason::SlopeUnfavorable)
        } else if self.fires_counter >= self.max_retries {
            self.give_up(now);
            FireOutcome::GaveUp(GiveUpReason::RetriesExhausted)
        } else {
            self.fires_counter += 1;
            FireOutcome::Extended {
                fires: self.fires_counter,
            }
        };

        self.samples.clear();
        outcome
    }

    /// Back out of an attempt whose timer never started.  No give-up is
    /// recorded, so the next over-threshold reading may try again.
    pub fn abort_start(&mut self) {
        self.samples.clear();
        self.fires_counter = 0;
        self.phase = FanPhase::Idle;
    }

    /// Abandon the running attempt (its timer could not be re-armed) and
    /// start the cool-down.
    pub fn abandon(&mut self, now: i64) {
        self.samples.clear();
        self.give_up(now);
    }

    fn give_up(&mut self, now: i64) {
        self.last_giveup = Some(now);
        self.fires_counter = 0;
        self.phase = FanPhase::Idle;
    }

    /// First attempt ever, or the cool-down since the last give-up has
    /// elapsed.  A clock that went backwards keeps the cool-down active.
    fn eligible(&self, now: i64) -> bool {
        match self.last_giveup {
            None => true,
            Some(t) => now >= t && now.saturating_sub(t) >= self.cooldown_secs,
        }
    }

    pub fn phase(&self) -> FanPhase {
        self.phase
    }

    pub fn is_correcting(&self) -> bool {
        self.phase == FanPhase::Correcting
    }

    pub fn fires_counter(&self) -> u32 {
        self.fires_counter
    }

    pub fn last_giveup(&self) -> Option<i64> {
        self.last_giveup
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }
}
