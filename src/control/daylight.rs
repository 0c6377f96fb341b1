//! Daylight policy and UV-dose integration.
//!
//! ```text
//!  normal:   ──night──┤ start_hour ══════ day ══════ end_hour ├──night──
//!  wrapped:  ══ day ══┤ end_hour ── night ── start_hour ├══════ day ═════
//!  demo:     ┤ anchor ══ day (demo_daylight_secs) ══┤── night ──┤ anchor + cycle ...
//! ```
//!
//! Daylight is recomputed every cycle from the reading timestamp; nothing
//! here is persisted.  The UV accumulators restart at zero every night so
//! they always hold "dose since daylight began".

use serde::Serialize;

use crate::config::ControlConfig;

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;

/// Decides whether it is currently daylight.
#[derive(Debug, Clone)]
pub struct DaylightPolicy {
    start_hour: u8,
    end_hour: u8,
    utc_offset_secs: i64,
    demo: Option<DemoWindow>,
}

/// Compressed day/night cycle for accelerated testing.
#[derive(Debug, Clone, Copy)]
struct DemoWindow {
    daylight_secs: i64,
    cycle_secs: i64,
    /// Process-start anchor; set from the first reading when not given.
    anchor: Option<i64>,
}

impl DaylightPolicy {
    pub fn new(config: &ControlConfig) -> Self {
        let demo = config.demo_mode.then_some(DemoWindow {
            daylight_secs: config.demo_daylight_secs as i64,
            cycle_secs: (config.demo_cycle_secs as i64).max(1),
            anchor: None,
        });
        Self {
            start_hour: config.daylight_start_hour,
            end_hour: config.daylight_end_hour,
            utc_offset_secs: config.utc_offset_secs as i64,
            demo,
        }
    }

    /// Pin the demo window to a recorded process-start time.
    /// Has no effect outside demo mode.
    pub fn set_demo_anchor(&mut self, epoch_secs: i64) {
        if let Some(demo) = self.demo.as_mut() {
            demo.anchor = Some(epoch_secs);
        }
    }

    pub fn is_demo(&self) -> bool {
        self.demo.is_some()
    }

    /// Local hour-of-day (0-23) for a Unix timestamp.
    pub fn local_hour(&self, epoch_secs: i64) -> u8 {
        let local = (epoch_secs.rem_euclid(SECS_PER_DAY)
            + self.utc_offset_secs.rem_euclid(SECS_PER_DAY))
            % SECS_PER_DAY;
        (local / SECS_PER_HOUR) as u8
    }

    /// Whether `epoch_secs` falls inside the daylight window.
    ///
    /// Takes `&mut self` because the demo window anchors itself to the
    /// first timestamp it sees.
    pub fn is_daylight(&mut self, epoch_secs: i64) -> bool {
        match self.demo.as_mut() {
            Some(demo) => {
                let anchor = *demo.anchor.get_or_insert(epoch_secs);
                // Before the anchor, or too far from it to represent: night.
                let elapsed = match epoch_secs.checked_sub(anchor) {
                    Some(elapsed) if elapsed >= 0 => elapsed,
                    _ => return false,
                };
                elapsed % demo.cycle_secs < demo.daylight_secs
            }
            None => hour_in_window(self.local_hour(epoch_secs), self.start_hour, self.end_hour),
        }
    }
}

/// `[start, end)` on the 24 h clock; wraps past midnight when `start > end`.
/// An equal start and end is an empty window.
fn hour_in_window(hour: u8, start: u8, end: u8) -> bool {
    if start <= end {
        hour >= start && hour < end
    } else {
        hour >= start || hour < end
    }
}

// ═══════════════════════════════════════════════════════════════
//  UV dose
// ═══════════════════════════════════════════════════════════════

/// Running UV-A/B/C dose since daylight began.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UvDose {
    pub uv_a: f32,
    pub uv_b: f32,
    pub uv_c: f32,
}

impl UvDose {
    /// Accumulate one cycle's reading during daylight; reset at night.
    ///
    /// Negative sensor values contribute nothing so the dose never shrinks
    /// within a daylight period.
    pub fn update(&mut self, uv_a: f32, uv_b: f32, uv_c: f32, daylight: bool) {
        if daylight {
            self.uv_a += non_negative(uv_a);
            self.uv_b += non_negative(uv_b);
            self.uv_c += non_negative(uv_c);
        } else {
            *self = Self::default();
        }
    }

    /// True when any channel exceeds its configured threshold.
    pub fn above_threshold(&self, config: &ControlConfig) -> bool {
        self.uv_a > config.uv_a_threshold
            || self.uv_b > config.uv_b_threshold
            || self.uv_c > config.uv_c_threshold
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
