//! Hardware timers using ESP-IDF's esp_timer API.
//!
//! Periodic sample/telemetry ticks and the one-shot correction timer all
//! push events into the lock-free SPSC queue; nothing here touches engine
//! state.  Callbacks run in the esp_timer task (not ISR context).
//!
//! On the host, [`SimCorrectionTimer`] stands in for the one-shot timer:
//! the caller advances it by elapsed seconds and delivers the token itself.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicU32, Ordering};

use log::{info, warn};

use crate::app::ports::{CorrectionTimer, TimerToken};
use crate::error::Error;

#[cfg(target_os = "espidf")]
use crate::events::{push_event, Event};
#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Token the correction timer was last armed with.
#[cfg(target_os = "espidf")]
static ARMED_TOKEN: AtomicU32 = AtomicU32::new(0);
/// Token latched by the most recent correction-timer expiry.
#[cfg(target_os = "espidf")]
static FIRED_TOKEN: AtomicU32 = AtomicU32::new(0);

/// Token carried by the last `Event::CorrectionTimerFired`.
#[cfg(target_os = "espidf")]
pub fn fired_token() -> TimerToken {
    FIRED_TOKEN.load(Ordering::Acquire)
}

// ── Periodic ticks ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut SAMPLE_TIMER: esp_timer_handle_t = core::ptr::null_mut();
#[cfg(target_os = "espidf")]
static mut TELEMETRY_TIMER: esp_timer_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe extern "C" fn sample_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::SampleTick);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn telemetry_tick_cb(_arg: *mut core::ffi::c_void) {
    push_event(Event::TelemetryTick);
}

/// SAFETY: `handle` must be one of the statics above, written only here,
/// from the main task, before any callback can fire.
#[cfg(target_os = "espidf")]
unsafe fn start_periodic(
    handle: *mut esp_timer_handle_t,
    callback: unsafe extern "C" fn(*mut core::ffi::c_void),
    name: &'static [u8],
    period_secs: u32,
) -> Result<(), Error> {
    let args = esp_timer_create_args_t {
        callback: Some(callback),
        arg: core::ptr::null_mut(),
        dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
        name: name.as_ptr() as *const _,
        skip_unhandled_events: true,
    };
    let ret = unsafe { esp_timer_create(&args, handle) };
    if ret != ESP_OK {
        return Err(Error::Timer(ret));
    }
    let ret = unsafe { esp_timer_start_periodic(*handle, u64::from(period_secs) * 1_000_000) };
    if ret != ESP_OK {
        return Err(Error::Timer(ret));
    }
    Ok(())
}

/// Start the sample tick and the telemetry tick.
#[cfg(target_os = "espidf")]
pub fn start_ticks(sample_interval_secs: u32, telemetry_interval_secs: u32) -> Result<(), Error> {
    // SAFETY: boot-time, single main task; see start_periodic().
    unsafe {
        start_periodic(&raw mut SAMPLE_TIMER, sample_tick_cb, b"sample\0", sample_interval_secs)?;
        start_periodic(
            &raw mut TELEMETRY_TIMER,
            telemetry_tick_cb,
            b"telemetry\0",
            telemetry_interval_secs,
        )?;
    }
    info!(
        "hw_timer: sample every {}s, telemetry every {}s",
        sample_interval_secs, telemetry_interval_secs
    );
    Ok(())
}

// ── One-shot correction timer (device) ───────────────────────

#[cfg(target_os = "espidf")]
unsafe extern "C" fn correction_expired_cb(_arg: *mut core::ffi::c_void) {
    FIRED_TOKEN.store(ARMED_TOKEN.load(Ordering::Acquire), Ordering::Release);
    if !push_event(Event::CorrectionTimerFired) {
        log::warn!("hw_timer: event queue full, correction expiry dropped");
    }
}

/// esp_timer one-shot implementing [`CorrectionTimer`].  Expiry latches
/// the armed token and queues `Event::CorrectionTimerFired`; the main loop
/// hands [`fired_token`] to the engine.
#[cfg(target_os = "espidf")]
pub struct EspCorrectionTimer {
    handle: esp_timer_handle_t,
}

#[cfg(target_os = "espidf")]
impl EspCorrectionTimer {
    pub fn new() -> Result<Self, Error> {
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        let args = esp_timer_create_args_t {
            callback: Some(correction_expired_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"correction\0".as_ptr() as *const _,
            skip_unhandled_events: false,
        };
        // SAFETY: `handle` is a valid out-pointer for the duration of the call.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            return Err(Error::Timer(ret));
        }
        Ok(Self { handle })
    }
}

#[cfg(target_os = "espidf")]
impl CorrectionTimer for EspCorrectionTimer {
    fn arm(&mut self, token: TimerToken, period_secs: u32) -> Result<(), Error> {
        ARMED_TOKEN.store(token, Ordering::Release);
        // SAFETY: handle was created in new() and is never deleted.
        let ret = unsafe {
            // ESP_ERR_INVALID_STATE here just means it was not running.
            esp_timer_stop(self.handle);
            esp_timer_start_once(self.handle, u64::from(period_secs) * 1_000_000)
        };
        if ret != ESP_OK {
            log::error!("hw_timer: correction timer start failed (rc={})", ret);
            return Err(Error::Timer(ret));
        }
        Ok(())
    }

    fn cancel(&mut self) {
        // SAFETY: as in arm().
        unsafe {
            esp_timer_stop(self.handle);
        }
    }

    fn is_armed(&self) -> bool {
        // SAFETY: as in arm().
        unsafe { esp_timer_is_active(self.handle) }
    }
}

// ── Polled correction timer (host) ────────────────────────────

/// `esp_err_t` reported when a simulated start is made to fail.
const SIM_ESP_FAIL: i32 = -1;

/// Deadline-based [`CorrectionTimer`] for host simulation and tests.
#[derive(Debug, Default)]
pub struct SimCorrectionTimer {
    armed: Option<TimerToken>,
    remaining_secs: u32,
    period_secs: u32,
    arm_count: u32,
    fail_starts: bool,
}

impl SimCorrectionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `secs` elapse.  Returns the armed token if the countdown hit
    /// zero; the timer is then disarmed (one-shot).
    pub fn advance(&mut self, secs: u32) -> Option<TimerToken> {
        let token = self.armed?;
        self.remaining_secs = self.remaining_secs.saturating_sub(secs);
        if self.remaining_secs > 0 {
            return None;
        }
        self.armed = None;
        Some(token)
    }

    /// Make every following `arm` fail, as a rejected `esp_timer_start_once`
    /// would.
    pub fn set_start_failure(&mut self, fail: bool) {
        self.fail_starts = fail;
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.armed
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn period_secs(&self) -> u32 {
        self.period_secs
    }

    /// Times `arm` has been called since construction.
    pub fn arm_count(&self) -> u32 {
        self.arm_count
    }
}

impl CorrectionTimer for SimCorrectionTimer {
    fn arm(&mut self, token: TimerToken, period_secs: u32) -> Result<(), Error> {
        if self.fail_starts {
            self.armed = None;
            self.remaining_secs = 0;
            warn!("hw_timer(sim): correction timer start failed");
            return Err(Error::Timer(SIM_ESP_FAIL));
        }
        self.armed = Some(token);
        self.remaining_secs = period_secs;
        self.period_secs = period_secs;
        self.arm_count += 1;
        info!("hw_timer(sim): correction timer armed, {}s", period_secs);
        Ok(())
    }

    fn cancel(&mut self) {
        self.armed = None;
        self.remaining_secs = 0;
    }

    fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
