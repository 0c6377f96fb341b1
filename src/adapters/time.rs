//! Clock adapter.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` for uptime and
//!   `gettimeofday()` for the SNTP-synced wall clock.
//! - **host**: `std::time` for simulation and tests.

/// Anything earlier than 2020-01-01 means SNTP has not synced yet.
pub const EPOCH_2020: i64 = 1_577_836_800;

pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_secs(&self) -> u64 {
        // SAFETY: reads the RTC-backed high-resolution counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000_000
    }

    /// Seconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }

    /// Unix epoch seconds, `None` until the wall clock is plausible.
    #[cfg(target_os = "espidf")]
    pub fn epoch_secs(&self) -> Option<i64> {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: tv is a valid out-pointer; the timezone argument may be null.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return None;
        }
        synced(tv.tv_sec as i64)
    }

    /// Unix epoch seconds, `None` until the wall clock is plausible.
    #[cfg(not(target_os = "espidf"))]
    pub fn epoch_secs(&self) -> Option<i64> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()?;
        synced(now.as_secs() as i64)
    }

    /// Wall-clock seconds, or uptime when SNTP has not synced.
    pub fn timestamp(&self) -> i64 {
        self.epoch_secs().unwrap_or(self.uptime_secs() as i64)
    }
}

fn synced(secs: i64) -> Option<i64> {
    (secs >= EPOCH_2020).then_some(secs)
}
