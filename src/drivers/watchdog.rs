//! Task Watchdog Timer (TWDT) driver.
//!
//! Resets the device if the main loop stops draining the event queue.
//! The loop feeds it once per iteration.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Default stall budget: several sample periods plus a sensor read.
pub const WATCHDOG_TIMEOUT_MS: u32 = 10_000;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Reconfigure the TWDT and subscribe the calling task.
    pub fn subscribe(timeout_ms: u32) -> Self {
        #[cfg(target_os = "espidf")]
        {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            // SAFETY: plain FFI calls with a stack config; main task only.
            let (reconfigured, added) =
                unsafe { (esp_task_wdt_reconfigure(&cfg), esp_task_wdt_add(core::ptr::null_mut())) };
            if reconfigured != ESP_OK {
                log::warn!("Watchdog: reconfigure returned {} (already configured?)", reconfigured);
            }
            let subscribed = added == ESP_OK;
            if subscribed {
                log::info!("Watchdog: subscribed ({}ms, panic on trigger)", timeout_ms);
            } else {
                log::warn!("Watchdog: failed to subscribe ({})", added);
            }
            Self { subscribed }
        }

        #[cfg(not(target_os = "espidf"))]
        {
            log::info!("Watchdog(sim): {}ms, no-op", timeout_ms);
            Self {}
        }
    }

    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        if self.subscribed {
            // SAFETY: resets the calling task's TWDT entry.
            unsafe {
                esp_task_wdt_reset();
            }
        }
    }
}
