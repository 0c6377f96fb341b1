//! One-shot GPIO initialisation and raw output writes.
//!
//! Configures every actuator output plus the status LED using raw
//! ESP-IDF sys calls.  Called once from `main()` before the event loop
//! starts.  On the host every call is a no-op that succeeds.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use crate::error::ActuatorError;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Configure the fan, lights, PDLC and status-LED pins as push-pull
/// outputs and drive them LOW (everything off).
#[cfg(target_os = "espidf")]
pub fn init_outputs() -> Result<(), ActuatorError> {
    let output_pins = [
        pins::FAN_GPIO,
        pins::LIGHTS_GPIO,
        pins::PDLC_GPIO,
        pins::STATUS_LED_GPIO,
    ];

    for &gpio in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        // SAFETY: called once from main() before the event loop; the
        // config struct outlives the call.
        let code = unsafe { gpio_config(&cfg) };
        if code != ESP_OK {
            return Err(ActuatorError::GpioConfigFailed { gpio, code });
        }
        gpio_write(gpio, false)?;
    }

    info!(
        "hw_init: outputs configured (fan=GPIO{}, lights=GPIO{}, pdlc=GPIO{}, led=GPIO{})",
        pins::FAN_GPIO,
        pins::LIGHTS_GPIO,
        pins::PDLC_GPIO,
        pins::STATUS_LED_GPIO
    );
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_outputs() -> Result<(), ActuatorError> {
    log::info!("hw_init(sim): GPIO init skipped");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(gpio: i32, high: bool) -> Result<(), ActuatorError> {
    // SAFETY: writes the output register of a pin configured in
    // init_outputs(); only the main task drives outputs.
    let code = unsafe { gpio_set_level(gpio, u32::from(high)) };
    if code != ESP_OK {
        return Err(ActuatorError::GpioWriteFailed { gpio, code });
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_gpio: i32, _high: bool) -> Result<(), ActuatorError> {
    Ok(())
}
