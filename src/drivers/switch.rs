//! GPIO-driven on/off actuator.
//!
//! The fan, grow-lights and PDLC film are all a single relay or MOSFET
//! gate, so one driver covers all three.  A failed GPIO write is logged
//! and the commanded state is still recorded: the engine's view of the
//! actuator follows the command, not the pin.

use log::{info, warn};

use super::hw_init::gpio_write;
use crate::app::ports::{ActuatorPort, ActuatorState};
use crate::pins;

pub struct GpioSwitch {
    name: &'static str,
    gpio: i32,
    state: ActuatorState,
}

impl GpioSwitch {
    pub const fn new(name: &'static str, gpio: i32) -> Self {
        Self {
            name,
            gpio,
            state: ActuatorState::Off,
        }
    }

    pub const fn fan() -> Self {
        Self::new("Fan", pins::FAN_GPIO)
    }

    pub const fn lights() -> Self {
        Self::new("Lights", pins::LIGHTS_GPIO)
    }

    pub const fn pdlc() -> Self {
        Self::new("PDLC", pins::PDLC_GPIO)
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    fn drive(&mut self, target: ActuatorState) {
        if let Err(e) = gpio_write(self.gpio, target.is_on()) {
            warn!("{}: {}", self.name, e);
        }
        self.state = target;
        match target {
            ActuatorState::On => info!("{} on.", self.name),
            ActuatorState::Off => info!("{} off.", self.name),
        }
    }
}

impl ActuatorPort for GpioSwitch {
    fn turn_on(&mut self) {
        self.drive(ActuatorState::On);
    }

    fn turn_off(&mut self) {
        self.drive(ActuatorState::Off);
    }

    fn current_state(&self) -> ActuatorState {
        self.state
    }
}
