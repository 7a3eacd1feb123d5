//! Green / red indicator lamps on two digital outputs (active HIGH).

use embedded_hal::digital::OutputPin;

use crate::app::ports::LampState;
use crate::error::HwError;

pub struct Lamps<P> {
    green: P,
    red: P,
    state: LampState,
}

impl<P: OutputPin> Lamps<P> {
    pub fn new(green: P, red: P) -> Self {
        Self {
            green,
            red,
            state: LampState::OFF,
        }
    }

    pub fn set(&mut self, state: LampState) -> Result<(), HwError> {
        drive(&mut self.green, state.green)?;
        drive(&mut self.red, state.red)?;
        self.state = state;
        Ok(())
    }

    pub fn state(&self) -> LampState {
        self.state
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), HwError> {
    let result = if on { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| HwError::GpioWriteFailed)
}
