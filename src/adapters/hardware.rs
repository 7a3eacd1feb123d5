//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the servo, lamp and LCD drivers plus the clock, exposing them
//! through [`ServoPort`], [`LampPort`], [`DisplayPort`] and [`ClockPort`]
//! (and so [`SorterHardware`](crate::app::ports::SorterHardware)).  This is
//! the only module in the system that touches actual hardware.
//!
//! The ports are infallible: there is no feedback from any of these
//! devices, so a failed write is logged and the firmware carries on.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ClockPort, DisplayPort, LampPort, LampState, ServoPort};
use crate::drivers::lamps::Lamps;
use crate::drivers::lcd::Hd44780;
use crate::drivers::servo::ServoDriver;

/// Concrete adapter that combines all hardware behind port traits.
///
/// `PWM` is the servo channel, `PIN` the lamp and LCD outputs, `DELAY` the
/// LCD's microsecond delay and `CLK` the millisecond clock.
pub struct HardwareAdapter<PWM, PIN, DELAY, CLK> {
    servo: ServoDriver<PWM>,
    lamps: Lamps<PIN>,
    lcd: Hd44780<PIN, DELAY>,
    clock: CLK,
}

impl<PWM, PIN, DELAY, CLK> HardwareAdapter<PWM, PIN, DELAY, CLK>
where
    PWM: SetDutyCycle,
    PIN: OutputPin,
    DELAY: DelayNs,
    CLK: ClockPort,
{
    pub fn new(
        servo: ServoDriver<PWM>,
        lamps: Lamps<PIN>,
        lcd: Hd44780<PIN, DELAY>,
        clock: CLK,
    ) -> Self {
        Self {
            servo,
            lamps,
            lcd,
            clock,
        }
    }

    pub fn servo_angle(&self) -> Option<u8> {
        self.servo.angle()
    }

    pub fn lamp_state(&self) -> LampState {
        self.lamps.state()
    }
}

// ── Actuator ports ────────────────────────────────────────────

impl<PWM: SetDutyCycle, PIN, DELAY, CLK> ServoPort for HardwareAdapter<PWM, PIN, DELAY, CLK> {
    fn set_angle(&mut self, degrees: u8) {
        if let Err(e) = self.servo.set_angle(degrees) {
            warn!("servo: {} at {}°", e, degrees);
        }
    }
}

impl<PWM, PIN: OutputPin, DELAY, CLK> LampPort for HardwareAdapter<PWM, PIN, DELAY, CLK> {
    fn set_lamps(&mut self, state: LampState) {
        if let Err(e) = self.lamps.set(state) {
            warn!("lamps: {}", e);
        }
    }
}

impl<PWM, PIN: OutputPin, DELAY: DelayNs, CLK> DisplayPort
    for HardwareAdapter<PWM, PIN, DELAY, CLK>
{
    fn write_lines(&mut self, line1: &str, line2: &str) {
        if let Err(e) = self.lcd.write_lines(line1, line2) {
            warn!("lcd: {}", e);
        }
    }
}

// ── Clock port ────────────────────────────────────────────────

impl<PWM, PIN, DELAY, CLK: ClockPort> ClockPort for HardwareAdapter<PWM, PIN, DELAY, CLK> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }
}
