//! Hobby servo driver over an `embedded-hal` PWM channel.
//!
//! Standard 50 Hz servo framing: a 544–2400 µs pulse in a 20 ms period maps
//! linearly onto 0–180°.  The channel's own duty resolution is read once at
//! construction.
//!
//! There is no position feedback.  `set_angle` returns as soon as the duty
//! is written; the caller waits for the horn to arrive.

use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::error::HwError;

/// PWM frequency the channel must be configured for.
pub const SERVO_FREQ_HZ: u32 = 50;

const PERIOD_US: u32 = 20_000;
const MIN_PULSE_US: u32 = 544;
const MAX_PULSE_US: u32 = 2_400;
const MAX_ANGLE: u8 = 180;

pub struct ServoDriver<P> {
    pwm: P,
    max_duty: u16,
    angle: Option<u8>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        let max_duty = pwm.max_duty_cycle();
        Self {
            pwm,
            max_duty,
            angle: None,
        }
    }

    /// Command the horn to `degrees`, clamped to 0–180.
    pub fn set_angle(&mut self, degrees: u8) -> Result<(), HwError> {
        let degrees = degrees.min(MAX_ANGLE);
        let duty = duty_for(degrees, self.max_duty);
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| HwError::PwmWriteFailed)?;
        debug!("servo: {}° (duty {}/{})", degrees, duty, self.max_duty);
        self.angle = Some(degrees);
        Ok(())
    }

    /// Last commanded angle, `None` before the first command.
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }
}

/// Pulse width for `degrees` in microseconds.
pub fn pulse_us(degrees: u8) -> u32 {
    let degrees = u32::from(degrees.min(MAX_ANGLE));
    MIN_PULSE_US + degrees * (MAX_PULSE_US - MIN_PULSE_US) / u32::from(MAX_ANGLE)
}

/// Duty value for `degrees` on a channel whose full scale is `max_duty`.
pub fn duty_for(degrees: u8, max_duty: u16) -> u16 {
    (pulse_us(degrees) * u32::from(max_duty) / PERIOD_US) as u16
}
