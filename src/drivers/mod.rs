//! Peripheral drivers, generic over `embedded-hal` 1.0 traits.
//!
//! | Driver     | Hardware                        | HAL traits             |
//! |------------|---------------------------------|------------------------|
//! | `servo`    | hobby servo on a 50 Hz PWM      | `pwm::SetDutyCycle`    |
//! | `lamps`    | green + red indicator LEDs      | `digital::OutputPin`   |
//! | `lcd`      | HD44780 16×2, 4-bit parallel    | `OutputPin`, `DelayNs` |
//! | `watchdog` | ESP-IDF task watchdog           | (FFI)                  |

pub mod lamps;
pub mod lcd;
pub mod servo;
pub mod watchdog;
