//! GPIO / peripheral pin assignments for the sorter controller board
//! (ESP32-S3 DevKitC-1).
//!
//! Single source of truth: `main` builds every driver from these numbers
//! rather than hard-coding pins.  Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Sorting servo (LEDC PWM, 50 Hz)
// ---------------------------------------------------------------------------

/// Servo signal line.
pub const SERVO_GPIO: i32 = 4;
/// LEDC timer resolution for the servo channel.  14 bits gives ~1.2 µs
/// steps across the 20 ms period.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;

// ---------------------------------------------------------------------------
// Indicator lamps (active HIGH)
// ---------------------------------------------------------------------------

/// Green: ready to feed.
pub const GREEN_LAMP_GPIO: i32 = 5;
/// Red: stop feeding / processing.
pub const RED_LAMP_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// HD44780 16×2 LCD, 4-bit parallel (R/W tied to GND)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 7;
pub const LCD_E_GPIO: i32 = 15;
pub const LCD_D4_GPIO: i32 = 16;
pub const LCD_D5_GPIO: i32 = 8;
pub const LCD_D6_GPIO: i32 = 9;
pub const LCD_D7_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// Host link (UART1).  The USB console stays free for logs.
// ---------------------------------------------------------------------------

pub const HOST_UART_TX_GPIO: i32 = 17;
pub const HOST_UART_RX_GPIO: i32 = 18;
