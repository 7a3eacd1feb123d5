//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements           | Connects to                    |
//! |------------|----------------------|--------------------------------|
//! | `hardware` | ServoPort, LampPort  | LEDC PWM, GPIO                 |
//! |            | DisplayPort          | HD44780 LCD                    |
//! |            | ClockPort            | (delegates to `time`)          |
//! | `nvs`      | ConfigPort           | NVS / in-memory store          |
//! |            | ByteStorePort        |                                |
//! | `serial`   | EventSink            | UART1 host link                |
//! | `time`     | ClockPort            | ESP32 system timer, FreeRTOS   |

pub mod hardware;
pub mod nvs;
pub mod serial;
pub mod time;
