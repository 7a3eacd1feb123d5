//! BinSorter Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        SerialLink        NvsAdapter           │
//! │  (servo·lamps·LCD·clock)(lines+EventSink) (config+label image) │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              SorterService (pure logic)                │    │
//! │  │  FSM · Debounce · SortExecutor · DisplayPresenter      │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each loop iteration consumes at most one host line, then refreshes the
//! status display and feeds the watchdog.  Commands run to completion,
//! blocking waits included, before the next line is read.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Output, PinDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;

use binsorter::adapters::hardware::HardwareAdapter;
use binsorter::adapters::nvs::NvsAdapter;
use binsorter::adapters::serial::{SerialLink, UartTransport};
use binsorter::adapters::time::Esp32TimeAdapter;
use binsorter::app::service::SorterService;
use binsorter::config::load_or_restore;
use binsorter::drivers::lamps::Lamps;
use binsorter::drivers::lcd::Hd44780;
use binsorter::drivers::servo::{SERVO_FREQ_HZ, ServoDriver};
use binsorter::drivers::watchdog::Watchdog;
use binsorter::error::Error;
use binsorter::pins;

type OutPin = PinDriver<'static, AnyOutputPin, Output>;

/// Main-loop yield between iterations (ms).
const LOOP_YIELD_MS: u32 = 1;

fn output(gpio: i32) -> Result<OutPin> {
    // SAFETY: every GPIO number comes from `pins` and is claimed exactly once.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    Ok(PinDriver::output(pin)?)
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BinSorter v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let watchdog = Watchdog::subscribe();

    // ── 2. Load config and label image from NVS ───────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => n,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            NvsAdapter::ram_only()
        }
    };
    let config = load_or_restore(&mut nvs);
    info!("Config: cooldown {} ms, {} baud", config.sort_cooldown_ms, config.serial_baud);

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;

    let servo_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(Hertz(SERVO_FREQ_HZ))
            .resolution(Resolution::Bits14),
    )?;
    // SAFETY: the servo GPIO is not claimed anywhere else.
    let servo_pin = unsafe { AnyOutputPin::new(pins::SERVO_GPIO) };
    let servo_pwm = LedcDriver::new(peripherals.ledc.channel0, servo_timer, servo_pin)?;
    info!(
        "Servo: GPIO{} at {} Hz, {}-bit",
        pins::SERVO_GPIO,
        SERVO_FREQ_HZ,
        pins::SERVO_PWM_RESOLUTION_BITS
    );

    let lamps = Lamps::new(output(pins::GREEN_LAMP_GPIO)?, output(pins::RED_LAMP_GPIO)?);

    let lcd = Hd44780::new(
        output(pins::LCD_RS_GPIO)?,
        output(pins::LCD_E_GPIO)?,
        [
            output(pins::LCD_D4_GPIO)?,
            output(pins::LCD_D5_GPIO)?,
            output(pins::LCD_D6_GPIO)?,
            output(pins::LCD_D7_GPIO)?,
        ],
        Ets,
    )
    .map_err(Error::from)?;

    // SAFETY: the UART GPIOs are not claimed anywhere else.
    let (tx, rx) = unsafe {
        (
            AnyIOPin::new(pins::HOST_UART_TX_GPIO),
            AnyIOPin::new(pins::HOST_UART_RX_GPIO),
        )
    };
    let uart = UartDriver::new(
        peripherals.uart1,
        tx,
        rx,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.serial_baud)),
    )?;
    info!("Host link: UART1 at {} baud", config.serial_baud);

    let mut hw = HardwareAdapter::new(
        ServoDriver::new(servo_pwm),
        lamps,
        lcd,
        Esp32TimeAdapter::new(),
    );
    let mut link = SerialLink::new(UartTransport::new(uart));

    // ── 4. Boot sequence ──────────────────────────────────────
    let mut app = SorterService::new(config);
    app.boot(&mut hw, &nvs, &mut link);

    info!("System ready. Entering main loop.");

    // ── 5. Main loop ──────────────────────────────────────────
    loop {
        match link.poll_line() {
            Some(Ok(line)) => app.handle_line(&line, &mut hw, &mut nvs, &mut link),
            Some(Err(e)) => warn!("host link: {}", e),
            None => {}
        }

        app.refresh_display(&mut hw);
        watchdog.feed();
        FreeRtos::delay_ms(LOOP_YIELD_MS);
    }
}
