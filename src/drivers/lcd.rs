//! HD44780 16×2 character LCD, 4-bit parallel interface.
//!
//! Six digital outputs (RS, E, D4–D7) and a microsecond delay.  R/W is tied
//! to ground, so the busy flag is never read; every instruction waits its
//! datasheet execution time instead.
//!
//! ```text
//!  byte ──▶ high nibble ──▶ D7..D4, pulse E ──▶ low nibble ──▶ D7..D4, pulse E
//! ```

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::error::HwError;

pub const COLUMNS: u8 = 16;
pub const ROWS: u8 = 2;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE_INC: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; ROWS as usize] = [0x00, 0x40];

/// Execution time of ordinary instructions and data writes.
const EXEC_US: u32 = 50;
/// Execution time of clear / home.
const CLEAR_US: u32 = 2_000;

pub struct Hd44780<P, D> {
    rs: P,
    en: P,
    /// D4, D5, D6, D7.
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Hd44780<P, D> {
    /// Take the pins and run the power-on initialisation sequence.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Result<Self, HwError> {
        let mut lcd = Self { rs, en, data, delay };
        lcd.init()?;
        Ok(lcd)
    }

    /// Clear and write two lines.  Lines longer than 16 columns are cut;
    /// anything outside printable ASCII shows as `?`.
    pub fn write_lines(&mut self, line1: &str, line2: &str) -> Result<(), HwError> {
        self.clear()?;
        for (row, text) in [line1, line2].into_iter().enumerate() {
            self.set_cursor(0, row as u8)?;
            for ch in text.chars().take(COLUMNS as usize) {
                self.write_data(glyph(ch))?;
            }
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), HwError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(CLEAR_US);
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), HwError> {
        let row = row.min(ROWS - 1) as usize;
        let col = col.min(COLUMNS - 1);
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col))
    }

    // ── Internal ──────────────────────────────────────────────

    fn init(&mut self) -> Result<(), HwError> {
        // Power-on: wait for Vcc, then force 8-bit mode three times
        // before dropping to 4-bit (datasheet figure 24).
        self.delay.delay_ms(50);
        self.set_pin_rs(false)?;
        self.write_nibble(0x03)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(4_500);
        self.write_nibble(0x03)?;
        self.delay.delay_us(150);
        self.write_nibble(0x02)?;
        self.delay.delay_us(EXEC_US);

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_ENTRY_MODE_INC)?;
        self.clear()
    }

    fn command(&mut self, cmd: u8) -> Result<(), HwError> {
        self.set_pin_rs(false)?;
        self.write_byte(cmd)
    }

    fn write_data(&mut self, byte: u8) -> Result<(), HwError> {
        self.set_pin_rs(true)?;
        self.write_byte(byte)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), HwError> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        self.delay.delay_us(EXEC_US);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), HwError> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            set(pin, nibble & (1 << bit) != 0)?;
        }
        set(&mut self.en, true)?;
        self.delay.delay_us(1);
        set(&mut self.en, false)?;
        self.delay.delay_us(1);
        Ok(())
    }

    fn set_pin_rs(&mut self, high: bool) -> Result<(), HwError> {
        set(&mut self.rs, high)
    }
}

fn set<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), HwError> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|_| HwError::DisplayWriteFailed)
}

/// Character ROM code for `ch`.
fn glyph(ch: char) -> u8 {
    if ch.is_ascii() && !ch.is_ascii_control() {
        ch as u8
    } else {
        b'?'
    }
}
