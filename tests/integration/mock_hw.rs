//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call against a virtual clock so tests can assert
//! on the full command history, including blocking waits, without touching
//! real GPIO/PWM registers or sleeping.

use binsorter::app::events::AppEvent;
use binsorter::app::ports::{
    ByteStorePort, ClockPort, DisplayPort, EventSink, LampPort, LampState, ServoPort, StorageError,
};
use binsorter::app::service::SorterService;
use binsorter::config::SorterConfig;
use binsorter::labels::STORE_SIZE;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    Angle(u8),
    Lamps(LampState),
    Display(String, String),
    Delay(u32),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub now_ms: u64,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let time pass without a hardware call (host-side gap between lines).
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn angles(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Angle(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn last_angle(&self) -> Option<u8> {
        self.angles().last().copied()
    }

    pub fn lamps(&self) -> LampState {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Lamps(s) => Some(*s),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Last two lines written to the display.
    pub fn display(&self) -> Option<(&str, &str)> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::Display(a, b) => Some((a.as_str(), b.as_str())),
            _ => None,
        })
    }

    /// Number of physical deflections (moves to a non-neutral angle).
    pub fn deflections(&self, neutral: u8) -> usize {
        self.angles().iter().filter(|a| **a != neutral).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl ServoPort for MockHardware {
    fn set_angle(&mut self, degrees: u8) {
        self.calls.push(HwCall::Angle(degrees));
    }
}

impl LampPort for MockHardware {
    fn set_lamps(&mut self, state: LampState) {
        self.calls.push(HwCall::Lamps(state));
    }
}

impl DisplayPort for MockHardware {
    fn write_lines(&mut self, line1: &str, line2: &str) {
        self.calls
            .push(HwCall::Display(line1.to_string(), line2.to_string()));
    }
}

impl ClockPort for MockHardware {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.calls.push(HwCall::Delay(ms));
        self.now_ms += u64::from(ms);
    }
}

// ── MockEeprom ────────────────────────────────────────────────

/// Byte store sized exactly for the label layout, zeroed like a fresh part.
pub struct MockEeprom {
    pub bytes: Vec<u8>,
    pub commits: usize,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockEeprom {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; STORE_SIZE],
            commits: 0,
            fail_writes: false,
        }
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteStorePort for MockEeprom {
    fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&self, addr: usize) -> Result<u8, StorageError> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(StorageError::OutOfBounds { addr })
    }

    fn write_byte(&mut self, addr: usize, value: u8) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        let slot = self
            .bytes
            .get_mut(addr)
            .ok_or(StorageError::OutOfBounds { addr })?;
        *slot = value;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.commits += 1;
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Captures every event and the wire lines it renders to.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
    pub lines: Vec<String>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines the host parses (`READY`, `SORTED_*`, `PASS_*`, ...).
    pub fn contractual(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|l| {
                *l == "READY"
                    || *l == "READY_TO_SORT"
                    || l.starts_with("PASS_COUNTER_RESET:")
                    || l.starts_with("SORTED_")
                    || l.starts_with("PASS_COMPLETE:")
            })
            .collect()
    }

    pub fn count(&self, line: &str) -> usize {
        self.lines.iter().filter(|l| *l == line).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.lines.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
        self.lines
            .extend(event.to_string().lines().map(str::to_string));
    }
}

// ── Rig: service + mocks wired together ───────────────────────

pub struct Rig {
    pub app: SorterService,
    pub hw: MockHardware,
    pub eeprom: MockEeprom,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    /// Booted service on a blank store.
    pub fn booted() -> Self {
        Self::booted_with(MockEeprom::new())
    }

    pub fn booted_with(eeprom: MockEeprom) -> Self {
        let mut rig = Self {
            app: SorterService::new(SorterConfig::default()),
            hw: MockHardware::new(),
            eeprom,
            sink: RecordingSink::new(),
        };
        rig.app.boot(&mut rig.hw, &rig.eeprom, &mut rig.sink);
        rig
    }

    /// Deliver one host line and run it to completion.
    pub fn send(&mut self, line: &str) {
        self.app
            .handle_line(line, &mut self.hw, &mut self.eeprom, &mut self.sink);
    }

    pub fn neutral(&self) -> u8 {
        self.app.config().neutral_angle
    }
}
