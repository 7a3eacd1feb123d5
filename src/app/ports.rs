//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SorterService (domain)
//! ```
//!
//! Driven adapters (servo, lamps, display, clock, byte store, host link)
//! implement these traits.  The [`SorterService`](super::service::SorterService)
//! consumes them via generics, so the domain core never touches hardware
//! directly and every blocking wait runs against a clock that tests can
//! replace with virtual time.
//!
//! Actuator ports are infallible from the domain's point of view: there is
//! no position feedback, so the firmware assumes success after the fixed
//! settling delay.  Drivers log their own failures.

use crate::config::SorterConfig;

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The single rotary actuator that deflects items.
pub trait ServoPort {
    /// Command the servo to `degrees` (0–180).  Returns immediately;
    /// settling is the caller's responsibility.
    fn set_angle(&mut self, degrees: u8);
}

/// Desired state of the two indicator lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LampState {
    pub green: bool,
    pub red: bool,
}

impl LampState {
    pub const OFF: Self = Self { green: false, red: false };
    pub const GREEN: Self = Self { green: true, red: false };
    pub const RED: Self = Self { green: false, red: true };
}

/// Green ("ready to feed") and red ("stop / processing") lamps.
pub trait LampPort {
    fn set_lamps(&mut self, state: LampState);
}

/// 16×2 character display.
pub trait DisplayPort {
    /// Clear the display and write two lines.  Callers pass lines that are
    /// already truncated to the panel width.
    fn write_lines(&mut self, line1: &str, line2: &str);
}

/// Monotonic time source and blocking delay.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block the (single) execution context for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Everything the sorting mechanism needs in one bound.
///
/// The service takes `&mut impl SorterHardware` rather than four separate
/// borrows; the adapter that owns the drivers satisfies all of them.
pub trait SorterHardware: ServoPort + LampPort + DisplayPort + ClockPort {}

impl<T: ServoPort + LampPort + DisplayPort + ClockPort> SorterHardware for T {}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → host link / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`AppEvent`](super::events::AppEvent)s through this
/// port.  The serial adapter renders each one as a text line and flushes
/// it before returning, so a line the host receives always reflects
/// committed state.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Byte store port (driven adapter: domain ↔ EEPROM / NVS blob)
// ───────────────────────────────────────────────────────────────

/// Byte-addressed persistent memory.
///
/// Writes may be cached; [`commit`](Self::commit) makes them durable and
/// must be called before the dispatcher moves on to the next command.
pub trait ByteStorePort {
    /// Number of addressable bytes.
    fn capacity(&self) -> usize;

    fn read_byte(&self, addr: usize) -> Result<u8, StorageError>;

    fn write_byte(&mut self, addr: usize, value: u8) -> Result<(), StorageError>;

    /// Flush pending writes to the non-volatile medium.
    fn commit(&mut self) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the mechanical configuration.
///
/// Implementations MUST validate before persisting and reject invalid
/// values with [`ConfigError::ValidationFailed`] rather than clamping.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SorterConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SorterConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &SorterConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`ByteStorePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Address beyond the end of the store.
    OutOfBounds { addr: usize },
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::OutOfBounds { addr } => write!(f, "address {} out of bounds", addr),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
