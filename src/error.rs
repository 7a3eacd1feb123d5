//! Unified error types for the BinSorter firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level boot path's error handling uniform.  All variants are `Copy`
//! so they can be passed through the service and logged without allocation.
//!
//! Port-level errors ([`StorageError`], [`ConfigError`]) live next to their
//! traits in [`crate::app::ports`].

use core::fmt;

use crate::app::ports::{ConfigError, StorageError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The persisted label list could not be read or written.
    Labels(LabelError),
    /// A hardware driver failed.
    Hardware(HwError),
    /// The serial host link failed.
    Link(LinkError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Labels(e) => write!(f, "labels: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Label store errors
// ---------------------------------------------------------------------------

/// Why the persisted label list was rejected.
///
/// Any of these makes the loader treat the store as empty.  The persisted
/// bytes are never rewritten in response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelError {
    /// Byte 0 holds more labels than the layout allows.
    CountOutOfRange(u8),
    /// A record's length byte does not fit inside its 50-byte slot.
    LengthOutOfRange { index: usize, len: u8 },
    /// A record's bytes are not valid UTF-8.
    InvalidText { index: usize },
    /// The underlying byte store failed.
    Storage(StorageError),
}

impl LabelError {
    /// `true` for corrupt persisted data, `false` for I/O failures.
    pub fn is_invalid_data(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountOutOfRange(n) => write!(f, "label count {n} out of range"),
            Self::LengthOutOfRange { index, len } => {
                write!(f, "label {index} length {len} out of range")
            }
            Self::InvalidText { index } => write!(f, "label {index} is not valid text"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl From<StorageError> for LabelError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<LabelError> for Error {
    fn from(e: LabelError) -> Self {
        Self::Labels(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware driver errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
    /// The character display rejected a write.
    DisplayWriteFailed,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::DisplayWriteFailed => write!(f, "display write failed"),
        }
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Host link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The transport failed to read.
    ReadFailed,
    /// The transport failed to write or flush.
    WriteFailed,
    /// An incoming line exceeded the receive buffer and was discarded.
    LineTooLong,
    /// An incoming line was not valid UTF-8 and was discarded.
    InvalidUtf8,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "serial read failed"),
            Self::WriteFailed => write!(f, "serial write failed"),
            Self::LineTooLong => write!(f, "line too long"),
            Self::InvalidUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
