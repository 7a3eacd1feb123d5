//! Wire rendering of [`AppEvent`]s.
//!
//! The contractual lines (`READY`, `READY_TO_SORT`, `PASS_COUNTER_RESET:0`,
//! `SORTED_*`, `PASS_COMPLETE:*`) are parsed by the host and must not
//! change.  Everything else is informational text for a human watching the
//! serial monitor.

use core::fmt;

use crate::app::commands::LampCommand;
use crate::app::events::{AppEvent, PassStatus};

const BANNER: &str = "Binary Sorter V3 - Servo Counting";

impl fmt::Display for AppEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => f.write_str("READY"),
            Self::ReadyToSort => f.write_str("READY_TO_SORT"),
            Self::PassCounterReset => f.write_str("PASS_COUNTER_RESET:0"),
            Self::Sorted { pile, count } => write!(f, "SORTED_{}:{}", pile.wire_name(), count),
            Self::PassComplete { target, other } => {
                write!(f, "PASS_COMPLETE:{}:{}", target, other)
            }

            Self::Banner => f.write_str(BANNER),
            Self::HardwareInitialized => f.write_str("Hardware initialized"),

            Self::Storing(csv) => write!(f, "Storing: {}", csv),
            Self::ObjectsStored(n) => write!(f, "Objects stored: {}", n),
            Self::ObjectsLoaded(n) => write!(f, "Objects loaded: {}", n),
            Self::LoadedObject(label) => write!(f, "  {}", label),
            Self::NoObjectsInStore => f.write_str("No objects in EEPROM"),
            Self::InvalidStoreData => f.write_str("Invalid EEPROM data"),
            Self::StoreAccessFailed(reason) => write!(f, "EEPROM access failed: {}", reason),
            Self::EmptyObjectList => f.write_str("No labels in list"),
            Self::ObjectListHeader => f.write_str("Object list:"),
            Self::ObjectListEntry { index, label } => write!(f, "  {}: {}", index, label),
            Self::NoObjectsStored => f.write_str("No objects stored"),
            Self::ObjectsCleared => f.write_str("Objects cleared & counters reset"),

            Self::TargetSet(label) => write!(f, "Target set: {}", label),
            Self::TargetMissing => f.write_str("Target label missing"),
            Self::SortRequested { pile, label } => write!(f, "{}: {}", pile.wire_name(), label),
            Self::Routing(pile) => write!(f, "-> {} pile", pile.wire_name()),
            Self::CooldownSkip => f.write_str("Cooldown active, skipping duplicate"),
            Self::PauseReceived { target, other } => {
                write!(f, "PAUSE_SORT received - target: {}, other: {}", target, other)
            }
            Self::Settling => f.write_str("Waiting for servo to settle..."),
            Self::PassCompleteSent { repeats } => {
                write!(f, "PASS_COMPLETE sent {} times", repeats)
            }
            Self::PassStatus(status) => fmt::Display::fmt(status, f),
            Self::SessionFinished { total } => {
                write!(f, "Session finished - total movements: {}", total)
            }
            Self::Stopped => f.write_str("Stopped"),

            Self::Lamp(cmd) => f.write_str(lamp_text(*cmd)),
            Self::Unknown(line) => write!(f, "Unknown: {}", line),
        }
    }
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current target: {}", self.target_label)?;
        writeln!(f, "Pass target count: {}", self.target_count)?;
        writeln!(f, "Pass other count: {}", self.other_count)?;
        write!(
            f,
            "Pass total: {}",
            self.target_count.saturating_add(self.other_count)
        )
    }
}

fn lamp_text(cmd: LampCommand) -> &'static str {
    match cmd {
        LampCommand::GreenOn => "Green LED ON - Ready to feed",
        LampCommand::GreenOff => "Green LED OFF",
        LampCommand::RedOn => "Red LED ON - Stop feeding",
        LampCommand::RedOff => "Red LED OFF",
    }
}
