//! Physical sorting: the three-phase servo motion and the duplicate gate
//! that sits in front of it.
//!
//! ```text
//!  SORT_* ──▶ DebounceGate ──[clear]──▶ SortExecutor ──▶ servo, counters, SORTED_*
//!                  │
//!              [cooldown] ──▶ diagnostic only
//! ```

pub mod debounce;
pub mod executor;

use crate::config::SorterConfig;

/// The two physical destinations the servo deflects toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pile {
    Target,
    Other,
}

impl Pile {
    /// Servo angle that drops an item onto this pile.
    pub fn angle(self, config: &SorterConfig) -> u8 {
        match self {
            Self::Target => config.target_angle,
            Self::Other => config.other_angle,
        }
    }

    /// Upper-case name used on the wire (`SORTED_TARGET`, `-> OTHER pile`).
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Target => "TARGET",
            Self::Other => "OTHER",
        }
    }

    /// Single-letter tag used on the display.
    pub fn tag(self) -> char {
        match self {
            Self::Target => 'T',
            Self::Other => 'O',
        }
    }
}
