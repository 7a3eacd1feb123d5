//! Shared mutable context threaded through every FSM handler.
//!
//! `SorterContext` is the single struct that state handlers read from and
//! write to: the session and pass counters, the debounce record, and the
//! output requests the service applies to hardware after each transition.
//! Think of it as the "blackboard" in a blackboard architecture.

use crate::app::ports::LampState;
use crate::labels::Label;
use crate::sorter::debounce::DebounceGate;
use crate::sorter::Pile;

// ---------------------------------------------------------------------------
// Session and pass
// ---------------------------------------------------------------------------

/// One end-to-end sorting activity, from boot (or FINISH_SORT) onward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    /// Physical sort actions since the session started.
    pub total: u32,
}

/// One contiguous sorting interval for a single target label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pass {
    pub target_label: Label,
    pub target_count: u32,
    pub other_count: u32,
    /// Sort commands are honoured only while this is set.
    pub active: bool,
}

impl Pass {
    pub fn total(&self) -> u32 {
        self.target_count + self.other_count
    }

    pub fn count(&self, pile: Pile) -> u32 {
        match pile {
            Pile::Target => self.target_count,
            Pile::Other => self.other_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Output requests (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// Hardware actions requested by `on_enter` / `on_exit` handlers.
///
/// Handlers stay pure; the service drains these after each transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputRequests {
    pub lamps: Option<LampState>,
    pub return_to_neutral: bool,
}

impl OutputRequests {
    /// Take the pending requests, leaving none behind.
    pub fn take(&mut self) -> Self {
        core::mem::take(self)
    }
}

// ---------------------------------------------------------------------------
// SorterContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct SorterContext {
    pub session: Session,
    pub pass: Pass,
    pub debounce: DebounceGate,
    /// Label handed to `Armed` by SET_TARGET.
    pub requested_target: Label,
    pub outputs: OutputRequests,
}

impl SorterContext {
    pub fn new(cooldown_ms: u32) -> Self {
        Self {
            session: Session::default(),
            pass: Pass::default(),
            debounce: DebounceGate::new(cooldown_ms),
            requested_target: Label::new(),
            outputs: OutputRequests::default(),
        }
    }

    /// Count one completed physical sort.  Returns the new pile count.
    pub fn record_sort(&mut self, pile: Pile) -> u32 {
        let count = match pile {
            Pile::Target => &mut self.pass.target_count,
            Pile::Other => &mut self.pass.other_count,
        };
        *count = count.saturating_add(1);
        self.session.total = self.session.total.saturating_add(1);
        *count
    }

    /// Zero the pass counters (new pass, finish, clear).
    pub fn reset_pass_counts(&mut self) {
        self.pass.target_count = 0;
        self.pass.other_count = 0;
    }

    /// Zero everything the session tracks, including the target label.
    pub fn reset_session(&mut self) {
        self.pass = Pass::default();
        self.session = Session::default();
    }
}
