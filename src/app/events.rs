//! Outbound application events.
//!
//! The [`SorterService`](super::service::SorterService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Each one becomes one
//! line on the host link (pass diagnostics become four); the rendering
//! lives in [`crate::protocol::response`].
//!
//! Only the contractual variants (`Ready`, `ReadyToSort`,
//! `PassCounterReset`, `Sorted`, `PassComplete`) carry meaning for the host.
//! Everything else is informational.

use crate::labels::Label;
use crate::sorter::Pile;

use super::commands::LampCommand;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    // ── Contractual ───────────────────────────────────────────
    /// Boot finished.
    Ready,
    /// A non-empty label list was loaded.
    ReadyToSort,
    /// A new pass started with zeroed counters.
    PassCounterReset,
    /// One physical sort completed; `count` is the new pile count.
    Sorted { pile: Pile, count: u32 },
    /// End-of-pass report, sent three times per PAUSE_SORT.
    PassComplete { target: u32, other: u32 },

    // ── Lifecycle ─────────────────────────────────────────────
    Banner,
    HardwareInitialized,

    // ── Label store ───────────────────────────────────────────
    Storing(String),
    ObjectsStored(usize),
    ObjectsLoaded(usize),
    LoadedObject(Label),
    NoObjectsInStore,
    InvalidStoreData,
    StoreAccessFailed(String),
    EmptyObjectList,
    ObjectListHeader,
    ObjectListEntry { index: usize, label: Label },
    NoObjectsStored,
    ObjectsCleared,

    // ── Pass / sorting ────────────────────────────────────────
    TargetSet(Label),
    TargetMissing,
    SortRequested { pile: Pile, label: Label },
    Routing(Pile),
    CooldownSkip,
    PauseReceived { target: u32, other: u32 },
    Settling,
    PassCompleteSent { repeats: usize },
    PassStatus(PassStatus),
    SessionFinished { total: u32 },
    Stopped,

    // ── Misc ──────────────────────────────────────────────────
    Lamp(LampCommand),
    Unknown(String),
}

/// Pass diagnostics included in `LIST_OBJECTS` while a pass is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassStatus {
    pub target_label: Label,
    pub target_count: u32,
    pub other_count: u32,
}
