//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  StateTable                                                      │
//! │  ┌─────────────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ StateId         │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├─────────────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Idle            │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Armed           │ fn(ctx)   │ -        │ fn(ctx)->Option<> │  │
//! │  │ Sorting         │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ PausedHandshake │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Finished        │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  └─────────────────┴───────────┴──────────┴───────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands move the machine with [`Fsm::force_transition`].  Transient
//! states (`Armed`, `PausedHandshake`, `Finished`) leave on their next
//! `on_update`, which the service runs with [`Fsm::settle`] once it has
//! finished the blocking work that belongs to the state.  All functions
//! receive `&mut SorterContext`.

pub mod context;
pub mod states;

use context::SorterContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all possible session/pass states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Idle = 0,
    Armed = 1,
    Sorting = 2,
    PausedHandshake = 3,
    Finished = 4,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 5;

    /// Convert a `u8` index back to `StateId`.  Panics on out-of-range in
    /// debug builds; returns `Idle` in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Armed,
            2 => Self::Sorting,
            3 => Self::PausedHandshake,
            4 => Self::Finished,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut SorterContext);

/// Signature for the update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut SorterContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array with no heap and no `dyn`.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table (array of [`StateDescriptor`]); the
/// [`SorterContext`] it drives is owned by the caller.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Transitions taken since start (wraps at u64::MAX).
    transitions: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first command.
    pub fn start(&mut self, ctx: &mut SorterContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Call `on_update` for the current state once and take the transition
    /// it asks for.  Returns `true` if the state changed.
    pub fn tick(&mut self, ctx: &mut SorterContext) -> bool {
        match (self.table[self.current].on_update)(ctx) {
            Some(next_id) if next_id as usize != self.current => {
                self.transition(next_id, ctx);
                true
            }
            _ => false,
        }
    }

    /// Tick until the machine rests in a state whose `on_update` stays put.
    ///
    /// Bounded by the number of states, so a cyclic table cannot hang the
    /// main loop.
    pub fn settle(&mut self, ctx: &mut SorterContext) {
        for _ in 0..StateId::COUNT {
            if !self.tick(ctx) {
                return;
            }
        }
        log::warn!(
            "FSM did not settle, resting in {}",
            self.table[self.current].name
        );
    }

    /// Force an immediate transition, running `on_exit` / `on_enter`.
    /// A no-op if `next` is already current.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut SorterContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// Transitions taken since start.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut SorterContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions = self.transitions.wrapping_add(1);

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
