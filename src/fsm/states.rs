//! Concrete state handler functions and table builder.
//!
//! Each state is a set of plain `fn` pointers; nothing is boxed.
//!
//! ```text
//!            SET_TARGET                     (immediate)
//!  IDLE ───────────────▶ ARMED ─────────────────────────▶ SORTING ◀─┐
//!   ▲                     │ [empty label]                   │  │    │ SORT_* (service)
//!   │◀────────────────────┘                                 │  └────┘
//!   │                                        PAUSE_SORT     │
//!   │◀── [handshake done] ── PAUSED_HANDSHAKE ◀─────────────┘
//!   │
//!   │◀── [hold done] ─────── FINISHED ◀── FINISH_SORT (any state)
//!   │
//!   └─── stop / CLEAR_OBJECTS (any state)
//! ```

use super::context::SorterContext;
use super::{StateDescriptor, StateId};
use crate::app::ports::LampState;
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Armed
        StateDescriptor {
            id: StateId::Armed,
            name: "Armed",
            on_enter: Some(armed_enter),
            on_exit: None,
            on_update: armed_update,
        },
        // Index 2 — Sorting
        StateDescriptor {
            id: StateId::Sorting,
            name: "Sorting",
            on_enter: Some(sorting_enter),
            on_exit: Some(sorting_exit),
            on_update: sorting_update,
        },
        // Index 3 — PausedHandshake
        StateDescriptor {
            id: StateId::PausedHandshake,
            name: "PausedHandshake",
            on_enter: Some(paused_enter),
            on_exit: Some(paused_exit),
            on_update: paused_update,
        },
        // Index 4 — Finished
        StateDescriptor {
            id: StateId::Finished,
            name: "Finished",
            on_enter: Some(finished_enter),
            on_exit: Some(finished_exit),
            on_update: finished_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE state — no pass running, sort commands ignored
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SorterContext) {
    ctx.pass.active = false;
    info!("IDLE: sorting disabled");
}

fn idle_update(_ctx: &mut SorterContext) -> Option<StateId> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED state — new pass configured, counters zeroed
// ═══════════════════════════════════════════════════════════════════════════

fn armed_enter(ctx: &mut SorterContext) {
    ctx.pass.target_label = ctx.requested_target.clone();
    ctx.reset_pass_counts();
    info!("ARMED: target '{}', pass counters reset", ctx.pass.target_label);
}

fn armed_update(ctx: &mut SorterContext) -> Option<StateId> {
    // An active pass always has a target.
    if ctx.pass.target_label.is_empty() {
        return Some(StateId::Idle);
    }
    Some(StateId::Sorting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SORTING state — pass active, SORT_* commands honoured
// ═══════════════════════════════════════════════════════════════════════════

fn sorting_enter(ctx: &mut SorterContext) {
    ctx.pass.active = true;
    info!("SORTING: accepting sort commands");
}

fn sorting_exit(ctx: &mut SorterContext) {
    ctx.pass.active = false;
    info!(
        "SORTING: closed with target={} other={}",
        ctx.pass.target_count, ctx.pass.other_count
    );
}

fn sorting_update(_ctx: &mut SorterContext) -> Option<StateId> {
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  PAUSED_HANDSHAKE state — reporting PASS_COMPLETE to the host
// ═══════════════════════════════════════════════════════════════════════════

fn paused_enter(ctx: &mut SorterContext) {
    ctx.pass.active = false;
    ctx.outputs.lamps = Some(LampState::RED);
    info!("PAUSED: red lamp on, reporting pass");
}

fn paused_exit(ctx: &mut SorterContext) {
    ctx.pass.target_label.clear();
    ctx.debounce.reset();
    ctx.outputs.return_to_neutral = true;
}

fn paused_update(_ctx: &mut SorterContext) -> Option<StateId> {
    // The service runs the handshake between entering and settling.
    Some(StateId::Idle)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FINISHED state — session over, counters zeroed on exit
// ═══════════════════════════════════════════════════════════════════════════

fn finished_enter(ctx: &mut SorterContext) {
    ctx.pass.active = false;
    ctx.pass.target_label.clear();
    ctx.debounce.reset();
    ctx.outputs.lamps = Some(LampState::OFF);
    ctx.outputs.return_to_neutral = true;
    info!("FINISHED: session total {}", ctx.session.total);
}

fn finished_exit(ctx: &mut SorterContext) {
    ctx.reset_session();
    info!("FINISHED: counters reset for next session");
}

fn finished_update(_ctx: &mut SorterContext) -> Option<StateId> {
    Some(StateId::Idle)
}
