//! Application service — the hexagonal core.
//!
//! [`SorterService`] owns the FSM, the shared context, the sort executor,
//! the display presenter and the in-memory label list.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters and a
//! virtual clock.
//!
//! ```text
//!  host line ──▶ ┌─────────────────────────────┐ ──▶ EventSink (host link)
//!                │        SorterService        │
//!  ByteStore ◀──▶│  FSM · Debounce · Executor  │ ──▶ SorterHardware
//!                └─────────────────────────────┘     (servo, lamps, LCD, clock)
//! ```
//!
//! Every command runs to completion, blocking waits included, before the
//! next one is looked at.  That is what lets a PAUSE_SORT sent right after
//! the last SORT_* observe the finished count.

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::config::SorterConfig;
use crate::display::{DisplayPresenter, Line, prefix};
use crate::fsm::context::{Pass, SorterContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};
use crate::labels::{self, Label, LabelList};
use crate::protocol::{PASS_COMPLETE_REPEATS, PASS_COMPLETE_RESEND_MS};
use crate::sorter::Pile;
use crate::sorter::debounce::Verdict;
use crate::sorter::executor::SortExecutor;

use super::commands::{AppCommand, LampCommand};
use super::events::{AppEvent, PassStatus};
use super::ports::{ByteStorePort, EventSink, LampState, SorterHardware};

/// Characters of the target label shown on the SET_TARGET screen.
const TARGET_SCREEN_CHARS: usize = 8;

// ───────────────────────────────────────────────────────────────
// SorterService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct SorterService {
    fsm: Fsm,
    ctx: SorterContext,
    executor: SortExecutor,
    presenter: DisplayPresenter,
    /// In-memory copy of the persisted label list.
    labels: LabelList,
    config: SorterConfig,
}

impl SorterService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch hardware; call [`boot`](Self::boot) next.
    pub fn new(config: SorterConfig) -> Self {
        Self {
            fsm: Fsm::new(build_state_table(), StateId::Idle),
            ctx: SorterContext::new(config.sort_cooldown_ms),
            executor: SortExecutor::new(&config),
            presenter: DisplayPresenter::new(config.display_refresh_interval_ms),
            labels: LabelList::new(),
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Power-on sequence: park the servo, load labels, announce `READY`.
    pub fn boot(
        &mut self,
        hw: &mut impl SorterHardware,
        store: &impl ByteStorePort,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Banner);
        self.presenter.show(hw, "System Starting", "Please wait...");
        hw.set_lamps(LampState::RED);

        hw.set_angle(self.executor.neutral_angle());
        hw.delay_ms(self.config.boot_settle_ms);
        sink.emit(&AppEvent::HardwareInitialized);

        self.fsm.start(&mut self.ctx);
        self.load_labels(hw, store, sink);

        self.presenter.show(hw, "System Ready", "Waiting...");
        hw.set_lamps(LampState::OFF);
        sink.emit(&AppEvent::Ready);
        info!("SorterService ready in {:?}", self.fsm.current_state());
    }

    // ── Command handling ──────────────────────────────────────

    /// Handle one line received from the host.  Blank lines are ignored.
    pub fn handle_line(
        &mut self,
        line: &str,
        hw: &mut impl SorterHardware,
        store: &mut impl ByteStorePort,
        sink: &mut impl EventSink,
    ) {
        if line.trim().is_empty() {
            return;
        }
        self.handle_command(AppCommand::parse(line), hw, store, sink);
    }

    /// Process a parsed command to completion.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand<'_>,
        hw: &mut impl SorterHardware,
        store: &mut impl ByteStorePort,
        sink: &mut impl EventSink,
    ) {
        debug!("command: {:?} in {:?}", cmd, self.fsm.current_state());
        match cmd {
            AppCommand::StoreObjects(csv) => self.store_labels(csv, hw, store, sink),
            AppCommand::LoadObjects => self.load_labels(hw, &*store, sink),
            AppCommand::ListObjects => self.list_labels(sink),
            AppCommand::ClearObjects => self.clear_labels(hw, store, sink),
            AppCommand::SetTarget(target) => self.set_target(target, hw, sink),
            AppCommand::SortTarget(item) => self.sort(Pile::Target, item, hw, sink),
            AppCommand::SortOther(item) => self.sort(Pile::Other, item, hw, sink),
            AppCommand::PauseSort => self.pause(hw, sink),
            AppCommand::FinishSort => self.finish(hw, sink),
            AppCommand::Lamp(lamp) => {
                hw.set_lamps(lamp_state(lamp));
                sink.emit(&AppEvent::Lamp(lamp));
            }
            AppCommand::Stop => self.stop(hw, sink),
            AppCommand::Unknown(line) => {
                debug!("unknown command '{}'", line);
                sink.emit(&AppEvent::Unknown(line.to_string()));
            }
        }
    }

    /// Periodic status redraw; call once per main-loop iteration.
    /// Returns `true` if the display was written.
    pub fn refresh_display(&mut self, hw: &mut impl SorterHardware) -> bool {
        let now = hw.now_ms();
        self.presenter.refresh_status(hw, now, &self.ctx.pass)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn pass(&self) -> &Pass {
        &self.ctx.pass
    }

    pub fn session_total(&self) -> u32 {
        self.ctx.session.total
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// `line1|line2` currently on the display.
    pub fn display_text(&self) -> &str {
        self.presenter.current()
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    // ── Pass lifecycle ────────────────────────────────────────

    fn set_target(&mut self, target: &str, hw: &mut impl SorterHardware, sink: &mut impl EventSink) {
        let target = target.trim();
        if target.is_empty() {
            warn!("SET_TARGET without a label, ignored");
            sink.emit(&AppEvent::TargetMissing);
            return;
        }

        self.ctx.requested_target = labels::label(target);
        self.fsm.force_transition(StateId::Armed, &mut self.ctx);
        self.fsm.settle(&mut self.ctx);
        self.apply_outputs(hw);

        let label = self.ctx.pass.target_label.clone();
        sink.emit(&AppEvent::TargetSet(label.clone()));
        sink.emit(&AppEvent::PassCounterReset);

        let mut line1 = Line::new();
        let _ = write!(line1, "Target: {}", prefix(&label, TARGET_SCREEN_CHARS));
        self.presenter.show(hw, &line1, "Count: 0");
    }

    fn sort(
        &mut self,
        pile: Pile,
        item: &str,
        hw: &mut impl SorterHardware,
        sink: &mut impl EventSink,
    ) {
        if !self.ctx.pass.active {
            debug!("SORT_{} '{}' with no active pass, ignored", pile.wire_name(), item);
            return;
        }

        let item = item.trim();
        let arrived_ms = hw.now_ms();
        if let Verdict::Cooldown { elapsed_ms } = self.ctx.debounce.check(item, arrived_ms) {
            debug!("'{}' repeated after {} ms, suppressed", item, elapsed_ms);
            sink.emit(&AppEvent::CooldownSkip);
            return;
        }

        sink.emit(&AppEvent::SortRequested {
            pile,
            label: labels::label(item),
        });
        self.executor
            .execute(pile, &mut self.ctx, hw, &mut self.presenter, sink);
        self.ctx.debounce.record(item, arrived_ms);
    }

    /// End the pass and report it: three `PASS_COMPLETE` lines, 100 ms apart.
    fn pause(&mut self, hw: &mut impl SorterHardware, sink: &mut impl EventSink) {
        let (target, other) = (self.ctx.pass.target_count, self.ctx.pass.other_count);
        sink.emit(&AppEvent::PauseReceived { target, other });

        self.fsm
            .force_transition(StateId::PausedHandshake, &mut self.ctx);
        self.apply_outputs(hw);

        sink.emit(&AppEvent::Settling);
        hw.delay_ms(self.config.pause_settle_ms);

        let report = AppEvent::PassComplete {
            target: self.ctx.pass.target_count,
            other: self.ctx.pass.other_count,
        };
        for _ in 0..PASS_COMPLETE_REPEATS {
            sink.emit(&report);
            hw.delay_ms(PASS_COMPLETE_RESEND_MS);
        }
        sink.emit(&AppEvent::PassCompleteSent {
            repeats: PASS_COMPLETE_REPEATS,
        });

        let mut line2 = Line::new();
        let _ = write!(line2, "Total: {}", self.ctx.pass.total());
        self.presenter.show(hw, "Pass Complete", &line2);

        self.fsm.settle(&mut self.ctx);
        self.apply_outputs(hw);
    }

    /// End the session: report the total, park, hold, then zero everything.
    fn finish(&mut self, hw: &mut impl SorterHardware, sink: &mut impl EventSink) {
        self.fsm.force_transition(StateId::Finished, &mut self.ctx);

        let total = self.ctx.session.total;
        sink.emit(&AppEvent::SessionFinished { total });
        let mut line2 = Line::new();
        let _ = write!(line2, "{} total", total);
        self.presenter.show(hw, "Session Done", &line2);

        self.apply_outputs(hw);
        hw.delay_ms(self.config.finish_hold_ms);

        self.fsm.settle(&mut self.ctx);
        self.presenter.show(hw, "System Ready", "Waiting...");
    }

    /// Immediate standby.  Counters and the target label are kept.
    fn stop(&mut self, hw: &mut impl SorterHardware, sink: &mut impl EventSink) {
        self.fsm.force_transition(StateId::Idle, &mut self.ctx);
        self.ctx.debounce.reset();

        sink.emit(&AppEvent::Stopped);
        self.presenter.show(hw, "System Stopped", "Standby mode");
        hw.set_lamps(LampState::OFF);
        self.executor.return_to_neutral(hw);
    }

    // ── Label store ───────────────────────────────────────────

    fn store_labels(
        &mut self,
        csv: &str,
        hw: &mut impl SorterHardware,
        store: &mut impl ByteStorePort,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Storing(csv.to_string()));

        let list = labels::parse_csv(csv);
        if list.is_empty() {
            sink.emit(&AppEvent::EmptyObjectList);
            return;
        }

        if let Err(e) = labels::store(store, &list) {
            warn!("label store write failed: {}", e);
            sink.emit(&AppEvent::StoreAccessFailed(e.to_string()));
            self.presenter.show(hw, "EEPROM Error", "Write failed");
            return;
        }

        sink.emit(&AppEvent::ObjectsStored(list.len()));
        let mut line2 = Line::new();
        let _ = write!(line2, "{} items", list.len());
        self.presenter.show(hw, "Objects Stored", &line2);

        self.load_labels(hw, &*store, sink);
    }

    fn load_labels(
        &mut self,
        hw: &mut impl SorterHardware,
        store: &impl ByteStorePort,
        sink: &mut impl EventSink,
    ) {
        match labels::load(store) {
            Ok(list) if list.is_empty() => {
                self.labels.clear();
                sink.emit(&AppEvent::NoObjectsInStore);
                self.presenter.show(hw, "Ready", "No objects");
            }
            Ok(list) => {
                sink.emit(&AppEvent::ObjectsLoaded(list.len()));
                for item in &list {
                    sink.emit(&AppEvent::LoadedObject(item.clone()));
                }
                let mut line2 = Line::new();
                let _ = write!(line2, "{} items", list.len());
                self.presenter.show(hw, "Objects Loaded", &line2);
                self.labels = list;
                sink.emit(&AppEvent::ReadyToSort);
            }
            Err(e) if e.is_invalid_data() => {
                warn!("label store rejected: {}", e);
                self.labels.clear();
                sink.emit(&AppEvent::InvalidStoreData);
                self.presenter.show(hw, "EEPROM Error", "Data invalid");
            }
            Err(e) => {
                warn!("label store read failed: {}", e);
                self.labels.clear();
                sink.emit(&AppEvent::StoreAccessFailed(e.to_string()));
                self.presenter.show(hw, "EEPROM Error", "Read failed");
            }
        }
    }

    fn list_labels(&self, sink: &mut impl EventSink) {
        if self.labels.is_empty() {
            sink.emit(&AppEvent::NoObjectsStored);
        } else {
            sink.emit(&AppEvent::ObjectListHeader);
            for (i, item) in self.labels.iter().enumerate() {
                sink.emit(&AppEvent::ObjectListEntry {
                    index: i + 1,
                    label: item.clone(),
                });
            }
        }

        if self.ctx.pass.active {
            sink.emit(&AppEvent::PassStatus(PassStatus {
                target_label: self.ctx.pass.target_label.clone(),
                target_count: self.ctx.pass.target_count,
                other_count: self.ctx.pass.other_count,
            }));
        }
    }

    /// Erase the persisted list and reset session and pass state.
    fn clear_labels(
        &mut self,
        hw: &mut impl SorterHardware,
        store: &mut impl ByteStorePort,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = labels::clear(store) {
            warn!("label store clear failed: {}", e);
            sink.emit(&AppEvent::StoreAccessFailed(e.to_string()));
        }
        self.labels.clear();

        self.fsm.force_transition(StateId::Idle, &mut self.ctx);
        self.ctx.reset_session();
        self.ctx.debounce.reset();
        self.apply_outputs(hw);

        sink.emit(&AppEvent::ObjectsCleared);
        self.presenter.show(hw, "Objects Cleared", "Memory empty");
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drain hardware requests left by FSM handlers.
    fn apply_outputs(&mut self, hw: &mut impl SorterHardware) {
        let out = self.ctx.outputs.take();
        if let Some(lamps) = out.lamps {
            hw.set_lamps(lamps);
        }
        if out.return_to_neutral {
            self.executor.return_to_neutral(hw);
        }
    }
}

fn lamp_state(cmd: LampCommand) -> LampState {
    match cmd {
        LampCommand::GreenOn => LampState::GREEN,
        LampCommand::RedOn => LampState::RED,
        LampCommand::GreenOff | LampCommand::RedOff => LampState::OFF,
    }
}
