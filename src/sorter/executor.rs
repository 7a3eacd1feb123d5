//! Three-phase sort motion and the authoritative counters.
//!
//! ```text
//!   neutral ──set_angle(side)──▶ deflect_ms ──set_angle(neutral)──▶ return_ms
//!                                                                     │
//!               counters += 1 ◀──────────────────────────────────────┘
//!               SORTED_<PILE>:<n>
//!               display "Sorting: T<n>" / "Total: <pass total>"
//! ```
//!
//! Counters move only after the servo is back at neutral, so a
//! `SORTED_*` line the host reads always describes a finished motion.

use core::fmt::Write as _;

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SorterHardware};
use crate::config::SorterConfig;
use crate::display::{DisplayPresenter, Line};
use crate::fsm::context::SorterContext;

use super::Pile;

/// Mechanical timing and angles for one sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortExecutor {
    target_angle: u8,
    other_angle: u8,
    neutral_angle: u8,
    deflect_ms: u32,
    return_ms: u32,
}

impl SortExecutor {
    pub fn new(config: &SorterConfig) -> Self {
        Self {
            target_angle: Pile::Target.angle(config),
            other_angle: Pile::Other.angle(config),
            neutral_angle: config.neutral_angle,
            deflect_ms: config.sort_deflect_ms,
            return_ms: config.sort_return_ms,
        }
    }

    /// Run one sort onto `pile` and count it.  Returns the new pile count.
    ///
    /// Blocks for `deflect_ms + return_ms`.  The caller has already
    /// checked that a pass is active and that the debounce gate is clear.
    pub fn execute(
        &self,
        pile: Pile,
        ctx: &mut SorterContext,
        hw: &mut impl SorterHardware,
        presenter: &mut DisplayPresenter,
        sink: &mut impl EventSink,
    ) -> u32 {
        sink.emit(&AppEvent::Routing(pile));

        hw.set_angle(self.side_angle(pile));
        hw.delay_ms(self.deflect_ms);
        self.return_to_neutral(hw);

        let count = ctx.record_sort(pile);
        info!(
            "sorted {} #{} (pass {}, session {})",
            pile.wire_name(),
            count,
            ctx.pass.total(),
            ctx.session.total
        );
        sink.emit(&AppEvent::Sorted { pile, count });

        let mut line1 = Line::new();
        let _ = write!(line1, "Sorting: {}{}", pile.tag(), count);
        let mut line2 = Line::new();
        let _ = write!(line2, "Total: {}", ctx.pass.total());
        presenter.show(hw, &line1, &line2);

        count
    }

    /// Drive the servo to neutral and wait for it to settle.
    pub fn return_to_neutral(&self, hw: &mut impl SorterHardware) {
        hw.set_angle(self.neutral_angle);
        hw.delay_ms(self.return_ms);
    }

    /// Neutral angle without the settle wait (boot, where the wait is longer).
    pub fn neutral_angle(&self) -> u8 {
        self.neutral_angle
    }

    fn side_angle(&self, pile: Pile) -> u8 {
        match pile {
            Pile::Target => self.target_angle,
            Pile::Other => self.other_angle,
        }
    }
}
