//! Two-line status presenter for the 16×2 character display.
//!
//! Every write goes through [`DisplayPresenter::show`], which truncates to
//! the panel width and remembers what is on the glass.  The periodic
//! status refresh uses that memory to skip redundant writes: an HD44780
//! clear-and-redraw flickers visibly and costs a couple of milliseconds.

use core::fmt::Write as _;

use crate::app::ports::DisplayPort;
use crate::fsm::context::Pass;

/// Characters per display line.
pub const LINE_WIDTH: usize = 16;

/// Room for two full lines plus the `|` separator, even with multi-byte chars.
const COMPOSITE_CAP: usize = 2 * LINE_WIDTH * 4 + 1;

/// A display line, truncated to [`LINE_WIDTH`] characters.
pub type Line = heapless::String<{ LINE_WIDTH * 4 }>;

/// Rate-limited, change-detecting renderer.
pub struct DisplayPresenter {
    /// `line1|line2` of the last write.
    current: heapless::String<COMPOSITE_CAP>,
    /// Time of the last periodic status refresh.
    last_refresh_ms: u64,
    refresh_interval_ms: u64,
}

impl DisplayPresenter {
    pub fn new(refresh_interval_ms: u32) -> Self {
        Self {
            current: heapless::String::new(),
            last_refresh_ms: 0,
            refresh_interval_ms: u64::from(refresh_interval_ms),
        }
    }

    /// Render two lines, each cut to 16 characters.
    pub fn show(&mut self, display: &mut impl DisplayPort, line1: &str, line2: &str) {
        let l1 = truncate(line1);
        let l2 = truncate(line2);
        display.write_lines(&l1, &l2);

        self.current.clear();
        let _ = write!(self.current, "{}|{}", l1, l2);
    }

    /// The composite `line1|line2` last written.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Periodic status while a pass is active: `Tgt:<label>` / `T:<t> O:<o>`.
    ///
    /// Runs at most once per refresh interval and writes only if the text
    /// changed.  Returns `true` if the display was written.
    pub fn refresh_status(
        &mut self,
        display: &mut impl DisplayPort,
        now_ms: u64,
        pass: &Pass,
    ) -> bool {
        if !pass.active || pass.target_label.is_empty() {
            return false;
        }
        if now_ms.saturating_sub(self.last_refresh_ms) <= self.refresh_interval_ms {
            return false;
        }
        self.last_refresh_ms = now_ms;

        let mut line1 = Line::new();
        let _ = write!(line1, "Tgt:{}", prefix(&pass.target_label, LINE_WIDTH - 4));
        let mut line2 = Line::new();
        let _ = write!(line2, "T:{} O:{}", pass.target_count, pass.other_count);

        if self.matches(&line1, &line2) {
            return false;
        }
        self.show(display, &line1, &line2);
        true
    }

    fn matches(&self, line1: &str, line2: &str) -> bool {
        let mut composite = heapless::String::<COMPOSITE_CAP>::new();
        let _ = write!(composite, "{}|{}", truncate(line1), truncate(line2));
        self.current == composite
    }
}

/// The first `chars` characters of `text`.
pub fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn truncate(text: &str) -> Line {
    let mut line = Line::new();
    let _ = line.push_str(prefix(text, LINE_WIDTH));
    line
}
