//! Duplicate-classification gate.
//!
//! The host keeps reporting the same label while one item crosses the
//! camera's view, so a repeat of the last accepted label inside the cooldown
//! window is dropped.  A different label always passes: it must be a new
//! item.
//!
//! The record is stamped with the time the command *arrived*, before the
//! motion started, so the window includes the servo's own travel time.

use crate::protocol::MAX_LINE_LEN;

/// A classification as received, never truncated: a label can't outgrow
/// the line that carried it.
type SeenLabel = heapless::String<MAX_LINE_LEN>;

/// Outcome of [`DebounceGate::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Run the sort.
    Clear,
    /// Same label inside the cooldown window; skip it.
    Cooldown { elapsed_ms: u64 },
}

/// `last_label` / `last_time_ms` record of the most recent accepted sort.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    last: Option<(SeenLabel, u64)>,
    cooldown_ms: u64,
}

impl DebounceGate {
    pub fn new(cooldown_ms: u32) -> Self {
        Self {
            last: None,
            cooldown_ms: u64::from(cooldown_ms),
        }
    }

    /// Decide whether a sort for `label` arriving at `now_ms` may run.
    pub fn check(&self, label: &str, now_ms: u64) -> Verdict {
        match &self.last {
            Some((last_label, last_ms)) if last_label.as_str() == label => {
                let elapsed_ms = now_ms.saturating_sub(*last_ms);
                if elapsed_ms <= self.cooldown_ms {
                    Verdict::Cooldown { elapsed_ms }
                } else {
                    Verdict::Clear
                }
            }
            _ => Verdict::Clear,
        }
    }

    /// Stamp an accepted sort.
    pub fn record(&mut self, label: &str, at_ms: u64) {
        let mut seen = SeenLabel::new();
        if seen.push_str(label).is_err() {
            log::warn!("debounce: {}-byte label exceeds line length", label.len());
            self.last = None;
            return;
        }
        self.last = Some((seen, at_ms));
    }

    /// Forget the last label (end of pass, stop, finish).
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// The last accepted label, if any.
    pub fn last_label(&self) -> Option<&str> {
        self.last.as_ref().map(|(l, _)| l.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> DebounceGate {
        DebounceGate::new(1500)
    }

    #[test]
    fn first_sort_is_clear() {
        assert_eq!(gate().check("cup", 0), Verdict::Clear);
    }

    #[test]
    fn same_label_inside_window_is_suppressed() {
        let mut g = gate();
        g.record("cup", 1_000);
        assert_eq!(
            g.check("cup", 2_100),
            Verdict::Cooldown { elapsed_ms: 1_100 }
        );
    }

    #[test]
    fn window_edge_is_inclusive() {
        let mut g = gate();
        g.record("cup", 0);
        assert!(matches!(g.check("cup", 1_500), Verdict::Cooldown { .. }));
        assert_eq!(g.check("cup", 1_501), Verdict::Clear);
    }

    #[test]
    fn different_label_bypasses_window() {
        let mut g = gate();
        g.record("cup", 0);
        assert_eq!(g.check("bottle", 10), Verdict::Clear);
    }

    #[test]
    fn long_labels_compare_in_full() {
        let mut g = gate();
        let first = format!("{}A", "x".repeat(55));
        let second = format!("{}B", "x".repeat(55));
        g.record(&first, 0);
        assert_eq!(g.check(&second, 10), Verdict::Clear);
        assert!(matches!(g.check(&first, 10), Verdict::Cooldown { .. }));
        assert_eq!(g.last_label(), Some(first.as_str()));
    }

    #[test]
    fn reset_forgets_last_label() {
        let mut g = gate();
        g.record("cup", 0);
        g.reset();
        assert_eq!(g.last_label(), None);
        assert_eq!(g.check("cup", 10), Verdict::Clear);
    }

    #[test]
    fn clock_going_backwards_counts_as_zero_elapsed() {
        let mut g = gate();
        g.record("cup", 5_000);
        assert_eq!(g.check("cup", 4_000), Verdict::Cooldown { elapsed_ms: 0 });
    }
}
