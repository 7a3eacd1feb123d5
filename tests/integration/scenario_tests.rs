//! End-to-end command scenarios: host lines in, wire lines and hardware
//! calls out, all against a virtual clock.

use super::mock_hw::{HwCall, MockEeprom, Rig};

use binsorter::app::ports::LampState;
use binsorter::fsm::StateId;

fn fresh_pass(target: &str) -> Rig {
    let mut rig = Rig::booted();
    rig.send(&format!("SET_TARGET:{}", target));
    rig.sink.clear();
    rig.hw.clear_calls();
    rig
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_with_empty_store_announces_ready() {
    let rig = Rig::booted();

    assert_eq!(rig.sink.contractual(), ["READY"]);
    assert_eq!(rig.sink.lines.first().map(String::as_str), Some("Binary Sorter V3 - Servo Counting"));
    assert!(rig.sink.lines.iter().any(|l| l == "No objects in EEPROM"));
    assert_eq!(rig.hw.display(), Some(("System Ready", "Waiting...")));
    assert_eq!(rig.app.display_text(), "System Ready|Waiting...");
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.hw.lamps(), LampState::OFF);
}

#[test]
fn boot_parks_servo_before_ready() {
    let rig = Rig::booted();

    let park = rig.hw.calls.iter().position(|c| *c == HwCall::Angle(93));
    let settle = rig.hw.calls.iter().position(|c| *c == HwCall::Delay(500));
    assert!(park.is_some() && settle > park, "servo parked then settled");
    assert_eq!(rig.hw.angles(), [93]);
}

#[test]
fn boot_with_stored_labels_is_ready_to_sort() {
    let mut seed = Rig::booted();
    seed.send("STORE_OBJECTS:cup,bottle");

    let rig = Rig::booted_with(seed.eeprom);
    assert_eq!(rig.sink.contractual(), ["READY_TO_SORT", "READY"]);
    assert_eq!(rig.app.labels(), ["cup", "bottle"]);
}

// ── Label store ───────────────────────────────────────────────

#[test]
fn store_then_list_reports_labels_in_order() {
    let mut rig = Rig::booted();
    rig.send("STORE_OBJECTS:cup,bottle,can");

    assert_eq!(rig.eeprom.bytes[0], 3);
    assert!(rig.eeprom.commits >= 1);
    assert!(rig.sink.lines.iter().any(|l| l == "Objects stored: 3"));
    assert_eq!(rig.sink.count("READY_TO_SORT"), 1);

    rig.sink.clear();
    rig.send("LIST_OBJECTS");
    assert_eq!(
        rig.sink.lines,
        ["Object list:", "  1: cup", "  2: bottle", "  3: can"]
    );
}

#[test]
fn list_during_pass_appends_diagnostics() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.sink.clear();

    rig.send("LIST_OBJECTS");
    assert_eq!(
        rig.sink.lines,
        [
            "No objects stored",
            "Current target: cup",
            "Pass target count: 1",
            "Pass other count: 0",
            "Pass total: 1",
        ]
    );
}

#[test]
fn empty_csv_is_rejected_without_touching_store() {
    let mut rig = Rig::booted();
    rig.send("STORE_OBJECTS:");

    assert!(rig.sink.lines.iter().any(|l| l == "No labels in list"));
    assert_eq!(rig.eeprom.commits, 0);
}

#[test]
fn interior_empty_label_is_stored_and_listed() {
    let mut rig = Rig::booted();
    rig.send("STORE_OBJECTS:cup,,can");
    assert_eq!(rig.eeprom.bytes[0], 3);

    rig.send("LOAD_OBJECTS");
    rig.sink.clear();
    rig.send("LIST_OBJECTS");
    assert_eq!(
        rig.sink.lines,
        ["Object list:", "  1: cup", "  2: ", "  3: can"]
    );
}

#[test]
fn corrupt_store_reports_invalid_data_and_is_not_rewritten() {
    let mut eeprom = MockEeprom::new();
    eeprom.bytes[0] = 31;
    let snapshot = eeprom.bytes.clone();

    let mut rig = Rig::booted_with(eeprom);
    assert!(rig.sink.lines.iter().any(|l| l == "Invalid EEPROM data"));

    rig.hw.clear_calls();
    rig.send("LOAD_OBJECTS");
    assert_eq!(rig.hw.display(), Some(("EEPROM Error", "Data invalid")));
    assert!(rig.app.labels().is_empty());
    assert_eq!(rig.eeprom.bytes, snapshot);
    assert_eq!(rig.eeprom.commits, 0);
}

#[test]
fn failed_store_write_is_reported() {
    let mut rig = Rig::booted();
    rig.eeprom.fail_writes = true;
    rig.send("STORE_OBJECTS:cup");

    assert!(rig.sink.lines.iter().any(|l| l.starts_with("EEPROM access failed")));
    assert_eq!(rig.hw.display(), Some(("EEPROM Error", "Write failed")));
    assert!(rig.app.labels().is_empty());
}

#[test]
fn clear_objects_resets_store_and_session() {
    let mut rig = Rig::booted();
    rig.send("STORE_OBJECTS:cup,can");
    rig.send("SET_TARGET:cup");
    rig.send("SORT_TARGET:cup");
    rig.send("CLEAR_OBJECTS");

    assert_eq!(rig.eeprom.bytes[0], 0);
    assert!(rig.app.labels().is_empty());
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.app.session_total(), 0);
    assert_eq!(rig.app.pass().total(), 0);
    assert!(!rig.app.pass().active);
    assert_eq!(rig.hw.display(), Some(("Objects Cleared", "Memory empty")));
}

// ── Pass lifecycle ────────────────────────────────────────────

#[test]
fn set_target_starts_pass() {
    let mut rig = Rig::booted();
    rig.sink.clear();
    rig.send("SET_TARGET:cup");

    assert_eq!(rig.sink.contractual(), ["PASS_COUNTER_RESET:0"]);
    assert_eq!(rig.app.state(), StateId::Sorting);
    assert!(rig.app.pass().active);
    assert_eq!(rig.app.pass().target_label, "cup");
    assert_eq!(rig.hw.display(), Some(("Target: cup", "Count: 0")));
}

#[test]
fn set_target_without_label_is_ignored() {
    let mut rig = Rig::booted();
    rig.sink.clear();
    rig.send("SET_TARGET:   ");

    assert!(rig.sink.contractual().is_empty());
    assert_eq!(rig.sink.lines, ["Target label missing"]);
    assert_eq!(rig.app.state(), StateId::Idle);
}

#[test]
fn duplicate_within_cooldown_then_other_pile_then_pause() {
    let mut rig = fresh_pass("cup");

    rig.send("SORT_TARGET:cup");
    rig.send("SORT_TARGET:cup");
    rig.send("SORT_OTHER:bottle");
    rig.send("PAUSE_SORT");

    assert_eq!(
        rig.sink.contractual(),
        [
            "SORTED_TARGET:1",
            "SORTED_OTHER:1",
            "PASS_COMPLETE:1:1",
            "PASS_COMPLETE:1:1",
            "PASS_COMPLETE:1:1",
        ]
    );
    assert_eq!(rig.sink.count("Cooldown active, skipping duplicate"), 1);
    assert_eq!(rig.hw.deflections(rig.neutral()), 2);
}

#[test]
fn same_label_after_cooldown_sorts_again() {
    let mut rig = fresh_pass("cup");

    rig.send("SORT_TARGET:cup");
    rig.hw.advance(1600);
    rig.send("SORT_TARGET:cup");
    rig.send("PAUSE_SORT");

    assert_eq!(
        rig.sink.contractual(),
        [
            "SORTED_TARGET:1",
            "SORTED_TARGET:2",
            "PASS_COMPLETE:2:0",
            "PASS_COMPLETE:2:0",
            "PASS_COMPLETE:2:0",
        ]
    );
}

#[test]
fn sort_without_active_pass_is_silent() {
    let mut rig = Rig::booted();
    rig.sink.clear();
    rig.hw.clear_calls();

    rig.send("SORT_TARGET:cup");
    rig.send("SORT_OTHER:can");

    assert!(rig.sink.lines.is_empty());
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn sort_motion_follows_deflect_return_template() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.send("SORT_OTHER:can");

    let motion: Vec<HwCall> = rig
        .hw
        .calls
        .iter()
        .filter(|c| matches!(c, HwCall::Angle(_) | HwCall::Delay(_)))
        .cloned()
        .collect();
    assert_eq!(
        motion,
        [
            HwCall::Angle(135),
            HwCall::Delay(800),
            HwCall::Angle(93),
            HwCall::Delay(300),
            HwCall::Angle(53),
            HwCall::Delay(800),
            HwCall::Angle(93),
            HwCall::Delay(300),
        ]
    );
    assert_eq!(rig.hw.display(), Some(("Sorting: O1", "Total: 2")));
}

#[test]
fn sorted_line_follows_motion() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");

    let sorted = rig.sink.lines.iter().position(|l| l == "SORTED_TARGET:1");
    let routing = rig.sink.lines.iter().position(|l| l == "-> TARGET pile");
    assert!(routing < sorted);
    assert_eq!(rig.sink.lines.first().map(String::as_str), Some("TARGET: cup"));
}

#[test]
fn pause_handshake_timing_and_outputs() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.hw.clear_calls();
    rig.sink.clear();

    rig.send("PAUSE_SORT");

    let delays: Vec<u32> = rig
        .hw
        .calls
        .iter()
        .filter_map(|c| match c {
            HwCall::Delay(ms) => Some(*ms),
            _ => None,
        })
        .collect();
    assert_eq!(delays, [1000, 100, 100, 100, 300]);
    assert_eq!(rig.hw.calls.first(), Some(&HwCall::Lamps(LampState::RED)));
    assert_eq!(rig.hw.last_angle(), Some(93));
    assert_eq!(rig.hw.display(), Some(("Pass Complete", "Total: 1")));

    assert_eq!(rig.sink.count("PASS_COMPLETE:1:0"), 3);
    assert_eq!(rig.sink.lines.last().map(String::as_str), Some("PASS_COMPLETE sent 3 times"));
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.app.pass().active);
    assert!(rig.app.pass().target_label.is_empty());
}

#[test]
fn sorts_after_pause_are_ignored() {
    let mut rig = fresh_pass("cup");
    rig.send("PAUSE_SORT");
    rig.sink.clear();

    rig.send("SORT_TARGET:cup");
    assert!(rig.sink.lines.is_empty());
}

#[test]
fn new_pass_zeroes_pass_counts_but_not_session() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.send("PAUSE_SORT");
    rig.send("SET_TARGET:can");
    rig.send("SORT_OTHER:cup");

    assert_eq!(rig.app.pass().target_count, 0);
    assert_eq!(rig.app.pass().other_count, 1);
    assert_eq!(rig.app.session_total(), 2);
}

#[test]
fn debounce_forgets_label_between_passes() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.send("PAUSE_SORT");
    rig.send("SET_TARGET:cup");
    rig.sink.clear();

    rig.send("SORT_TARGET:cup");
    assert_eq!(rig.sink.contractual(), ["SORTED_TARGET:1"]);
}

#[test]
fn long_labels_sharing_a_prefix_are_different_items() {
    let mut rig = fresh_pass("cup");
    let stem = "x".repeat(55);
    rig.send(&format!("SORT_TARGET:{stem}A"));
    rig.send(&format!("SORT_TARGET:{stem}B"));

    assert_eq!(rig.app.pass().target_count, 2);
    assert_eq!(rig.sink.contractual(), ["SORTED_TARGET:1", "SORTED_TARGET:2"]);
}

#[test]
fn two_passes_then_finish_clears_everything() {
    let mut rig = Rig::booted();
    rig.send("SET_TARGET:cup");
    rig.send("SORT_TARGET:cup");
    rig.send("PAUSE_SORT");
    rig.send("SET_TARGET:can");
    rig.send("SORT_OTHER:bottle");
    rig.send("PAUSE_SORT");
    assert_eq!(rig.app.session_total(), 2);

    rig.sink.clear();
    rig.send("FINISH_SORT");

    assert_eq!(rig.sink.lines, ["Session finished - total movements: 2"]);
    assert_eq!(rig.app.session_total(), 0);
    assert_eq!(rig.app.pass().total(), 0);
    assert!(rig.app.pass().target_label.is_empty());
    assert_eq!(rig.app.state(), StateId::Idle);
    assert_eq!(rig.hw.lamps(), LampState::OFF);
    assert_eq!(rig.hw.last_angle(), Some(93));
    assert_eq!(rig.hw.display(), Some(("System Ready", "Waiting...")));
    assert!(rig.hw.calls.contains(&HwCall::Display("Session Done".into(), "2 total".into())));
    assert!(rig.hw.calls.contains(&HwCall::Delay(2000)));
}

#[test]
fn finish_mid_pass_ends_the_pass() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.send("FINISH_SORT");
    rig.sink.clear();

    rig.send("SORT_TARGET:can");
    assert!(rig.sink.lines.is_empty());
    assert_eq!(rig.sink.count("PASS_COMPLETE:1:0"), 0);
}

#[test]
fn stop_goes_to_standby_and_keeps_counts() {
    let mut rig = fresh_pass("cup");
    rig.send("SORT_TARGET:cup");
    rig.sink.clear();

    rig.send("stop");

    assert_eq!(rig.sink.lines, ["Stopped"]);
    assert_eq!(rig.app.state(), StateId::Idle);
    assert!(!rig.app.pass().active);
    assert_eq!(rig.app.pass().target_count, 1);
    assert_eq!(rig.app.session_total(), 1);
    assert_eq!(rig.hw.lamps(), LampState::OFF);
    assert_eq!(rig.hw.last_angle(), Some(93));
    assert_eq!(rig.hw.display(), Some(("System Stopped", "Standby mode")));

    rig.sink.clear();
    rig.send("SORT_TARGET:cup");
    assert!(rig.sink.lines.is_empty());
}

// ── Lamps, unknown lines ──────────────────────────────────────

#[test]
fn lamp_commands_drive_lamps() {
    let mut rig = Rig::booted();
    rig.sink.clear();

    rig.send("GREEN_LED_ON");
    assert_eq!(rig.hw.lamps(), LampState::GREEN);
    rig.send("RED_LED_ON");
    assert_eq!(rig.hw.lamps(), LampState::RED);
    rig.send("RED_LED_OFF");
    assert_eq!(rig.hw.lamps(), LampState::OFF);

    assert_eq!(
        rig.sink.lines,
        ["Green LED ON - Ready to feed", "Red LED ON - Stop feeding", "Red LED OFF"]
    );
}

#[test]
fn unknown_and_blank_lines() {
    let mut rig = Rig::booted();
    rig.sink.clear();

    rig.send("   ");
    rig.send("SPIN_AROUND\r");

    assert_eq!(rig.sink.lines, ["Unknown: SPIN_AROUND"]);
    assert_eq!(rig.app.state(), StateId::Idle);
}

#[test]
fn commands_tolerate_surrounding_whitespace() {
    let mut rig = Rig::booted();
    rig.sink.clear();
    rig.send("  SET_TARGET:cup\r");

    assert_eq!(rig.sink.contractual(), ["PASS_COUNTER_RESET:0"]);
    assert_eq!(rig.app.pass().target_label, "cup");
}

// ── Periodic display ──────────────────────────────────────────

#[test]
fn status_refresh_is_rate_limited_and_change_driven() {
    let mut rig = fresh_pass("cup");
    rig.hw.advance(600);

    assert!(rig.app.refresh_display(&mut rig.hw));
    assert_eq!(rig.hw.display(), Some(("Tgt:cup", "T:0 O:0")));

    rig.hw.advance(100);
    assert!(!rig.app.refresh_display(&mut rig.hw), "inside the interval");

    rig.hw.advance(600);
    assert!(!rig.app.refresh_display(&mut rig.hw), "nothing changed");

    rig.send("SORT_OTHER:can");
    rig.hw.advance(600);
    assert!(rig.app.refresh_display(&mut rig.hw));
    assert_eq!(rig.hw.display(), Some(("Tgt:cup", "T:0 O:1")));
}

#[test]
fn target_with_separator_char_is_not_redrawn() {
    let mut rig = fresh_pass("a|b");
    rig.hw.advance(600);
    assert!(rig.app.refresh_display(&mut rig.hw));

    for _ in 0..5 {
        rig.hw.advance(600);
        assert!(!rig.app.refresh_display(&mut rig.hw));
    }
    assert_eq!(rig.hw.display(), Some(("Tgt:a|b", "T:0 O:0")));
}

#[test]
fn no_status_refresh_while_idle() {
    let mut rig = Rig::booted();
    rig.hw.advance(10_000);
    assert!(!rig.app.refresh_display(&mut rig.hw));
}
