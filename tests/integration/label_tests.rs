//! Label store layout against a byte-exact EEPROM image.

use super::mock_hw::MockEeprom;

use binsorter::error::LabelError;
use binsorter::labels::{self, LABEL_CAPACITY, MAX_LABEL_LEN, MAX_LABELS, STORE_SIZE};

#[test]
fn records_use_fixed_fifty_byte_stride() {
    let mut mem = MockEeprom::new();
    let list = labels::parse_csv("cup, bottle ,can");
    labels::store(&mut mem, &list).unwrap();

    assert_eq!(mem.bytes[0], 3);
    assert_eq!(mem.bytes[1], 3);
    assert_eq!(&mem.bytes[2..5], b"cup");
    assert!(mem.bytes[5..51].iter().all(|b| *b == 0), "record padded with zeros");
    assert_eq!(mem.bytes[51], 6);
    assert_eq!(&mem.bytes[52..58], b"bottle");
    assert_eq!(mem.bytes[101], 3);
    assert_eq!(&mem.bytes[102..105], b"can");
    assert_eq!(mem.commits, 1);
}

#[test]
fn full_store_fits_exactly() {
    assert_eq!(STORE_SIZE, 1 + 30 * 50);

    let mut mem = MockEeprom::new();
    let csv: Vec<String> = (0..MAX_LABELS).map(|i| format!("{:0>49}", i)).collect();
    let list = labels::parse_csv(&csv.join(","));
    assert_eq!(list.len(), MAX_LABELS);

    labels::store(&mut mem, &list).unwrap();
    let loaded = labels::load(&mem).unwrap();
    assert_eq!(loaded, list);
    assert_eq!(mem.bytes[STORE_SIZE - MAX_LABEL_LEN], LABEL_CAPACITY as u8);
}

#[test]
fn extra_labels_are_dropped() {
    let csv: Vec<String> = (0..MAX_LABELS + 5).map(|i| format!("l{}", i)).collect();
    let list = labels::parse_csv(&csv.join(","));
    assert_eq!(list.len(), MAX_LABELS);
    assert_eq!(list.last().map(|l| l.as_str()), Some("l29"));
}

#[test]
fn overlong_label_is_truncated_to_record() {
    let long = "x".repeat(80);
    let list = labels::parse_csv(&long);
    assert_eq!(list[0].len(), LABEL_CAPACITY);
}

#[test]
fn count_out_of_range_is_invalid_data() {
    let mut mem = MockEeprom::new();
    mem.bytes[0] = (MAX_LABELS + 1) as u8;

    let err = labels::load(&mem).unwrap_err();
    assert_eq!(err, LabelError::CountOutOfRange(31));
    assert!(err.is_invalid_data());
}

#[test]
fn length_out_of_range_is_invalid_data() {
    let mut mem = MockEeprom::new();
    mem.bytes[0] = 2;
    mem.bytes[1] = 3;
    mem.bytes[2..5].copy_from_slice(b"cup");
    mem.bytes[51] = MAX_LABEL_LEN as u8;

    let err = labels::load(&mem).unwrap_err();
    assert_eq!(err, LabelError::LengthOutOfRange { index: 1, len: 50 });
}

#[test]
fn clear_zeroes_count_only() {
    let mut mem = MockEeprom::new();
    labels::store(&mut mem, &labels::parse_csv("cup")).unwrap();
    labels::clear(&mut mem).unwrap();

    assert_eq!(mem.bytes[0], 0);
    assert_eq!(&mem.bytes[2..5], b"cup");
    assert!(labels::load(&mem).unwrap().is_empty());
    assert_eq!(mem.commits, 2);
}

#[test]
fn store_replaces_longer_list() {
    let mut mem = MockEeprom::new();
    labels::store(&mut mem, &labels::parse_csv("a,b,c,d")).unwrap();
    labels::store(&mut mem, &labels::parse_csv("e")).unwrap();

    let loaded = labels::load(&mem).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], "e");
}
