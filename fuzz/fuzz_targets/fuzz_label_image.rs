//! Fuzz target: label store loader over an arbitrary EEPROM image
//!
//! Verifies that `labels::load`:
//! - never panics on corrupt bytes
//! - never returns more than `MAX_LABELS` entries or an over-long label
//! - never writes to the store
//!
//! cargo fuzz run fuzz_label_image

#![no_main]

use binsorter::app::ports::{ByteStorePort, StorageError};
use binsorter::labels::{self, LABEL_CAPACITY, MAX_LABELS, STORE_SIZE};
use libfuzzer_sys::fuzz_target;

// ── Read-only byte store for fuzz testing ─────────────────────

struct Image(Vec<u8>);

impl ByteStorePort for Image {
    fn capacity(&self) -> usize {
        self.0.len()
    }

    fn read_byte(&self, addr: usize) -> Result<u8, StorageError> {
        self.0.get(addr).copied().ok_or(StorageError::OutOfBounds { addr })
    }

    fn write_byte(&mut self, _addr: usize, _value: u8) -> Result<(), StorageError> {
        panic!("loader must not write");
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        panic!("loader must not commit");
    }
}

fuzz_target!(|data: &[u8]| {
    let mut bytes = data.to_vec();
    bytes.resize(STORE_SIZE, 0);
    let image = Image(bytes);

    if let Ok(list) = labels::load(&image) {
        assert!(list.len() <= MAX_LABELS);
        assert!(list.iter().all(|l| l.len() <= LABEL_CAPACITY));
    }
});
