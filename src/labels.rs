//! Persisted class-label list.
//!
//! Layout in the byte store (fixed, part of the on-device format):
//!
//! ```text
//! ┌────────┬──────────────────────────────┬─────┬──────────────────────────────┐
//! │ count  │ record 0 (50 B)              │ ... │ record count-1 (50 B)        │
//! │ 1 B    │ len (1 B) │ text │ 0-padding │     │                              │
//! └────────┴──────────────────────────────┴─────┴──────────────────────────────┘
//!  addr 0   addr 1                               addr 1 + i * 50
//! ```
//!
//! `count ≤ 30`, `len ≤ 49`.  Loading is defensive: an out-of-range count or
//! length makes the whole store read as invalid, and nothing is rewritten.
//! Labels are informational only and never influence sorting.

use crate::app::ports::{ByteStorePort, StorageError};
use crate::error::LabelError;

/// Maximum number of labels in the store.
pub const MAX_LABELS: usize = 30;
/// Record stride in bytes, including the length prefix.
pub const MAX_LABEL_LEN: usize = 50;
/// Longest label text that fits in a record.
pub const LABEL_CAPACITY: usize = MAX_LABEL_LEN - 1;

const COUNT_ADDR: usize = 0;
const RECORDS_ADDR: usize = 1;

/// Bytes needed to hold a full list.
pub const STORE_SIZE: usize = RECORDS_ADDR + MAX_LABELS * MAX_LABEL_LEN;

/// A single class label, at most [`LABEL_CAPACITY`] bytes.
pub type Label = heapless::String<LABEL_CAPACITY>;

/// An ordered list of up to [`MAX_LABELS`] labels.
pub type LabelList = heapless::Vec<Label, MAX_LABELS>;

/// Build a [`Label`] from arbitrary text, truncating on a char boundary.
pub fn label(text: &str) -> Label {
    let mut end = text.len().min(LABEL_CAPACITY);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = Label::new();
    // Cannot overflow: `end <= LABEL_CAPACITY`.
    let _ = out.push_str(&text[..end]);
    out
}

/// Split a comma-separated list into trimmed labels.
///
/// Interior empty entries are kept as empty labels.  Nothing after the last
/// comma means no final entry, so `"a,"` is one label and `""` is none.
/// Anything past [`MAX_LABELS`] is dropped.
pub fn parse_csv(csv: &str) -> LabelList {
    let mut list = LabelList::new();
    if csv.is_empty() {
        return list;
    }
    let parts = csv.strip_suffix(',').unwrap_or(csv);
    for part in parts.split(',').map(str::trim) {
        if list.push(label(part)).is_err() {
            log::warn!("labels: more than {} entries, ignoring the rest", MAX_LABELS);
            break;
        }
    }
    list
}

/// Replace the persisted list with `list` and commit.
///
/// A store smaller than [`STORE_SIZE`] is refused before any byte changes.
pub fn store(mem: &mut impl ByteStorePort, list: &[Label]) -> Result<(), LabelError> {
    if mem.capacity() < STORE_SIZE {
        return Err(LabelError::Storage(StorageError::OutOfBounds {
            addr: STORE_SIZE - 1,
        }));
    }

    let count = list.len().min(MAX_LABELS);
    mem.write_byte(COUNT_ADDR, count as u8)?;

    for (i, item) in list.iter().take(count).enumerate() {
        let base = record_addr(i);
        let bytes = item.as_bytes();
        let len = bytes.len().min(LABEL_CAPACITY);
        mem.write_byte(base, len as u8)?;
        for slot in 0..LABEL_CAPACITY {
            let value = if slot < len { bytes[slot] } else { 0 };
            mem.write_byte(base + 1 + slot, value)?;
        }
    }

    mem.commit()?;
    log::info!("labels: stored {} entries", count);
    Ok(())
}

/// Read the persisted list.
pub fn load(mem: &impl ByteStorePort) -> Result<LabelList, LabelError> {
    let count = mem.read_byte(COUNT_ADDR)?;
    if count as usize > MAX_LABELS {
        return Err(LabelError::CountOutOfRange(count));
    }

    let mut list = LabelList::new();
    for index in 0..count as usize {
        let base = record_addr(index);
        let len = mem.read_byte(base)?;
        if len as usize >= MAX_LABEL_LEN {
            return Err(LabelError::LengthOutOfRange { index, len });
        }

        let mut raw: heapless::Vec<u8, LABEL_CAPACITY> = heapless::Vec::new();
        for slot in 0..len as usize {
            let b = mem.read_byte(base + 1 + slot)?;
            // Stray NULs inside the length are padding, not text.
            if b != 0 {
                let _ = raw.push(b);
            }
        }

        let text = core::str::from_utf8(&raw).map_err(|_| LabelError::InvalidText { index })?;
        let _ = list.push(label(text));
    }
    Ok(list)
}

/// Set the persisted count to zero and commit.  Record bytes are left as-is.
pub fn clear(mem: &mut impl ByteStorePort) -> Result<(), LabelError> {
    mem.write_byte(COUNT_ADDR, 0)?;
    mem.commit()?;
    log::info!("labels: cleared");
    Ok(())
}

fn record_addr(index: usize) -> usize {
    RECORDS_ADDR + index * MAX_LABEL_LEN
}
