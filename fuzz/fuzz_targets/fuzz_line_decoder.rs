//! Fuzz target: `LineDecoder::feed` / `next_line`
//!
//! Drives arbitrary byte sequences into the line decoder and asserts that
//! it never panics, never yields a line longer than `MAX_LINE_LEN` or one
//! containing a newline, and accepts bytes cleanly again after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use binsorter::protocol::codec::LineDecoder;
use binsorter::protocol::MAX_LINE_LEN;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();

    // Split the input at an arbitrary point to exercise reassembly.
    let split = data.first().map_or(0, |b| *b as usize % (data.len() + 1));
    for chunk in [&data[..split], &data[split..]] {
        decoder.feed(chunk);
        while let Some(line) = decoder.next_line() {
            if let Ok(line) = line {
                assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
                assert!(!line.contains('\n'), "terminator leaked into line");
            }
        }
    }

    decoder.reset();
    decoder.feed(data);
    while decoder.next_line().is_some() {}
});
