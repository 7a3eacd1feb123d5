//! Fuzz target: `AppCommand::parse`
//!
//! Any UTF-8 line must parse to some command without panicking, and
//! payloads must be sub-slices of the trimmed input.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use binsorter::app::commands::AppCommand;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = core::str::from_utf8(data) else {
        return;
    };

    match AppCommand::parse(line) {
        AppCommand::StoreObjects(p)
        | AppCommand::SetTarget(p)
        | AppCommand::SortTarget(p)
        | AppCommand::SortOther(p) => {
            assert!(line.trim().ends_with(p), "payload is not the line tail");
        }
        AppCommand::Unknown(rest) => assert_eq!(rest, line.trim()),
        _ => {}
    }
});
