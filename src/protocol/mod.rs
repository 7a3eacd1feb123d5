//! Line-oriented host protocol.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Host link stack                        │
//! │                                                            │
//! │  ┌───────────┐   ┌─────────────┐   ┌─────────────────────┐ │
//! │  │ Transport │──▶│ LineDecoder │──▶│ AppCommand::parse   │ │
//! │  │ (trait)   │   │ (\n framing)│   │  → SorterService    │ │
//! │  └───────────┘   └─────────────┘   └─────────────────────┘ │
//! │        ▲                                     │             │
//! │        │         ┌───────────────────────────┘             │
//! │        │         ▼                                         │
//! │  ┌───────────┐   ┌─────────────┐                           │
//! │  │ Transport │◀──│  response   │  (AppEvent → text line)   │
//! │  │ (write)   │   │ (Display)   │                           │
//! │  └───────────┘   └─────────────┘                           │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod response;
pub mod transport;

/// Longest accepted command line, excluding the newline.
///
/// `STORE_OBJECTS:` plus 30 labels of 49 bytes and their commas fits.
pub const MAX_LINE_LEN: usize = 1600;

/// Times `PASS_COMPLETE:<t>:<o>` is sent per pause.
pub const PASS_COMPLETE_REPEATS: usize = 3;

/// Spacing between the `PASS_COMPLETE` repeats.
pub const PASS_COMPLETE_RESEND_MS: u32 = 100;
