//! Newline frame codec.
//!
//! Wire format: ASCII text, one command per line, terminated by `\n`.
//!
//! The decoder accumulates incoming bytes and yields complete lines.  This
//! handles partial reads gracefully: a single `Transport::read` may return
//! half a line, or several lines concatenated.  Only one line is yielded
//! per call to [`LineDecoder::next_line`]; the remainder stays buffered for
//! the next main-loop iteration.

use std::collections::VecDeque;

use crate::error::LinkError;

use super::MAX_LINE_LEN;

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Collecting bytes of the current line.
    Collecting,
    /// The current line overflowed; drop bytes up to the next `\n`.
    Discarding,
}

/// Streaming line decoder.
pub struct LineDecoder {
    state: DecoderState,
    line: heapless::Vec<u8, MAX_LINE_LEN>,
    /// Received bytes not yet examined.
    pending: VecDeque<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            line: heapless::Vec::new(),
            pending: VecDeque::new(),
        }
    }

    /// Queue bytes read from the transport.
    pub fn feed(&mut self, data: &[u8]) {
        self.pending.extend(data.iter().copied());
    }

    /// `true` if queued bytes have not been examined yet.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Yield the next complete line, without its `\n`.
    ///
    /// Returns `None` once the queued bytes hold no further complete line.
    /// An overlong line yields `LineTooLong` once, as soon as it overflows;
    /// the rest of it is dropped silently.
    pub fn next_line(&mut self) -> Option<Result<String, LinkError>> {
        while let Some(byte) = self.pending.pop_front() {
            match (self.state, byte) {
                (DecoderState::Discarding, b'\n') => {
                    self.state = DecoderState::Collecting;
                }
                (DecoderState::Discarding, _) => {}
                (DecoderState::Collecting, b'\n') => {
                    let bytes = core::mem::take(&mut self.line);
                    return Some(
                        String::from_utf8(bytes.to_vec()).map_err(|_| LinkError::InvalidUtf8),
                    );
                }
                (DecoderState::Collecting, _) => {
                    if self.line.push(byte).is_err() {
                        self.line.clear();
                        self.state = DecoderState::Discarding;
                        return Some(Err(LinkError::LineTooLong));
                    }
                }
            }
        }
        None
    }

    /// Drop all buffered input (e.g. after a transport error).
    pub fn reset(&mut self) {
        self.state = DecoderState::Collecting;
        self.line.clear();
        self.pending.clear();
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}
