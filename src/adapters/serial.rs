//! Host serial link — line framing over a [`Transport`], plus the
//! [`EventSink`] that renders [`AppEvent`]s back onto it.
//!
//! Reading is non-blocking: [`SerialLink::poll_line`] returns at most one
//! line per call and `None` when nothing complete has arrived.  Writing is
//! blocking: every emitted line is written in full and flushed before
//! `emit` returns, so the host never sees a count ahead of the state it
//! describes.

use log::{debug, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::error::LinkError;
use crate::protocol::codec::LineDecoder;
use crate::protocol::transport::Transport;

/// Bytes pulled from the transport per poll.
const RX_CHUNK: usize = 64;

/// Give up on a write after this many zero-length transfers.
const MAX_STALLED_WRITES: u32 = 8;

pub struct SerialLink<T> {
    transport: T,
    decoder: LineDecoder,
}

impl<T: Transport> SerialLink<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            decoder: LineDecoder::new(),
        }
    }

    /// Next complete line from the host, without its terminator.
    ///
    /// Buffered lines are drained before the transport is read again.
    pub fn poll_line(&mut self) -> Option<Result<String, LinkError>> {
        if self.decoder.has_pending() {
            if let Some(line) = self.decoder.next_line() {
                return Some(line);
            }
        }

        if !self.transport.available() {
            return None;
        }

        let mut buf = [0u8; RX_CHUNK];
        match self.transport.read(&mut buf) {
            Ok(0) => None,
            Ok(n) => {
                self.decoder.feed(&buf[..n]);
                self.decoder.next_line()
            }
            Err(e) => {
                warn!("serial: read failed: {:?}", e);
                self.decoder.reset();
                Some(Err(LinkError::ReadFailed))
            }
        }
    }

    /// Write one line and flush.
    pub fn send_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\n")?;
        self.transport.flush().map_err(|_| LinkError::WriteFailed)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn write_all(&mut self, mut data: &[u8]) -> Result<(), LinkError> {
        let mut stalled = 0;
        while !data.is_empty() {
            match self.transport.write(data) {
                Ok(0) => {
                    stalled += 1;
                    if stalled >= MAX_STALLED_WRITES {
                        return Err(LinkError::WriteFailed);
                    }
                }
                Ok(n) => data = &data[n.min(data.len())..],
                Err(_) => return Err(LinkError::WriteFailed),
            }
        }
        Ok(())
    }
}

impl<T: Transport> EventSink for SerialLink<T> {
    fn emit(&mut self, event: &AppEvent) {
        let line = event.to_string();
        debug!("-> {}", line);
        if let Err(e) = self.send_line(&line) {
            warn!("serial: dropped '{}': {}", line, e);
        }
    }
}

// ── ESP32 UART transport ──────────────────────────────────────

/// UART1 to the host computer.
#[cfg(target_os = "espidf")]
pub struct UartTransport {
    uart: esp_idf_hal::uart::UartDriver<'static>,
}

#[cfg(target_os = "espidf")]
impl UartTransport {
    pub fn new(uart: esp_idf_hal::uart::UartDriver<'static>) -> Self {
        Self { uart }
    }
}

#[cfg(target_os = "espidf")]
impl Transport for UartTransport {
    type Error = esp_idf_svc::sys::EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.uart.read(buf, esp_idf_hal::delay::NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.wait_tx_done(esp_idf_hal::delay::BLOCK)
    }

    fn available(&self) -> bool {
        self.uart.remaining_read().is_ok_and(|n| n > 0)
    }
}
