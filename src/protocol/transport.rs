//! Byte channel under the host line protocol.
//!
//! The ESP32 build uses UART1 (`adapters::serial::UartTransport`); host
//! tests script their own.  [`SerialLink`](crate::adapters::serial::SerialLink)
//! is generic over this trait and never names a driver type.

/// Non-blocking byte pipe to the host computer.
pub trait Transport {
    type Error: core::fmt::Debug;

    /// Copy whatever bytes have arrived into `buf`.  `Ok(0)` means nothing
    /// is waiting; it is not end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Queue as much of `data` as the driver accepts and return that count.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Block until queued bytes are on the wire.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// `true` if a `read` would return data.
    fn available(&self) -> bool;
}

/// Host link with nothing attached: reads are empty, writes vanish.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = core::convert::Infallible;

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }
}
