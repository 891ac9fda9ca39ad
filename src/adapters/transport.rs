//! Transport abstraction — the byte channel under the radio adapter.
//!
//! Concrete implementations:
//! - UART link to the radio co-processor (ESP-IDF)
//! - [`NullTransport`] when no radio is fitted
//!
//! The radio adapter is generic over `Transport`, so swapping the link
//! requires zero changes to message encoding.

/// Write-only byte transport.  Frames are already delimited by the caller.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// A null transport that discards all writes.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// UART link to the radio co-processor.
#[cfg(target_os = "espidf")]
pub struct UartTransport<'d> {
    uart: esp_idf_hal::uart::UartDriver<'d>,
}

#[cfg(target_os = "espidf")]
impl<'d> UartTransport<'d> {
    pub fn new(uart: esp_idf_hal::uart::UartDriver<'d>) -> Self {
        Self { uart }
    }
}

#[cfg(target_os = "espidf")]
impl Transport for UartTransport<'_> {
    type Error = esp_idf_svc::sys::EspError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.uart.wait_tx_done(esp_idf_hal::delay::BLOCK)
    }
}
