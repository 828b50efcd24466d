//! Byte-wise stream sink.
//!
//! Streamed samples leave the device one byte at a time through a
//! full-duplex serial exchange. Only the transmitted direction carries
//! meaning; the received byte is returned and otherwise ignored.

/// Destination of streamed sample bytes.
pub trait StreamSink {
    /// Error type of a failed exchange.
    type Error;

    /// Send one byte, blocking until the hardware is ready, and return the
    /// byte clocked in during the exchange.
    fn send_receive(&mut self, byte: u8) -> Result<u8, Self::Error>;

    /// Send every byte of `bytes` in order.
    fn send_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for &byte in bytes {
            self.send_receive(byte)?;
        }
        Ok(())
    }
}

impl<T: StreamSink + ?Sized> StreamSink for &mut T {
    type Error = T::Error;

    fn send_receive(&mut self, byte: u8) -> Result<u8, Self::Error> {
        T::send_receive(self, byte)
    }
}

#[cfg(feature = "spi")]
pub use spi::SpiStreamSink;

#[cfg(feature = "spi")]
mod spi {
    use embedded_hal::spi::SpiBus;

    use super::StreamSink;

    /// [`StreamSink`] over any [`embedded_hal::spi::SpiBus`].
    ///
    /// Each byte is one in-place transfer followed by a flush, so the call
    /// returns only after the byte has been clocked out (TXE then RXNE on
    /// STM32 SPI).
    pub struct SpiStreamSink<SPI> {
        spi: SPI,
    }

    impl<SPI: SpiBus<u8>> SpiStreamSink<SPI> {
        pub fn new(spi: SPI) -> Self {
            SpiStreamSink { spi }
        }

        /// Release the underlying bus.
        pub fn release(self) -> SPI {
            self.spi
        }
    }

    impl<SPI: SpiBus<u8>> StreamSink for SpiStreamSink<SPI> {
        type Error = SPI::Error;

        fn send_receive(&mut self, byte: u8) -> Result<u8, Self::Error> {
            let mut word = [byte];
            self.spi.transfer_in_place(&mut word)?;
            self.spi.flush()?;
            Ok(word[0])
        }
    }

}
