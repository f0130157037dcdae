//! RFM95 Bus Transaction Interface
//!
//! This module provides the register access layer underneath the radio driver.
//! Every call is one complete chip-select framed transaction; nothing is
//! cached between calls.
//!
//! The interface is built around the [`RegisterBus`] trait, a byte-addressable
//! register peer, and [`Device<SPI>`], its implementation over an
//! `embedded-hal` [`SpiDevice`](embedded_hal::spi::SpiDevice). Typed access to
//! the definitions in [`crate::registers`] is layered on top of the four raw
//! primitives.
//!
//! # Framing
//! - Read: `[addr & 0x7F, 0x00]`, the register value is the second byte
//!   clocked in
//! - Write: `[addr | 0x80, value]`
//! - FIFO bursts use the same address byte followed by the payload, the FIFO
//!   pointer auto-increments per byte
//!
//! # Example
//! ```no_run
//! use rfm95::{Device, RegisterBus, registers::Version};
//!
//! fn revision<SPI: embedded_hal::spi::SpiDevice>(spi: SPI) -> Result<u8, rfm95::BusError> {
//!     let mut device = Device::new(spi);
//!     let version: Version = device.read()?;
//!     Ok(version.revision)
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::{Mode, Operation, SpiDevice, MODE_0};
use regiface::{
    errors::Error as RegifaceError, ByteArray, FromByteArray, ReadableRegister, ToByteArray,
    WritableRegister,
};

use crate::registers::FIFO_ADDRESS;

/// SPI mode expected by the radio: CPOL = 0, CPHA = 0, MSB first.
pub const SPI_MODE: Mode = MODE_0;

/// SPI clock used for the radio. The SX1276 accepts up to 10 MHz.
pub const SPI_FREQUENCY_HZ: u32 = 1_000_000;

const WRITE_BIT: u8 = 0x80;

/// A byte-addressable register peer.
///
/// Implementations must complete exactly the requested byte count per call
/// and must not interleave calls. No retries happen at this layer.
pub trait RegisterBus {
    /// Reads one 8-bit register.
    fn read_register(&mut self, address: u8) -> Result<u8, RegifaceError>;

    /// Writes one 8-bit register.
    fn write_register(&mut self, address: u8, value: u8) -> Result<(), RegifaceError>;

    /// Reads `bytes.len()` bytes from the FIFO in one transaction.
    fn read_block(&mut self, bytes: &mut [u8]) -> Result<(), RegifaceError>;

    /// Writes `bytes` to the FIFO in one transaction.
    fn write_block(&mut self, bytes: &[u8]) -> Result<(), RegifaceError>;

    /// Reads a typed register.
    ///
    /// Multi-byte registers are read one address at a time starting at
    /// `R::id()`, most significant byte first.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    fn read<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u8>,
    {
        let mut raw_value = R::Array::new();

        for (offset, byte) in raw_value.as_mut().iter_mut().enumerate() {
            *byte = self.read_register(R::id().wrapping_add(offset as u8))?;
        }

        R::from_bytes(raw_value).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Writes a typed register, one address at a time, most significant byte first.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - SPI communication failed
    fn write<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = match register.to_bytes() {
            Ok(raw_value) => raw_value,
            Err(never) => match never {},
        };

        for (offset, byte) in raw_value.as_ref().iter().enumerate() {
            self.write_register(R::id().wrapping_add(offset as u8), *byte)?;
        }

        Ok(())
    }
}

/// SPI transport for the RFM95.
///
/// Chip-select is owned by the [`SpiDevice`]: each transaction asserts it
/// once and releases it at the end, so no two accesses can interleave.
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    ///
    /// The interface must already be configured for [`SPI_MODE`].
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> RegisterBus for Device<SPI>
where
    SPI: SpiDevice,
{
    fn read_register(&mut self, address: u8) -> Result<u8, RegifaceError> {
        let mut response = [0u8; 2];

        self.spi
            .transaction(&mut [Operation::Transfer(
                &mut response,
                &[address & !WRITE_BIT, 0x00],
            )])
            .map_err(|_| RegifaceError::BusError)?;

        Ok(response[1])
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), RegifaceError> {
        self.spi
            .transaction(&mut [Operation::Write(&[address | WRITE_BIT, value])])
            .map_err(|_| RegifaceError::BusError)
    }

    fn read_block(&mut self, bytes: &mut [u8]) -> Result<(), RegifaceError> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[FIFO_ADDRESS & !WRITE_BIT]),
                Operation::Read(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }

    fn write_block(&mut self, bytes: &[u8]) -> Result<(), RegifaceError> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[FIFO_ADDRESS | WRITE_BIT]),
                Operation::Write(bytes),
            ])
            .map_err(|_| RegifaceError::BusError)
    }
}
