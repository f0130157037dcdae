#![no_std]
//! RFM95 LoRa Radio Driver
//!
//! This crate provides a polling driver for the HopeRF RFM95 module and the
//! Semtech SX1276 LoRa transceiver it is built around. It turns a byte buffer
//! into an over-the-air packet and a received packet back into bytes plus
//! link quality figures.
//!
//! # Features
//! - Frequency range: 862-1020 MHz (HF port), ~61 Hz resolution
//! - LoRa modulation: SF6-12, BW 7.8-500 kHz, CR 4/5-4/8
//! - Output power: 2 to 17 dBm on PA_BOOST
//! - Single best-effort datagrams up to 255 bytes
//! - No interrupts required, completion is detected by polling IRQ flags
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Bus transaction layer
//!   - [`RegisterBus`]: byte-addressable register peer, mockable in tests
//!   - [`Device`]: SPI implementation with the SX1276 read/write framing
//!
//! - [`registers`]: Typed register definitions for the LoRa register bank
//!
//! - [`radio`]: The [`Radio`] driver handle
//!   - [`radio::operational`]: Operating modes, frequency, power, modem settings
//!   - [`radio::packet`]: Transmit and receive pipelines
//!   - [`radio::status`]: Silicon revision, packet RSSI and SNR
//!
//! - [`config`]: Bring-up configuration
//!
//! # Usage
//! The device registers are the only state. The driver never caches a mode or
//! a setting and never does anything in the background: every call is a short,
//! deterministic sequence of register transactions on the caller's thread.
//!
//! Bring-up follows a fixed sequence:
//!
//! 1. Configure SPI for [`SPI_MODE`] at [`SPI_FREQUENCY_HZ`]
//! 2. Create a [`Radio`] from a [`Device`], the reset pin and a delay
//! 3. Call [`Radio::initialize`] with a [`Config`]
//! 4. Call [`Radio::send`] or poll [`Radio::receive`]
//!
//! # Important Notes
//! - A failed [`Radio::initialize`] means no SX1276 answered; stop using the handle
//! - [`Radio::send`] blocks for the whole time on air
//! - A CRC failure is reported as [`Reception::CrcError`], distinct from
//!   [`Reception::Empty`]; use [`Reception::len`] to treat both as "nothing"
//! - Configuration writes are never read back to confirm them
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
//! use rfm95::{Config, Device, Error, Radio, Reception};
//!
//! fn echo<SPI, RESET, DELAY>(spi: SPI, reset: RESET, delay: DELAY) -> Result<(), Error>
//! where
//!     SPI: SpiDevice,
//!     RESET: OutputPin,
//!     DELAY: DelayNs,
//! {
//!     let mut radio = Radio::new(Device::new(spi), reset, delay);
//!     radio.initialize(&Config::default())?;
//!     radio.set_power(17)?;
//!
//!     let mut buffer = [0u8; 255];
//!     loop {
//!         if let Reception::Packet(len) = radio.receive(&mut buffer)? {
//!             radio.send(&buffer[..len], Some(1_000))?;
//!         }
//!     }
//! }
//! ```

pub use regiface::errors::Error as BusError;

pub mod config;
pub mod device;
pub mod error;
pub mod radio;
pub mod registers;

pub use config::*;
pub use device::{Device, RegisterBus, SPI_FREQUENCY_HZ, SPI_MODE};
pub use error::Error;
pub use radio::{PacketStatus, Radio, Reception};
