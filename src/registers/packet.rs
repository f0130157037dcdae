//! Packet handling related registers
//!
//! This module contains registers for the LoRa packet engine including:
//! - FIFO pointers and base addresses
//! - Interrupt flags
//! - Payload and preamble length
//! - Modem configuration (bandwidth, coding rate, spreading factor, CRC)
//! - Per-packet signal quality
//!
//! The 256 byte FIFO is shared by transmit and receive. Both base addresses
//! are set to 0 during bring-up so either direction can use the full buffer.

use bitflags::bitflags;
use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::config::{Bandwidth, CodingRate, InvalidModemParameter, SpreadingFactor};

/// FIFO data register address. Burst access auto-increments the FIFO pointer.
pub const FIFO_ADDRESS: u8 = 0x00;

/// Size of the on-chip packet FIFO in bytes
pub const FIFO_SIZE: usize = 256;

/// Largest payload the length register can describe
pub const MAX_PAYLOAD_LENGTH: usize = 255;

/// FIFO SPI pointer register (address: 0x0D)
///
/// Position of the next FIFO access over SPI.
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoAddrPtr {
    pub address: u8,
}

/// FIFO transmit base address register (address: 0x0E)
#[register(0x0Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoTxBaseAddr {
    pub address: u8,
}

/// FIFO receive base address register (address: 0x0F)
#[register(0x0Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoRxBaseAddr {
    pub address: u8,
}

/// Start address of the last received packet (address: 0x10)
///
/// Read-only. Set by the modem when a packet has been written to the FIFO.
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoRxCurrentAddr {
    pub address: u8,
}

bitflags! {
    /// LoRa interrupt sources
    ///
    /// A set bit is cleared by writing a 1 to it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Irq: u8 {
        /// Single receive timed out
        const RX_TIMEOUT = 1 << 7;
        /// Packet reception complete
        const RX_DONE = 1 << 6;
        /// Payload CRC check failed
        const PAYLOAD_CRC_ERROR = 1 << 5;
        /// Valid header received
        const VALID_HEADER = 1 << 4;
        /// FIFO payload transmission complete
        const TX_DONE = 1 << 3;
        /// Channel activity detection finished
        const CAD_DONE = 1 << 2;
        /// Frequency hopping channel change requested
        const FHSS_CHANGE_CHANNEL = 1 << 1;
        /// Channel activity detected
        const CAD_DETECTED = 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Irq {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Irq({=u8:#04x})", self.bits())
    }
}

/// IRQ flags register (address: 0x12)
///
/// # Important Notes
/// - Flags are set regardless of the mask register, the driver polls them
/// - Writing a flag pattern back clears exactly those flags
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqFlags {
    pub flags: Irq,
}

/// Number of payload bytes of the last received packet (address: 0x13)
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RxNbBytes {
    pub count: u8,
}

/// SNR of the last packet (address: 0x19)
///
/// Two's complement, 0.25 dB per unit.
#[register(0x19u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PktSnrValue {
    pub raw: i8,
}

impl PktSnrValue {
    /// SNR in dB
    pub fn db(self) -> f32 {
        self.raw as f32 * 0.25
    }
}

/// RSSI of the last packet (address: 0x1A)
///
/// # RSSI Calculation
/// RSSI in dBm = -157 + raw on the HF port (-164 on the LF port)
#[register(0x1Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PktRssiValue {
    pub raw: u8,
}

impl PktRssiValue {
    /// Offset between the raw value and dBm on the HF port
    pub const HF_OFFSET_DBM: i16 = 157;

    /// RSSI in dBm, HF band calibration
    pub fn dbm(self) -> i16 {
        self.raw as i16 - Self::HF_OFFSET_DBM
    }
}

/// Modem configuration register 1 (address: 0x1D)
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig1 {
    /// Signal bandwidth (bits 7:4)
    pub bandwidth: Bandwidth,
    /// Coding rate (bits 3:1)
    pub coding_rate: CodingRate,
    /// Implicit header mode (bit 0)
    pub implicit_header: bool,
}

/// Modem configuration register 2 (address: 0x1E)
#[register(0x1Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig2 {
    /// Spreading factor (bits 7:4)
    pub spreading_factor: SpreadingFactor,
    /// Send the FIFO contents continuously, test mode only (bit 3)
    pub tx_continuous: bool,
    /// Generate and check a payload CRC (bit 2)
    pub crc_on: bool,
    /// RX timeout MSB (bits 1:0)
    pub symbol_timeout_msb: u8,
}

/// Preamble length register (addresses: 0x20 - 0x21)
///
/// Preamble length in symbols, the modem adds 4.25 symbols.
#[register(0x20u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PreambleLength {
    pub symbols: u16,
}

impl Default for PreambleLength {
    fn default() -> Self {
        Self { symbols: 8 }
    }
}

/// Payload length register (address: 0x22)
///
/// Number of FIFO bytes sent in explicit header mode.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PayloadLength {
    pub length: u8,
}

macro_rules! single_byte_address {
    ($($reg:ident),*) => {
        $(
            impl FromByteArray for $reg {
                type Error = Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self { address: bytes[0] })
                }
            }
        )*
    };
}

single_byte_address!(FifoAddrPtr, FifoTxBaseAddr, FifoRxBaseAddr, FifoRxCurrentAddr);

impl ToByteArray for FifoAddrPtr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl ToByteArray for FifoTxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl ToByteArray for FifoRxBaseAddr {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.address])
    }
}

impl FromByteArray for IrqFlags {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: Irq::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqFlags {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for RxNbBytes {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { count: bytes[0] })
    }
}

impl FromByteArray for PktSnrValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            raw: bytes[0] as i8,
        })
    }
}

impl FromByteArray for PktRssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

impl FromByteArray for ModemConfig1 {
    type Error = InvalidModemParameter;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            bandwidth: Bandwidth::try_from(bytes[0] >> 4)?,
            coding_rate: CodingRate::try_from((bytes[0] >> 1) & 0x07)?,
            implicit_header: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for ModemConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.bandwidth as u8) << 4)
            | ((self.coding_rate as u8) << 1)
            | self.implicit_header as u8])
    }
}

impl FromByteArray for ModemConfig2 {
    type Error = InvalidModemParameter;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            spreading_factor: SpreadingFactor::try_from(bytes[0] >> 4)?,
            tx_continuous: bytes[0] & 0x08 != 0,
            crc_on: bytes[0] & 0x04 != 0,
            symbol_timeout_msb: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.spreading_factor as u8) << 4)
            | ((self.tx_continuous as u8) << 3)
            | ((self.crc_on as u8) << 2)
            | (self.symbol_timeout_msb & 0x03)])
    }
}

impl FromByteArray for PreambleLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            symbols: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for PreambleLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.symbols.to_be_bytes())
    }
}

impl FromByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { length: bytes[0] })
    }
}

impl ToByteArray for PayloadLength {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length])
    }
}
