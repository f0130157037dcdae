//! System-related registers
//!
//! This module contains registers for device identification and the
//! operating mode state machine:
//! - Silicon revision
//! - Operating mode and modem selection
//!
//! Most configuration registers are only writable in sleep or standby, so the
//! operating mode register is touched by nearly every driver operation.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Silicon revision reported by the SX1276 family (RFM95/96/98).
pub const EXPECTED_VERSION: u8 = 0x12;

/// Version register (address: 0x42)
///
/// Holds the silicon revision. Bits 7:4 are the full revision number and
/// bits 3:0 the metal mask revision. This is the only register the driver
/// uses to decide whether a working radio is attached.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Version {
    /// Raw revision byte, 0x12 on all SX1276/77/78/79 parts
    pub revision: u8,
}

/// Operating mode of the transceiver
///
/// Selected by bits 2:0 of `RegOpMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest power. The only mode in which the modem type may be changed.
    Sleep = 0,
    /// Crystal running, ready for FIFO access
    Standby = 1,
    /// Frequency synthesizer locked to the TX frequency
    FrequencySynthesisTx = 2,
    /// Transmit the FIFO contents, returning to standby when done
    Transmit = 3,
    /// Frequency synthesizer locked to the RX frequency
    FrequencySynthesisRx = 4,
    /// Receive until told otherwise
    ReceiveContinuous = 5,
    /// Receive a single packet, then return to standby
    ReceiveSingle = 6,
    /// Channel activity detection
    ChannelActivityDetection = 7,
}

impl From<u8> for Mode {
    fn from(value: u8) -> Self {
        match value & 0x07 {
            0 => Self::Sleep,
            1 => Self::Standby,
            2 => Self::FrequencySynthesisTx,
            3 => Self::Transmit,
            4 => Self::FrequencySynthesisRx,
            5 => Self::ReceiveContinuous,
            6 => Self::ReceiveSingle,
            _ => Self::ChannelActivityDetection,
        }
    }
}

/// Operating mode register (address: 0x01)
///
/// Selects the modem and its operating mode.
///
/// # Important Notes
/// - `long_range_mode` selects LoRa. It can only be changed in sleep.
/// - The low frequency bit selects the LF register bank (band 2/3). It is
///   kept clear for the HF band this driver targets.
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OpMode {
    /// LoRa modem selected (bit 7)
    pub long_range_mode: bool,
    /// Low frequency register bank (bit 3)
    pub low_frequency_mode: bool,
    /// Operating mode (bits 2:0)
    pub mode: Mode,
}

impl OpMode {
    /// LoRa modem in the given mode, HF register bank.
    pub fn lora(mode: Mode) -> Self {
        Self {
            long_range_mode: true,
            low_frequency_mode: false,
            mode,
        }
    }
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { revision: bytes[0] })
    }
}

impl FromByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            long_range_mode: bytes[0] & 0x80 != 0,
            low_frequency_mode: bytes[0] & 0x08 != 0,
            mode: Mode::from(bytes[0]),
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut value = self.mode as u8;
        if self.long_range_mode {
            value |= 0x80;
        }
        if self.low_frequency_mode {
            value |= 0x08;
        }
        Ok([value])
    }
}
