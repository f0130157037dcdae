//! RF-related registers
//!
//! This module contains registers related to RF configuration including:
//! - Carrier frequency
//! - Power amplifier selection and output power
//! - Low noise amplifier gain

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Crystal oscillator frequency of the RFM95 module
pub const CRYSTAL_FREQUENCY_HZ: u64 = 32_000_000;

/// Lowest output power reachable on the PA_BOOST pin in dBm
pub const MIN_POWER_DBM: u8 = 2;

/// Highest output power on PA_BOOST without the +20 dBm high power mode
pub const MAX_POWER_DBM: u8 = 17;

/// RF carrier frequency register (addresses: 0x06 - 0x08)
///
/// 24-bit channel frequency word, MSB at the lowest address.
///
/// # Frequency Calculation
/// `value = (frequency_hz << 19) / 32 MHz`, one step is about 61 Hz.
///
/// # Important Notes
/// - The new frequency only takes effect once the LSB has been written
/// - No range check is performed, frequencies above ~1.02 GHz wrap
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frf {
    /// Channel frequency word, only the low 24 bits are used
    pub value: u32,
}

impl Frf {
    /// Converts a carrier frequency in Hz to a channel frequency word.
    pub fn from_hz(frequency_hz: u32) -> Self {
        let value = ((frequency_hz as u64) << 19) / CRYSTAL_FREQUENCY_HZ;
        Self {
            value: (value as u32) & 0x00FF_FFFF,
        }
    }

    /// Carrier frequency in Hz represented by this word, rounded down.
    pub fn to_hz(self) -> u32 {
        ((self.value as u64 * CRYSTAL_FREQUENCY_HZ) >> 19) as u32
    }
}

/// PA configuration register (address: 0x09)
///
/// Selects the output pin and sets the output power.
///
/// # Output Power
/// - RFO pin: Pout = Pmax - (15 - output_power)
/// - PA_BOOST pin: Pout = 2 + output_power (2 to 17 dBm)
///
/// The RFM95 only bonds out PA_BOOST, so the driver always selects it.
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PaConfig {
    /// Output on PA_BOOST instead of RFO (bit 7)
    pub pa_boost: bool,
    /// Maximum power for the RFO pin, Pmax = 10.8 + 0.6 * max_power (bits 6:4)
    pub max_power: u8,
    /// Output power step (bits 3:0)
    pub output_power: u8,
}

impl PaConfig {
    /// PA_BOOST output at `dbm`, silently clamped to 2..=17 dBm.
    pub fn boost(dbm: u8) -> Self {
        let dbm = dbm.clamp(MIN_POWER_DBM, MAX_POWER_DBM);
        Self {
            pa_boost: true,
            max_power: 0,
            output_power: dbm - MIN_POWER_DBM,
        }
    }
}

/// LNA settings register (address: 0x0C)
///
/// # Important Notes
/// - `gain` 1 is maximum gain, 6 is minimum
/// - `boost_hf` enables 150% LNA current for the HF band, the setting the
///   driver uses for best sensitivity
#[register(0x0Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lna {
    /// LNA gain setting (bits 7:5)
    pub gain: u8,
    /// Low frequency band boost, reserved (bits 4:3)
    pub boost_lf: u8,
    /// Reserved (bit 2), written back as read
    pub reserved: bool,
    /// High frequency band boost (bits 1:0), [`Lna::BOOST_HF_ON`] for 150% current
    pub boost_hf: u8,
}

impl Lna {
    /// `boost_hf` value selecting boost on (150% LNA current)
    pub const BOOST_HF_ON: u8 = 0b11;
}

impl FromByteArray for Frf {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for Frf {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let bytes = self.value.to_be_bytes();
        Ok([bytes[1], bytes[2], bytes[3]])
    }
}

impl FromByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pa_boost: bytes[0] & 0x80 != 0,
            max_power: (bytes[0] >> 4) & 0x07,
            output_power: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let pa_select = if self.pa_boost { 0x80 } else { 0x00 };
        Ok([pa_select | ((self.max_power & 0x07) << 4) | (self.output_power & 0x0F)])
    }
}

impl FromByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            gain: bytes[0] >> 5,
            boost_lf: (bytes[0] >> 3) & 0x03,
            reserved: bytes[0] & 0x04 != 0,
            boost_hf: bytes[0] & 0x03,
        })
    }
}

impl ToByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let reserved = if self.reserved { 0x04 } else { 0x00 };
        Ok([((self.gain & 0x07) << 5)
            | ((self.boost_lf & 0x03) << 3)
            | reserved
            | (self.boost_hf & 0x03)])
    }
}
