//! Radio configuration
//!
//! [`Config`] collects the values programmed during bring-up. Its [`Default`]
//! matches the stock setup of an RFM95 on the 915 MHz band: BW 125 kHz,
//! CR 4/5, SF7, CRC on and an 8 symbol preamble.
//!
//! The modem parameter enums carry their raw register encodings and are
//! shared with the typed register definitions in [`crate::registers`].

/// Error type for modem parameter conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidModemParameter(pub u8);

/// LoRa signal bandwidth
///
/// Stored in bits 7:4 of `RegModemConfig1`. Narrower bandwidths improve
/// sensitivity at the cost of data rate and tighter crystal tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    /// 7.8 kHz
    Bw7_8kHz = 0,
    /// 10.4 kHz
    Bw10_4kHz = 1,
    /// 15.6 kHz
    Bw15_6kHz = 2,
    /// 20.8 kHz
    Bw20_8kHz = 3,
    /// 31.25 kHz
    Bw31_25kHz = 4,
    /// 41.7 kHz
    Bw41_7kHz = 5,
    /// 62.5 kHz
    Bw62_5kHz = 6,
    /// 125 kHz
    Bw125kHz = 7,
    /// 250 kHz
    Bw250kHz = 8,
    /// 500 kHz
    Bw500kHz = 9,
}

impl Bandwidth {
    /// Bandwidth in Hz
    pub fn hz(self) -> u32 {
        match self {
            Self::Bw7_8kHz => 7_800,
            Self::Bw10_4kHz => 10_400,
            Self::Bw15_6kHz => 15_600,
            Self::Bw20_8kHz => 20_800,
            Self::Bw31_25kHz => 31_250,
            Self::Bw41_7kHz => 41_700,
            Self::Bw62_5kHz => 62_500,
            Self::Bw125kHz => 125_000,
            Self::Bw250kHz => 250_000,
            Self::Bw500kHz => 500_000,
        }
    }
}

impl TryFrom<u8> for Bandwidth {
    type Error = InvalidModemParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bw7_8kHz),
            1 => Ok(Self::Bw10_4kHz),
            2 => Ok(Self::Bw15_6kHz),
            3 => Ok(Self::Bw20_8kHz),
            4 => Ok(Self::Bw31_25kHz),
            5 => Ok(Self::Bw41_7kHz),
            6 => Ok(Self::Bw62_5kHz),
            7 => Ok(Self::Bw125kHz),
            8 => Ok(Self::Bw250kHz),
            9 => Ok(Self::Bw500kHz),
            invalid => Err(InvalidModemParameter(invalid)),
        }
    }
}

/// Forward error correction coding rate
///
/// Stored in bits 3:1 of `RegModemConfig1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodingRate {
    /// 4/5
    Cr4_5 = 1,
    /// 4/6
    Cr4_6 = 2,
    /// 4/7
    Cr4_7 = 3,
    /// 4/8
    Cr4_8 = 4,
}

impl TryFrom<u8> for CodingRate {
    type Error = InvalidModemParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Cr4_5),
            2 => Ok(Self::Cr4_6),
            3 => Ok(Self::Cr4_7),
            4 => Ok(Self::Cr4_8),
            invalid => Err(InvalidModemParameter(invalid)),
        }
    }
}

/// Spreading factor in chips per symbol (2^SF)
///
/// Stored in bits 7:4 of `RegModemConfig2`.
///
/// # Important Notes
/// - SF6 only works in implicit header mode
/// - SF11 and SF12 at 125 kHz need the low data rate optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpreadingFactor {
    /// 64 chips per symbol
    Sf6 = 6,
    /// 128 chips per symbol
    Sf7 = 7,
    /// 256 chips per symbol
    Sf8 = 8,
    /// 512 chips per symbol
    Sf9 = 9,
    /// 1024 chips per symbol
    Sf10 = 10,
    /// 2048 chips per symbol
    Sf11 = 11,
    /// 4096 chips per symbol
    Sf12 = 12,
}

impl TryFrom<u8> for SpreadingFactor {
    type Error = InvalidModemParameter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(Self::Sf6),
            7 => Ok(Self::Sf7),
            8 => Ok(Self::Sf8),
            9 => Ok(Self::Sf9),
            10 => Ok(Self::Sf10),
            11 => Ok(Self::Sf11),
            12 => Ok(Self::Sf12),
            invalid => Err(InvalidModemParameter(invalid)),
        }
    }
}

/// Values programmed by [`Radio::initialize`](crate::Radio::initialize).
///
/// Build one at startup and hand it to the driver; nothing here is retained
/// by the driver afterwards. The device registers remain the only record of
/// the active configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Carrier frequency in Hz
    pub frequency_hz: u32,
    /// Signal bandwidth
    pub bandwidth: Bandwidth,
    /// Error coding rate
    pub coding_rate: CodingRate,
    /// Spreading factor
    pub spreading_factor: SpreadingFactor,
    /// Append and check a payload CRC
    pub crc: bool,
    /// Preamble length in symbols
    pub preamble_length: u16,
    /// Output power on PA_BOOST. `None` leaves the power-on PA setting alone.
    pub tx_power_dbm: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frequency_hz: 915_000_000,
            bandwidth: Bandwidth::Bw125kHz,
            coding_rate: CodingRate::Cr4_5,
            spreading_factor: SpreadingFactor::Sf7,
            crc: true,
            preamble_length: 8,
            tx_power_dbm: None,
        }
    }
}
