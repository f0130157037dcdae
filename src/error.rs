//! Error types for the RFM95 driver.

use core::fmt;

use regiface::errors::Error as RegifaceError;

/// The error type returned by [`Radio`](crate::Radio) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An SPI transaction failed.
    Bus,
    /// Bytes read from a register could not be decoded.
    Deserialization,
    /// The reset line could not be driven.
    Reset,
    /// The version register did not hold the expected silicon revision.
    /// The handle must not be used further.
    VersionMismatch(u8),
    /// Transmit did not complete before the deadline.
    Timeout,
    /// Payload does not fit the 255 byte length register.
    PayloadTooLarge(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI bus error"),
            Self::Deserialization => write!(f, "invalid register contents"),
            Self::Reset => write!(f, "failed to drive reset line"),
            Self::VersionMismatch(found) => {
                write!(f, "unexpected silicon revision {found:#04x}")
            }
            Self::Timeout => write!(f, "transmit timed out"),
            Self::PayloadTooLarge(len) => write!(f, "payload of {len} bytes exceeds 255"),
        }
    }
}

impl From<RegifaceError> for Error {
    fn from(err: RegifaceError) -> Self {
        match err {
            RegifaceError::DeserializationError => Self::Deserialization,
            _ => Self::Bus,
        }
    }
}
