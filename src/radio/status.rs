//! Identification and signal quality
//!
//! Packet RSSI and SNR describe the most recently completed reception and
//! are overwritten by the next one. Nothing checks that a packet was actually
//! received; read them right after [`Radio::receive`] returns a packet.

use super::Radio;
use crate::device::RegisterBus;
use crate::error::Error;
use crate::registers::{PktRssiValue, PktSnrValue, Version};

/// Signal quality of the last received packet
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketStatus {
    /// Packet RSSI in dBm, HF band calibration
    pub rssi_dbm: i16,
    /// Packet SNR in dB, 0.25 dB resolution
    pub snr_db: f32,
}

impl<BUS, RESET, DELAY> Radio<BUS, RESET, DELAY>
where
    BUS: RegisterBus,
{
    /// Reads the silicon revision.
    pub fn version(&mut self) -> Result<u8, Error> {
        let version: Version = self.bus.read()?;
        Ok(version.revision)
    }

    /// RSSI of the last packet in dBm (`raw - 157`).
    ///
    /// The offset is only valid on the HF port (band 1, 862-1020 MHz).
    pub fn last_rssi(&mut self) -> Result<i16, Error> {
        let rssi: PktRssiValue = self.bus.read()?;
        Ok(rssi.dbm())
    }

    /// SNR of the last packet in dB.
    pub fn last_snr(&mut self) -> Result<f32, Error> {
        let snr: PktSnrValue = self.bus.read()?;
        Ok(snr.db())
    }

    /// RSSI and SNR of the last packet.
    pub fn packet_status(&mut self) -> Result<PacketStatus, Error> {
        Ok(PacketStatus {
            rssi_dbm: self.last_rssi()?,
            snr_db: self.last_snr()?,
        })
    }
}
