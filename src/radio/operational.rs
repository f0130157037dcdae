//! Operating mode and configuration
//!
//! Mode transitions and configuration setters are unconditional register
//! writes. No precondition is checked and nothing is read back, except for
//! the modem setters which read-modify-write the register they share with
//! other parameters.
//!
//! Most of these registers are only writable in sleep or standby.

use log::debug;

use super::Radio;
use crate::config::{Bandwidth, CodingRate, SpreadingFactor};
use crate::device::RegisterBus;
use crate::error::Error;
use crate::registers::{
    Frf, Mode, ModemConfig1, ModemConfig2, OpMode, PaConfig, PreambleLength, MIN_POWER_DBM,
};

impl<BUS, RESET, DELAY> Radio<BUS, RESET, DELAY>
where
    BUS: RegisterBus,
{
    /// Selects an operating mode of the LoRa modem.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.bus.write(OpMode::lora(mode))?;
        Ok(())
    }

    /// Reads the current operating mode from the device.
    pub fn mode(&mut self) -> Result<Mode, Error> {
        let op_mode: OpMode = self.bus.read()?;
        Ok(op_mode.mode)
    }

    /// Enters sleep, the lowest power mode.
    pub fn enter_sleep(&mut self) -> Result<(), Error> {
        self.set_mode(Mode::Sleep)
    }

    /// Enters standby, ready for FIFO access and TX/RX.
    pub fn enter_idle(&mut self) -> Result<(), Error> {
        self.set_mode(Mode::Standby)
    }

    /// Programs the carrier frequency.
    ///
    /// Frequencies outside the 24-bit range wrap silently.
    pub fn set_frequency(&mut self, frequency_hz: u32) -> Result<(), Error> {
        let frf = Frf::from_hz(frequency_hz);
        self.bus.write(frf)?;
        debug!("rfm95: frequency {} Hz (frf {:#08x})", frequency_hz, frf.value);
        Ok(())
    }

    /// Sets the PA_BOOST output power in dBm, clamped to 2..=17.
    pub fn set_power(&mut self, dbm: u8) -> Result<(), Error> {
        let pa_config = PaConfig::boost(dbm);
        self.bus.write(pa_config)?;
        debug!("rfm95: output power {} dBm", pa_config.output_power + MIN_POWER_DBM);
        Ok(())
    }

    /// Sets the signal bandwidth in `RegModemConfig1`.
    pub fn set_bandwidth(&mut self, bandwidth: Bandwidth) -> Result<(), Error> {
        let mut config: ModemConfig1 = self.bus.read()?;
        config.bandwidth = bandwidth;
        self.bus.write(config)?;
        Ok(())
    }

    /// Sets the error coding rate in `RegModemConfig1`.
    pub fn set_coding_rate(&mut self, coding_rate: CodingRate) -> Result<(), Error> {
        let mut config: ModemConfig1 = self.bus.read()?;
        config.coding_rate = coding_rate;
        self.bus.write(config)?;
        Ok(())
    }

    /// Sets the spreading factor in `RegModemConfig2`.
    pub fn set_spreading_factor(&mut self, spreading_factor: SpreadingFactor) -> Result<(), Error> {
        let mut config: ModemConfig2 = self.bus.read()?;
        config.spreading_factor = spreading_factor;
        self.bus.write(config)?;
        Ok(())
    }

    /// Enables or disables the payload CRC.
    pub fn set_crc(&mut self, enabled: bool) -> Result<(), Error> {
        let mut config: ModemConfig2 = self.bus.read()?;
        config.crc_on = enabled;
        self.bus.write(config)?;
        Ok(())
    }

    /// Sets the preamble length in symbols.
    pub fn set_preamble_length(&mut self, symbols: u16) -> Result<(), Error> {
        self.bus.write(PreambleLength { symbols })?;
        Ok(())
    }
}
