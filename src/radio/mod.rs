//! RFM95 radio driver
//!
//! [`Radio`] is a stateless facade over the device registers. It owns the
//! register bus, the reset line and a delay provider, and keeps nothing else:
//! operating mode, frequency, power and FIFO pointers live only in the device
//! and are read back when needed.
//!
//! Operations are grouped by concern:
//! - bring-up (this module)
//! - [`operational`]: mode transitions, frequency, power and modem settings
//! - [`packet`]: transmit and receive pipelines
//! - [`status`]: identification and per-packet signal quality
//!
//! Every operation takes `&mut self`, so at most one bus transaction is in
//! flight per handle. Share a handle between threads only behind a mutex.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{debug, warn};

use crate::config::Config;
use crate::device::RegisterBus;
use crate::error::Error;
use crate::registers::{
    FifoRxBaseAddr, FifoTxBaseAddr, Lna, ModemConfig1, ModemConfig2, PreambleLength, Version,
    EXPECTED_VERSION,
};

pub mod operational;
pub mod packet;
pub mod status;

pub use packet::Reception;
pub use status::PacketStatus;

/// Duration of each half of the hardware reset pulse.
pub const RESET_PULSE_MS: u32 = 10;

/// Interval between polls of the TX done flag.
pub const TX_POLL_INTERVAL_MS: u32 = 1;

/// Driver handle for one RFM95 module.
pub struct Radio<BUS, RESET, DELAY> {
    bus: BUS,
    reset: RESET,
    delay: DELAY,
}

impl<BUS, RESET, DELAY> Radio<BUS, RESET, DELAY> {
    /// Wraps the parts without touching the hardware.
    ///
    /// Call [`initialize`](Radio::initialize) before any other operation.
    pub fn new(bus: BUS, reset: RESET, delay: DELAY) -> Self {
        Self { bus, reset, delay }
    }

    /// Releases the bus, reset line and delay provider.
    pub fn release(self) -> (BUS, RESET, DELAY) {
        (self.bus, self.reset, self.delay)
    }
}

impl<BUS, RESET, DELAY> Radio<BUS, RESET, DELAY>
where
    BUS: RegisterBus,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    /// Resets and configures the radio, leaving it in standby.
    ///
    /// 1. Pulses the reset line low then high for [`RESET_PULSE_MS`] each
    /// 2. Checks the version register against [`EXPECTED_VERSION`]
    /// 3. In sleep: programs frequency, FIFO base addresses, LNA boost,
    ///    modem parameters, preamble and (optionally) output power
    /// 4. Enters standby
    ///
    /// Configuration writes are not read back.
    ///
    /// # Errors
    /// * `Error::VersionMismatch` - no SX1276 answered. Nothing is written to
    ///   the device and the handle must not be used further.
    /// * `Error::Reset` / `Error::Bus` - the hardware could not be driven
    pub fn initialize(&mut self, config: &Config) -> Result<(), Error> {
        self.hardware_reset()?;

        let version: Version = self.bus.read()?;
        if version.revision != EXPECTED_VERSION {
            warn!(
                "rfm95: unexpected silicon revision {:#04x}, expected {:#04x}",
                version.revision, EXPECTED_VERSION
            );
            return Err(Error::VersionMismatch(version.revision));
        }

        self.enter_sleep()?;
        self.set_frequency(config.frequency_hz)?;

        self.bus.write(FifoTxBaseAddr { address: 0 })?;
        self.bus.write(FifoRxBaseAddr { address: 0 })?;

        let mut lna: Lna = self.bus.read()?;
        lna.boost_hf = Lna::BOOST_HF_ON;
        self.bus.write(lna)?;

        self.bus.write(ModemConfig1 {
            bandwidth: config.bandwidth,
            coding_rate: config.coding_rate,
            implicit_header: false,
        })?;
        self.bus.write(ModemConfig2 {
            spreading_factor: config.spreading_factor,
            tx_continuous: false,
            crc_on: config.crc,
            symbol_timeout_msb: 0,
        })?;
        self.bus.write(PreambleLength {
            symbols: config.preamble_length,
        })?;

        if let Some(dbm) = config.tx_power_dbm {
            self.set_power(dbm)?;
        }

        self.enter_idle()?;

        debug!(
            "rfm95: initialized at {} Hz, {:?} {:?} {:?}",
            config.frequency_hz, config.spreading_factor, config.bandwidth, config.coding_rate
        );
        Ok(())
    }

    fn hardware_reset(&mut self) -> Result<(), Error> {
        self.reset.set_low().map_err(|_| Error::Reset)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.reset.set_high().map_err(|_| Error::Reset)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        Ok(())
    }
}
