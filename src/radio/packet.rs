//! Transmit and receive pipelines
//!
//! Both pipelines poll the IRQ flags register; no DIO interrupt is used.
//! Transmit blocks until the TX done flag is set (or an optional deadline
//! passes). Receive never blocks and is meant to be called in a loop.

use embedded_hal::delay::DelayNs;
use log::{trace, warn};

use super::{Radio, TX_POLL_INTERVAL_MS};
use crate::device::RegisterBus;
use crate::error::Error;
use crate::registers::{
    FifoAddrPtr, FifoRxCurrentAddr, Irq, IrqFlags, Mode, PayloadLength, RxNbBytes,
    MAX_PAYLOAD_LENGTH,
};

/// Outcome of one [`Radio::receive`] poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Reception {
    /// No packet has completed since the last poll.
    Empty,
    /// A packet arrived but failed its CRC check. Its bytes were discarded.
    CrcError,
    /// A packet of this many bytes was copied into the caller's buffer.
    Packet(usize),
}

impl Reception {
    /// Number of bytes delivered. `Empty` and `CrcError` both count as zero.
    pub fn len(self) -> usize {
        match self {
            Self::Packet(len) => len,
            Self::Empty | Self::CrcError => 0,
        }
    }

    /// `true` unless a packet was delivered.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl<BUS, RESET, DELAY> Radio<BUS, RESET, DELAY>
where
    BUS: RegisterBus,
    DELAY: DelayNs,
{
    /// Transmits `payload` and blocks until the radio reports TX done.
    ///
    /// With `timeout_ms` set to `None` this waits indefinitely. Otherwise the
    /// TX done flag is polled every [`TX_POLL_INTERVAL_MS`] until the deadline,
    /// after which the radio is put back in standby and `Error::Timeout` is
    /// returned.
    ///
    /// Register sequence: standby, FIFO pointer = 0, FIFO burst, payload
    /// length, transmit, poll IRQ flags, clear TX done, standby.
    ///
    /// # Errors
    /// * `Error::PayloadTooLarge` - more than 255 bytes, nothing is sent
    /// * `Error::Timeout` - TX done not seen before the deadline
    pub fn send(&mut self, payload: &[u8], timeout_ms: Option<u32>) -> Result<(), Error> {
        if payload.len() > MAX_PAYLOAD_LENGTH {
            return Err(Error::PayloadTooLarge(payload.len()));
        }

        self.enter_idle()?;
        self.bus.write(FifoAddrPtr { address: 0 })?;
        self.bus.write_block(payload)?;
        self.bus.write(PayloadLength {
            length: payload.len() as u8,
        })?;
        self.set_mode(Mode::Transmit)?;
        trace!("rfm95: transmitting {} bytes", payload.len());

        let mut waited_ms: u32 = 0;
        loop {
            let irq: IrqFlags = self.bus.read()?;
            if irq.flags.contains(Irq::TX_DONE) {
                break;
            }

            if let Some(timeout_ms) = timeout_ms {
                if waited_ms >= timeout_ms {
                    warn!("rfm95: transmit not done after {} ms", waited_ms);
                    if let Err(err) = self.enter_idle() {
                        warn!("rfm95: standby after transmit timeout failed: {}", err);
                    }
                    return Err(Error::Timeout);
                }
            }

            self.delay.delay_ms(TX_POLL_INTERVAL_MS);
            waited_ms = waited_ms.saturating_add(TX_POLL_INTERVAL_MS);
        }

        self.bus.write(IrqFlags { flags: Irq::TX_DONE })?;
        trace!("rfm95: transmit done after ~{} ms", waited_ms);
        self.enter_idle()
    }
}

impl<BUS, RESET, DELAY> Radio<BUS, RESET, DELAY>
where
    BUS: RegisterBus,
{
    /// Polls for a received packet.
    ///
    /// Keeps the radio in continuous receive and checks the RX done flag once.
    /// A completed packet is copied into `buffer`, truncated to its length.
    /// The RX done flag (and the CRC error flag, when set) is cleared before
    /// returning.
    ///
    /// Signal quality for a returned packet must be read through
    /// [`last_rssi`](Radio::last_rssi) / [`last_snr`](Radio::last_snr) before
    /// the next reception overwrites it.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<Reception, Error> {
        self.set_mode(Mode::ReceiveContinuous)?;

        let irq: IrqFlags = self.bus.read()?;
        if !irq.flags.contains(Irq::RX_DONE) {
            return Ok(Reception::Empty);
        }

        self.bus.write(IrqFlags {
            flags: irq.flags & (Irq::RX_DONE | Irq::PAYLOAD_CRC_ERROR),
        })?;

        if irq.flags.contains(Irq::PAYLOAD_CRC_ERROR) {
            warn!("rfm95: dropped packet with CRC error");
            return Ok(Reception::CrcError);
        }

        let received: RxNbBytes = self.bus.read()?;
        let len = (received.count as usize).min(buffer.len());

        let current: FifoRxCurrentAddr = self.bus.read()?;
        self.bus.write(FifoAddrPtr {
            address: current.address,
        })?;
        self.bus.read_block(&mut buffer[..len])?;

        trace!(
            "rfm95: received {} bytes ({} reported) at fifo {:#04x}",
            len,
            received.count,
            current.address
        );
        Ok(Reception::Packet(len))
    }
}
