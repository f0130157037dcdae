//! Shared test doubles: a simulated SX1276 register file, a recording reset
//! pin and a recording delay.

#![allow(dead_code)]

use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use rfm95::{BusError, Radio, RegisterBus};

pub const REG_OP_MODE: u8 = 0x01;
pub const REG_FRF_MSB: u8 = 0x06;
pub const REG_FRF_MID: u8 = 0x07;
pub const REG_FRF_LSB: u8 = 0x08;
pub const REG_PA_CONFIG: u8 = 0x09;
pub const REG_LNA: u8 = 0x0C;
pub const REG_FIFO_ADDR_PTR: u8 = 0x0D;
pub const REG_FIFO_TX_BASE_ADDR: u8 = 0x0E;
pub const REG_FIFO_RX_BASE_ADDR: u8 = 0x0F;
pub const REG_FIFO_RX_CURRENT_ADDR: u8 = 0x10;
pub const REG_IRQ_FLAGS: u8 = 0x12;
pub const REG_RX_NB_BYTES: u8 = 0x13;
pub const REG_PKT_SNR_VALUE: u8 = 0x19;
pub const REG_PKT_RSSI_VALUE: u8 = 0x1A;
pub const REG_MODEM_CONFIG_1: u8 = 0x1D;
pub const REG_MODEM_CONFIG_2: u8 = 0x1E;
pub const REG_PREAMBLE_MSB: u8 = 0x20;
pub const REG_PREAMBLE_LSB: u8 = 0x21;
pub const REG_PAYLOAD_LENGTH: u8 = 0x22;
pub const REG_VERSION: u8 = 0x42;

pub const MODE_SLEEP: u8 = 0x80;
pub const MODE_STANDBY: u8 = 0x81;
pub const MODE_TX: u8 = 0x83;
pub const MODE_RX_CONTINUOUS: u8 = 0x85;

pub const IRQ_RX_DONE: u8 = 0x40;
pub const IRQ_PAYLOAD_CRC_ERROR: u8 = 0x20;
pub const IRQ_VALID_HEADER: u8 = 0x10;
pub const IRQ_TX_DONE: u8 = 0x08;

/// One bus transaction as seen by the simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Read { address: u8, value: u8 },
    Write { address: u8, value: u8 },
    ReadBlock(Vec<u8>),
    WriteBlock(Vec<u8>),
}

/// A register-level model of the SX1276 LoRa register bank.
///
/// - IRQ flags are cleared by writing ones
/// - FIFO bursts go through the FIFO address pointer and advance it
/// - After a write selecting transmit mode, TX done is raised on the
///   `tx_done_after_polls`-th read of the IRQ flags (never when `None`)
/// - Once the IRQ flags have been read `fail_after_irq_reads` times, every
///   further transaction fails
pub struct SimulatedRadio {
    pub registers: [u8; 0x80],
    pub fifo: [u8; 256],
    pub log: Vec<Transaction>,
    pub tx_done_after_polls: Option<usize>,
    pub fail_bus: bool,
    pub fail_after_irq_reads: Option<usize>,
    irq_reads: usize,
    tx_polls: Option<usize>,
}

impl SimulatedRadio {
    pub fn new() -> Self {
        let mut registers = [0u8; 0x80];
        // Power-on reset values from the datasheet
        registers[REG_OP_MODE as usize] = 0x09;
        registers[REG_FRF_MSB as usize] = 0x6C;
        registers[REG_FRF_MID as usize] = 0x80;
        registers[REG_PA_CONFIG as usize] = 0x4F;
        registers[REG_LNA as usize] = 0x20;
        registers[REG_FIFO_TX_BASE_ADDR as usize] = 0x80;
        registers[REG_MODEM_CONFIG_1 as usize] = 0x72;
        registers[REG_MODEM_CONFIG_2 as usize] = 0x70;
        registers[REG_PREAMBLE_LSB as usize] = 0x08;
        registers[REG_PAYLOAD_LENGTH as usize] = 0x01;
        registers[REG_VERSION as usize] = 0x12;

        Self {
            registers,
            fifo: [0u8; 256],
            log: Vec::new(),
            tx_done_after_polls: Some(1),
            fail_bus: false,
            fail_after_irq_reads: None,
            irq_reads: 0,
            tx_polls: None,
        }
    }

    pub fn with_version(version: u8) -> Self {
        let mut radio = Self::new();
        radio.registers[REG_VERSION as usize] = version;
        radio
    }

    pub fn register(&self, address: u8) -> u8 {
        self.registers[address as usize]
    }

    /// Places a packet in the FIFO as the modem would after a reception.
    pub fn deliver_packet(&mut self, fifo_address: u8, payload: &[u8], crc_error: bool) {
        for (offset, byte) in payload.iter().enumerate() {
            self.fifo[fifo_address.wrapping_add(offset as u8) as usize] = *byte;
        }
        self.registers[REG_FIFO_RX_CURRENT_ADDR as usize] = fifo_address;
        self.registers[REG_RX_NB_BYTES as usize] = payload.len() as u8;
        self.registers[REG_IRQ_FLAGS as usize] |= IRQ_RX_DONE | IRQ_VALID_HEADER;
        if crc_error {
            self.registers[REG_IRQ_FLAGS as usize] |= IRQ_PAYLOAD_CRC_ERROR;
        }
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transaction::Write { address, value } => Some((*address, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn reads_of(&self, address: u8) -> usize {
        self.log
            .iter()
            .filter(|t| matches!(t, Transaction::Read { address: a, .. } if *a == address))
            .count()
    }

    pub fn block_reads(&self) -> Vec<Vec<u8>> {
        self.log
            .iter()
            .filter_map(|t| match t {
                Transaction::ReadBlock(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    fn check_bus(&self) -> Result<(), BusError> {
        let exhausted = self
            .fail_after_irq_reads
            .is_some_and(|limit| self.irq_reads >= limit);
        if self.fail_bus || exhausted {
            Err(BusError::BusError)
        } else {
            Ok(())
        }
    }

    fn advance_fifo_pointer(&mut self) -> usize {
        let pointer = self.registers[REG_FIFO_ADDR_PTR as usize];
        self.registers[REG_FIFO_ADDR_PTR as usize] = pointer.wrapping_add(1);
        pointer as usize
    }
}

impl RegisterBus for SimulatedRadio {
    fn read_register(&mut self, address: u8) -> Result<u8, BusError> {
        self.check_bus()?;

        if address == REG_IRQ_FLAGS {
            self.irq_reads += 1;
            if let Some(polls) = self.tx_polls.as_mut() {
                *polls += 1;
                if self.tx_done_after_polls.is_some_and(|n| *polls >= n) {
                    self.registers[REG_IRQ_FLAGS as usize] |= IRQ_TX_DONE;
                    self.tx_polls = None;
                }
            }
        }

        let value = self.registers[address as usize];
        self.log.push(Transaction::Read { address, value });
        Ok(value)
    }

    fn write_register(&mut self, address: u8, value: u8) -> Result<(), BusError> {
        self.check_bus()?;
        self.log.push(Transaction::Write { address, value });

        match address {
            REG_IRQ_FLAGS => self.registers[REG_IRQ_FLAGS as usize] &= !value,
            REG_OP_MODE => {
                self.registers[REG_OP_MODE as usize] = value;
                if value & 0x07 == 0x03 {
                    self.tx_polls = Some(0);
                }
            }
            _ => self.registers[address as usize] = value,
        }
        Ok(())
    }

    fn read_block(&mut self, bytes: &mut [u8]) -> Result<(), BusError> {
        self.check_bus()?;
        for byte in bytes.iter_mut() {
            let pointer = self.advance_fifo_pointer();
            *byte = self.fifo[pointer];
        }
        self.log.push(Transaction::ReadBlock(bytes.to_vec()));
        Ok(())
    }

    fn write_block(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.check_bus()?;
        for byte in bytes {
            let pointer = self.advance_fifo_pointer();
            self.fifo[pointer] = *byte;
        }
        self.log.push(Transaction::WriteBlock(bytes.to_vec()));
        Ok(())
    }
}

/// Reset line double recording every level it is driven to.
#[derive(Debug, Default)]
pub struct RecordingPin {
    pub levels: Vec<bool>,
}

impl ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Delay double that returns immediately and records each millisecond request.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub ms_calls: Vec<u32>,
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.ms_calls.push(ms);
        self.total_ns += ms as u64 * 1_000_000;
    }
}

pub type TestRadio = Radio<SimulatedRadio, RecordingPin, RecordingDelay>;

pub fn radio(device: SimulatedRadio) -> TestRadio {
    Radio::new(device, RecordingPin::default(), RecordingDelay::default())
}

/// Builds an initialized radio and clears the bring-up traffic from the log.
pub fn initialized_radio() -> TestRadio {
    let mut radio = radio(SimulatedRadio::new());
    radio
        .initialize(&rfm95::Config::default())
        .expect("bring-up against the simulated device");
    let (mut device, pin, delay) = radio.release();
    device.log.clear();
    Radio::new(device, pin, delay)
}
