//! # Bus Transaction Layer Tests
//!
//! Checks the SPI framing produced by [`rfm95::Device`]: one chip-select
//! framed transaction per call, address bit 7 selecting write, and FIFO bursts
//! on address 0x00.

use std::collections::VecDeque;

use embedded_hal::spi::{self, ErrorKind, ErrorType, Operation, SpiDevice};
use rfm95::registers::{Frf, IrqFlags, Irq, Version};
use rfm95::{BusError, Device, RegisterBus};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Op {
    Write(Vec<u8>),
    Read(usize),
    Transfer(Vec<u8>),
}

#[derive(Debug)]
struct SpiFault;

impl spi::Error for SpiFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Records every transaction and answers reads from a queue of bytes.
#[derive(Default)]
struct MockSpi {
    transactions: Vec<Vec<Op>>,
    miso: VecDeque<u8>,
    fail: bool,
}

impl MockSpi {
    fn answering(bytes: &[u8]) -> Self {
        Self {
            miso: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }

    fn next_byte(&mut self) -> u8 {
        self.miso.pop_front().unwrap_or(0)
    }
}

impl ErrorType for MockSpi {
    type Error = SpiFault;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(SpiFault);
        }

        let mut recorded = Vec::new();
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => recorded.push(Op::Write(bytes.to_vec())),
                Operation::Read(bytes) => {
                    for byte in bytes.iter_mut() {
                        *byte = self.next_byte();
                    }
                    recorded.push(Op::Read(bytes.len()));
                }
                Operation::Transfer(read, write) => {
                    for byte in read.iter_mut() {
                        *byte = self.next_byte();
                    }
                    recorded.push(Op::Transfer(write.to_vec()));
                }
                Operation::TransferInPlace(bytes) => {
                    recorded.push(Op::Transfer(bytes.to_vec()));
                    for byte in bytes.iter_mut() {
                        *byte = self.next_byte();
                    }
                }
                _ => {}
            }
        }
        self.transactions.push(recorded);
        Ok(())
    }
}

#[test]
fn read_register_clears_bit_7_and_returns_second_byte() {
    let mut device = Device::new(MockSpi::answering(&[0xFF, 0x12]));

    assert_eq!(device.read_register(0x42).unwrap(), 0x12);

    let spi = device.release();
    assert_eq!(spi.transactions, vec![vec![Op::Transfer(vec![0x42, 0x00])]]);
}

#[test]
fn read_register_masks_out_write_bit() {
    let mut device = Device::new(MockSpi::answering(&[0x00, 0x00]));
    device.read_register(0x81).unwrap();

    let spi = device.release();
    assert_eq!(spi.transactions, vec![vec![Op::Transfer(vec![0x01, 0x00])]]);
}

#[test]
fn write_register_sets_bit_7() {
    let mut device = Device::new(MockSpi::default());
    device.write_register(0x01, 0x81).unwrap();

    let spi = device.release();
    assert_eq!(spi.transactions, vec![vec![Op::Write(vec![0x81, 0x81])]]);
}

#[test]
fn fifo_bursts_are_single_transactions() {
    let mut device = Device::new(MockSpi::answering(&[0x48, 0x49, 0x21]));

    device.write_block(b"Ola").unwrap();
    let mut buffer = [0u8; 3];
    device.read_block(&mut buffer).unwrap();

    assert_eq!(&buffer, b"HI!");
    let spi = device.release();
    assert_eq!(
        spi.transactions,
        vec![
            vec![Op::Write(vec![0x80]), Op::Write(b"Ola".to_vec())],
            vec![Op::Write(vec![0x00]), Op::Read(3)],
        ]
    );
}

#[test]
fn typed_multi_byte_register_is_written_msb_first() {
    let mut device = Device::new(MockSpi::default());
    device.write(Frf::from_hz(915_000_000)).unwrap();

    let spi = device.release();
    assert_eq!(
        spi.transactions,
        vec![
            vec![Op::Write(vec![0x86, 0xE4])],
            vec![Op::Write(vec![0x87, 0xC0])],
            vec![Op::Write(vec![0x88, 0x00])],
        ]
    );
}

#[test]
fn typed_read_decodes_register() {
    let mut device = Device::new(MockSpi::answering(&[0x00, 0x12, 0x00, 0x48]));

    let version: Version = device.read().unwrap();
    let irq: IrqFlags = device.read().unwrap();

    assert_eq!(version.revision, 0x12);
    assert_eq!(irq.flags, Irq::RX_DONE | Irq::TX_DONE);
}

#[test]
fn spi_failure_maps_to_bus_error() {
    let mut device = Device::new(MockSpi {
        fail: true,
        ..MockSpi::default()
    });

    assert!(matches!(device.read_register(0x42), Err(BusError::BusError)));
    assert!(matches!(
        device.write_register(0x01, 0x80),
        Err(BusError::BusError)
    ));
    assert!(matches!(device.write_block(&[1, 2]), Err(BusError::BusError)));
}
