//! Register definitions for the SX1276 LoRa modem
//! Generated from the SX1276/77/78/79 datasheet rev. 7, LoRa register bank

mod packet;
mod rf;
mod system;

pub use packet::*;
pub use rf::*;
pub use system::*;
