//! Simulated display controller for ddclink
//!
//! This crate provides a host-side implementation of the `ddclink-hal`
//! channel trait that behaves like a display's management interface:
//!
//! - DDC/CI packets written to the DDC data address are decoded; queries
//!   stage a VCP reply for the next read at offset 0, writes with a value
//!   update the control
//! - Writes to any other data address land in an echo memory that reads
//!   return verbatim
//! - Transfers can be made to fail with a chosen fault, and every attempt
//!   is recorded
//!
//! It is used by the integration tests and by the demo's simulated
//! discovery.

pub mod display;
pub mod i2c;
pub mod memory;

// Re-export shared types from ddclink-hal
pub use ddclink_hal::{I2cChannel, TransportStatus};

pub use display::{SimDisplay, Transfer};
pub use i2c::SimFault;
pub use memory::EchoMemory;
