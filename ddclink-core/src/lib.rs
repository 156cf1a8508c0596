//! Display management channel logic
//!
//! This crate contains everything that runs on top of a raw display I2C
//! channel and does not depend on a specific platform:
//!
//! - Raw I2C transport with handle-availability checks
//! - DDC/CI command framing and response reads
//! - Bounds-checked firmware block write/read/verify
//! - Configuration types for addresses and sizes
//!
//! Every operation borrows a [`ServiceHandle`], performs at most one
//! blocking transfer and returns a typed result. Nothing is retried and no
//! state survives between calls.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod ddc;
pub mod error;
pub mod firmware;
pub mod transport;

pub use config::{DdcConfig, FirmwareConfig};
pub use ddclink_hal::{I2cAddress, I2cChannel, ServiceHandle, TransportStatus};
pub use error::Error;
pub use firmware::{Verification, MAX_BLOCK_SIZE};
