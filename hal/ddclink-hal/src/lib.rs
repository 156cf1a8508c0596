//! ddclink Hardware Abstraction Layer
//!
//! This crate defines the channel abstraction that platform backends
//! implement to reach a display's management interface. The protocol and
//! core crates are written against these traits only, so the same DDC/CI
//! and firmware-block logic runs against a real display service or a
//! simulated controller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (ddclink-demo, etc.)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ddclink-core (transport, DDC, blocks)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ddclink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ ddclink-hal-  │       │   platform    │
//! │      sim      │       │   services    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cChannel`] - Raw I2C transfers against one display
//! - [`service::ServiceHandle`] - Borrowed, possibly absent, channel handle

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod service;

// Re-export key types at crate root for convenience
pub use i2c::{I2cAddress, I2cChannel, TransportStatus, DDC_CHIP_ADDRESS, DDC_DATA_ADDRESS};
pub use service::ServiceHandle;
