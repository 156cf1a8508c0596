//! Configuration types
//!
//! Address pairs and sizes are passed explicitly to every operation
//! rather than baked into call signatures. The defaults are the DDC/CI
//! conventions.

use ddclink_hal::{I2cAddress, DDC_CHIP_ADDRESS};
use ddclink_protocol::VCP_REPLY_LEN;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// DDC/CI command configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DdcConfig {
    /// Address pair commands are written to and replies read from
    pub address: I2cAddress,
    /// Number of bytes read back for a response
    pub response_len: usize,
}

impl Default for DdcConfig {
    fn default() -> Self {
        Self {
            address: I2cAddress::DDC,
            response_len: VCP_REPLY_LEN,
        }
    }
}

impl DdcConfig {
    /// Use a different response length
    pub const fn with_response_len(self, response_len: usize) -> Self {
        Self {
            address: self.address,
            response_len,
        }
    }
}

/// Firmware block transfer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FirmwareConfig {
    /// Chip address blocks are addressed through
    pub chip_address: u8,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            chip_address: DDC_CHIP_ADDRESS,
        }
    }
}

impl FirmwareConfig {
    /// Address pair for a block at `address`
    pub const fn block_address(&self, address: u32) -> I2cAddress {
        I2cAddress::new(self.chip_address, address)
    }
}
