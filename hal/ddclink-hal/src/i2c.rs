//! I2C channel abstractions
//!
//! Provides the raw transfer primitive that platform display services
//! implement. Unlike a plain I2C master, the display channel carries a
//! 32-bit data address (sub-address) alongside the 7-bit chip address,
//! and reports the outcome of each transfer as a platform status code.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 7-bit DDC/CI chip address
pub const DDC_CHIP_ADDRESS: u8 = 0x37;

/// DDC/CI data (sub-)address
pub const DDC_DATA_ADDRESS: u8 = 0x51;

/// Non-success status reported by a channel transfer
///
/// The core only distinguishes success from failure; the raw code is
/// carried along for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportStatus(pub i32);

impl TransportStatus {
    /// Generic I/O failure (`kIOReturnError`)
    pub const ERROR: Self = Self(0xE000_02BC_u32 as i32);

    /// Device did not respond (`kIOReturnNotResponding`)
    pub const NOT_RESPONDING: Self = Self(0xE000_02ED_u32 as i32);

    /// Raw status code
    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0 as u32)
    }
}

/// Raw I2C channel to one display's management interface
///
/// Each call is a single blocking transfer. Implementations must not
/// retry; a failed transfer is reported as-is.
pub trait I2cChannel {
    /// Write `payload` to `data_address` on `chip_address`
    ///
    /// # Arguments
    /// * `chip_address` - 7-bit I2C chip address
    /// * `data_address` - Sub-address (0x51 for DDC, block address for firmware)
    /// * `payload` - Bytes to write
    fn write_i2c(
        &mut self,
        chip_address: u8,
        data_address: u32,
        payload: &[u8],
    ) -> Result<(), TransportStatus>;

    /// Read `buf.len()` bytes starting at `offset` on `chip_address`
    ///
    /// On success the whole buffer has been filled with device data.
    fn read_i2c(
        &mut self,
        chip_address: u8,
        offset: u32,
        buf: &mut [u8],
    ) -> Result<(), TransportStatus>;
}

impl<T: I2cChannel + ?Sized> I2cChannel for &mut T {
    fn write_i2c(
        &mut self,
        chip_address: u8,
        data_address: u32,
        payload: &[u8],
    ) -> Result<(), TransportStatus> {
        (**self).write_i2c(chip_address, data_address, payload)
    }

    fn read_i2c(
        &mut self,
        chip_address: u8,
        offset: u32,
        buf: &mut [u8],
    ) -> Result<(), TransportStatus> {
        (**self).read_i2c(chip_address, offset, buf)
    }
}

/// Chip address and data address used for one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct I2cAddress {
    /// 7-bit chip address
    pub chip: u8,
    /// Data address / sub-address
    pub data: u32,
}

impl Default for I2cAddress {
    fn default() -> Self {
        Self::DDC
    }
}

impl I2cAddress {
    /// DDC/CI transport address pair (0x37 / 0x51)
    pub const DDC: Self = Self {
        chip: DDC_CHIP_ADDRESS,
        data: DDC_DATA_ADDRESS as u32,
    };

    /// Create an address pair
    pub const fn new(chip: u8, data: u32) -> Self {
        Self { chip, data }
    }

    /// Same chip, different data address
    pub const fn with_data(self, data: u32) -> Self {
        Self {
            chip: self.chip,
            data,
        }
    }
}
