//! Firmware block transfer
//!
//! Writes, reads and verifies opaque blocks of up to [`MAX_BLOCK_SIZE`]
//! bytes at a 32-bit address on the display controller. Blocks go through
//! the raw transport unframed: no DDC header, no checksum.
//!
//! Each call is one transfer. There is no chunking, sequencing or
//! resumption; larger images are split by the caller into independent
//! blocks.

use alloc::vec::Vec;

use ddclink_hal::{I2cChannel, ServiceHandle};
use log::{debug, warn};

use crate::config::FirmwareConfig;
use crate::error::Error;
use crate::transport;

/// Largest block a single transfer may carry
pub const MAX_BLOCK_SIZE: usize = 4096;

/// Outcome of a read-back verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verification {
    /// Device content equals the expected block
    Matched,
    /// Device content differs
    Mismatch {
        /// Offset of the first differing byte
        offset: usize,
        /// Byte that was expected there
        expected: u8,
        /// Byte the device returned
        found: u8,
    },
    /// The read-back itself failed
    ReadFailed(Error),
}

impl Verification {
    /// Whether the block matched
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Matched)
    }
}

fn check_len(len: usize) -> Result<(), Error> {
    if len > MAX_BLOCK_SIZE {
        warn!(
            "Firmware block too large: {} bytes (max {})",
            len, MAX_BLOCK_SIZE
        );
        return Err(Error::BlockTooLarge { len });
    }
    Ok(())
}

/// Write `data` verbatim at `address`
///
/// Blocks larger than [`MAX_BLOCK_SIZE`] are rejected before any I/O.
pub fn write_block<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    config: &FirmwareConfig,
    address: u32,
    data: &[u8],
) -> Result<(), Error> {
    check_len(data.len())?;
    debug!(
        "Writing firmware block: {} bytes to address 0x{:X}",
        data.len(),
        address
    );
    transport::write(handle, config.block_address(address), data)
}

/// Read `length` bytes from `address`
///
/// Lengths above [`MAX_BLOCK_SIZE`] are rejected before any I/O.
pub fn read_block<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    config: &FirmwareConfig,
    address: u32,
    length: usize,
) -> Result<Vec<u8>, Error> {
    check_len(length)?;
    debug!(
        "Reading firmware block: {} bytes from address 0x{:X}",
        length, address
    );
    transport::read(handle, config.chip_address, address, length)
}

/// Read back `expected.len()` bytes from `address` and compare
///
/// A failed read is reported as [`Verification::ReadFailed`], never as an
/// error: a negative match is an expected outcome of verification.
pub fn verify_block<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    config: &FirmwareConfig,
    address: u32,
    expected: &[u8],
) -> Verification {
    let found = match read_block(handle, config, address, expected.len()) {
        Ok(found) => found,
        Err(e) => return Verification::ReadFailed(e),
    };

    let mismatch = expected
        .iter()
        .zip(found.iter())
        .position(|(want, got)| want != got);

    match mismatch {
        None => {
            debug!("Firmware block verification passed at 0x{:X}", address);
            Verification::Matched
        }
        Some(offset) => {
            warn!(
                "Firmware block verification failed at 0x{:X} (+{})",
                address, offset
            );
            Verification::Mismatch {
                offset,
                expected: expected[offset],
                found: found[offset],
            }
        }
    }
}
