//! Raw I2C transport
//!
//! Single-transfer read and write against a service handle. An absent
//! handle fails with [`Error::Unavailable`] before any channel is touched;
//! a non-success channel status is returned as [`Error::Transport`]. There
//! is no retry and no timeout handling at this layer.

use alloc::vec;
use alloc::vec::Vec;

use ddclink_hal::{I2cAddress, I2cChannel, ServiceHandle};
use log::{debug, warn};

use crate::error::Error;

/// Write `payload` to `address.data` on `address.chip`
pub fn write<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    address: I2cAddress,
    payload: &[u8],
) -> Result<(), Error> {
    let Some(channel) = handle.channel() else {
        warn!("I2C write skipped: no display service");
        return Err(Error::Unavailable);
    };

    match channel.write_i2c(address.chip, address.data, payload) {
        Ok(()) => {
            debug!(
                "I2C write: {} bytes to chip 0x{:02X}, data addr 0x{:X}",
                payload.len(),
                address.chip,
                address.data
            );
            Ok(())
        }
        Err(status) => {
            warn!("I2C write failed with status {}", status);
            Err(Error::Transport(status))
        }
    }
}

/// Fill `buf` with bytes read from `offset` on `chip_address`
pub fn read_into<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    chip_address: u8,
    offset: u32,
    buf: &mut [u8],
) -> Result<(), Error> {
    let Some(channel) = handle.channel() else {
        warn!("I2C read skipped: no display service");
        return Err(Error::Unavailable);
    };

    match channel.read_i2c(chip_address, offset, buf) {
        Ok(()) => {
            debug!(
                "I2C read: {} bytes from chip 0x{:02X}, offset 0x{:X}",
                buf.len(),
                chip_address,
                offset
            );
            Ok(())
        }
        Err(status) => {
            warn!("I2C read failed with status {}", status);
            Err(Error::Transport(status))
        }
    }
}

/// Read exactly `length` bytes from `offset` on `chip_address`
///
/// The content is returned as supplied by the device.
pub fn read<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    chip_address: u8,
    offset: u32,
    length: usize,
) -> Result<Vec<u8>, Error> {
    if !handle.is_present() {
        warn!("I2C read skipped: no display service");
        return Err(Error::Unavailable);
    }

    let mut buf = vec![0u8; length];
    read_into(handle, chip_address, offset, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddclink_hal::TransportStatus;

    /// Channel that answers reads with an incrementing pattern
    struct PatternChannel {
        transfers: usize,
        fail: Option<TransportStatus>,
        last_write: Option<(u8, u32, usize)>,
    }

    impl PatternChannel {
        fn new() -> Self {
            Self {
                transfers: 0,
                fail: None,
                last_write: None,
            }
        }
    }

    impl I2cChannel for PatternChannel {
        fn write_i2c(
            &mut self,
            chip_address: u8,
            data_address: u32,
            payload: &[u8],
        ) -> Result<(), TransportStatus> {
            self.transfers += 1;
            if let Some(status) = self.fail {
                return Err(status);
            }
            self.last_write = Some((chip_address, data_address, payload.len()));
            Ok(())
        }

        fn read_i2c(
            &mut self,
            _chip_address: u8,
            offset: u32,
            buf: &mut [u8],
        ) -> Result<(), TransportStatus> {
            self.transfers += 1;
            if let Some(status) = self.fail {
                return Err(status);
            }
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = (offset as usize + i) as u8;
            }
            Ok(())
        }
    }

    #[test]
    fn test_write_uses_address_pair() {
        let mut channel = PatternChannel::new();
        let mut handle = ServiceHandle::new(&mut channel);

        write(&mut handle, I2cAddress::DDC, &[1, 2, 3, 4, 5]).unwrap();
        assert_eq!(channel.last_write, Some((0x37, 0x51, 5)));
    }

    #[test]
    fn test_read_returns_requested_length() {
        let mut channel = PatternChannel::new();
        let mut handle = ServiceHandle::new(&mut channel);

        let data = read(&mut handle, 0x37, 4, 16).unwrap();
        assert_eq!(data.len(), 16);
        assert_eq!(data[0], 4);
        assert_eq!(data[15], 19);
    }

    #[test]
    fn test_transport_failure_carries_status() {
        let mut channel = PatternChannel::new();
        channel.fail = Some(TransportStatus::NOT_RESPONDING);
        let mut handle = ServiceHandle::new(&mut channel);

        assert_eq!(
            write(&mut handle, I2cAddress::DDC, &[0]),
            Err(Error::Transport(TransportStatus::NOT_RESPONDING))
        );
        assert_eq!(
            read(&mut handle, 0x37, 0, 4),
            Err(Error::Transport(TransportStatus::NOT_RESPONDING))
        );
        drop(handle);
        assert_eq!(channel.transfers, 2);
    }

    #[test]
    fn test_absent_handle_is_unavailable() {
        let mut handle = ServiceHandle::<PatternChannel>::absent();
        let mut buf = [0u8; 4];

        assert_eq!(write(&mut handle, I2cAddress::DDC, &[0]), Err(Error::Unavailable));
        assert_eq!(read(&mut handle, 0x37, 0, 4), Err(Error::Unavailable));
        assert_eq!(
            read_into(&mut handle, 0x37, 0, &mut buf),
            Err(Error::Unavailable)
        );
    }
}
