//! DDC/CI command layer
//!
//! Frames commands into checksummed DDC packets and writes them to the
//! configured DDC address pair; reads raw responses back from offset 0.
//!
//! The display needs time to process a command before its reply can be
//! read. This module never waits: callers insert the settle delay between
//! [`send_command`] and [`read_response`], or pass it to [`query`].

use alloc::vec::Vec;

use ddclink_hal::{I2cChannel, ServiceHandle};
use ddclink_protocol::{DdcPacket, VcpReply};
use log::{debug, warn};

use crate::config::DdcConfig;
use crate::error::Error;
use crate::transport;

/// Settle delay between a command and its reply, in milliseconds
pub const DEFAULT_SETTLE_MS: u32 = 50;

/// Frame and send a DDC/CI command
///
/// `value` of `None` sends `[command]`; `Some(v)` sends
/// `[command, v >> 8, v & 0xFF]`. Returns the transport outcome as-is.
pub fn send_command<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    config: &DdcConfig,
    command: u8,
    value: Option<u16>,
) -> Result<(), Error> {
    if !handle.is_present() {
        warn!("DDC command 0x{:02X} skipped: no display service", command);
        return Err(Error::Unavailable);
    }

    let packet = DdcPacket { command, value }.encode_to_vec()?;
    debug!(
        "DDC command 0x{:02X} value {:?}: {:02X?}",
        command,
        value,
        packet.as_slice()
    );

    transport::write(handle, config.address, &packet)
}

/// Read a raw DDC/CI response of `config.response_len` bytes
///
/// The bytes are not validated; see [`VcpReply::parse`].
pub fn read_response<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    config: &DdcConfig,
) -> Result<Vec<u8>, Error> {
    transport::read(handle, config.address.chip, 0, config.response_len)
}

/// Set a VCP control to `value`
pub fn set_value<C: I2cChannel + ?Sized>(
    handle: &mut ServiceHandle<'_, C>,
    config: &DdcConfig,
    command: u8,
    value: u16,
) -> Result<(), Error> {
    send_command(handle, config, command, Some(value))
}

/// Query a VCP control and parse the reply
///
/// `settle` runs between the command and the response read.
pub fn query<C, F>(
    handle: &mut ServiceHandle<'_, C>,
    config: &DdcConfig,
    command: u8,
    settle: F,
) -> Result<VcpReply, Error>
where
    C: I2cChannel + ?Sized,
    F: FnOnce(),
{
    send_command(handle, config, command, None)?;
    settle();
    let response = read_response(handle, config)?;
    let reply = VcpReply::parse(&response)?;
    debug!(
        "VCP 0x{:02X}: current {} maximum {}",
        reply.code, reply.current, reply.maximum
    );
    Ok(reply)
}
