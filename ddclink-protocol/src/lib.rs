//! DDC/CI wire protocol
//!
//! This crate defines the byte layout used on a display's DDC/CI channel.
//! Host-to-display commands are framed as:
//! ```text
//! ┌────────────────┬────────┬─────────┬──────────────────┬──────────┐
//! │ HEADER         │ LENGTH │ COMMAND │ VALUE (optional) │ CHECKSUM │
//! │ 0x80 | (len+1) │ 1B     │ 1B      │ 2B big-endian    │ 1B       │
//! └────────────────┴────────┴─────────┴──────────────────┴──────────┘
//! ```
//!
//! The checksum is seeded with `(0x37 << 1) ^ 0x51`, the conventional
//! destination/source addresses, and XORs every other byte of the packet.
//!
//! Display-to-host VCP replies are described in [`vcp`]. Firmware blocks are
//! sent without any framing and are not covered here.

#![no_std]
#![deny(unsafe_code)]

pub mod packet;
pub mod vcp;

pub use packet::{
    checksum, DdcPacket, PacketError, CHECKSUM_SEED, MAX_BODY_SIZE, MAX_PACKET_SIZE,
};
pub use vcp::{ReplyError, VcpReply, VCP_BRIGHTNESS, VCP_REPLY_LEN, VCP_REPLY_TAG};
