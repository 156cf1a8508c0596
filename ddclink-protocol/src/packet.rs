//! DDC/CI packet encoding and decoding.
//!
//! Packet format:
//! - HEADER (1 byte): 0x80 | (body length + 1)
//! - LENGTH (1 byte): body length (1 or 3)
//! - COMMAND (1 byte): VCP / command code
//! - VALUE (0 or 2 bytes): big-endian 16-bit value
//! - CHECKSUM (1 byte): CHECKSUM_SEED XOR every preceding byte

use core::fmt;

use ddclink_hal::{DDC_CHIP_ADDRESS, DDC_DATA_ADDRESS};
use heapless::Vec;

/// High bit set on every header byte
pub const HEADER_FLAG: u8 = 0x80;

/// Initial checksum value, derived from the DDC transport addresses
///
/// Fixed to the DDC constants regardless of the addresses a packet is
/// eventually written to.
pub const CHECKSUM_SEED: u8 = (DDC_CHIP_ADDRESS << 1) ^ DDC_DATA_ADDRESS;

/// Maximum body size (command + 16-bit value)
pub const MAX_BODY_SIZE: usize = 3;

/// Maximum complete packet size (HEADER + LENGTH + MAX_BODY + CHECKSUM)
pub const MAX_PACKET_SIZE: usize = 1 + 1 + MAX_BODY_SIZE + 1;

/// Smallest valid packet (HEADER + LENGTH + COMMAND + CHECKSUM)
const MIN_PACKET_SIZE: usize = 4;

/// Errors that can occur during packet encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Packet is shorter than its length byte announces
    Incomplete,
    /// Header byte does not match the length byte
    InvalidHeader,
    /// Length byte is not a valid body size
    InvalidLength,
    /// Checksum mismatch
    InvalidChecksum,
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PacketError::BufferTooSmall => "buffer too small for DDC packet",
            PacketError::Incomplete => "incomplete DDC packet",
            PacketError::InvalidHeader => "invalid DDC header byte",
            PacketError::InvalidLength => "invalid DDC body length",
            PacketError::InvalidChecksum => "DDC checksum mismatch",
        };
        f.write_str(msg)
    }
}

impl core::error::Error for PacketError {}

/// Header byte for a body of `body_len` bytes
pub const fn header_byte(body_len: usize) -> u8 {
    HEADER_FLAG | (body_len as u8 + 1)
}

/// Split a 16-bit value into big-endian bytes
pub const fn split_value(value: u16) -> [u8; 2] {
    [(value >> 8) as u8, (value & 0xFF) as u8]
}

/// Join big-endian bytes into a 16-bit value
pub const fn join_value(high: u8, low: u8) -> u16 {
    (high as u16) * 256 + low as u16
}

/// Compute the checksum of a complete packet
///
/// The last byte is the checksum slot and is left out of the computation.
pub fn checksum(packet: &[u8]) -> u8 {
    let Some((_, covered)) = packet.split_last() else {
        return CHECKSUM_SEED;
    };
    covered.iter().fold(CHECKSUM_SEED, |acc, &byte| acc ^ byte)
}

/// A DDC/CI command, optionally carrying a 16-bit value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DdcPacket {
    /// Command / VCP code
    pub command: u8,
    /// Value to set, `None` for a query
    pub value: Option<u16>,
}

impl DdcPacket {
    /// A command without a value (e.g. a VCP query)
    pub const fn query(command: u8) -> Self {
        Self {
            command,
            value: None,
        }
    }

    /// A command carrying a 16-bit value
    pub const fn with_value(command: u8, value: u16) -> Self {
        Self {
            command,
            value: Some(value),
        }
    }

    /// Command body: `[command]` or `[command, value_hi, value_lo]`
    pub fn body(&self) -> Result<Vec<u8, MAX_BODY_SIZE>, PacketError> {
        let mut body = Vec::new();
        body.push(self.command)
            .map_err(|_| PacketError::BufferTooSmall)?;
        if let Some(value) = self.value {
            body.extend_from_slice(&split_value(value))
                .map_err(|_| PacketError::BufferTooSmall)?;
        }
        Ok(body)
    }

    /// Number of bytes `encode` writes
    pub fn encoded_len(&self) -> usize {
        match self.value {
            Some(_) => MAX_BODY_SIZE + 3,
            None => 1 + 3,
        }
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let body = self.body()?;
        let packet_len = body.len() + 3;
        if buffer.len() < packet_len {
            return Err(PacketError::BufferTooSmall);
        }

        buffer[0] = header_byte(body.len());
        buffer[1] = body.len() as u8;
        buffer[2..2 + body.len()].copy_from_slice(&body);
        let sum = checksum(&buffer[..packet_len]);
        buffer[packet_len - 1] = sum;

        Ok(packet_len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_PACKET_SIZE>, PacketError> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| PacketError::BufferTooSmall)
    }

    /// Decode and validate a packet as written by the host
    pub fn decode(bytes: &[u8]) -> Result<Self, PacketError> {
        if bytes.len() < MIN_PACKET_SIZE {
            return Err(PacketError::Incomplete);
        }

        let body_len = bytes[1] as usize;
        if body_len != 1 && body_len != MAX_BODY_SIZE {
            return Err(PacketError::InvalidLength);
        }
        if bytes[0] != header_byte(body_len) {
            return Err(PacketError::InvalidHeader);
        }

        let packet_len = body_len + 3;
        if bytes.len() < packet_len {
            return Err(PacketError::Incomplete);
        }
        if bytes.len() > packet_len {
            return Err(PacketError::InvalidLength);
        }
        if checksum(bytes) != bytes[packet_len - 1] {
            return Err(PacketError::InvalidChecksum);
        }

        let command = bytes[2];
        if body_len == 1 {
            Ok(Self::query(command))
        } else {
            Ok(Self::with_value(command, join_value(bytes[3], bytes[4])))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_seed() {
        assert_eq!(CHECKSUM_SEED, 0x3F);
    }

    #[test]
    fn test_body_matches_encoded_len() {
        let query = DdcPacket::query(0x10);
        assert_eq!(query.body().unwrap().as_slice(), &[0x10]);
        assert_eq!(query.encoded_len(), 4);

        let set = DdcPacket::with_value(0x10, 0x1234);
        assert_eq!(set.body().unwrap().as_slice(), &[0x10, 0x12, 0x34]);
        assert_eq!(set.encoded_len(), 6);
        assert_eq!(set.encode_to_vec().unwrap().len(), set.encoded_len());
    }

    #[test]
    fn test_encode_brightness_query() {
        let packet = DdcPacket::query(0x10);
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let len = packet.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(buffer[0], 0x81); // header
        assert_eq!(buffer[1], 0x01); // length
        assert_eq!(buffer[2], 0x10); // command
        assert_eq!(buffer[3], 0x3F ^ 0x81 ^ 0x01 ^ 0x10);
    }

    #[test]
    fn test_encode_with_value() {
        let packet = DdcPacket::with_value(0x10, 0x1234);
        let encoded = packet.encode_to_vec().unwrap();

        assert_eq!(encoded.len(), 6);
        assert_eq!(encoded[0], 0x84);
        assert_eq!(encoded[1], 0x03);
        assert_eq!(&encoded[2..5], &[0x10, 0x12, 0x34]);
        assert_eq!(
            encoded[5],
            CHECKSUM_SEED ^ 0x84 ^ 0x03 ^ 0x10 ^ 0x12 ^ 0x34
        );
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let packet = DdcPacket::with_value(0x10, 50);
        let mut buffer = [0u8; 5];
        assert_eq!(packet.encode(&mut buffer), Err(PacketError::BufferTooSmall));
    }

    #[test]
    fn test_decode_roundtrip() {
        let original = DdcPacket::with_value(0x12, 75);
        let encoded = original.encode_to_vec().unwrap();
        assert_eq!(DdcPacket::decode(&encoded), Ok(original));
    }

    #[test]
    fn test_decode_invalid_checksum() {
        let mut encoded = DdcPacket::query(0x10).encode_to_vec().unwrap();
        let last_idx = encoded.len() - 1;
        encoded[last_idx] ^= 0xFF;
        assert_eq!(DdcPacket::decode(&encoded), Err(PacketError::InvalidChecksum));
    }

    #[test]
    fn test_decode_rejects_raw_bytes() {
        assert_eq!(
            DdcPacket::decode(&[0x01, 0x02, 0x03, 0x04, 0x05]),
            Err(PacketError::InvalidLength)
        );
        assert_eq!(DdcPacket::decode(&[0x81, 0x01]), Err(PacketError::Incomplete));
        assert_eq!(
            DdcPacket::decode(&[0x82, 0x01, 0x10, 0x00]),
            Err(PacketError::InvalidHeader)
        );
    }

    #[test]
    fn test_decode_truncated_value() {
        let encoded = DdcPacket::with_value(0x10, 1).encode_to_vec().unwrap();
        assert_eq!(DdcPacket::decode(&encoded[..5]), Err(PacketError::Incomplete));
    }

    #[test]
    fn test_value_split() {
        assert_eq!(split_value(0xABCD), [0xAB, 0xCD]);
        assert_eq!(join_value(0xAB, 0xCD), 0xABCD);
        assert_eq!(join_value(0, 0), 0);
    }
}
