//! VCP (Virtual Control Panel) reply layout
//!
//! A display answers a VCP query with an 11-byte reply read back from
//! offset 0 of the DDC chip address:
//! ```text
//! ┌─────┬──────┬────────┬────────┬──────┬──────┬─────────┬─────────┬──────────┐
//! │ TAG │ LEN  │ OPCODE │ RESULT │ CODE │ TYPE │ MAX     │ CURRENT │ CHECKSUM │
//! │0x6F │ 0x88 │ 0x02   │ 1B     │ 1B   │ 1B   │ 2B (BE) │ 2B (BE) │ 1B       │
//! └─────┴──────┴────────┴────────┴──────┴──────┴─────────┴─────────┴──────────┘
//! ```
//!
//! Parsing only checks the tag and the length; the checksum is not
//! validated.

use core::fmt;

use crate::packet::{join_value, split_value, HEADER_FLAG};

/// First byte of a VCP reply
pub const VCP_REPLY_TAG: u8 = 0x6F;

/// Length of a complete VCP reply
pub const VCP_REPLY_LEN: usize = 11;

/// Opcode of a "get VCP feature" reply
pub const VCP_REPLY_OPCODE: u8 = 0x02;

/// Checksum seed for display-originated replies (host address 0x50)
pub const REPLY_CHECKSUM_SEED: u8 = 0x50;

/// Luminance control
pub const VCP_BRIGHTNESS: u8 = 0x10;

/// Contrast control
pub const VCP_CONTRAST: u8 = 0x12;

/// Bytes needed to reach the current value field
const MIN_REPLY_LEN: usize = 10;

/// Errors from reply parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// Fewer bytes than the value fields need
    TooShort,
    /// First byte is not the reply tag
    BadTag(u8),
}

impl fmt::Display for ReplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplyError::TooShort => f.write_str("VCP reply too short"),
            ReplyError::BadTag(tag) => write!(f, "unexpected VCP reply tag 0x{:02X}", tag),
        }
    }
}

impl core::error::Error for ReplyError {}

/// Parsed VCP reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VcpReply {
    /// Result code (0 = supported)
    pub result: u8,
    /// VCP code this reply is for
    pub code: u8,
    /// VCP type (0 = set parameter, 1 = momentary)
    pub kind: u8,
    /// Maximum value
    pub maximum: u16,
    /// Current value
    pub current: u16,
}

impl VcpReply {
    /// Reply for a supported continuous control
    pub const fn new(code: u8, current: u16, maximum: u16) -> Self {
        Self {
            result: 0,
            code,
            kind: 0,
            maximum,
            current,
        }
    }

    /// Parse a raw response buffer
    pub fn parse(bytes: &[u8]) -> Result<Self, ReplyError> {
        if bytes.len() < MIN_REPLY_LEN {
            return Err(ReplyError::TooShort);
        }
        if bytes[0] != VCP_REPLY_TAG {
            return Err(ReplyError::BadTag(bytes[0]));
        }

        Ok(Self {
            result: bytes[3],
            code: bytes[4],
            kind: bytes[5],
            maximum: join_value(bytes[6], bytes[7]),
            current: join_value(bytes[8], bytes[9]),
        })
    }

    /// Whether the display reported the control as supported
    pub fn is_supported(&self) -> bool {
        self.result == 0
    }

    /// Encode as the display would send it
    pub fn encode(&self) -> [u8; VCP_REPLY_LEN] {
        let [max_hi, max_lo] = split_value(self.maximum);
        let [cur_hi, cur_lo] = split_value(self.current);
        let mut reply = [
            VCP_REPLY_TAG,
            HEADER_FLAG | 0x08,
            VCP_REPLY_OPCODE,
            self.result,
            self.code,
            self.kind,
            max_hi,
            max_lo,
            cur_hi,
            cur_lo,
            0,
        ];
        let sum = reply[..VCP_REPLY_LEN - 1]
            .iter()
            .fold(REPLY_CHECKSUM_SEED, |acc, &b| acc ^ b);
        reply[VCP_REPLY_LEN - 1] = sum;
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_brightness_reply() {
        let raw = [
            0x6F, 0x88, 0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32, 0x00,
        ];
        let reply = VcpReply::parse(&raw).unwrap();
        assert_eq!(reply.code, VCP_BRIGHTNESS);
        assert_eq!(reply.maximum, 100);
        assert_eq!(reply.current, 50);
        assert!(reply.is_supported());
    }

    #[test]
    fn test_parse_needs_ten_bytes() {
        let raw = [0x6F, 0x88, 0x02, 0x00, 0x10, 0x00, 0x01, 0x00, 0x00];
        assert_eq!(VcpReply::parse(&raw), Err(ReplyError::TooShort));

        // Checksum byte is not required
        let raw = [0x6F, 0x88, 0x02, 0x00, 0x10, 0x00, 0x01, 0x00, 0x00, 0x80];
        assert_eq!(VcpReply::parse(&raw).unwrap().current, 0x80);
    }

    #[test]
    fn test_parse_bad_tag() {
        let raw = [0xFF; VCP_REPLY_LEN];
        assert_eq!(VcpReply::parse(&raw), Err(ReplyError::BadTag(0xFF)));
    }

    #[test]
    fn test_encode_layout() {
        let reply = VcpReply::new(VCP_CONTRAST, 0x0102, 0x0304);
        let raw = reply.encode();

        assert_eq!(raw[0], VCP_REPLY_TAG);
        assert_eq!(raw[1], 0x88);
        assert_eq!(raw[4], VCP_CONTRAST);
        assert_eq!(&raw[6..10], &[0x03, 0x04, 0x01, 0x02]);
        let expected = raw[..10].iter().fold(REPLY_CHECKSUM_SEED, |a, &b| a ^ b);
        assert_eq!(raw[10], expected);
        assert_eq!(VcpReply::parse(&raw), Ok(reply));
    }
}
