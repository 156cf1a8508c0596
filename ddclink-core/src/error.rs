//! Error taxonomy for channel operations

use core::fmt;

use ddclink_hal::TransportStatus;
use ddclink_protocol::{PacketError, ReplyError};

/// Errors returned by transport, DDC and firmware block operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No service handle was supplied; nothing was transferred
    Unavailable,
    /// The channel reported a non-success status
    Transport(TransportStatus),
    /// Firmware block larger than the transfer ceiling; nothing was transferred
    BlockTooLarge {
        /// Requested length in bytes
        len: usize,
    },
    /// Packet could not be framed
    Packet(PacketError),
    /// Response is not a VCP reply
    Reply(ReplyError),
}

impl Error {
    /// Whether the request was rejected before any I/O
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::Unavailable | Error::BlockTooLarge { .. })
    }

    /// Raw channel status, if the transfer itself failed
    pub fn status(&self) -> Option<TransportStatus> {
        match self {
            Error::Transport(status) => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportStatus> for Error {
    fn from(status: TransportStatus) -> Self {
        Error::Transport(status)
    }
}

impl From<PacketError> for Error {
    fn from(e: PacketError) -> Self {
        Error::Packet(e)
    }
}

impl From<ReplyError> for Error {
    fn from(e: ReplyError) -> Self {
        Error::Reply(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unavailable => f.write_str("no display service available"),
            Error::Transport(status) => write!(f, "I2C transfer failed with status {}", status),
            Error::BlockTooLarge { len } => write!(
                f,
                "firmware block too large: {} bytes (max {})",
                len,
                crate::firmware::MAX_BLOCK_SIZE
            ),
            Error::Packet(e) => write!(f, "DDC framing failed: {}", e),
            Error::Reply(e) => write!(f, "invalid DDC response: {}", e),
        }
    }
}

impl core::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let too_large = Error::BlockTooLarge { len: 4097 };
        let transport = Error::from(TransportStatus::ERROR);

        assert!(too_large.is_precondition());
        assert!(Error::Unavailable.is_precondition());
        assert!(!transport.is_precondition());
        assert_eq!(transport.status(), Some(TransportStatus::ERROR));
        assert_eq!(too_large.status(), None);
    }
}
