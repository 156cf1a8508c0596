//! Injectable I2C faults
//!
//! Maps bus-level failure kinds onto the platform status codes a real
//! display service would report.

use ddclink_hal::TransportStatus;

/// Fault to inject into simulated transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimFault {
    /// Device did not acknowledge
    Nack,
    /// Transfer timed out
    Timeout,
    /// Bus error
    Bus,
    /// Specific raw status
    Status(TransportStatus),
}

/// `kIOReturnTimeout`
const STATUS_TIMEOUT: TransportStatus = TransportStatus(0xE000_02D6_u32 as i32);

impl From<SimFault> for TransportStatus {
    fn from(fault: SimFault) -> Self {
        match fault {
            SimFault::Nack => TransportStatus::NOT_RESPONDING,
            SimFault::Timeout => STATUS_TIMEOUT,
            SimFault::Bus => TransportStatus::ERROR,
            SimFault::Status(status) => status,
        }
    }
}
