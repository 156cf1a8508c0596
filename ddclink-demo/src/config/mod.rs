//! Demo configuration
//!
//! Parsed from TOML. Every field has a default, so an empty file yields
//! the DDC/CI conventions and no displays.

mod loader;

pub use loader::{load, parse, EMBEDDED_CONFIG};

use std::time::Duration;

use ddclink_core::{ddc, DdcConfig, FirmwareConfig, I2cAddress};
use ddclink_hal::{DDC_CHIP_ADDRESS, DDC_DATA_ADDRESS};
use ddclink_hal_sim::SimFault;
use ddclink_protocol::{VCP_BRIGHTNESS, VCP_REPLY_LEN};
use serde::Deserialize;

/// Complete demo configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// DDC/CI settings
    pub ddc: DdcSection,
    /// Firmware block settings
    pub firmware: FirmwareSection,
    /// Simulated displays
    #[serde(rename = "display")]
    pub displays: Vec<DisplayEntry>,
}

/// `[ddc]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DdcSection {
    /// 7-bit chip address
    pub chip_address: u8,
    /// Data address commands are written to
    pub data_address: u32,
    /// Bytes read back for a response
    pub response_length: usize,
    /// Wait between command and response read
    pub settle_delay_ms: u64,
    /// Command used for the brightness query
    pub brightness_command: u8,
}

impl Default for DdcSection {
    fn default() -> Self {
        Self {
            chip_address: DDC_CHIP_ADDRESS,
            data_address: DDC_DATA_ADDRESS as u32,
            response_length: VCP_REPLY_LEN,
            settle_delay_ms: u64::from(ddc::DEFAULT_SETTLE_MS),
            brightness_command: VCP_BRIGHTNESS,
        }
    }
}

impl DdcSection {
    /// Core DDC configuration
    pub fn to_config(&self) -> DdcConfig {
        DdcConfig {
            address: I2cAddress::new(self.chip_address, self.data_address),
            response_len: self.response_length,
        }
    }

    /// Settle delay as a duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// `[firmware]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirmwareSection {
    /// Chip address blocks go through
    pub chip_address: u8,
    /// Address of the 256-byte write/verify test
    pub address: u32,
    /// Address of the 4 KiB stress write
    pub stress_address: u32,
}

impl Default for FirmwareSection {
    fn default() -> Self {
        Self {
            chip_address: DDC_CHIP_ADDRESS,
            address: 0x1000,
            stress_address: 0x2000,
        }
    }
}

impl FirmwareSection {
    /// Core firmware configuration
    pub fn to_config(&self) -> FirmwareConfig {
        FirmwareConfig {
            chip_address: self.chip_address,
        }
    }
}

/// Fault injected into a simulated display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultSetting {
    /// Device never acknowledges
    Nack,
    /// Transfers time out
    Timeout,
    /// Bus error
    Bus,
}

impl From<FaultSetting> for SimFault {
    fn from(fault: FaultSetting) -> Self {
        match fault {
            FaultSetting::Nack => SimFault::Nack,
            FaultSetting::Timeout => SimFault::Timeout,
            FaultSetting::Bus => SimFault::Bus,
        }
    }
}

/// One `[[display]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayEntry {
    /// Product name from the display attributes
    pub product_name: String,
    /// Manufacturer id from the display attributes
    pub manufacturer_id: String,
    /// EDID UUID
    pub edid_uuid: String,
    /// Physical connection location ("External", "Embedded", ...)
    pub location: String,
    /// Whether a management channel could be opened
    pub attached: bool,
    /// Initial brightness
    pub brightness: u16,
    /// Maximum brightness
    pub max_brightness: u16,
    /// Fault every transfer fails with
    pub fault: Option<FaultSetting>,
}

impl Default for DisplayEntry {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            manufacturer_id: String::new(),
            edid_uuid: String::new(),
            location: "External".into(),
            attached: true,
            brightness: 50,
            max_brightness: 100,
            fault: None,
        }
    }
}

impl DisplayEntry {
    /// Whether discovery reports this display
    pub fn is_external(&self) -> bool {
        self.location == "External"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_ddc() {
        let config = DemoConfig::default();
        let ddc = config.ddc.to_config();
        assert_eq!(ddc, DdcConfig::default());
        assert_eq!(config.firmware.to_config(), FirmwareConfig::default());
        assert_eq!(config.ddc.settle_delay(), Duration::from_millis(50));
        assert!(config.displays.is_empty());
    }

    #[test]
    fn test_display_defaults() {
        let entry = DisplayEntry::default();
        assert!(entry.is_external());
        assert!(entry.attached);
        assert_eq!(entry.fault, None);
    }
}
