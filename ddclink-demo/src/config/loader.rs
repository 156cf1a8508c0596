//! Configuration loading
//!
//! Loads the demo configuration from a TOML file, or falls back to the
//! defaults embedded at build time.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use super::DemoConfig;

/// Embedded default configuration (compiled into the binary)
/// Edit displays.toml and rebuild to customize
pub const EMBEDDED_CONFIG: &str = include_str!("../../displays.toml");

/// Largest response the demo will request
const MAX_RESPONSE_LENGTH: usize = 256;

/// Load configuration from `path`, or the embedded defaults
pub fn load(path: Option<&Path>) -> Result<DemoConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            parse(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => {
            debug!("Using embedded configuration");
            parse(EMBEDDED_CONFIG).context("parsing embedded displays.toml")?
        }
    };

    log_config_summary(&config);
    Ok(config)
}

/// Parse and validate configuration text
pub fn parse(text: &str) -> Result<DemoConfig> {
    let config: DemoConfig = toml::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &DemoConfig) -> Result<()> {
    if config.ddc.chip_address > 0x7F {
        bail!(
            "ddc.chip_address 0x{:X} is not a 7-bit address",
            config.ddc.chip_address
        );
    }
    if config.firmware.chip_address > 0x7F {
        bail!(
            "firmware.chip_address 0x{:X} is not a 7-bit address",
            config.firmware.chip_address
        );
    }
    if config.ddc.response_length == 0 || config.ddc.response_length > MAX_RESPONSE_LENGTH {
        bail!(
            "ddc.response_length must be between 1 and {}",
            MAX_RESPONSE_LENGTH
        );
    }
    for entry in &config.displays {
        if entry.brightness > entry.max_brightness {
            bail!(
                "display {:?}: brightness {} exceeds max_brightness {}",
                entry.product_name,
                entry.brightness,
                entry.max_brightness
            );
        }
    }
    Ok(())
}

fn log_config_summary(config: &DemoConfig) {
    info!(
        "DDC chip 0x{:02X} data 0x{:02X}, response {} bytes, settle {} ms",
        config.ddc.chip_address,
        config.ddc.data_address,
        config.ddc.response_length,
        config.ddc.settle_delay_ms
    );
    debug!(
        "Firmware test at 0x{:X}, stress at 0x{:X}, {} display entr(ies)",
        config.firmware.address,
        config.firmware.stress_address,
        config.displays.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = parse(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.ddc.chip_address, 0x37);
        assert_eq!(config.ddc.data_address, 0x51);
        assert_eq!(config.firmware.address, 0x1000);
        assert!(config.displays.iter().any(|d| d.is_external()));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.ddc.response_length, 11);
        assert!(config.displays.is_empty());
    }

    #[test]
    fn test_sections_are_optional() {
        let config = parse("[[display]]\nproduct_name = \"Panel\"\n").unwrap();
        assert_eq!(config.ddc.chip_address, 0x37);
        assert_eq!(config.firmware.address, 0x1000);
        assert_eq!(config.displays.len(), 1);
    }

    #[test]
    fn test_fault_setting() {
        let config = parse(
            r#"
            [[display]]
            product_name = "Flaky"
            fault = "timeout"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.displays[0].fault,
            Some(super::super::FaultSetting::Timeout)
        );
    }

    #[test]
    fn test_rejects_wide_chip_address() {
        assert!(parse("[ddc]\nchip_address = 0xA0\n").is_err());
    }

    #[test]
    fn test_rejects_brightness_above_max() {
        let text = "[[display]]\nbrightness = 120\nmax_brightness = 100\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(parse("[ddc]\nretries = 3\n").is_err());
    }
}
