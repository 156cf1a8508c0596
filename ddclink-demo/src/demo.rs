//! Demonstration sequence
//!
//! Exercises every core operation against one discovered display and
//! records the outcome of each step. Output is for the user only; the
//! outcomes themselves are typed.

use std::thread;

use ddclink_core::firmware::{self, Verification, MAX_BLOCK_SIZE};
use ddclink_core::{ddc, transport, Error, I2cChannel};
use ddclink_protocol::VcpReply;
use tracing::{debug, warn};

use crate::config::DemoConfig;
use crate::discovery::DiscoveredDisplay;

/// Bytes written by the raw write test
const RAW_TEST_DATA: [u8; 5] = [0x01, 0x02, 0x03, 0x04, 0x05];

/// Bytes requested by the raw read test
const RAW_READ_LEN: usize = 16;

/// Fill byte of the stress block
const STRESS_FILL: u8 = 0xAA;

/// Outcome of one demo step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// Step name
    pub name: &'static str,
    /// Whether the step did what it set out to do
    pub passed: bool,
}

/// Outcome of the whole sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Step outcomes, in order
    pub steps: Vec<StepResult>,
}

impl Summary {
    fn record(&mut self, name: &'static str, passed: bool) {
        self.steps.push(StepResult { name, passed });
    }

    /// Number of passed steps
    pub fn passed(&self) -> usize {
        self.steps.iter().filter(|s| s.passed).count()
    }

    /// Print a one-line-per-step report
    pub fn print(&self) {
        println!("\nSummary: {}/{} steps passed", self.passed(), self.steps.len());
        for step in &self.steps {
            let mark = if step.passed { "ok  " } else { "FAIL" };
            println!("  [{}] {}", mark, step.name);
        }
    }
}

/// Format bytes as `0x01 0x02 ...`
pub fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn report<T>(result: &Result<T, Error>) -> bool {
    match result {
        Ok(_) => {
            println!("Result: success");
            true
        }
        Err(e) => {
            println!("Result: failed ({})", e);
            false
        }
    }
}

/// Demo sequence runner
pub struct Demo<'a> {
    config: &'a DemoConfig,
}

impl<'a> Demo<'a> {
    /// Create a runner using `config`
    pub fn new(config: &'a DemoConfig) -> Self {
        Self { config }
    }

    /// Run every step against `display`
    ///
    /// When `brightness` is set, the brightness is changed and read back
    /// after the initial query.
    pub fn run<C: I2cChannel>(
        &self,
        display: &mut DiscoveredDisplay<C>,
        brightness: Option<u16>,
    ) -> Summary {
        println!(
            "\nTesting I2C communication with: {}",
            display.info.product_name
        );

        let mut summary = Summary::default();
        summary.record("raw write", self.raw_write(display));
        summary.record("raw read", self.raw_read(display));
        summary.record("brightness query", self.brightness_query(display).is_some());
        if let Some(value) = brightness {
            summary.record("brightness set", self.brightness_set(display, value));
        }
        summary.record("firmware write/verify", self.firmware_round_trip(display));
        summary.record("4 KiB transfer", self.large_transfer(display));
        summary.record("size ceiling", self.size_ceiling(display));
        summary
    }

    fn raw_write<C: I2cChannel>(&self, display: &mut DiscoveredDisplay<C>) -> bool {
        println!("\nTest 1: Basic I2C Write");
        let address = self.config.ddc.to_config().address;
        report(&transport::write(&mut display.handle(), address, &RAW_TEST_DATA))
    }

    fn raw_read<C: I2cChannel>(&self, display: &mut DiscoveredDisplay<C>) -> bool {
        println!("\nTest 2: Basic I2C Read");
        let chip = self.config.ddc.chip_address;
        match transport::read(&mut display.handle(), chip, 0, RAW_READ_LEN) {
            Ok(data) => {
                println!("Read {} bytes:", data.len());
                println!("  Data: {}", hex(&data));
                true
            }
            Err(e) => {
                println!("Read failed ({})", e);
                false
            }
        }
    }

    fn query_brightness<C: I2cChannel>(
        &self,
        display: &mut DiscoveredDisplay<C>,
    ) -> Result<Vec<u8>, Error> {
        let ddc_config = self.config.ddc.to_config();
        let mut handle = display.handle();

        ddc::send_command(
            &mut handle,
            &ddc_config,
            self.config.ddc.brightness_command,
            None,
        )?;
        debug!("Waiting {} ms for response", self.config.ddc.settle_delay_ms);
        thread::sleep(self.config.ddc.settle_delay());
        ddc::read_response(&mut handle, &ddc_config)
    }

    fn brightness_query<C: I2cChannel>(
        &self,
        display: &mut DiscoveredDisplay<C>,
    ) -> Option<VcpReply> {
        println!("\nTest 3: DDC/CI Brightness Query");
        let response = match self.query_brightness(display) {
            Ok(response) => response,
            Err(e) => {
                println!("DDC query failed ({})", e);
                return None;
            }
        };

        println!("DDC response received:");
        println!("  Raw data: {}", hex(&response));
        match VcpReply::parse(&response) {
            Ok(reply) => {
                println!("  Current Brightness: {}", reply.current);
                println!("  Maximum Brightness: {}", reply.maximum);
                Some(reply)
            }
            Err(e) => {
                warn!("Response is not a VCP reply: {}", e);
                None
            }
        }
    }

    fn brightness_set<C: I2cChannel>(
        &self,
        display: &mut DiscoveredDisplay<C>,
        value: u16,
    ) -> bool {
        println!("\nSetting brightness to {}", value);
        let ddc_config = self.config.ddc.to_config();
        let command = self.config.ddc.brightness_command;

        if !report(&ddc::set_value(
            &mut display.handle(),
            &ddc_config,
            command,
            value,
        )) {
            return false;
        }
        thread::sleep(self.config.ddc.settle_delay());

        match self.brightness_query(display) {
            Some(reply) if reply.current == value.min(reply.maximum) => true,
            Some(reply) => {
                warn!("Brightness reads back as {}, expected {}", reply.current, value);
                false
            }
            None => false,
        }
    }

    fn firmware_round_trip<C: I2cChannel>(&self, display: &mut DiscoveredDisplay<C>) -> bool {
        println!("\nTest 4: Firmware Block Operations");
        let fw_config = self.config.firmware.to_config();
        let address = self.config.firmware.address;
        let data: Vec<u8> = (0x00..=0xFF).collect();
        let mut handle = display.handle();

        println!("Writing {} bytes to firmware address 0x{:X}", data.len(), address);
        if let Err(e) = firmware::write_block(&mut handle, &fw_config, address, &data) {
            println!("Firmware write failed ({})", e);
            return false;
        }
        println!("Firmware write successful");

        println!("Verifying firmware block...");
        match firmware::verify_block(&mut handle, &fw_config, address, &data) {
            Verification::Matched => {
                println!("Firmware verification successful");
                true
            }
            Verification::Mismatch {
                offset,
                expected,
                found,
            } => {
                println!(
                    "Firmware verification failed at +{}: expected 0x{:02X}, found 0x{:02X}",
                    offset, expected, found
                );
                false
            }
            Verification::ReadFailed(e) => {
                println!("Firmware verification failed: read-back error ({})", e);
                false
            }
        }
    }

    fn large_transfer<C: I2cChannel>(&self, display: &mut DiscoveredDisplay<C>) -> bool {
        println!("\nTest 5: Large Data Transfer");
        let fw_config = self.config.firmware.to_config();
        let block = vec![STRESS_FILL; MAX_BLOCK_SIZE];

        println!("Testing maximum {} byte transfer...", MAX_BLOCK_SIZE);
        report(&firmware::write_block(
            &mut display.handle(),
            &fw_config,
            self.config.firmware.stress_address,
            &block,
        ))
    }

    fn size_ceiling<C: I2cChannel>(&self, display: &mut DiscoveredDisplay<C>) -> bool {
        println!("\nTest 6: Transfer Size Ceiling");
        let fw_config = self.config.firmware.to_config();
        let result = firmware::read_block(
            &mut display.handle(),
            &fw_config,
            self.config.firmware.stress_address,
            MAX_BLOCK_SIZE + 1,
        );

        match result {
            Err(Error::BlockTooLarge { len }) => {
                println!("{} byte request rejected before any transfer", len);
                true
            }
            other => {
                warn!("Oversized request was not rejected: {:?}", other.map(|v| v.len()));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse, DisplayEntry, FaultSetting, EMBEDDED_CONFIG};
    use crate::discovery::{DisplayDiscovery, SimulatedDiscovery};

    fn fast_config() -> DemoConfig {
        let mut config = parse(EMBEDDED_CONFIG).unwrap();
        config.ddc.settle_delay_ms = 0;
        config
    }

    #[test]
    fn test_hex() {
        assert_eq!(hex(&[0x01, 0xAB]), "0x01 0xAB");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_full_run_passes() {
        let config = fast_config();
        let mut displays = SimulatedDiscovery::new(&config).discover();

        let summary = Demo::new(&config).run(&mut displays[0], Some(75));

        assert_eq!(summary.steps.len(), 7);
        assert_eq!(summary.passed(), 7);
        let device = displays[0].channel().unwrap();
        assert_eq!(device.control_value(0x10), Some(75));
    }

    #[test]
    fn test_faulty_display_only_passes_ceiling() {
        let mut config = fast_config();
        config.displays = vec![DisplayEntry {
            fault: Some(FaultSetting::Nack),
            ..DisplayEntry::default()
        }];
        let mut displays = SimulatedDiscovery::new(&config).discover();

        let summary = Demo::new(&config).run(&mut displays[0], None);

        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.steps.last().unwrap().name, "size ceiling");
    }
}
