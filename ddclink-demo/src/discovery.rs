//! Display service discovery
//!
//! Discovery yields, per display, descriptive metadata and an optional
//! opened channel. The demo ships a simulated discovery backed by
//! [`SimDisplay`]; platform backends implement [`DisplayDiscovery`] the
//! same way.

use ddclink_core::{I2cChannel, ServiceHandle};
use ddclink_hal_sim::SimDisplay;
use ddclink_protocol::VCP_BRIGHTNESS;
use tracing::{info, warn};

use crate::config::DemoConfig;

/// Descriptive metadata for one display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Sequential display id (1-based)
    pub display_id: u32,
    /// EDID UUID
    pub edid_uuid: String,
    /// Product name
    pub product_name: String,
    /// Manufacturer id
    pub manufacturer_id: String,
    /// Physical connection location
    pub location: String,
}

/// A discovered display and its channel, if one could be opened
pub struct DiscoveredDisplay<C> {
    /// Metadata
    pub info: DisplayInfo,
    channel: Option<C>,
}

impl<C: I2cChannel> DiscoveredDisplay<C> {
    /// Create a discovered display
    pub fn new(info: DisplayInfo, channel: Option<C>) -> Self {
        Self { info, channel }
    }

    /// Whether a channel is available
    pub fn is_attached(&self) -> bool {
        self.channel.is_some()
    }

    /// Borrow the channel as a service handle
    pub fn handle(&mut self) -> ServiceHandle<'_, C> {
        ServiceHandle::from_option(self.channel.as_mut())
    }

    /// The underlying channel
    #[cfg(test)]
    pub fn channel(&self) -> Option<&C> {
        self.channel.as_ref()
    }
}

/// Source of display services
pub trait DisplayDiscovery {
    /// Channel type handed out
    type Channel: I2cChannel;

    /// Enumerate external displays
    fn discover(&self) -> Vec<DiscoveredDisplay<Self::Channel>>;
}

/// Discovery over the `[[display]]` entries of the demo configuration
pub struct SimulatedDiscovery<'a> {
    config: &'a DemoConfig,
}

impl<'a> SimulatedDiscovery<'a> {
    /// Create a discovery over `config`
    pub fn new(config: &'a DemoConfig) -> Self {
        Self { config }
    }
}

impl DisplayDiscovery for SimulatedDiscovery<'_> {
    type Channel = SimDisplay;

    fn discover(&self) -> Vec<DiscoveredDisplay<SimDisplay>> {
        info!("Searching for display services...");

        let mut found = Vec::new();
        for entry in self.config.displays.iter().filter(|e| e.is_external()) {
            let info = DisplayInfo {
                display_id: found.len() as u32 + 1,
                edid_uuid: entry.edid_uuid.clone(),
                product_name: entry.product_name.clone(),
                manufacturer_id: entry.manufacturer_id.clone(),
                location: entry.location.clone(),
            };

            let channel = entry.attached.then(|| {
                let mut display = SimDisplay::new()
                    .with_chip_address(self.config.ddc.chip_address)
                    .with_control(VCP_BRIGHTNESS, entry.brightness, entry.max_brightness);
                if let Some(fault) = entry.fault {
                    display.fail_with(fault.into());
                }
                display
            });
            if channel.is_none() {
                warn!("No channel for {}", info.product_name);
            }

            info!("Found display service {}: {}", info.display_id, info.product_name);
            found.push(DiscoveredDisplay::new(info, channel));
        }

        if found.is_empty() {
            warn!("No display services found");
        }
        found
    }
}
