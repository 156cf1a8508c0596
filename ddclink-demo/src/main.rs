//! ddclink demo
//!
//! Discovers external displays, then runs raw I2C, DDC/CI and firmware
//! block transfers against the selected one.
//!
//! Displays are simulated from `displays.toml` (embedded at build time,
//! or passed with `--config`). Set `RUST_LOG` to adjust log output.

mod config;
mod demo;
mod discovery;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;
use crate::demo::{Demo, Summary};
use crate::discovery::{DiscoveredDisplay, DisplayDiscovery, SimulatedDiscovery};

#[derive(Parser)]
#[command(name = "ddclink-demo")]
#[command(about = "DDC/CI and firmware block transfer demo")]
struct Cli {
    /// Configuration file (defaults to the embedded displays.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Index of the display to test, in discovery order
    #[arg(short, long, default_value_t = 0)]
    display: usize,

    /// Set brightness to this value after the query step
    #[arg(short, long)]
    brightness: Option<u16>,

    /// Print the effective core configuration and exit
    #[arg(long)]
    dump_config: bool,
}

/// Effective core configuration, as handed to the library
#[derive(Serialize)]
struct CoreConfig {
    ddc: ddclink_core::DdcConfig,
    firmware: ddclink_core::FirmwareConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// How a demo invocation ended
#[derive(Debug)]
enum Outcome {
    /// Configuration was printed
    Dumped,
    /// No external display with an open channel was found
    NoDisplays,
    /// The demo sequence ran
    Completed(Summary),
}

impl Outcome {
    fn is_success(&self) -> bool {
        !matches!(self, Outcome::NoDisplays)
    }

    fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = config::load(cli.config.as_deref())?;
    let outcome = execute(&config, &cli)?;
    if let Outcome::Completed(summary) = &outcome {
        summary.print();
    }
    Ok(outcome.exit_code())
}

fn execute(config: &DemoConfig, cli: &Cli) -> Result<Outcome> {
    if cli.dump_config {
        dump_config(config)?;
        return Ok(Outcome::Dumped);
    }

    let mut displays = SimulatedDiscovery::new(config).discover();
    if !displays.iter().any(DiscoveredDisplay::is_attached) {
        println!("No external displays found");
        return Ok(Outcome::NoDisplays);
    }

    println!("Found {} external display(s)", displays.len());
    print_displays(&displays);

    let count = displays.len();
    let Some(display) = displays.get_mut(cli.display) else {
        bail!(
            "display index {} out of range ({} display(s) found)",
            cli.display,
            count
        );
    };
    if !display.is_attached() {
        println!("Warning: no channel for {}", display.info.product_name);
    }

    let display_id = display.info.display_id;
    info!("Running demo on display {}", display_id);
    let summary = Demo::new(config).run(display, cli.brightness);
    Ok(Outcome::Completed(summary))
}

fn print_displays<C>(displays: &[DiscoveredDisplay<C>]) {
    for (index, display) in displays.iter().enumerate() {
        let info = &display.info;
        println!("\nDisplay {}:", index + 1);
        println!("  Display ID: {}", info.display_id);
        println!("  EDID UUID: {}", info.edid_uuid);
        println!("  Product Name: {}", info.product_name);
        println!("  Manufacturer ID: {}", info.manufacturer_id);
        println!("  Location: {}", info.location);
    }
}

fn dump_config(config: &DemoConfig) -> Result<()> {
    let core = CoreConfig {
        ddc: config.ddc.to_config(),
        firmware: config.firmware.to_config(),
    };
    let text = toml::to_string(&core).context("serializing configuration")?;
    print!("{}", text);
    Ok(())
}
