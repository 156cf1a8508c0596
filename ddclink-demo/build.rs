//! Build script for ddclink-demo
//!
//! Validates displays.toml at compile time, since it is embedded into the
//! binary as the default configuration.

use std::fs;
use std::path::Path;

fn main() {
    validate_config();
}

/// Validate displays.toml configuration at compile time
fn validate_config() {
    // Re-run if displays.toml changes
    println!("cargo:rerun-if-changed=displays.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("displays.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: displays.toml could not be read                          ║\n\
                ║                                                                  ║\n\
                ║  The demo embeds displays.toml as its default configuration.     ║\n\
                ║  Please create one in the ddclink-demo directory.                ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}",
                e
            );
        }
    };

    let table: toml::Table = match config_content.parse() {
        Ok(table) => table,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: displays.toml is not valid TOML                          ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}",
                e
            );
        }
    };

    // Sections are optional (defaults apply) but must be tables when present
    for section in ["ddc", "firmware"] {
        if table.get(section).is_some_and(|v| !v.is_table()) {
            panic!("displays.toml: [{}] must be a table", section);
        }
    }

    let displays = table
        .get("display")
        .and_then(toml::Value::as_array)
        .map(Vec::len)
        .unwrap_or(0);
    if displays == 0 {
        println!("cargo:warning=displays.toml declares no [[display]] entries");
    }
}
