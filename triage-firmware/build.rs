//! Build script for triage-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates triage.toml and bakes it into the firmware as a constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use triage_core::config::FirmwareConfig;

/// Sections accepted in triage.toml
const KNOWN_SECTIONS: &[&str] = &["timing", "link", "movement", "sensors", "actuators"];

fn main() {
    setup_linker();
    let config = load_config();
    write_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate triage.toml
///
/// A missing file means factory defaults; anything present must parse and
/// describe a usable device.
fn load_config() -> FirmwareConfig {
    println!("cargo:rerun-if-changed=triage.toml");

    let config_path = Path::new("triage.toml");
    if !config_path.exists() {
        println!("cargo:warning=triage.toml not found, using factory defaults");
        return FirmwareConfig::default();
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read triage.toml", &e.to_string()),
    };

    let raw: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("Invalid TOML syntax in triage.toml", &e.to_string()),
    };
    check_sections(&raw);

    let config: FirmwareConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => fail("Invalid value in triage.toml", &e.to_string()),
    };

    if let Err(e) = config.validate() {
        fail("Unusable configuration in triage.toml", &e.to_string());
    }

    println!("cargo:warning=triage.toml validated successfully");
    config
}

/// Reject sections the firmware does not know, usually typos
fn check_sections(raw: &toml::Value) {
    let Some(table) = raw.as_table() else {
        return;
    };

    let errors: Vec<String> = table
        .keys()
        .filter(|key| !KNOWN_SECTIONS.contains(&key.as_str()))
        .map(|key| format!("unknown section [{}]", key))
        .collect();

    if !errors.is_empty() {
        fail("Unknown sections in triage.toml", &errors.join("\n"));
    }
}

/// Emit the validated configuration as a Rust constant
///
/// The `Debug` rendering of the config types is a valid struct literal, so
/// it is written out verbatim.
fn write_config(config: &FirmwareConfig) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let source = format!(
        "/// Configuration baked in from triage.toml\n\
         pub const FIRMWARE_CONFIG: FirmwareConfig = {:?};\n",
        config
    );
    fs::write(out_dir.join("config.rs"), source).unwrap();
}

/// Abort the build with a boxed error banner
fn fail(title: &str, detail: &str) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(detail)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
