//! drishti-scan - interactive 3D scanner session
//!
//! Opens the rig's serial port (configured or auto-detected), waits for the
//! firmware to settle, and hands control to the command shell on stdin.

use drishti_scan::config::AppConfig;
use drishti_scan::error::{Error, Result};
use drishti_scan::rig::{discovery, RigDriver, SerialTransport};
use drishti_scan::shell::ScannerShell;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `drishti-scan <path>` (positional)
/// - `drishti-scan --config <path>` (flag-based)
/// - `drishti-scan -c <path>` (short flag)
///
/// Defaults to `scanner.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "scanner.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = if Path::new(&config_path).exists() {
        AppConfig::from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.clone()),
    )
    .init();

    if Path::new(&config_path).exists() {
        log::info!("Using config: {}", config_path);
    } else {
        log::info!("No config at {}, using defaults", config_path);
    }

    let port = match config.hardware.port.clone() {
        Some(port) => port,
        None => discovery::find_port().ok_or(Error::NoDeviceFound)?,
    };

    let transport = SerialTransport::open(&port, config.hardware.baud_rate)?;

    // The rig firmware resets when the port opens; give it time to come up
    log::info!(
        "Connecting to {}, waiting {} ms for the rig to settle",
        port,
        config.hardware.settle_delay_ms
    );
    std::thread::sleep(Duration::from_millis(config.hardware.settle_delay_ms));

    let driver = RigDriver::new(
        transport,
        Duration::from_millis(config.hardware.read_timeout_ms),
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    ScannerShell::new(driver, config).run(stdin.lock(), stdout.lock())?;

    Ok(())
}
