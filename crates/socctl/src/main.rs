//! `socctl` entry point.
//!
//! Binds the CPU clock and the thermal sensor against simulated firmware and
//! register backends built from configuration, then runs one command.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soc_common::config::PlatformConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Platform control command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "socctl",
    about = "Inspect and drive the firmware CPU clock and AVS thermal sensor",
    version,
    long_about = None
)]
struct Args {
    /// Path to a platform configuration file (TOML).
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, short = 'l', default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// CPU clock operations.
    #[command(subcommand)]
    Clock(ClockCommand),

    /// Thermal sensor operations.
    #[command(subcommand)]
    Thermal(ThermalCommand),

    /// Configuration helpers.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum ClockCommand {
    /// Print the current rate in Hz.
    Get,
    /// Request a rate and print the rate the firmware applied.
    Set {
        /// Requested rate in Hz.
        hz: u32,
    },
    /// Print the rate that would be used for a request.
    Round {
        /// Requested rate in Hz.
        hz: u32,
    },
}

#[derive(Subcommand, Debug)]
enum ThermalCommand {
    /// Print the temperature in millidegrees Celsius.
    Read {
        /// Raw status word to load into the simulated register (hex with 0x, or decimal).
        #[arg(long, value_parser = parse_u32)]
        raw: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
}

fn parse_u32(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid 32-bit value \"{s}\": {e}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting socctl");

    let config = load_config(&args)?;

    let output = match &args.command {
        Command::Clock(ClockCommand::Get) => commands::clock_get(&config),
        Command::Clock(ClockCommand::Set { hz }) => commands::clock_set(&config, *hz),
        Command::Clock(ClockCommand::Round { hz }) => commands::clock_round(&config, *hz),
        Command::Thermal(ThermalCommand::Read { raw }) => commands::thermal_read(&config, *raw),
        Command::Config(ConfigCommand::Show) => config.to_toml().context("Failed to render config"),
    }?;

    println!("{}", output.trim_end());
    Ok(())
}

/// Crates whose spans and events `--log-level` controls.
const LOG_TARGETS: [&str; 4] = ["socctl", "soc_clk", "soc_thermal", "soc_common"];

/// Install the stderr subscriber. `RUST_LOG` overrides `--log-level`.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect();
        tracing_subscriber::EnvFilter::new(directives.join(","))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Where the effective configuration comes from.
#[derive(Debug, PartialEq, Eq)]
enum ConfigSource {
    /// `--config`; must exist.
    Explicit(PathBuf),
    /// First existing candidate from `SOC_CONFIG_PATH`, the system path or
    /// the working directory.
    Discovered(PathBuf),
    /// No file found.
    Defaults,
}

/// Pick the configuration source.
///
/// `--config` wins outright. Otherwise `SOC_CONFIG_PATH`, then
/// `/etc/soc/config.toml`, then `config/default.toml` are tried in order.
fn resolve_config(explicit: Option<&Path>, env_path: Option<PathBuf>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }
    env_path
        .into_iter()
        .chain(["/etc/soc/config.toml", "config/default.toml"].map(PathBuf::from))
        .find(|candidate| {
            let found = candidate.is_file();
            if !found {
                debug!(path = %candidate.display(), "Config candidate not found");
            }
            found
        })
        .map_or(ConfigSource::Defaults, ConfigSource::Discovered)
}

fn load_config(args: &Args) -> Result<PlatformConfig> {
    let env_path = std::env::var_os("SOC_CONFIG_PATH").map(PathBuf::from);
    match resolve_config(args.config.as_deref(), env_path) {
        ConfigSource::Explicit(path) | ConfigSource::Discovered(path) => {
            info!(path = %path.display(), "Loading config");
            PlatformConfig::from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        ConfigSource::Defaults => {
            info!("No config file found, using built-in defaults");
            Ok(PlatformConfig::default())
        }
    }
}
