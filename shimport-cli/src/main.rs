//! shimport CLI - Command-line tool for resolving serial ports.
//!
//! ## Features
//!
//! - List serial ports, optionally filtered, as text or JSON
//! - Resolve a port by explicit name, environment variable or match criteria
//! - Resolve the port of a paired Bluetooth device
//! - Shell completion generation
//!
//! The resolved port is the only thing written to stdout, so the tool can be
//! used as `$(shimport resolve --vid 0x10C4)` in scripts.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use console::style;
use env_logger::Env;
use log::debug;
use shimport::MatchCriteria;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

mod commands;
mod config;

use config::Config;

/// Errors raised by the CLI itself (as opposed to the resolver).
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Invalid invocation or configuration; exit code 2.
    #[error("{0}")]
    Usage(String),
}

/// shimport - Resolve a device's serial connection to a concrete port.
///
/// Environment variables:
///   PYSHIMMER_PORT     - Port used by `resolve` when --port is not given
///   PYSHIMMER_BT_PORT  - Port used by `bluetooth` when --port is not given
///   RUST_LOG           - Log filter (overrides -v/-q)
#[derive(Parser)]
#[command(name = "shimport")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output level (-v, -vv for increasing detail).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file.
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Port match criteria shared by several commands.
#[derive(Args, Clone, Debug, Default)]
struct CriteriaArgs {
    /// Case-insensitive substring matched against port metadata.
    #[arg(long = "match", value_name = "TEXT")]
    pattern: Option<String>,

    /// USB vendor ID (hex, e.g. 0x10C4).
    #[arg(long, value_parser = parse_hex_u16)]
    vid: Option<u16>,

    /// USB product ID (hex, e.g. 0xEA60).
    #[arg(long, value_parser = parse_hex_u16)]
    pid: Option<u16>,
}

impl CriteriaArgs {
    /// Combine with `defaults`, flags taking precedence field by field.
    fn with_defaults(&self, defaults: MatchCriteria) -> MatchCriteria {
        MatchCriteria {
            pattern: self.pattern.clone().or(defaults.pattern),
            vendor_id: self.vid.or(defaults.vendor_id),
            product_id: self.pid.or(defaults.product_id),
        }
    }
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List available serial ports.
    ListPorts {
        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Output port list as JSON to stdout.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a serial port and print it.
    Resolve {
        /// Explicit port (skips enumeration).
        #[arg(short, long)]
        port: Option<String>,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Environment variable holding the port (default: PYSHIMMER_PORT).
        #[arg(long, value_name = "NAME")]
        env_var: Option<String>,
    },

    /// Resolve the serial port of a paired Bluetooth device and print it.
    Bluetooth {
        /// Explicit port (skips enumeration).
        #[arg(short, long)]
        port: Option<String>,

        /// Environment variable holding the port (default: PYSHIMMER_BT_PORT).
        #[arg(long, value_name = "NAME")]
        env_var: Option<String>,

        /// Print pairing advice for this platform and exit.
        #[arg(long)]
        hint: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type for completions.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Parse a hexadecimal USB id (supports 0x prefix and underscores).
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Invalid hex id: {s}"));
    }
    u16::from_str_radix(&digits, 16).map_err(|e| format!("Invalid hex id: {e}"))
}

/// Map an error to the process exit code.
///
/// Usage problems and failed disambiguation exit with 2 so scripts can tell
/// them apart from enumeration failures (1).
fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<CliError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<shimport::Error>() {
        Some(resolve_err) if resolve_err.is_usage_error() => 2,
        _ => 1,
    }
}

fn init_logging(cli: &Cli) {
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(if cli.verbose >= 2 {
            Some(env_logger::TimestampPrecision::Millis)
        } else {
            None
        })
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = if let Some(ref path) = cli.config_path {
        if !path.exists() {
            return Err(CliError::Usage(format!(
                "Config file not found: {}",
                path.display()
            ))
            .into());
        }
        Config::load_from_path(path)
    } else {
        Config::load()
    };

    match &cli.command {
        Commands::ListPorts { criteria, json } => {
            commands::ports::cmd_list_ports(&criteria.with_defaults(MatchCriteria::new()), *json)
        },
        Commands::Resolve {
            port,
            criteria,
            env_var,
        } => commands::resolve::cmd_resolve(
            port.as_deref(),
            criteria.with_defaults(config.serial.criteria()),
            env_var.as_deref().or(config.serial.env_var.as_deref()),
        ),
        Commands::Bluetooth {
            port,
            env_var,
            hint,
        } => {
            if *hint {
                commands::resolve::cmd_bluetooth_hint();
                return Ok(());
            }
            commands::resolve::cmd_bluetooth(
                port.as_deref(),
                env_var.as_deref().or(config.bluetooth.env_var.as_deref()),
            )
        },
        Commands::Completions { shell } => {
            commands::completions::cmd_completions(*shell);
            Ok(())
        },
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --- NO_COLOR and TTY detection ---
    if env::var("NO_COLOR").is_ok() || !console::Term::stderr().is_term() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    init_logging(&cli);

    debug!(
        "shimport v{} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        cli.verbose
    );

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            ExitCode::from(exit_code(&err))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- parse_hex_u16 ----

    #[test]
    fn test_parse_hex_u16() {
        assert_eq!(parse_hex_u16("0x10C4"), Ok(0x10C4));
        assert_eq!(parse_hex_u16("0XEA60"), Ok(0xEA60));
        assert_eq!(parse_hex_u16("ea60"), Ok(0xEA60));
        assert_eq!(parse_hex_u16("0x04_03"), Ok(0x0403));
        assert!(parse_hex_u16("0x10000").is_err());
        assert!(parse_hex_u16("cp210x").is_err());
    }

    #[test]
    fn test_parse_hex_u16_rejects_malformed_prefixes() {
        assert!(parse_hex_u16("0x0x10").is_err());
        assert!(parse_hex_u16("+10").is_err());
        assert!(parse_hex_u16("0x+10").is_err());
        assert!(parse_hex_u16("0x").is_err());
        assert!(parse_hex_u16("").is_err());
    }

    // ---- argument parsing ----

    #[test]
    fn test_parse_list_ports() {
        let cli = Cli::try_parse_from(["shimport", "list-ports", "--json", "--vid", "0x0403"])
            .unwrap();
        match cli.command {
            Commands::ListPorts { criteria, json } => {
                assert!(json);
                assert_eq!(criteria.vid, Some(0x0403));
                assert!(criteria.pattern.is_none());
            },
            _ => panic!("Expected ListPorts command"),
        }
    }

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::try_parse_from([
            "shimport", "resolve", "--match", "dock", "--pid", "6001", "--env-var", "DOCK_PORT",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve {
                port,
                criteria,
                env_var,
            } => {
                assert!(port.is_none());
                assert_eq!(criteria.pattern.as_deref(), Some("dock"));
                assert_eq!(criteria.pid, Some(0x6001));
                assert_eq!(env_var.as_deref(), Some("DOCK_PORT"));
            },
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_parse_bluetooth_with_global_flags() {
        let cli = Cli::try_parse_from(["shimport", "bluetooth", "-p", "COM12", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Bluetooth { port: Some(ref p), hint: false, .. } if p == "COM12"
        ));
    }

    #[test]
    fn test_parse_rejects_bad_vid() {
        assert!(Cli::try_parse_from(["shimport", "resolve", "--vid", "zz"]).is_err());
    }

    // ---- criteria precedence ----

    #[test]
    fn test_criteria_flags_override_defaults() {
        let args = CriteriaArgs {
            pattern: Some("ftdi".to_string()),
            vid: None,
            pid: Some(0x6001),
        };
        let defaults = MatchCriteria::matching("cp210").vendor_id(0x10C4).product_id(0xEA60);
        let criteria = args.with_defaults(defaults);
        assert_eq!(
            criteria,
            MatchCriteria::matching("ftdi").vendor_id(0x10C4).product_id(0x6001)
        );
    }

    #[test]
    fn test_empty_criteria_args_keep_empty() {
        let criteria = CriteriaArgs::default().with_defaults(MatchCriteria::new());
        assert!(criteria.is_empty());
    }

    // ---- exit codes ----

    #[test]
    fn test_exit_code_usage() {
        let err: anyhow::Error = CliError::Usage("bad".to_string()).into();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_disambiguation_failure() {
        let err: anyhow::Error = shimport::Error::NoPortSpecified {
            env_var: "PYSHIMMER_PORT".to_string(),
        }
        .into();
        assert_eq!(exit_code(&err), 2);
    }

    #[test]
    fn test_exit_code_enumeration_failure() {
        let err: anyhow::Error =
            shimport::Error::PlatformQueryFailed("no udev".to_string()).into();
        assert_eq!(exit_code(&err), 1);

        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code(&err), 1);
    }
}
