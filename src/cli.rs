use anyhow::Result;
use clap::{Parser, Subcommand};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use vp_control::ControlType;

#[derive(Error, Debug, PartialEq)]
pub enum CommandRefError {
    #[error("invalid command '{0}', expected <control type>/<function code>")]
    BadCommandRef(String),
}

/// A single command addressed as `<control type>/<function code>`.
#[derive(Debug, PartialEq)]
pub struct CommandRef {
    pub control_type: ControlType,
    pub function_code: u16,
}

impl FromStr for CommandRef {
    type Err = CommandRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lazy_static! {
            static ref RE: Regex = Regex::new(r"^([-_[:alpha:]]+)/(\d+)$").unwrap();
        }

        let bad = || CommandRefError::BadCommandRef(s.to_string());
        let c = RE.captures(s).ok_or_else(bad)?;

        Ok(CommandRef {
            control_type: c[1].parse().map_err(|_| bad())?,
            function_code: c[2].parse().map_err(|_| bad())?,
        })
    }
}

fn parse_millis(input: &str) -> Result<Duration, std::num::ParseIntError> {
    input.parse().map(Duration::from_millis)
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Skip sanity checks
    #[clap(long, short)]
    pub force: bool,

    /// enable debug output
    #[clap(long, short)]
    pub debug: bool,

    /// UART device or 'auto'
    #[clap(long, short, default_value = "auto")]
    pub port: String,

    /// UART baud rate
    #[clap(long, short, default_value_t = 9600)]
    pub baudrate: u32,

    /// Retry count for timed out or failed exchanges
    #[clap(long, short, default_value_t = 0)]
    pub retries: usize,

    /// Reply timeout in milliseconds
    #[clap(long, default_value = "2000", parse(try_from_str = parse_millis))]
    pub timeout: Duration,

    /// Delay between commands in milliseconds
    #[clap(long, default_value = "100", parse(try_from_str = parse_millis))]
    pub interval: Duration,

    /// JSON command table instead of the built-in one
    #[clap(long, short)]
    pub table: Option<PathBuf>,

    /// Use json-formatted output
    #[clap(long, short)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List control types and their opcodes
    Families,

    /// List commands in the table
    List {
        /// Control type or text contained in group/description
        filter: Option<String>,
    },

    /// Query current values
    Get {
        /// Control type or text contained in group/description
        filter: Option<String>,
    },

    /// Write a value or fire a trigger
    Set {
        /// Command as <control type>/<function code>, e.g. set-b/0
        command: CommandRef,
        /// Value to write; omitted for triggers
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ref() {
        assert_eq!(
            "set-b/21".parse::<CommandRef>(),
            Ok(CommandRef {
                control_type: ControlType::SetB,
                function_code: 21
            })
        );
        assert_eq!(
            "zero/22".parse::<CommandRef>().unwrap().control_type,
            ControlType::Zero
        );
        assert!("set-b".parse::<CommandRef>().is_err());
        assert!("seven/1".parse::<CommandRef>().is_err());
        assert!("set-a/70000".parse::<CommandRef>().is_err());
    }

    #[test]
    fn cli_parses_set() {
        let cli = Cli::try_parse_from(["vp-control", "-p", "/dev/ttyUSB0", "set", "set-c/1", "1"])
            .unwrap();
        assert_eq!(cli.port, "/dev/ttyUSB0");
        assert_eq!(cli.interval, Duration::from_millis(100));
        match cli.command {
            Commands::Set { command, value } => {
                assert_eq!(command.control_type, ControlType::SetC);
                assert_eq!(value.as_deref(), Some("1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cli_parses_timing() {
        let cli = Cli::try_parse_from(["vp-control", "--timeout", "500", "--interval", "0", "get"])
            .unwrap();
        assert_eq!(cli.timeout, Duration::from_millis(500));
        assert_eq!(cli.interval, Duration::ZERO);
        assert!(matches!(cli.command, Commands::Get { filter: None }));
    }
}
