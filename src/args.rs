//! Command-line argument parsing.
//!
//! Arguments are declared with `clap` derive and then flattened into a
//! [`CliAction`] that `main` dispatches on. Running without a subcommand
//! starts the daemon.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_FADE_DURATION_SECS, DEFAULT_FADE_STEPS, MAXIMUM_FADE_STEPS, MINIMUM_FADE_STEPS,
};

#[derive(Debug, Parser)]
#[command(name = "gammaflux")]
#[command(version, about = "Solar-scheduled color temperature for Xorg displays")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file to use instead of the default location
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print per-update details
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Follow the day/night schedule (default)
    Run,
    /// Apply a fixed color temperature once and exit
    Set {
        /// Temperature in Kelvin
        kelvin: f64,
    },
    /// Restore neutral 1:1:1 gamma on all displays
    Reset,
    /// Smoothly fade between two temperatures
    Fade {
        /// Starting temperature in Kelvin
        start: f64,
        /// Final temperature in Kelvin
        end: f64,
        /// Total fade time in seconds
        #[arg(long, default_value_t = DEFAULT_FADE_DURATION_SECS)]
        duration: u64,
        /// Number of interpolation steps
        #[arg(
            long,
            default_value_t = DEFAULT_FADE_STEPS,
            value_parser = clap::value_parser!(u32).range(MINIMUM_FADE_STEPS as i64..=MAXIMUM_FADE_STEPS as i64)
        )]
        steps: u32,
    },
    /// Show today's schedule and the current target without touching displays
    Status,
}

/// What the application should do, as decided from the command line.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    Run,
    SetTemperature { kelvin: f64 },
    Reset,
    Fade {
        start: f64,
        end: f64,
        duration_secs: u64,
        steps: u32,
    },
    Status,
}

/// Result of parsing command-line arguments.
#[derive(Debug, PartialEq)]
pub struct ParsedArgs {
    pub action: CliAction,
    pub debug_enabled: bool,
    pub config_path: Option<PathBuf>,
}

impl ParsedArgs {
    /// Parse command-line arguments, including the program name.
    ///
    /// Help and version requests come back as `clap::Error`s whose `exit()`
    /// prints the text and exits with status 0.
    pub fn parse<I, S>(args: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        Ok(ParsedArgs::from(cli))
    }
}

impl From<Cli> for ParsedArgs {
    fn from(cli: Cli) -> Self {
        let action = match cli.command.unwrap_or(Command::Run) {
            Command::Run => CliAction::Run,
            Command::Set { kelvin } => CliAction::SetTemperature { kelvin },
            Command::Reset => CliAction::Reset,
            Command::Fade {
                start,
                end,
                duration,
                steps,
            } => CliAction::Fade {
                start,
                end,
                duration_secs: duration,
                steps,
            },
            Command::Status => CliAction::Status,
        };

        ParsedArgs {
            action,
            debug_enabled: cli.debug,
            config_path: cli.config,
        }
    }
}
