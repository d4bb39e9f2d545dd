use anyhow::Result;
use std::path::PathBuf;

use gammaflux::args::{CliAction, ParsedArgs};
use gammaflux::commands::{fade::handle_fade_command, set, status::handle_status_command};
use gammaflux::config::Config;
use gammaflux::constants::EXIT_FAILURE;
use gammaflux::daemon::run_daemon;
use gammaflux::logger::Log;

fn main() {
    let parsed = ParsedArgs::parse(std::env::args_os()).unwrap_or_else(|e| e.exit());

    Log::set_debug(parsed.debug_enabled);
    Log::log_version();

    if let Err(e) = run(parsed) {
        Log::log_pipe();
        Log::log_critical(&format!("{:#}", e));
        Log::log_end();
        std::process::exit(EXIT_FAILURE);
    }

    Log::log_end();
}

fn run(parsed: ParsedArgs) -> Result<()> {
    let (config, source) = load_config(parsed.config_path)?;

    match parsed.action {
        CliAction::Run => {
            config.log_config(source.as_deref());
            run_daemon(&config)
        }
        CliAction::SetTemperature { kelvin } => set::handle_set_command(&config, kelvin),
        CliAction::Reset => set::handle_reset_command(&config),
        CliAction::Fade {
            start,
            end,
            duration_secs,
            steps,
        } => handle_fade_command(&config, start, end, duration_secs, steps),
        CliAction::Status => handle_status_command(&config),
    }
}

/// Load the configuration and report which file it came from, if any.
fn load_config(explicit: Option<PathBuf>) -> Result<(Config, Option<PathBuf>)> {
    match explicit {
        Some(path) => Ok((Config::load_from_path(&path)?, Some(path))),
        None => {
            let path = Config::get_config_path()?;
            let source = path.exists().then(|| path.clone());
            Ok((Config::load()?, source))
        }
    }
}
