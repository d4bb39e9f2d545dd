//! One-shot command handlers.
//!
//! Each command enumerates the displays itself, does its work and exits
//! without touching the daemon's lock file.

pub mod fade;
pub mod set;
pub mod status;

use anyhow::{Context, Result};

use crate::backend::{DisplayBackend, create_backend};
use crate::config::Config;
use crate::logger::Log;

/// Create the configured backend and list the displays it can drive.
pub fn connect(config: &Config) -> Result<(Box<dyn DisplayBackend>, Vec<String>)> {
    let mut backend = create_backend(config.backend());
    let displays = backend
        .list_connected_displays()
        .context("Cannot continue without displays")?;

    Log::log_decorated(&format!(
        "Using {} display(s) via {}: {}",
        displays.len(),
        backend.backend_name(),
        displays.join(", ")
    ));

    Ok((backend, displays))
}
