//! `set` and `reset`: apply one gamma triple to every display and exit.

use anyhow::Result;

use crate::backend::{DisplayBackend, apply_to_all};
use crate::config::Config;
use crate::constants::{RECOMMENDED_MAX_TEMP, RECOMMENDED_MIN_TEMP};
use crate::gamma::{GammaTriple, try_compute_gamma};
use crate::logger::{Log, LogLevel};

/// True when `kelvin` lies outside the range where the gamma ramps vary.
pub fn outside_recommended_range(kelvin: f64) -> bool {
    !(RECOMMENDED_MIN_TEMP as f64..=RECOMMENDED_MAX_TEMP as f64).contains(&kelvin)
}

/// Apply `gamma` to every display.
///
/// Individual failures are logged. Fails only when no display accepted it.
pub fn apply_everywhere(
    backend: &mut dyn DisplayBackend,
    displays: &[String],
    gamma: GammaTriple,
) -> Result<()> {
    let failures = apply_to_all(backend, displays, gamma);
    for failure in &failures {
        Log::log_error_chain(LogLevel::Err, failure);
    }

    if !displays.is_empty() && failures.len() == displays.len() {
        anyhow::bail!("No display accepted gamma {}", gamma);
    }
    Ok(())
}

/// Apply a fixed color temperature.
pub fn set_temperature(
    backend: &mut dyn DisplayBackend,
    displays: &[String],
    kelvin: f64,
) -> Result<GammaTriple> {
    let gamma = try_compute_gamma(kelvin)?;

    if outside_recommended_range(kelvin) {
        Log::log_warning(&format!(
            "{}K is outside the recommended range {}-{}K",
            kelvin, RECOMMENDED_MIN_TEMP, RECOMMENDED_MAX_TEMP
        ));
    }

    apply_everywhere(backend, displays, gamma)?;
    Ok(gamma)
}

/// Handle `gammaflux set <KELVIN>`.
pub fn handle_set_command(config: &Config, kelvin: f64) -> Result<()> {
    let (mut backend, displays) = super::connect(config)?;
    let gamma = set_temperature(backend.as_mut(), &displays, kelvin)?;
    Log::log_block_start(&format!("Applied {}K ({})", kelvin, gamma));
    Ok(())
}

/// Handle `gammaflux reset`.
pub fn handle_reset_command(config: &Config) -> Result<()> {
    let (mut backend, displays) = super::connect(config)?;
    apply_everywhere(backend.as_mut(), &displays, GammaTriple::NEUTRAL)?;
    Log::log_block_start("Displays restored to neutral gamma");
    Ok(())
}
