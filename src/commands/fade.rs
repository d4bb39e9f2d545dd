//! `fade`: smoothly move every display from one temperature to another.

use anyhow::Result;
use std::time::Duration;

use crate::config::Config;
use crate::fade::ManualFade;
use crate::signals::setup_signal_handler;

use super::set::outside_recommended_range;

/// Both endpoints must be finite; an infinite endpoint would make every
/// interpolated step infinite or NaN.
pub fn validate_fade_temperatures(start: f64, end: f64) -> Result<()> {
    if !start.is_finite() || !end.is_finite() {
        anyhow::bail!("Fade temperatures must be finite numbers, got {} and {}", start, end);
    }
    Ok(())
}

/// Handle `gammaflux fade <START> <END> [--duration SECS] [--steps N]`.
pub fn handle_fade_command(
    config: &Config,
    start: f64,
    end: f64,
    duration_secs: u64,
    steps: u32,
) -> Result<()> {
    validate_fade_temperatures(start, end)?;
    for kelvin in [start, end] {
        if outside_recommended_range(kelvin) {
            crate::logger::Log::log_warning(&format!(
                "{}K is outside the recommended range",
                kelvin
            ));
        }
    }

    let running = setup_signal_handler()?;
    let (mut backend, displays) = super::connect(config)?;

    let mut fade = ManualFade::new(start, end, Duration::from_secs(duration_secs), steps);
    let report = fade.execute(backend.as_mut(), &displays, &running);

    if report.failures > 0 && report.failures == report.applied.len() * displays.len() {
        anyhow::bail!("No display accepted any step of the fade");
    }
    Ok(())
}
