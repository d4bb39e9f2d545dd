//! `status`: report today's schedule and the current target without
//! touching any display.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::gamma::compute_gamma;
use crate::geo::{SolarEphemeris, SunTimesProvider};
use crate::logger::Log;
use crate::time_state::{DayNightScheduler, current_target_state, next_phase_boundary};

/// Lines describing the schedule and target at `now`.
pub fn describe_status<P: SunTimesProvider>(
    scheduler: &DayNightScheduler<P>,
    now: &DateTime<Tz>,
) -> Result<Vec<String>> {
    let settings = scheduler.settings();
    let local = now.with_timezone(&settings.timezone);
    let schedule = scheduler.schedule_at(&local)?;
    let state = current_target_state(&schedule, &local);
    let time = |t: DateTime<Tz>| t.format("%H:%M:%S").to_string();

    let mut lines = vec![
        format!("Date: {} ({})", schedule.date(), settings.timezone),
        format!(
            "Morning fade: {} - {}",
            time(schedule.morning_transition_start()),
            time(schedule.sunrise())
        ),
        format!(
            "Evening fade: {} - {}",
            time(schedule.evening_transition_start()),
            time(schedule.night_start())
        ),
        format!("Sunset: {}", time(schedule.sunset())),
        format!("Fade window: {}", schedule.fade_window().as_str()),
    ];

    if state.phase.is_fading() {
        lines.push(format!(
            "Phase: {} ({:.1}%)",
            state.phase.label(),
            state.progress * 100.0
        ));
    } else {
        lines.push(format!("Phase: {}", state.phase.label()));
    }

    lines.push(format!(
        "Target: {:.0}K ({})",
        state.temperature,
        compute_gamma(state.temperature)
    ));

    if let Some(boundary) = next_phase_boundary(&schedule, &local) {
        lines.push(format!("Next change: {}", time(boundary)));
    }

    Ok(lines)
}

/// Handle `gammaflux status`.
pub fn handle_status_command(config: &Config) -> Result<()> {
    let settings = config.schedule_settings()?;
    let now = Utc::now().with_timezone(&settings.timezone);
    let scheduler = DayNightScheduler::new(settings, SolarEphemeris::new());

    Log::log_block_start(&format!("Status for {}", config.location_name()));
    for line in describe_status(&scheduler, &now)? {
        Log::log_indented(&line);
    }
    Ok(())
}
