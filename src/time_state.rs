//! Day/night scheduling: which phase is active and which temperature it asks for.
//!
//! A [`SolarSchedule`] holds one day's sunrise and sunset for the configured
//! location together with the transition length and the two anchor
//! temperatures. From it four instants are derived:
//!
//! - `morning_transition_start = sunrise - transition`
//! - `sunrise`
//! - `evening_transition_start = sunset - transition`
//! - `night_start = sunset + transition`
//!
//! and every instant of the day falls into exactly one [`SchedulePhase`]. The
//! rules are evaluated as a priority chain so that shared boundaries resolve
//! to the earlier rule:
//!
//! | Phase       | Condition                                          |
//! |-------------|----------------------------------------------------|
//! | Night       | `now >= night_start` or `now < morning_start`      |
//! | Day         | `sunrise <= now < evening_start`                   |
//! | EveningFade | `evening_start <= now < night_start`               |
//! | MorningFade | `morning_start <= now < sunrise`                   |
//!
//! Everything here is pure. The only fallible piece is [`DayNightScheduler`],
//! which asks a [`SunTimesProvider`] for the day's solar events and reports
//! [`FluxError::Computation`] when there are none.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration as StdDuration;

use crate::constants::MINIMUM_SLEEP_SECS;
use crate::error::{FluxError, Result};
use crate::geo::SunTimesProvider;
use crate::utils::{elapsed_ratio, interpolate_f64};

/// How the evening fade maps elapsed time to interpolation progress.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FadeWindow {
    /// The evening ramp spans the whole evening window (twice the transition
    /// length) and reaches the night temperature at `night_start`, while the
    /// morning ramp spans a single transition length ending at sunrise.
    Extended,
    /// Both ramps span one transition length: the evening ramp reaches the
    /// night temperature at sunset and holds it until `night_start`.
    Symmetric,
}

impl FadeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            FadeWindow::Extended => "extended",
            FadeWindow::Symmetric => "symmetric",
        }
    }
}

/// The four mutually exclusive time-of-day regimes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SchedulePhase {
    Day,
    Night,
    EveningFade,
    MorningFade,
}

impl SchedulePhase {
    pub fn is_fading(&self) -> bool {
        matches!(self, SchedulePhase::EveningFade | SchedulePhase::MorningFade)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SchedulePhase::Day => "Day",
            SchedulePhase::Night => "Night",
            SchedulePhase::EveningFade => "Fading down",
            SchedulePhase::MorningFade => "Fading up",
        }
    }
}

/// Location, timezone and temperature settings the scheduler works from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSettings {
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Tz,
    pub transition_duration: chrono::Duration,
    pub day_temp: f64,
    pub night_temp: f64,
    pub fade_window: FadeWindow,
}

/// One calendar day's solar events plus the settings needed to schedule it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSchedule {
    sunrise: DateTime<Tz>,
    sunset: DateTime<Tz>,
    transition_duration: chrono::Duration,
    day_temp: f64,
    night_temp: f64,
    fade_window: FadeWindow,
}

impl SolarSchedule {
    /// Build a schedule, enforcing that sunrise precedes sunset on the same
    /// calendar day in the settings' timezone.
    pub fn new(
        sunrise: DateTime<Tz>,
        sunset: DateTime<Tz>,
        settings: &ScheduleSettings,
    ) -> Result<Self> {
        let sunrise = sunrise.with_timezone(&settings.timezone);
        let sunset = sunset.with_timezone(&settings.timezone);
        let date = sunrise.date_naive();

        let reason = if sunrise >= sunset {
            Some(format!(
                "sunrise {} is not before sunset {}",
                sunrise.format("%H:%M:%S"),
                sunset.format("%H:%M:%S")
            ))
        } else if sunset.date_naive() != date {
            Some(format!(
                "sunrise and sunset fall on different days ({} and {})",
                date,
                sunset.date_naive()
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(FluxError::computation(
                date,
                FluxError::Lookup {
                    latitude: settings.latitude,
                    longitude: settings.longitude,
                    date,
                    reason,
                },
            ));
        }

        Ok(Self {
            sunrise,
            sunset,
            transition_duration: settings.transition_duration,
            day_temp: settings.day_temp,
            night_temp: settings.night_temp,
            fade_window: settings.fade_window,
        })
    }

    pub fn sunrise(&self) -> DateTime<Tz> {
        self.sunrise
    }

    pub fn sunset(&self) -> DateTime<Tz> {
        self.sunset
    }

    pub fn date(&self) -> NaiveDate {
        self.sunrise.date_naive()
    }

    pub fn transition_duration(&self) -> chrono::Duration {
        self.transition_duration
    }

    pub fn day_temp(&self) -> f64 {
        self.day_temp
    }

    pub fn night_temp(&self) -> f64 {
        self.night_temp
    }

    pub fn fade_window(&self) -> FadeWindow {
        self.fade_window
    }

    pub fn morning_transition_start(&self) -> DateTime<Tz> {
        self.sunrise - self.transition_duration
    }

    pub fn evening_transition_start(&self) -> DateTime<Tz> {
        self.sunset - self.transition_duration
    }

    pub fn night_start(&self) -> DateTime<Tz> {
        self.sunset + self.transition_duration
    }
}

/// The phase, its fade progress and the resulting temperature at one instant.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct TargetState {
    pub phase: SchedulePhase,
    /// Interpolation ratio of the active fade; 0.0 in stable phases.
    pub progress: f64,
    pub temperature: f64,
}

/// Determine which phase is active at `now`.
pub fn determine_phase(schedule: &SolarSchedule, now: &DateTime<Tz>) -> SchedulePhase {
    let morning_start = schedule.morning_transition_start();
    let evening_start = schedule.evening_transition_start();
    let night_start = schedule.night_start();

    if *now >= night_start || *now < morning_start {
        SchedulePhase::Night
    } else if *now >= schedule.sunrise && *now < evening_start {
        SchedulePhase::Day
    } else if *now >= evening_start && *now < night_start {
        SchedulePhase::EveningFade
    } else {
        // Remaining instants satisfy morning_start <= now < sunrise
        SchedulePhase::MorningFade
    }
}

fn progress_for_phase(schedule: &SolarSchedule, phase: SchedulePhase, now: &DateTime<Tz>) -> f64 {
    match phase {
        SchedulePhase::Day | SchedulePhase::Night => 0.0,
        SchedulePhase::EveningFade => {
            let span = match schedule.fade_window {
                FadeWindow::Extended => schedule.transition_duration * 2,
                FadeWindow::Symmetric => schedule.transition_duration,
            };
            elapsed_ratio(now, &schedule.evening_transition_start(), span)
        }
        SchedulePhase::MorningFade => elapsed_ratio(
            now,
            &schedule.morning_transition_start(),
            schedule.transition_duration,
        ),
    }
}

/// Interpolation ratio of the fade active at `now`, clamped to [0.0, 1.0].
///
/// Returns 0.0 during the stable Day and Night phases.
pub fn phase_progress(schedule: &SolarSchedule, now: &DateTime<Tz>) -> f64 {
    progress_for_phase(schedule, determine_phase(schedule, now), now)
}

/// Phase, progress and target temperature at `now`.
pub fn current_target_state(schedule: &SolarSchedule, now: &DateTime<Tz>) -> TargetState {
    let phase = determine_phase(schedule, now);
    let progress = progress_for_phase(schedule, phase, now);

    let temperature = match phase {
        SchedulePhase::Day => schedule.day_temp,
        SchedulePhase::Night => schedule.night_temp,
        SchedulePhase::EveningFade => {
            interpolate_f64(schedule.day_temp, schedule.night_temp, progress)
        }
        SchedulePhase::MorningFade => {
            interpolate_f64(schedule.night_temp, schedule.day_temp, progress)
        }
    };

    TargetState {
        phase,
        progress,
        temperature,
    }
}

/// Target color temperature in Kelvin at `now`.
///
/// # Examples
/// ```
/// use chrono::TimeZone;
/// use chrono_tz::America::Los_Angeles;
/// use gammaflux::time_state::{current_target_temperature, FadeWindow, ScheduleSettings, SolarSchedule};
///
/// let settings = ScheduleSettings {
///     latitude: 37.7749,
///     longitude: -122.4194,
///     timezone: Los_Angeles,
///     transition_duration: chrono::Duration::minutes(60),
///     day_temp: 5700.0,
///     night_temp: 3000.0,
///     fade_window: FadeWindow::Extended,
/// };
/// let sunrise = Los_Angeles.with_ymd_and_hms(2024, 6, 21, 6, 30, 0).unwrap();
/// let sunset = Los_Angeles.with_ymd_and_hms(2024, 6, 21, 18, 0, 0).unwrap();
/// let schedule = SolarSchedule::new(sunrise, sunset, &settings).unwrap();
///
/// // 30 minutes into the evening fade that opens at 17:00
/// let now = Los_Angeles.with_ymd_and_hms(2024, 6, 21, 17, 30, 0).unwrap();
/// assert_eq!(current_target_temperature(&schedule, &now), 5025.0);
/// ```
pub fn current_target_temperature(schedule: &SolarSchedule, now: &DateTime<Tz>) -> f64 {
    current_target_state(schedule, now).temperature
}

/// The next derived boundary strictly after `now` on the schedule's day.
///
/// Returns `None` once `night_start` has passed; the following boundary
/// belongs to tomorrow's schedule.
pub fn next_phase_boundary(schedule: &SolarSchedule, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    [
        schedule.morning_transition_start(),
        schedule.sunrise,
        schedule.evening_transition_start(),
        schedule.night_start(),
    ]
    .into_iter()
    .filter(|boundary| boundary > now)
    .min()
}

/// How long the driver should sleep before the next tick.
///
/// - During fades: the poll interval, for smooth progress
/// - During stable phases: the poll interval or the time to the next
///   boundary, whichever is shorter
///
/// Never returns less than one second.
pub fn time_until_next_update(
    schedule: &SolarSchedule,
    now: &DateTime<Tz>,
    poll_interval: StdDuration,
) -> StdDuration {
    let minimum = StdDuration::from_secs(MINIMUM_SLEEP_SECS);

    if determine_phase(schedule, now).is_fading() {
        return poll_interval.max(minimum);
    }

    let until_boundary = next_phase_boundary(schedule, now)
        .and_then(|boundary| boundary.signed_duration_since(*now).to_std().ok());

    match until_boundary {
        Some(wait) => wait.min(poll_interval).max(minimum),
        None => poll_interval.max(minimum),
    }
}

/// Computes target temperatures for arbitrary instants at a fixed location.
///
/// The scheduler owns no mutable state: each call fetches the solar events
/// for the calendar day of `now` and evaluates the phase table.
pub struct DayNightScheduler<P: SunTimesProvider> {
    settings: ScheduleSettings,
    provider: P,
}

impl<P: SunTimesProvider> DayNightScheduler<P> {
    pub fn new(settings: ScheduleSettings, provider: P) -> Self {
        Self { settings, provider }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Build the schedule for `date`, mapping ephemeris failures to
    /// [`FluxError::Computation`].
    pub fn schedule_for(&self, date: NaiveDate) -> Result<SolarSchedule> {
        let (sunrise, sunset) = self
            .provider
            .sun_times(
                self.settings.latitude,
                self.settings.longitude,
                date,
                self.settings.timezone,
            )
            .map_err(|e| match e {
                FluxError::Computation { .. } => e,
                other => FluxError::computation(date, other),
            })?;

        let schedule = SolarSchedule::new(sunrise, sunset, &self.settings)?;
        if schedule.date() != date {
            return Err(FluxError::computation(
                date,
                FluxError::Lookup {
                    latitude: self.settings.latitude,
                    longitude: self.settings.longitude,
                    date,
                    reason: format!("solar events fall on {} instead", schedule.date()),
                },
            ));
        }

        Ok(schedule)
    }

    /// Schedule for the calendar day of `now` in the configured timezone.
    pub fn schedule_at(&self, now: &DateTime<Tz>) -> Result<SolarSchedule> {
        let local = now.with_timezone(&self.settings.timezone);
        self.schedule_for(local.date_naive())
    }

    /// Phase, progress and target temperature at `now`.
    pub fn target_at(&self, now: &DateTime<Tz>) -> Result<TargetState> {
        let schedule = self.schedule_at(now)?;
        let local = now.with_timezone(&self.settings.timezone);
        Ok(current_target_state(&schedule, &local))
    }

    /// Target temperature in Kelvin at `now`.
    pub fn current_target_temperature(&self, now: &DateTime<Tz>) -> Result<f64> {
        self.target_at(now).map(|state| state.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use crate::geo::MockSunTimesProvider;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    fn settings(fade_window: FadeWindow) -> ScheduleSettings {
        ScheduleSettings {
            latitude: 37.7749,
            longitude: -122.4194,
            timezone: TEST_TIMEZONE.parse().unwrap(),
            transition_duration: chrono::Duration::minutes(TEST_TRANSITION_MINUTES),
            day_temp: TEST_DAY_TEMP,
            night_temp: TEST_NIGHT_TEMP,
            fade_window,
        }
    }

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Tz> {
        Los_Angeles
            .with_ymd_and_hms(2024, 6, 21, hour, minute, second)
            .unwrap()
    }

    /// Sunrise 06:30, sunset 18:00, 60 minute transitions.
    fn standard_schedule(fade_window: FadeWindow) -> SolarSchedule {
        SolarSchedule::new(at(6, 30, 0), at(18, 0, 0), &settings(fade_window)).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_derived_instants() {
        let schedule = standard_schedule(FadeWindow::Extended);
        assert_eq!(schedule.morning_transition_start(), at(5, 30, 0));
        assert_eq!(schedule.evening_transition_start(), at(17, 0, 0));
        assert_eq!(schedule.night_start(), at(19, 0, 0));
        assert_eq!(schedule.date(), NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
    }

    #[test]
    fn test_evening_fade_scenario() {
        let schedule = standard_schedule(FadeWindow::Extended);

        // 30 minutes into the 120 minute evening ramp
        let state = current_target_state(&schedule, &at(17, 30, 0));
        assert_eq!(state.phase, SchedulePhase::EveningFade);
        assert_close(state.progress, 0.25);
        assert_close(state.temperature, 5025.0);

        // 90 minutes in
        let state = current_target_state(&schedule, &at(18, 30, 0));
        assert_eq!(state.phase, SchedulePhase::EveningFade);
        assert_close(state.progress, 0.75);
        assert_close(state.temperature, 3675.0);
    }

    #[test]
    fn test_morning_fade_midpoint_scenario() {
        let schedule = standard_schedule(FadeWindow::Extended);
        let state = current_target_state(&schedule, &at(6, 0, 0));

        assert_eq!(state.phase, SchedulePhase::MorningFade);
        assert_close(state.progress, 0.5);
        assert_close(state.temperature, 4350.0);
    }

    #[test]
    fn test_sunrise_boundary_is_day() {
        let schedule = standard_schedule(FadeWindow::Extended);
        assert_eq!(determine_phase(&schedule, &at(6, 30, 0)), SchedulePhase::Day);
        assert_eq!(current_target_temperature(&schedule, &at(6, 30, 0)), TEST_DAY_TEMP);
        assert_eq!(
            determine_phase(&schedule, &at(6, 29, 59)),
            SchedulePhase::MorningFade
        );
    }

    #[test]
    fn test_evening_start_boundary_is_fade_at_zero() {
        let schedule = standard_schedule(FadeWindow::Extended);
        let state = current_target_state(&schedule, &at(17, 0, 0));

        assert_eq!(state.phase, SchedulePhase::EveningFade);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.temperature, TEST_DAY_TEMP);
        assert_eq!(determine_phase(&schedule, &at(16, 59, 59)), SchedulePhase::Day);
    }

    #[test]
    fn test_night_start_boundary_is_night() {
        let schedule = standard_schedule(FadeWindow::Extended);
        let state = current_target_state(&schedule, &at(19, 0, 0));

        assert_eq!(state.phase, SchedulePhase::Night);
        assert_eq!(state.temperature, TEST_NIGHT_TEMP);

        let just_before = current_target_state(&schedule, &at(18, 59, 59));
        assert_eq!(just_before.phase, SchedulePhase::EveningFade);
        assert!(just_before.temperature > TEST_NIGHT_TEMP);
    }

    #[test]
    fn test_morning_start_boundary() {
        let schedule = standard_schedule(FadeWindow::Extended);
        assert_eq!(determine_phase(&schedule, &at(5, 29, 59)), SchedulePhase::Night);

        let state = current_target_state(&schedule, &at(5, 30, 0));
        assert_eq!(state.phase, SchedulePhase::MorningFade);
        assert_eq!(state.progress, 0.0);
        assert_eq!(state.temperature, TEST_NIGHT_TEMP);
    }

    #[test]
    fn test_night_wraps_around_midnight() {
        let schedule = standard_schedule(FadeWindow::Extended);
        assert_eq!(determine_phase(&schedule, &at(0, 0, 0)), SchedulePhase::Night);
        assert_eq!(determine_phase(&schedule, &at(3, 0, 0)), SchedulePhase::Night);
        assert_eq!(determine_phase(&schedule, &at(23, 59, 59)), SchedulePhase::Night);
        assert_eq!(phase_progress(&schedule, &at(23, 0, 0)), 0.0);
    }

    #[test]
    fn test_extended_evening_fade_at_sunset_is_halfway() {
        let schedule = standard_schedule(FadeWindow::Extended);
        let state = current_target_state(&schedule, &at(18, 0, 0));
        assert_close(state.progress, 0.5);
        assert_close(state.temperature, 4350.0);
    }

    #[test]
    fn test_symmetric_evening_fade_completes_at_sunset() {
        let schedule = standard_schedule(FadeWindow::Symmetric);

        let halfway = current_target_state(&schedule, &at(17, 30, 0));
        assert_eq!(halfway.phase, SchedulePhase::EveningFade);
        assert_close(halfway.temperature, 4350.0);

        let at_sunset = current_target_state(&schedule, &at(18, 0, 0));
        assert_eq!(at_sunset.progress, 1.0);
        assert_eq!(at_sunset.temperature, TEST_NIGHT_TEMP);

        // Held at night temperature for the rest of the evening window
        let held = current_target_state(&schedule, &at(18, 30, 0));
        assert_eq!(held.phase, SchedulePhase::EveningFade);
        assert_eq!(held.temperature, TEST_NIGHT_TEMP);

        // Morning side is identical in both modes
        assert_close(current_target_temperature(&schedule, &at(6, 0, 0)), 4350.0);
    }

    #[test]
    fn test_short_day_prefers_evening_fade() {
        // Day shorter than the transition: evening window opens before sunrise
        let schedule =
            SolarSchedule::new(at(10, 0, 0), at(10, 30, 0), &settings(FadeWindow::Extended))
                .unwrap();

        assert_eq!(determine_phase(&schedule, &at(9, 15, 0)), SchedulePhase::MorningFade);
        assert_eq!(determine_phase(&schedule, &at(9, 45, 0)), SchedulePhase::EveningFade);
        assert_eq!(determine_phase(&schedule, &at(10, 15, 0)), SchedulePhase::EveningFade);
        assert_eq!(determine_phase(&schedule, &at(11, 30, 0)), SchedulePhase::Night);
    }

    #[test]
    fn test_schedule_rejects_sunset_before_sunrise() {
        let result = SolarSchedule::new(at(18, 0, 0), at(6, 30, 0), &settings(FadeWindow::Extended));
        assert!(matches!(result, Err(FluxError::Computation { .. })));

        let result = SolarSchedule::new(at(6, 0, 0), at(6, 0, 0), &settings(FadeWindow::Extended));
        assert!(matches!(result, Err(FluxError::Computation { .. })));
    }

    #[test]
    fn test_schedule_rejects_events_on_different_days() {
        let next_day = Los_Angeles.with_ymd_and_hms(2024, 6, 22, 1, 0, 0).unwrap();
        let result = SolarSchedule::new(at(6, 30, 0), next_day, &settings(FadeWindow::Extended));
        assert!(matches!(result, Err(FluxError::Computation { .. })));
    }

    #[test]
    fn test_next_phase_boundary() {
        let schedule = standard_schedule(FadeWindow::Extended);
        assert_eq!(next_phase_boundary(&schedule, &at(2, 0, 0)), Some(at(5, 30, 0)));
        assert_eq!(next_phase_boundary(&schedule, &at(5, 30, 0)), Some(at(6, 30, 0)));
        assert_eq!(next_phase_boundary(&schedule, &at(12, 0, 0)), Some(at(17, 0, 0)));
        assert_eq!(next_phase_boundary(&schedule, &at(18, 0, 0)), Some(at(19, 0, 0)));
        assert_eq!(next_phase_boundary(&schedule, &at(19, 0, 0)), None);
    }

    #[test]
    fn test_time_until_next_update() {
        let schedule = standard_schedule(FadeWindow::Extended);
        let poll = StdDuration::from_secs(60);

        // Fading: always the poll interval
        assert_eq!(time_until_next_update(&schedule, &at(18, 0, 0), poll), poll);

        // Stable with a distant boundary: capped by the poll interval
        assert_eq!(time_until_next_update(&schedule, &at(12, 0, 0), poll), poll);

        // Stable with a long poll interval: wake at the boundary
        let long_poll = StdDuration::from_secs(10 * 3600);
        assert_eq!(
            time_until_next_update(&schedule, &at(12, 0, 0), long_poll),
            StdDuration::from_secs(5 * 3600)
        );
        assert_eq!(
            time_until_next_update(&schedule, &at(16, 59, 30), long_poll),
            StdDuration::from_secs(30)
        );

        // After night start there is no boundary left today
        assert_eq!(time_until_next_update(&schedule, &at(21, 0, 0), poll), poll);
    }

    #[test]
    fn test_scheduler_uses_provider_times() {
        let mut provider = MockSunTimesProvider::new();
        provider
            .expect_sun_times()
            .returning(|_, _, _, _| Ok((at(6, 30, 0), at(18, 0, 0))));

        let scheduler = DayNightScheduler::new(settings(FadeWindow::Extended), provider);

        let state = scheduler.target_at(&at(17, 30, 0)).unwrap();
        assert_eq!(state.phase, SchedulePhase::EveningFade);
        assert_close(state.temperature, 5025.0);
        assert_close(scheduler.current_target_temperature(&at(6, 0, 0)).unwrap(), 4350.0);
    }

    #[test]
    fn test_scheduler_requests_date_in_configured_timezone() {
        let mut provider = MockSunTimesProvider::new();
        provider
            .expect_sun_times()
            .withf(|_, _, date, _| *date == NaiveDate::from_ymd_opt(2024, 6, 21).unwrap())
            .returning(|_, _, _, _| Ok((at(6, 30, 0), at(18, 0, 0))));

        let scheduler = DayNightScheduler::new(settings(FadeWindow::Extended), provider);

        // 03:00 UTC on the 22nd is still the evening of the 21st in Los Angeles
        let utc_now = Tz::UTC.with_ymd_and_hms(2024, 6, 22, 3, 0, 0).unwrap();
        let state = scheduler.target_at(&utc_now).unwrap();
        assert_eq!(state.phase, SchedulePhase::Night);
    }

    #[test]
    fn test_scheduler_rejects_events_for_another_day() {
        let mut provider = MockSunTimesProvider::new();
        provider.expect_sun_times().returning(|_, _, _, _| {
            Ok((
                Los_Angeles.with_ymd_and_hms(2024, 6, 22, 6, 30, 0).unwrap(),
                Los_Angeles.with_ymd_and_hms(2024, 6, 22, 18, 0, 0).unwrap(),
            ))
        });

        let scheduler = DayNightScheduler::new(settings(FadeWindow::Extended), provider);
        match scheduler.target_at(&at(12, 0, 0)) {
            Err(FluxError::Computation { date, .. }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
            }
            other => panic!("expected computation error, got {:?}", other),
        }
    }

    #[test]
    fn test_scheduler_surfaces_computation_error() {
        let mut provider = MockSunTimesProvider::new();
        provider.expect_sun_times().returning(|lat, lon, date, _| {
            Err(FluxError::Lookup {
                latitude: lat,
                longitude: lon,
                date,
                reason: "polar night".to_string(),
            })
        });

        let scheduler = DayNightScheduler::new(settings(FadeWindow::Extended), provider);
        let result = scheduler.target_at(&at(12, 0, 0));
        assert!(matches!(result, Err(FluxError::Computation { .. })));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn phases_partition_the_day(seconds in 0u32..86_400) {
                let schedule = standard_schedule(FadeWindow::Extended);
                let now = at(seconds / 3600, (seconds % 3600) / 60, seconds % 60);

                let morning_start = schedule.morning_transition_start();
                let evening_start = schedule.evening_transition_start();
                let night_start = schedule.night_start();

                let night = now >= night_start || now < morning_start;
                let day = now >= schedule.sunrise() && now < evening_start;
                let evening = now >= evening_start && now < night_start;
                let morning = now >= morning_start && now < schedule.sunrise();

                let matching = [night, day, evening, morning].iter().filter(|m| **m).count();
                prop_assert_eq!(matching, 1);

                let expected = if night {
                    SchedulePhase::Night
                } else if day {
                    SchedulePhase::Day
                } else if evening {
                    SchedulePhase::EveningFade
                } else {
                    SchedulePhase::MorningFade
                };
                prop_assert_eq!(determine_phase(&schedule, &now), expected);
            }

            #[test]
            fn target_stays_between_anchors(seconds in 0u32..86_400) {
                for fade_window in [FadeWindow::Extended, FadeWindow::Symmetric] {
                    let schedule = standard_schedule(fade_window);
                    let now = at(seconds / 3600, (seconds % 3600) / 60, seconds % 60);
                    let state = current_target_state(&schedule, &now);

                    prop_assert!((0.0..=1.0).contains(&state.progress));
                    prop_assert!(state.temperature >= TEST_NIGHT_TEMP - 1e-9);
                    prop_assert!(state.temperature <= TEST_DAY_TEMP + 1e-9);
                }
            }
        }
    }
}
