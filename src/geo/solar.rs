//! Sunrise and sunset instants from geographic coordinates.
//!
//! Solar events come from the `sunrise` crate (sun at the horizon, with the
//! standard refraction correction). Before asking it, the latitude and date are
//! checked for polar day and polar night, where the sun never crosses the
//! horizon and there is nothing meaningful to schedule against.

use chrono::{DateTime, Datelike, NaiveDate};
use chrono_tz::Tz;
use std::f64::consts::PI;
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::error::{FluxError, Result};
use crate::geo::SunTimesProvider;

/// Apparent altitude of the sun's center at sunrise/sunset (refraction + disc radius).
const HORIZON_ALTITUDE_DEG: f64 = -0.833;

/// Axial tilt used by the declination approximation.
const AXIAL_TILT_DEG: f64 = 23.44;

/// Solar ephemeris backed by the `sunrise` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SolarEphemeris;

impl SolarEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl SunTimesProvider for SolarEphemeris {
    fn sun_times(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<(DateTime<Tz>, DateTime<Tz>)> {
        let lookup_error = |reason: String| FluxError::Lookup {
            latitude,
            longitude,
            date,
            reason,
        };

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(lookup_error(format!(
                "invalid latitude {latitude}, must be between -90 and 90 degrees"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(lookup_error(format!(
                "invalid longitude {longitude}, must be between -180 and 180 degrees"
            )));
        }

        if let Some(condition) = polar_condition(latitude, date) {
            return Err(lookup_error(condition.to_string()));
        }

        let coord = Coordinates::new(latitude, longitude)
            .ok_or_else(|| lookup_error("coordinates rejected by the ephemeris".to_string()))?;
        let events_on = |ephemeris_date: NaiveDate| {
            let solar_day = SolarDay::new(coord, ephemeris_date);
            (
                solar_day.event_time(SolarEvent::Sunrise).with_timezone(&tz),
                solar_day.event_time(SolarEvent::Sunset).with_timezone(&tz),
            )
        };

        let (mut sunrise, mut sunset) = events_on(date);

        // The ephemeris day is centred on UTC; zones far from their longitude
        // (Pacific/Apia, Pacific/Kiritimati) land a day off locally
        let offset = date.signed_duration_since(sunrise.date_naive());
        if !offset.is_zero() {
            let shifted = date.checked_add_signed(offset).ok_or_else(|| {
                lookup_error(format!("cannot shift ephemeris date by {} days", offset.num_days()))
            })?;
            (sunrise, sunset) = events_on(shifted);
        }

        Ok((sunrise, sunset))
    }
}

/// Polar conditions under which the sun stays above or below the horizon all day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarCondition {
    MidnightSun,
    PolarNight,
}

impl std::fmt::Display for PolarCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolarCondition::MidnightSun => write!(f, "midnight sun, the sun never sets"),
            PolarCondition::PolarNight => write!(f, "polar night, the sun never rises"),
        }
    }
}

/// Approximate solar declination in degrees for a date.
fn solar_declination(date: NaiveDate) -> f64 {
    let day_of_year = date.ordinal() as f64;
    -AXIAL_TILT_DEG * (2.0 * PI / 365.0 * (day_of_year + 10.0)).cos()
}

/// Detect polar day or polar night from the sunrise hour-angle equation.
///
/// `cos(H0) = (sin(h0) - sin(φ)·sin(δ)) / (cos(φ)·cos(δ))` has no solution when
/// its right-hand side leaves [-1, 1]: above 1 the sun never rises, below -1 it
/// never sets.
pub fn polar_condition(latitude: f64, date: NaiveDate) -> Option<PolarCondition> {
    let phi = latitude.to_radians();
    let delta = solar_declination(date).to_radians();
    let h0 = HORIZON_ALTITUDE_DEG.to_radians();

    let numerator = h0.sin() - phi.sin() * delta.sin();
    let denominator = phi.cos() * delta.cos();

    let cos_hour_angle = if denominator.abs() < 1e-12 {
        // At the poles the sign of the numerator decides
        if numerator > 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        numerator / denominator
    };

    if cos_hour_angle > 1.0 {
        Some(PolarCondition::PolarNight)
    } else if cos_hour_angle < -1.0 {
        Some(PolarCondition::MidnightSun)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_san_francisco_summer_solstice() {
        let tz: Tz = "America/Los_Angeles".parse().unwrap();
        let (sunrise, sunset) = SolarEphemeris::new()
            .sun_times(37.7749, -122.4194, date(2024, 6, 21), tz)
            .unwrap();

        assert!(sunrise < sunset);
        assert_eq!(sunrise.date_naive(), date(2024, 6, 21));
        assert_eq!(sunset.date_naive(), date(2024, 6, 21));
        // Sunrise around 05:48, sunset around 20:35 local time
        assert!((5..=6).contains(&sunrise.hour()), "sunrise at {}", sunrise);
        assert!((20..=21).contains(&sunset.hour()), "sunset at {}", sunset);
    }

    #[test]
    fn test_equatorial_day_is_about_twelve_hours() {
        let tz: Tz = "America/Guayaquil".parse().unwrap();
        let (sunrise, sunset) = SolarEphemeris::new()
            .sun_times(-0.1807, -78.4678, date(2024, 3, 20), tz)
            .unwrap();

        let day_length = sunset.signed_duration_since(sunrise);
        assert!(day_length.num_minutes() > 11 * 60 + 45);
        assert!(day_length.num_minutes() < 12 * 60 + 30);
    }

    #[test]
    fn test_events_fall_on_requested_local_date_far_from_utc() {
        // (latitude, longitude, zone): offsets of +13, +14 and a west-of-meridian +9
        let cases = [
            (-13.8333, -171.7667, chrono_tz::Pacific::Apia),
            (1.8721, -157.4278, chrono_tz::Pacific::Kiritimati),
            (35.6762, 139.6503, chrono_tz::Asia::Tokyo),
            (34.0522, -118.2437, chrono_tz::America::Los_Angeles),
        ];

        for (lat, lon, tz) in cases {
            for requested in [date(2024, 1, 1), date(2024, 6, 21), date(2024, 12, 31)] {
                let (sunrise, sunset) = SolarEphemeris::new()
                    .sun_times(lat, lon, requested, tz)
                    .unwrap();
                assert_eq!(sunrise.date_naive(), requested, "sunrise in {}", tz);
                assert_eq!(sunset.date_naive(), requested, "sunset in {}", tz);
                assert!(sunrise < sunset);
            }
        }
    }

    #[test]
    fn test_apia_solstice_times() {
        let (sunrise, sunset) = SolarEphemeris::new()
            .sun_times(-13.8333, -171.7667, date(2024, 6, 21), chrono_tz::Pacific::Apia)
            .unwrap();

        assert_eq!(sunrise.date_naive(), date(2024, 6, 21));
        assert!((6..=7).contains(&sunrise.hour()), "sunrise at {}", sunrise);
        assert!((17..=18).contains(&sunset.hour()), "sunset at {}", sunset);
    }

    #[test]
    fn test_polar_night_is_a_lookup_error() {
        let tz: Tz = "Arctic/Longyearbyen".parse().unwrap();
        let result = SolarEphemeris::new().sun_times(78.2232, 15.6267, date(2024, 12, 21), tz);

        match result {
            Err(FluxError::Lookup { reason, .. }) => assert!(reason.contains("polar night")),
            other => panic!("expected polar night lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_midnight_sun_is_a_lookup_error() {
        let tz: Tz = "Arctic/Longyearbyen".parse().unwrap();
        let result = SolarEphemeris::new().sun_times(78.2232, 15.6267, date(2024, 6, 21), tz);

        match result {
            Err(FluxError::Lookup { reason, .. }) => assert!(reason.contains("midnight sun")),
            other => panic!("expected midnight sun lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordinates() {
        let tz = Tz::UTC;
        let ephemeris = SolarEphemeris::new();
        assert!(ephemeris.sun_times(91.0, 0.0, date(2024, 6, 21), tz).is_err());
        assert!(ephemeris.sun_times(-91.0, 0.0, date(2024, 6, 21), tz).is_err());
        assert!(ephemeris.sun_times(45.0, 181.0, date(2024, 6, 21), tz).is_err());
        assert!(ephemeris.sun_times(45.0, -181.0, date(2024, 6, 21), tz).is_err());
    }

    #[test]
    fn test_polar_condition_by_latitude() {
        assert_eq!(polar_condition(45.0, date(2024, 6, 21)), None);
        assert_eq!(polar_condition(-45.0, date(2024, 12, 21)), None);
        assert_eq!(polar_condition(0.0, date(2024, 3, 20)), None);

        assert_eq!(
            polar_condition(85.0, date(2024, 6, 21)),
            Some(PolarCondition::MidnightSun)
        );
        assert_eq!(
            polar_condition(85.0, date(2024, 12, 21)),
            Some(PolarCondition::PolarNight)
        );
        assert_eq!(
            polar_condition(-85.0, date(2024, 12, 21)),
            Some(PolarCondition::MidnightSun)
        );
        assert_eq!(
            polar_condition(90.0, date(2024, 6, 21)),
            Some(PolarCondition::MidnightSun)
        );
    }
}
