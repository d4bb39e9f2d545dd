//! Geographic sunrise/sunset lookup.
//!
//! This module provides:
//! - The [`SunTimesProvider`] seam the scheduler consumes
//! - Solar ephemeris calculations for sunrise/sunset instants
//! - Timezone detection from coordinates

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::error::Result;

pub mod solar;
pub mod timezone;

pub use solar::SolarEphemeris;
pub use timezone::{determine_timezone_from_coordinates, resolve_timezone};

/// Source of one day's sunrise and sunset for a location.
///
/// Implementations return both instants expressed in `tz`, or
/// [`FluxError::Lookup`](crate::error::FluxError::Lookup) when the sun does
/// not rise or set on `date` at that location.
#[cfg_attr(test, mockall::automock)]
pub trait SunTimesProvider {
    fn sun_times(
        &self,
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        tz: Tz,
    ) -> Result<(DateTime<Tz>, DateTime<Tz>)>;
}
