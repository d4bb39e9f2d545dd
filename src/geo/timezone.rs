//! Timezone resolution for the configured location.
//!
//! An explicitly configured IANA name wins. Without one, the timezone is looked
//! up from the coordinates with `tzf-rs` boundary data, so that sunrise and
//! sunset are reported in the location's own wall-clock time.

use anyhow::Result;
use chrono_tz::Tz;
use std::sync::OnceLock;
use tzf_rs::DefaultFinder;

/// Determine the timezone for given coordinates using timezone boundary data.
///
/// Falls back to UTC when the boundary data has no zone for the point
/// (international waters).
pub fn determine_timezone_from_coordinates(latitude: f64, longitude: f64) -> Tz {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // Note: tzf-rs uses (longitude, latitude) order
    let tz_name = finder.get_tz_name(longitude, latitude);

    tz_name.parse::<Tz>().unwrap_or(Tz::UTC)
}

/// Resolve the configured timezone name, or detect it from coordinates.
pub fn resolve_timezone(name: Option<&str>, latitude: f64, longitude: f64) -> Result<Tz> {
    match name {
        Some(name) => name
            .trim()
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", name, e)),
        None => Ok(determine_timezone_from_coordinates(latitude, longitude)),
    }
}
