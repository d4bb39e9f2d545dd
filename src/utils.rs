//! Utility functions shared across the codebase.
//!
//! Interpolation and ratio helpers used by the scheduler and the manual fade,
//! plus small formatting helpers for log output.

use chrono::{DateTime, TimeZone};

/// Interpolate between two temperatures based on progress (0.0 to 1.0).
///
/// Computes `start × (1 − ratio) + end × ratio` with the ratio clamped to
/// [0.0, 1.0], so the endpoints are returned exactly.
///
/// # Examples
/// ```
/// use gammaflux::utils::interpolate_f64;
/// assert_eq!(interpolate_f64(5700.0, 3000.0, 0.25), 5025.0);
/// assert_eq!(interpolate_f64(3000.0, 5700.0, 0.5), 4350.0);
/// ```
pub fn interpolate_f64(start: f64, end: f64, progress: f64) -> f64 {
    let ratio = progress.clamp(0.0, 1.0);
    start * (1.0 - ratio) + end * ratio
}

/// Fraction of `span` that has elapsed between `start` and `now`, clamped to [0.0, 1.0].
///
/// A zero or negative span yields 1.0 once `now` has reached `start`.
pub fn elapsed_ratio<Tz: TimeZone>(
    now: &DateTime<Tz>,
    start: &DateTime<Tz>,
    span: chrono::Duration,
) -> f64 {
    let elapsed_ms = now.clone().signed_duration_since(start.clone()).num_milliseconds() as f64;
    let span_ms = span.num_milliseconds() as f64;

    if span_ms <= 0.0 {
        return if elapsed_ms >= 0.0 { 1.0 } else { 0.0 };
    }

    (elapsed_ms / span_ms).clamp(0.0, 1.0)
}

/// Format a duration as "Xh Ym" or "Ym Zs" for log output.
pub fn format_duration(duration: std::time::Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}
