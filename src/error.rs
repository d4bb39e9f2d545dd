//! Error types for the gamma model, the scheduler and the display collaborators.
//!
//! Each failure kind gets its own variant carrying the context needed to log
//! it: which temperature was rejected, which date and location had no solar
//! events, which display refused a gamma triple.
//!
//! Propagation policy:
//! - The gamma model never fails; only the checked variant reports
//!   [`FluxError::InputDomainEdge`].
//! - The scheduler surfaces [`FluxError::Computation`] and leaves the fallback
//!   decision to its caller.
//! - [`FluxError::Apply`] and [`FluxError::Enumeration`] come from the display
//!   backend and are handled by the driver loop.

use chrono::NaiveDate;
use thiserror::Error;

use crate::gamma::GammaTriple;

/// Result type alias using [`FluxError`] as the error type.
pub type Result<T> = std::result::Result<T, FluxError>;

#[derive(Debug, Error)]
pub enum FluxError {
    /// A Kelvin value that cannot be ordered against the model's anchors (NaN).
    #[error("temperature {value}K is outside the domain of the gamma model")]
    InputDomainEdge { value: f64 },

    /// The solar ephemeris produced no sunrise/sunset for this date and place.
    #[error("no sunrise/sunset for ({latitude:.4}, {longitude:.4}) on {date}: {reason}")]
    Lookup {
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
        reason: String,
    },

    /// The scheduler could not build a schedule for the requested instant.
    #[error("cannot compute the day/night schedule for {date}")]
    Computation {
        date: NaiveDate,
        #[source]
        source: Box<FluxError>,
    },

    /// The display utility rejected or failed to apply a gamma triple.
    #[error("failed to apply gamma {gamma} to display {display}: {reason}")]
    Apply {
        display: String,
        gamma: GammaTriple,
        reason: String,
    },

    /// Connected displays could not be listed, or none were found.
    #[error("cannot enumerate connected displays: {reason}")]
    Enumeration { reason: String },
}

impl FluxError {
    /// Wrap a lookup failure into the scheduler's computation error.
    pub fn computation(date: NaiveDate, source: FluxError) -> Self {
        FluxError::Computation {
            date,
            source: Box::new(source),
        }
    }
}
