//! Conversion from a color temperature in Kelvin to a per-channel gamma triple.
//!
//! The model is a cheap approximation of the warm shift of lower color
//! temperatures: red stays at full strength while green and blue follow
//! three-segment piecewise-linear ramps that are clamped to their channel
//! ranges. Anything at or above 6500K is the neutral white point.
//!
//! The output is meant for gamma-style correction tools such as
//! `xrandr --gamma R:G:B`, which is why [`GammaTriple`] formats itself that way.

use std::fmt;

use crate::constants::{
    BLUE_LOWER_KNEE, BLUE_MAX, BLUE_MIN, BLUE_UPPER_KNEE, GREEN_LOWER_KNEE, GREEN_MAX, GREEN_MIN,
    GREEN_UPPER_KNEE, MINIMUM_MODEL_TEMP, NEUTRAL_TEMP,
};
use crate::error::{FluxError, Result};

/// Per-channel multiplicative correction factors, each within 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaTriple {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl GammaTriple {
    /// The 1.0:1.0:1.0 triple that leaves the display untouched.
    pub const NEUTRAL: GammaTriple = GammaTriple {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
    };

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.red, self.green, self.blue)
    }
}

impl fmt::Display for GammaTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}:{:.4}:{:.4}", self.red, self.green, self.blue)
    }
}

/// Convert a color temperature to a gamma triple.
///
/// Total over `f64`:
/// - `temp_k >= 6500` (including `+inf`) returns [`GammaTriple::NEUTRAL`]
/// - values below 1000 (including `-inf`) behave exactly like 1000
/// - `NaN` cannot be placed on the ramps and returns the neutral triple;
///   use [`try_compute_gamma`] to have it reported instead
///
/// # Examples
/// ```
/// use gammaflux::gamma::{compute_gamma, GammaTriple};
/// assert_eq!(compute_gamma(6500.0), GammaTriple::NEUTRAL);
/// assert_eq!(compute_gamma(999.0), compute_gamma(1000.0));
/// assert_eq!(compute_gamma(3000.0).to_string(), "1.0000:0.7000:0.3000");
/// ```
pub fn compute_gamma(temp_k: f64) -> GammaTriple {
    if temp_k.is_nan() || temp_k >= NEUTRAL_TEMP {
        return GammaTriple::NEUTRAL;
    }

    let temp = temp_k.max(MINIMUM_MODEL_TEMP);

    GammaTriple {
        red: 1.0,
        green: green_channel(temp).clamp(GREEN_MIN, GREEN_MAX),
        blue: blue_channel(temp).clamp(BLUE_MIN, BLUE_MAX),
    }
}

/// Checked variant of [`compute_gamma`] that rejects `NaN` with
/// [`FluxError::InputDomainEdge`] instead of returning the neutral sentinel.
pub fn try_compute_gamma(temp_k: f64) -> Result<GammaTriple> {
    if temp_k.is_nan() {
        return Err(FluxError::InputDomainEdge { value: temp_k });
    }
    Ok(compute_gamma(temp_k))
}

fn green_channel(temp: f64) -> f64 {
    if temp >= GREEN_UPPER_KNEE {
        0.8 + 0.2 * ((temp - GREEN_UPPER_KNEE) / 1500.0)
    } else if temp >= GREEN_LOWER_KNEE {
        0.6 + 0.3 * ((temp - GREEN_LOWER_KNEE) / 3000.0)
    } else {
        0.6 - 0.1 * ((GREEN_LOWER_KNEE - temp) / 1000.0)
    }
}

fn blue_channel(temp: f64) -> f64 {
    if temp >= BLUE_UPPER_KNEE {
        0.8 + 0.2 * ((temp - BLUE_UPPER_KNEE) / 500.0)
    } else if temp >= BLUE_LOWER_KNEE {
        0.3 + 0.5 * ((temp - BLUE_LOWER_KNEE) / 3000.0)
    } else {
        0.3 * ((temp - MINIMUM_MODEL_TEMP) / 2000.0)
    }
}
