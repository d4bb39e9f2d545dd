//! Application constants and default values for gammaflux.
//!
//! This module contains the configuration defaults, validation limits,
//! gamma model anchor points and operational constants used throughout
//! the application.

use crate::backend::Backend;
use crate::time_state::FadeWindow;

// ═══ Application Configuration Defaults ═══
// These values are used when config options are not specified by the user

pub const DEFAULT_BACKEND: Backend = Backend::Xrandr;
pub const DEFAULT_LATITUDE: f64 = 37.7749; // San Francisco, CA
pub const DEFAULT_LONGITUDE: f64 = -122.4194;
pub const DEFAULT_TIMEZONE: &str = "America/Los_Angeles";
pub const DEFAULT_LOCATION_NAME: &str = "My Location";
pub const DEFAULT_DAY_TEMP: u32 = 5700; // Kelvin - cool, white light
pub const DEFAULT_NIGHT_TEMP: u32 = 3000; // Kelvin - warm, red light
pub const DEFAULT_TRANSITION_DURATION: u64 = 60; // minutes
pub const DEFAULT_POLL_INTERVAL: u64 = 60; // seconds between scheduler ticks
pub const DEFAULT_FADE_WINDOW: FadeWindow = FadeWindow::Extended;
pub const DEFAULT_RESET_ON_EXIT: bool = true;

// Manual fade command defaults
pub const DEFAULT_FADE_DURATION_SECS: u64 = 10;
pub const DEFAULT_FADE_STEPS: u32 = 100;

// ═══ Gamma Model ═══
// Anchor points of the piecewise-linear Kelvin to gamma ramps

pub const NEUTRAL_TEMP: f64 = 6500.0; // 1.0:1.0:1.0 white point
pub const MINIMUM_MODEL_TEMP: f64 = 1000.0; // inputs below behave like this value

pub const GREEN_UPPER_KNEE: f64 = 5000.0;
pub const GREEN_LOWER_KNEE: f64 = 2000.0;
pub const GREEN_MIN: f64 = 0.5;
pub const GREEN_MAX: f64 = 1.0;

pub const BLUE_UPPER_KNEE: f64 = 6000.0;
pub const BLUE_LOWER_KNEE: f64 = 3000.0;
pub const BLUE_MIN: f64 = 0.0;
pub const BLUE_MAX: f64 = 1.0;

// Recommended range for fixed temperatures; values outside still work but
// produce either the neutral triple or the warmest ramp
pub const RECOMMENDED_MIN_TEMP: u32 = 1000;
pub const RECOMMENDED_MAX_TEMP: u32 = 6500;

// ═══ Validation Limits ═══
// These limits ensure user inputs are within reasonable and safe ranges

pub const MINIMUM_TEMP: u32 = 1000;
pub const MAXIMUM_TEMP: u32 = 10000;

pub const MINIMUM_TRANSITION_DURATION: u64 = 5; // minutes
pub const MAXIMUM_TRANSITION_DURATION: u64 = 180; // minutes

pub const MINIMUM_POLL_INTERVAL: u64 = 10; // seconds
pub const MAXIMUM_POLL_INTERVAL: u64 = 600; // seconds

pub const MINIMUM_FADE_STEPS: u32 = 1;
pub const MAXIMUM_FADE_STEPS: u32 = 1000;

// ═══ Operational Timing Constants ═══

pub const CHECK_INTERVAL_SECS: u64 = 1; // How often to check the running flag during sleep
pub const MINIMUM_SLEEP_SECS: u64 = 1; // Never busy-loop at a phase boundary

// ═══ External Utility ═══

pub const XRANDR_COMMAND: &str = "xrandr";

// ═══ Files ═══

pub const CONFIG_DIR_NAME: &str = "gammaflux";
pub const CONFIG_FILE_NAME: &str = "gammaflux.toml";
pub const LOCK_FILE_NAME: &str = "gammaflux.lock";

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1;
