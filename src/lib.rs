//! # gammaflux
//!
//! Solar-scheduled color temperature for Xorg displays.
//!
//! gammaflux tracks the day/night cycle at a configured location and shifts
//! every connected display toward warmer colors around sunset, back to the day
//! temperature around sunrise. The target temperature is converted to a
//! per-channel gamma triple and pushed to the displays with `xrandr`.
//!
//! ## Architecture
//!
//! - **gamma**: Kelvin to gamma triple conversion
//! - **time_state**: Day/night phases and target temperature for an instant
//! - **geo**: Sunrise/sunset lookup and timezone detection
//! - **backend**: Display enumeration and gamma application
//! - **daemon**: The scheduler loop with single-instance locking
//! - **fade**: Manual fades between two temperatures
//! - **commands**: One-shot `set`, `reset`, `fade` and `status` handlers
//! - **config**: Configuration loading and validation
//! - **args**: Command-line parsing
//! - **logger**: Structured logging with visual formatting
//! - **error**: Error types shared by the core and the driver
//! - **constants**: Application-wide constants and defaults
//! - **signals**: Shutdown signal handling
//! - **utils**: Interpolation and formatting helpers

pub mod args;
pub mod backend;
pub mod commands;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod error;
pub mod fade;
pub mod gamma;
pub mod geo;
pub mod logger;
pub mod signals;
pub mod time_state;
pub mod utils;

// Re-export important types for easier access
pub use backend::{DisplayBackend, XrandrBackend};
pub use config::Config;
pub use error::FluxError;
pub use gamma::{GammaTriple, compute_gamma, try_compute_gamma};
pub use logger::{Log, LogLevel};
pub use time_state::{
    DayNightScheduler, FadeWindow, SchedulePhase, ScheduleSettings, SolarSchedule, TargetState,
    current_target_temperature,
};
