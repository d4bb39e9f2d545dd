//! Configuration loading and validation for gammaflux.
//!
//! Settings live in `gammaflux.toml` under the user's configuration directory
//! (`$XDG_CONFIG_HOME/gammaflux/gammaflux.toml` on Linux). Every key is
//! optional; a missing file means all defaults. The file is only ever read.
//!
//! ```toml
//! backend = "xrandr"              # Display backend
//!
//! # Location used for sunrise/sunset
//! latitude = 37.7749
//! longitude = -122.4194
//! timezone = "America/Los_Angeles" # Detected from coordinates when omitted
//! location_name = "San Francisco"
//!
//! # Color temperature anchors
//! day_temp = 5700                 # Kelvin
//! night_temp = 3000               # Kelvin
//!
//! # Transition behavior
//! transition_duration = 60        # Minutes before/after sunrise and sunset
//! poll_interval = 60              # Seconds between updates
//! fade_window = "extended"        # "extended" or "symmetric"
//!
//! reset_on_exit = true            # Restore 1:1:1 gamma on shutdown
//! ```
//!
//! Validation rejects out-of-range values with a message naming the key and
//! the accepted range.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use crate::backend::Backend;
use crate::constants::*;
use crate::geo::resolve_timezone;
use crate::logger::Log;
use crate::time_state::{FadeWindow, ScheduleSettings};

/// Configuration structure for gammaflux settings.
///
/// Fields are optional in the file. After loading, every field is populated
/// with either the configured value or its default.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    pub backend: Option<Backend>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// IANA timezone name; detected from the coordinates when absent.
    pub timezone: Option<String>,
    pub location_name: Option<String>,
    pub day_temp: Option<u32>,
    pub night_temp: Option<u32>,
    pub transition_duration: Option<u64>, // minutes
    pub poll_interval: Option<u64>,       // seconds
    pub fade_window: Option<FadeWindow>,
    pub reset_on_exit: Option<bool>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Built-in defaults, as used when no configuration file exists.
    pub fn defaults() -> Result<Self> {
        let mut config = Config::default();
        Self::apply_defaults_and_validate_fields(&mut config)?;
        Ok(config)
    }

    /// Load and validate the file at `path`, which must exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Configuration file not found at specified path: {}",
                path.display()
            );
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            Self::defaults()
        }
    }

    /// Load the configuration from the default location.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_or_default(&config_path).with_context(|| {
            Log::log_pipe();
            format!(
                "Failed to load configuration from {}",
                config_path.display()
            )
        })
    }

    /// Parse TOML content, apply defaults and validate.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        Self::apply_defaults_and_validate_fields(&mut config)?;
        Ok(config)
    }

    fn apply_defaults_and_validate_fields(config: &mut Config) -> Result<()> {
        if config.backend.is_none() {
            config.backend = Some(DEFAULT_BACKEND);
        }

        match config.latitude {
            Some(lat) if !(-90.0..=90.0).contains(&lat) => {
                anyhow::bail!("Latitude must be between -90 and 90 degrees (got {})", lat);
            }
            Some(_) => {}
            None => config.latitude = Some(DEFAULT_LATITUDE),
        }

        match config.longitude {
            Some(lon) if !(-180.0..=180.0).contains(&lon) => {
                anyhow::bail!(
                    "Longitude must be between -180 and 180 degrees (got {})",
                    lon
                );
            }
            Some(_) => {}
            None => config.longitude = Some(DEFAULT_LONGITUDE),
        }

        // Only fall back to the default zone when the default location is in use
        if let Some(name) = &config.timezone {
            name.trim()
                .parse::<chrono_tz::Tz>()
                .map_err(|e| anyhow::anyhow!("Unknown timezone '{}': {}", name, e))?;
        } else if config.latitude == Some(DEFAULT_LATITUDE)
            && config.longitude == Some(DEFAULT_LONGITUDE)
        {
            config.timezone = Some(DEFAULT_TIMEZONE.to_string());
        }

        if config.location_name.is_none() {
            config.location_name = Some(DEFAULT_LOCATION_NAME.to_string());
        }

        config.day_temp = Some(Self::validated_temp(
            "Day temperature",
            config.day_temp,
            DEFAULT_DAY_TEMP,
        )?);
        config.night_temp = Some(Self::validated_temp(
            "Night temperature",
            config.night_temp,
            DEFAULT_NIGHT_TEMP,
        )?);

        if let Some(duration) = config.transition_duration {
            if !(MINIMUM_TRANSITION_DURATION..=MAXIMUM_TRANSITION_DURATION).contains(&duration) {
                anyhow::bail!(
                    "Transition duration must be between {} and {} minutes (got {})",
                    MINIMUM_TRANSITION_DURATION,
                    MAXIMUM_TRANSITION_DURATION,
                    duration
                );
            }
        } else {
            config.transition_duration = Some(DEFAULT_TRANSITION_DURATION);
        }

        if let Some(interval) = config.poll_interval {
            if !(MINIMUM_POLL_INTERVAL..=MAXIMUM_POLL_INTERVAL).contains(&interval) {
                anyhow::bail!(
                    "Poll interval must be between {} and {} seconds (got {})",
                    MINIMUM_POLL_INTERVAL,
                    MAXIMUM_POLL_INTERVAL,
                    interval
                );
            }
        } else {
            config.poll_interval = Some(DEFAULT_POLL_INTERVAL);
        }

        if config.fade_window.is_none() {
            config.fade_window = Some(DEFAULT_FADE_WINDOW);
        }

        if config.reset_on_exit.is_none() {
            config.reset_on_exit = Some(DEFAULT_RESET_ON_EXIT);
        }

        Ok(())
    }

    fn validated_temp(label: &str, value: Option<u32>, default: u32) -> Result<u32> {
        match value {
            Some(temp) if !(MINIMUM_TEMP..=MAXIMUM_TEMP).contains(&temp) => {
                anyhow::bail!(
                    "{} must be between {} and {} Kelvin (got {})",
                    label,
                    MINIMUM_TEMP,
                    MAXIMUM_TEMP,
                    temp
                )
            }
            Some(temp) => Ok(temp),
            None => Ok(default),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend.unwrap_or(DEFAULT_BACKEND)
    }

    pub fn day_temp(&self) -> u32 {
        self.day_temp.unwrap_or(DEFAULT_DAY_TEMP)
    }

    pub fn night_temp(&self) -> u32 {
        self.night_temp.unwrap_or(DEFAULT_NIGHT_TEMP)
    }

    pub fn poll_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.poll_interval.unwrap_or(DEFAULT_POLL_INTERVAL))
    }

    pub fn reset_on_exit(&self) -> bool {
        self.reset_on_exit.unwrap_or(DEFAULT_RESET_ON_EXIT)
    }

    pub fn location_name(&self) -> &str {
        self.location_name.as_deref().unwrap_or(DEFAULT_LOCATION_NAME)
    }

    /// Build the scheduler settings, resolving the timezone.
    pub fn schedule_settings(&self) -> Result<ScheduleSettings> {
        let latitude = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let longitude = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        let timezone = resolve_timezone(self.timezone.as_deref(), latitude, longitude)?;
        let minutes = self
            .transition_duration
            .unwrap_or(DEFAULT_TRANSITION_DURATION);

        Ok(ScheduleSettings {
            latitude,
            longitude,
            timezone,
            transition_duration: chrono::Duration::minutes(minutes as i64),
            day_temp: self.day_temp() as f64,
            night_temp: self.night_temp() as f64,
            fade_window: self.fade_window.unwrap_or(DEFAULT_FADE_WINDOW),
        })
    }

    pub fn log_config(&self, source: Option<&Path>) {
        match source {
            Some(path) => Log::log_block_start(&format!(
                "Loaded configuration from {}",
                path.display()
            )),
            None => Log::log_block_start("No configuration file found, using defaults"),
        }

        Log::log_indented(&format!("Backend: {}", self.backend().as_str()));

        let lat = self.latitude.unwrap_or(DEFAULT_LATITUDE);
        let lon = self.longitude.unwrap_or(DEFAULT_LONGITUDE);
        let lat_dir = if lat >= 0.0 { "N" } else { "S" };
        let lon_dir = if lon >= 0.0 { "E" } else { "W" };
        Log::log_indented(&format!(
            "Location: {} ({:.4}°{}, {:.4}°{})",
            self.location_name(),
            lat.abs(),
            lat_dir,
            lon.abs(),
            lon_dir
        ));
        Log::log_indented(&format!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or("detected from coordinates")
        ));
        Log::log_indented(&format!("Day temperature: {}K", self.day_temp()));
        Log::log_indented(&format!("Night temperature: {}K", self.night_temp()));
        Log::log_indented(&format!(
            "Transition duration: {} minutes",
            self.transition_duration
                .unwrap_or(DEFAULT_TRANSITION_DURATION)
        ));
        Log::log_indented(&format!(
            "Poll interval: {} seconds",
            self.poll_interval().as_secs()
        ));
        Log::log_indented(&format!(
            "Fade window: {}",
            self.fade_window.unwrap_or(DEFAULT_FADE_WINDOW).as_str()
        ));
        Log::log_indented(&format!("Reset on exit: {}", self.reset_on_exit()));
    }
}
