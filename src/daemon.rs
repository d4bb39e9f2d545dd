//! The scheduler loop that keeps every display at the target temperature.
//!
//! Startup acquires a single-instance lock, enumerates the connected displays
//! once and installs the shutdown handler. Each tick then:
//!
//! 1. asks the scheduler for the target at the current instant, falling back
//!    to the day temperature when no schedule can be computed,
//! 2. converts the target to a gamma triple,
//! 3. applies it to every display, logging failures without stopping,
//! 4. sleeps until the next update in short chunks so shutdown stays prompt.
//!
//! On shutdown the displays are optionally restored to neutral gamma.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use fs2::FileExt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration as StdDuration;

use crate::backend::{DisplayBackend, apply_to_all, create_backend};
use crate::config::Config;
use crate::constants::{CHECK_INTERVAL_SECS, LOCK_FILE_NAME};
use crate::error::FluxError;
use crate::gamma::{GammaTriple, try_compute_gamma};
use crate::geo::{SolarEphemeris, SunTimesProvider};
use crate::logger::{Log, LogLevel};
use crate::signals::setup_signal_handler;
use crate::time_state::{
    DayNightScheduler, SchedulePhase, current_target_state, time_until_next_update,
};
use crate::utils::format_duration;

/// Exclusive lock that keeps a second daemon from fighting over the displays.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// `$XDG_RUNTIME_DIR/gammaflux.lock`, or the temp directory without a runtime dir.
    pub fn default_path() -> PathBuf {
        std::env::var_os("XDG_RUNTIME_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
            .join(LOCK_FILE_NAME)
    }

    /// Try to take the lock at `path`.
    ///
    /// Returns `Ok(None)` when another process already holds it.
    pub fn acquire(path: &Path) -> Result<Option<Self>> {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create lock file {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        writeln!(file, "{}", std::process::id())
            .with_context(|| format!("Failed to write lock file {}", path.display()))?;

        Ok(Some(Self {
            file,
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock and remove the lock file.
    pub fn release(self) {
        let _ = FileExt::unlock(&self.file);
        drop(self.file);

        if let Err(e) = std::fs::remove_file(&self.path) {
            Log::log_decorated(&format!("Warning: Failed to remove lock file: {}", e));
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Active phase, or `None` when the day temperature fallback was used
    pub phase: Option<SchedulePhase>,
    pub temperature: f64,
    pub gamma: GammaTriple,
    /// Number of displays that rejected the gamma triple
    pub failures: usize,
    /// How long to wait before the next tick
    pub next_update: StdDuration,
}

impl TickOutcome {
    pub fn used_fallback(&self) -> bool {
        self.phase.is_none()
    }
}

/// Scheduler, display backend and the set of displays being driven.
pub struct Daemon<P: SunTimesProvider> {
    scheduler: DayNightScheduler<P>,
    backend: Box<dyn DisplayBackend>,
    displays: Vec<String>,
    poll_interval: StdDuration,
    last_phase: Option<SchedulePhase>,
    in_fallback: bool,
}

impl<P: SunTimesProvider> Daemon<P> {
    /// Enumerate the connected displays once and prepare the loop.
    pub fn start(
        scheduler: DayNightScheduler<P>,
        mut backend: Box<dyn DisplayBackend>,
        poll_interval: StdDuration,
    ) -> std::result::Result<Self, FluxError> {
        let displays = backend.list_connected_displays()?;

        Log::log_block_start(&format!(
            "Found {} connected display(s) via {}",
            displays.len(),
            backend.backend_name()
        ));
        for display in &displays {
            Log::log_indented(display);
        }

        Ok(Self {
            scheduler,
            backend,
            displays,
            poll_interval,
            last_phase: None,
            in_fallback: false,
        })
    }

    pub fn displays(&self) -> &[String] {
        &self.displays
    }

    /// Compute and apply the target for `now`.
    pub fn tick(&mut self, now: &DateTime<Tz>) -> TickOutcome {
        let settings = self.scheduler.settings();
        let local = now.with_timezone(&settings.timezone);
        let day_temp = settings.day_temp;

        let (state, next_update) = match self.scheduler.schedule_at(&local) {
            Ok(schedule) => {
                self.in_fallback = false;
                (
                    Some(current_target_state(&schedule, &local)),
                    time_until_next_update(&schedule, &local, self.poll_interval),
                )
            }
            Err(e) => {
                if !self.in_fallback {
                    Log::log_pipe();
                    Log::log_error_chain(LogLevel::Warn, &e);
                    Log::log_indented(&format!("Using day temperature {:.0}K", day_temp));
                    self.in_fallback = true;
                }
                (None, self.poll_interval)
            }
        };

        let temperature = state.map(|s| s.temperature).unwrap_or(day_temp);
        let gamma = match try_compute_gamma(temperature) {
            Ok(gamma) => gamma,
            Err(e) => {
                Log::log_warning(&e.to_string());
                GammaTriple::NEUTRAL
            }
        };

        let failures = apply_to_all(self.backend.as_mut(), &self.displays, gamma);
        for failure in &failures {
            Log::log_error_chain(LogLevel::Err, failure);
        }

        let phase = state.map(|s| s.phase);
        if let Some(current) = phase {
            if self.last_phase != Some(current) {
                Log::log_block_start(&format!(
                    "{} at {}: {:.0}K ({})",
                    current.label(),
                    local.format("%H:%M:%S"),
                    temperature,
                    gamma
                ));
            }
        }
        self.last_phase = phase;

        if let Some(state) = state {
            if state.phase.is_fading() {
                Log::log_debug(&format!(
                    "{} {:.1}%: {:.0}K ({})",
                    state.phase.label(),
                    state.progress * 100.0,
                    temperature,
                    gamma
                ));
            }
        }
        Log::log_debug(&format!("Next update in {}", format_duration(next_update)));

        TickOutcome {
            phase,
            temperature,
            gamma,
            failures: failures.len(),
            next_update,
        }
    }

    /// Tick until `running` is cleared.
    pub fn run(&mut self, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            let now = Utc::now().with_timezone(&self.scheduler.settings().timezone);
            let outcome = self.tick(&now);
            sleep_while_running(outcome.next_update, running);
        }
    }

    /// Restore neutral gamma on every display.
    pub fn reset_displays(&mut self) -> usize {
        let failures = apply_to_all(self.backend.as_mut(), &self.displays, GammaTriple::NEUTRAL);
        for failure in &failures {
            Log::log_error_chain(LogLevel::Err, failure);
        }
        failures.len()
    }
}

/// Sleep for `duration` in short chunks, returning early once `running` clears.
pub fn sleep_while_running(duration: StdDuration, running: &AtomicBool) {
    let chunk = StdDuration::from_secs(CHECK_INTERVAL_SECS);
    let mut slept = StdDuration::ZERO;

    while slept < duration && running.load(Ordering::SeqCst) {
        let step = chunk.min(duration - slept);
        thread::sleep(step);
        slept += step;
    }
}

/// Run the daemon until a shutdown signal arrives.
pub fn run_daemon(config: &Config) -> Result<()> {
    run_daemon_with_lock(config, &InstanceLock::default_path())
}

/// Take the instance lock at `lock_path`, run the daemon and release the lock
/// however the run ends.
pub fn run_daemon_with_lock(config: &Config, lock_path: &Path) -> Result<()> {
    let Some(lock) = InstanceLock::acquire(lock_path)? else {
        Log::log_pipe();
        anyhow::bail!(
            "Another instance of gammaflux is already running (lock file {})",
            lock_path.display()
        );
    };

    let result = run_locked(config);
    lock.release();
    result
}

fn run_locked(config: &Config) -> Result<()> {
    let settings = config.schedule_settings()?;
    let running = setup_signal_handler()?;

    Log::log_block_start(&format!(
        "Scheduling in {} ({})",
        config.location_name(),
        settings.timezone
    ));
    let scheduler = DayNightScheduler::new(settings, SolarEphemeris::new());

    let mut daemon = Daemon::start(
        scheduler,
        create_backend(config.backend()),
        config.poll_interval(),
    )
    .context("Cannot start without displays")?;

    daemon.run(&running);

    Log::log_block_start("Shutting down gammaflux...");
    if config.reset_on_exit() {
        let failures = daemon.reset_displays();
        if failures == 0 {
            Log::log_decorated("Displays restored to neutral gamma");
        }
    }

    Ok(())
}
