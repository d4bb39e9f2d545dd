//! Manual fade between two color temperatures.
//!
//! The fade splits the requested duration into equal steps, converts each
//! interpolated temperature to a gamma triple and pushes it to every display.
//! A progress bar tracks the fade on the terminal. The fade stops early when
//! the running flag is cleared by a signal.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::backend::{DisplayBackend, apply_to_all};
use crate::gamma::compute_gamma;
use crate::logger::{Log, LogLevel};
use crate::utils::interpolate_f64;

const PROGRESS_BAR_WIDTH: usize = 30;

/// Temperatures visited by a fade of `steps` steps, both endpoints included.
///
/// # Examples
/// ```
/// use gammaflux::fade::fade_steps;
/// assert_eq!(fade_steps(6000.0, 3000.0, 3), vec![6000.0, 5000.0, 4000.0, 3000.0]);
/// ```
pub fn fade_steps(start: f64, end: f64, steps: u32) -> Vec<f64> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| interpolate_f64(start, end, i as f64 / steps as f64))
        .collect()
}

/// What happened during a fade.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeReport {
    /// Temperatures pushed to the displays, in order
    pub applied: Vec<f64>,
    /// Number of per-display apply failures
    pub failures: usize,
    /// False when the fade was interrupted before reaching the end temperature
    pub completed: bool,
}

/// A smooth transition from one temperature to another.
#[derive(Debug, Clone)]
pub struct ManualFade {
    start: f64,
    end: f64,
    duration: Duration,
    steps: u32,
    last_progress_pct: Option<usize>,
}

impl ManualFade {
    pub fn new(start: f64, end: f64, duration: Duration, steps: u32) -> Self {
        Self {
            start,
            end,
            duration,
            steps: steps.max(1),
            last_progress_pct: None,
        }
    }

    /// Pause between two consecutive steps.
    pub fn step_interval(&self) -> Duration {
        self.duration / self.steps
    }

    /// Run the fade, applying every step to every display.
    ///
    /// Apply failures are counted and logged once at the end so they do not
    /// break up the progress bar.
    pub fn execute(
        &mut self,
        backend: &mut dyn DisplayBackend,
        displays: &[String],
        running: &AtomicBool,
    ) -> FadeReport {
        Log::log_pipe();
        Log::log_decorated(&format!(
            "Fading from {:.0}K to {:.0}K over {}s in {} steps",
            self.start,
            self.end,
            self.duration.as_secs(),
            self.steps
        ));

        let temperatures = fade_steps(self.start, self.end, self.steps);
        let interval = self.step_interval();
        let total = temperatures.len();

        let mut applied = Vec::with_capacity(total);
        let mut errors = Vec::new();

        for (index, temp) in temperatures.into_iter().enumerate() {
            if !running.load(Ordering::SeqCst) {
                break;
            }

            errors.extend(apply_to_all(backend, displays, compute_gamma(temp)));
            applied.push(temp);

            let progress = index as f64 / (total - 1).max(1) as f64;
            self.draw_progress_bar(progress, temp);

            if index + 1 < total && !interval.is_zero() {
                thread::sleep(interval);
            }
        }

        if self.last_progress_pct.is_some() && Log::is_enabled() {
            let mut stdout = io::stdout().lock();
            writeln!(stdout).ok();
            stdout.flush().ok();
        }

        for error in &errors {
            Log::log_error_chain(LogLevel::Err, error);
        }

        let completed = applied.len() == total;
        if completed {
            Log::log_decorated("Fade complete");
        } else {
            Log::log_warning("Fade interrupted");
        }

        FadeReport {
            applied,
            failures: errors.len(),
            completed,
        }
    }

    fn draw_progress_bar(&mut self, progress: f64, current_temp: f64) {
        if !Log::is_enabled() {
            return;
        }

        let percentage = (progress * 100.0) as usize;

        // Only redraw if percentage changed to prevent flickering
        if self.last_progress_pct == Some(percentage) && percentage < 100 {
            return;
        }

        let filled = (PROGRESS_BAR_WIDTH as f64 * progress) as usize;
        let empty = PROGRESS_BAR_WIDTH - filled.min(PROGRESS_BAR_WIDTH);

        let bar = if filled > 0 {
            format!(
                "{}>{}",
                "=".repeat(filled.saturating_sub(1)),
                " ".repeat(empty)
            )
        } else {
            " ".repeat(PROGRESS_BAR_WIDTH)
        };

        print!(
            "\r\x1B[K┃[{}] {}% (temp: {:.0}K)",
            bar, percentage, current_temp
        );
        io::stdout().flush().ok();

        self.last_progress_pct = Some(percentage);
    }
}
