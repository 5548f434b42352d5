//! Progress bars and log-only progress lines for the build phases.
//!
//! In log-only mode bars and spinners are hidden and each phase prints a
//! tail-friendly line every [`Phase::log_interval`] units instead.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Build stages that report progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Loading the library export (row count unknown up front).
    Read,
    /// Row normalization and aggregation, counted in rows.
    Normalize,
    /// Chunk file writing, counted in chunks.
    Chunks,
}

impl Phase {
    /// Short tag used in log-only lines.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Read => "read",
            Phase::Normalize => "normalize",
            Phase::Chunks => "chunks",
        }
    }

    /// Message shown next to the bar or spinner.
    pub fn message(self) -> &'static str {
        match self {
            Phase::Read => "Reading library export",
            Phase::Normalize => "Normalizing rows",
            Phase::Chunks => "Writing chunks",
        }
    }

    /// Units between log-only lines. The last unit is always logged.
    pub fn log_interval(self) -> u64 {
        match self {
            Phase::Read => 0,
            Phase::Normalize => 10_000,
            Phase::Chunks => 10,
        }
    }
}

/// Format elapsed wall time in human-readable format
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Bar for a phase with a known unit count; hidden in log-only mode.
pub fn create_progress_bar(len: u64, phase: Phase) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        pb.set_style(style);
    }
    pb.set_message(phase.message());
    pb
}

/// Spinner for a phase without a known length; hidden in log-only mode.
pub fn create_spinner(phase: Phase) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        let style = ProgressStyle::default_spinner()
            .template("{msg} {spinner} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
    }
    pb.set_message(phase.message());
    pb
}

/// Print `[phase] current/total (pct%)` to stderr in log-only mode.
pub fn log_progress(phase: Phase, current: u64, total: u64) {
    if is_log_only() && should_log(current, total, phase.log_interval()) {
        eprintln!("{}", progress_line(phase, current, total));
    }
}

fn progress_line(phase: Phase, current: u64, total: u64) -> String {
    let pct = 100.0 * current as f64 / total as f64;
    format!("[{}] {}/{} ({:.1}%)", phase.label(), current, total, pct)
}

fn should_log(current: u64, total: u64, interval: u64) -> bool {
    total > 0 && (current == total || (interval > 0 && current % interval == 0))
}
