//! Terminal progress display for the model download
//!
//! On a terminal this draws an indicatif byte bar, or a spinner with a
//! running byte count when the server did not declare a size. When stderr is
//! not a terminal the bar stays hidden and a plain-text line is printed every
//! few seconds instead.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use indicatif::{HumanBytes, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::debug;

use crate::app::TransferProgress;
use crate::constants::progress;

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Enable visual progress bars
    pub enable_progress_bars: bool,
    /// Redraw interval of the bar/spinner
    pub tick_interval: Duration,
    /// Interval between plain-text lines in non-terminal mode
    pub text_report_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_progress_bars: true,
            tick_interval: progress::TICK_INTERVAL,
            text_report_interval: progress::TEXT_REPORT_INTERVAL,
        }
    }
}

impl ProgressConfig {
    /// No bars and no text lines
    pub fn silent() -> Self {
        Self {
            enable_progress_bars: false,
            text_report_interval: Duration::MAX,
            ..Default::default()
        }
    }
}

/// Byte progress for a single download
pub struct DownloadProgress {
    config: ProgressConfig,
    bar: ProgressBar,
    draw_bar: bool,
    last_report: Mutex<Instant>,
}

impl DownloadProgress {
    /// Create a progress display; the bar is drawn only on a terminal
    pub fn new(config: ProgressConfig) -> Self {
        let is_terminal = atty::is(atty::Stream::Stderr);
        Self::with_terminal(config, is_terminal)
    }

    fn with_terminal(config: ProgressConfig, is_terminal: bool) -> Self {
        let draw_bar = config.enable_progress_bars && is_terminal;
        let bar = if draw_bar {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };

        Self {
            config,
            bar,
            draw_bar,
            last_report: Mutex::new(Instant::now()),
        }
    }

    /// Bytes reported so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn style_for(total: Option<u64>) -> ProgressStyle {
        match total {
            Some(_) => ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {bytes_per_sec}",
                )
                .map(|style| style.progress_chars("##-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            None => ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {bytes} {bytes_per_sec}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        }
    }

    fn report_text(&self, force: bool) {
        let Ok(mut last_report) = self.last_report.lock() else {
            return;
        };
        if force || last_report.elapsed() >= self.config.text_report_interval {
            eprintln!(
                "[Model Download] {}",
                describe_progress(self.position(), self.bar.length())
            );
            *last_report = Instant::now();
        }
    }
}

impl TransferProgress for DownloadProgress {
    fn start(&self, total: Option<u64>) {
        debug!("Progress started with total {:?}", total);
        if let Some(total) = total {
            self.bar.set_length(total);
        }
        self.bar.set_style(Self::style_for(total));
        self.bar.set_message("Downloading");
        if self.draw_bar {
            self.bar.enable_steady_tick(self.config.tick_interval);
        }
        if let Ok(mut last_report) = self.last_report.lock() {
            *last_report = Instant::now();
        }
    }

    fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
        if !self.draw_bar {
            self.report_text(false);
        }
    }

    fn finish(&self) {
        if self.draw_bar {
            self.bar.finish();
        } else if self.config.text_report_interval != Duration::MAX {
            self.report_text(true);
        }
    }

    fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Human-readable progress line; percentage only when the total is known
pub fn describe_progress(bytes: u64, total: Option<u64>) -> String {
    match total {
        Some(total) if total > 0 => format!(
            "Downloaded {} of {} ({:.0}%)",
            HumanBytes(bytes),
            HumanBytes(total),
            bytes as f64 / total as f64 * 100.0
        ),
        _ => format!("Downloaded {}", HumanBytes(bytes)),
    }
}
