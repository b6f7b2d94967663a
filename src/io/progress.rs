//! Terminal progress display for extraction and generation runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

static CELL_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} cells"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static SPINNER_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

/// Progress reporting for one command
///
/// When constructed hidden every call is a no-op, so callers never need to
/// branch on quiet mode.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a progress display, drawing nothing when `visible` is false
    pub fn new(visible: bool) -> Self {
        let bar = ProgressBar::hidden();
        if visible {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        Self { bar }
    }

    /// Whether anything is drawn
    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Show an indeterminate spinner with a message
    pub fn start_spinner(&self, message: &str) {
        self.bar.set_style(SPINNER_STYLE.clone());
        self.bar.set_message(message.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    /// Switch to a bar counting resolved cells out of `cells`
    pub fn start_cells(&self, message: &str, cells: usize) {
        self.bar.disable_steady_tick();
        self.bar.set_style(CELL_STYLE.clone());
        self.bar.set_length(cells as u64);
        self.bar.set_position(0);
        self.bar.set_message(message.to_string());
    }

    /// Report the number of resolved cells and the current iteration
    pub fn update_cells(&self, resolved: usize, iteration: usize) {
        self.bar.set_position(resolved as u64);
        self.bar.set_message(format!("iteration {iteration}"));
    }

    /// Current position of the bar
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the display, leaving a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Clear the display without a message
    pub fn abandon(&self) {
        self.bar.finish_and_clear();
    }
}
