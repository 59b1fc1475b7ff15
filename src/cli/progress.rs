//! Terminal progress bar for interactive scans

use codeweave::scanner::ProgressReport;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid template")
        .progress_chars("█▓▒░  ")
}

/// Draws an indicatif bar on stderr
#[derive(Default)]
pub struct BarProgressReport {
    bar: Option<ProgressBar>,
}

impl BarProgressReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReport for BarProgressReport {
    fn start(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(create_bar_style());
        bar.set_message("Scanning source files...");
        self.bar = Some(bar);
    }

    fn progress(&mut self, current: usize) {
        if let Some(bar) = &self.bar {
            bar.set_position(current as u64);
        }
    }

    fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            let done = bar.position();
            bar.finish_with_message(format!(
                "{}Scanned {} source files",
                style("✓ ").green(),
                style(done).cyan()
            ));
        }
    }

    fn cancel(&mut self) {
        if let Some(bar) = self.bar.take() {
            let done = bar.position();
            bar.abandon_with_message(format!(
                "{}Stopped after {} files",
                style("✗ ").red(),
                style(done).yellow()
            ));
        }
    }
}
