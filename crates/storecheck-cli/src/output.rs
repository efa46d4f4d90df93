//! Progress and status output on stderr

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use storecheck::{TestResultEntry, TestStatus};

/// Progress reporter for scenario runs
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
        }
    }

    /// Start a progress bar over `total` runs
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Record one finished run
    pub fn run_finished(&self, entry: &TestResultEntry) {
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
            pb.set_message(entry.name.clone());
        }
        let line = format!("{} ({} ms)", entry.name, entry.duration_ms);
        match entry.status {
            TestStatus::Passed => self.success(&line),
            TestStatus::Skipped => self.warning(&format!("{} skipped", entry.name)),
            TestStatus::Failed => {
                let reason = entry
                    .failure
                    .as_ref()
                    .map(|f| format!(" [{} during {}] {}", f.kind, f.phase, f.message))
                    .unwrap_or_default();
                self.failure(&format!("{line}{reason}"));
            }
        }
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    fn write(&self, line: &str) {
        match self.progress_bar {
            Some(ref pb) => pb.println(line),
            None => {
                let _ = self.term.write_line(line);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        self.write(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        self.write(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        self.write(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        self.write(&format!("{prefix} {message}"));
    }

    /// Print the suite summary line
    pub fn summary(&self, passed: usize, failed: usize, skipped: usize, duration: Duration) {
        if self.quiet && failed == 0 {
            return;
        }

        let total = passed + failed + skipped;
        let duration_secs = duration.as_secs_f64();

        let line = if self.use_color {
            let passed_style = Style::new().green().bold();
            let failed_style = Style::new().red().bold();
            let skipped_style = Style::new().yellow();

            let status = if failed > 0 {
                failed_style.apply_to("FAILED")
            } else {
                passed_style.apply_to("PASSED")
            };

            format!(
                "{} {} runs in {:.2}s ({} passed, {} failed, {} skipped)",
                status,
                total,
                duration_secs,
                passed_style.apply_to(passed),
                if failed > 0 {
                    failed_style.apply_to(failed).to_string()
                } else {
                    failed.to_string()
                },
                skipped_style.apply_to(skipped)
            )
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            format!(
                "{status} {total} runs in {duration_secs:.2}s ({passed} passed, {failed} failed, {skipped} skipped)"
            )
        };

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&line);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_reporter_has_no_progress_bar() {
        let mut reporter = ProgressReporter::new(false, true);
        reporter.start_progress(7, "running");
        assert!(reporter.progress_bar.is_none());
        reporter.run_finished(&TestResultEntry::skipped("shop/cart-accumulation"));
        reporter.finish();
    }

    #[test]
    fn test_default_uses_color() {
        let reporter = ProgressReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.quiet);
    }
}
