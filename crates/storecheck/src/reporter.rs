//! Run reports: console summary, JSON and JUnit XML.

use crate::result::{FailureKind, StorecheckError, StorecheckResult};
use crate::session::ScenarioPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of one scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// All expectations held
    Passed,
    /// Aborted by a failure
    Failed,
    /// Not started (fail-fast)
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// Why a run failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    /// Failure taxonomy
    pub kind: FailureKind,
    /// Phase the run was in when it failed
    pub phase: String,
    /// Error message
    pub message: String,
}

/// One report line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResultEntry {
    /// Scenario run name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Failure, when status is failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureDetail>,
    /// Screenshot saved for a failed run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl TestResultEntry {
    /// Create a passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration_ms: millis(duration),
            failure: None,
            screenshot: None,
            finished_at: Utc::now(),
        }
    }

    /// Create a failing result from the error that ended the run
    #[must_use]
    pub fn failed(
        name: impl Into<String>,
        duration: Duration,
        phase: &ScenarioPhase,
        error: &StorecheckError,
    ) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration_ms: millis(duration),
            failure: Some(FailureDetail {
                kind: error.kind(),
                phase: phase.name().to_string(),
                message: error.to_string(),
            }),
            screenshot: None,
            finished_at: Utc::now(),
        }
    }

    /// Create a skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration_ms: 0,
            failure: None,
            screenshot: None,
            finished_at: Utc::now(),
        }
    }

    /// Attach the failure screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot = Some(path.into());
        self
    }

    /// Duration of the run
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Collected results of one suite invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reporter {
    /// Suite name
    suite_name: String,
    /// When the suite started
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    /// Results in completion order
    results: Vec<TestResultEntry>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self {
            suite_name: "storecheck".to_string(),
            started_at: None,
            results: Vec::new(),
        }
    }

    /// Set suite name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.suite_name = name.into();
        self
    }

    /// Mark the suite start
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    /// Record a run result
    pub fn record(&mut self, result: TestResultEntry) {
        self.results.push(result);
    }

    /// Suite name
    #[must_use]
    pub fn suite_name(&self) -> &str {
        &self.suite_name
    }

    /// Get number of passed runs
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Get number of failed runs
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Get number of skipped runs
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Get total run count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.len()
    }

    /// Get pass rate (0.0 to 1.0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 1.0;
        }
        self.passed_count() as f64 / self.results.len() as f64
    }

    /// Every recorded run passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.status.is_passed())
    }

    /// Sum of run durations
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(TestResultEntry::duration).sum()
    }

    /// Get results
    #[must_use]
    pub fn results(&self) -> &[TestResultEntry] {
        &self.results
    }

    /// Get failed runs
    #[must_use]
    pub fn failures(&self) -> Vec<&TestResultEntry> {
        self.results
            .iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }

    /// Generate summary string
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}: {}/{} passed ({:.1}%)",
            self.suite_name,
            self.passed_count(),
            self.total_count(),
            self.pass_rate() * 100.0
        )
    }

    /// Plain-text report: one line per run, failure details, summary
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let _ = writeln!(
                out,
                "{:<8} {} ({} ms)",
                result.status.as_str().to_uppercase(),
                result.name,
                result.duration_ms
            );
            if let Some(failure) = &result.failure {
                let _ = writeln!(
                    out,
                    "         [{}] during {}: {}",
                    failure.kind, failure.phase, failure.message
                );
            }
            if let Some(path) = &result.screenshot {
                let _ = writeln!(out, "         screenshot: {}", path.display());
            }
        }
        let _ = writeln!(out, "{}", self.summary());
        out
    }

    /// JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn render_json(&self) -> StorecheckResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        let _ = writeln!(
            xml,
            r#"<testsuite name="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            escape_xml(&self.suite_name),
            self.total_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_duration().as_secs_f64()
        );

        for result in &self.results {
            let _ = writeln!(
                xml,
                r#"  <testcase name="{}" time="{:.3}">"#,
                escape_xml(&result.name),
                result.duration().as_secs_f64()
            );
            match (&result.status, &result.failure) {
                (TestStatus::Failed, Some(failure)) => {
                    let _ = writeln!(
                        xml,
                        r#"    <failure type="{}" message="{}">phase: {}</failure>"#,
                        failure.kind,
                        escape_xml(&failure.message),
                        escape_xml(&failure.phase)
                    );
                }
                (TestStatus::Skipped, _) => xml.push_str("    <skipped/>\n"),
                _ => {}
            }
            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }

    /// Write the JUnit XML report
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn generate_junit(&self, output_path: &Path) -> StorecheckResult<()> {
        std::fs::write(output_path, self.render_junit())?;
        Ok(())
    }

    /// Write the JSON report
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn generate_json(&self, output_path: &Path) -> StorecheckResult<()> {
        std::fs::write(output_path, self.render_json()?)?;
        Ok(())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
