//! Scenario runner.
//!
//! Every run gets a fresh session from the [`SessionFactory`]. Runs execute
//! up to `workers` at a time; in fail-fast mode the first failure stops
//! new runs from starting and they are reported as skipped. Runs already in
//! flight finish normally.

use crate::config::SuiteConfig;
use crate::driver::{BrowserDriver, SessionFactory};
use crate::reporter::{Reporter, TestResultEntry};
use crate::result::{StorecheckError, StorecheckResult};
use crate::scenario::Scenario;
use crate::session::{duration_ms, ScenarioPhase, Session};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::Instant;

/// Runs scenarios against sessions from a factory
#[derive(Debug)]
pub struct ScenarioRunner<F: SessionFactory> {
    factory: F,
    config: SuiteConfig,
}

impl<F: SessionFactory> ScenarioRunner<F> {
    /// Create a runner
    #[must_use]
    pub const fn new(factory: F, config: SuiteConfig) -> Self {
        Self { factory, config }
    }

    /// Suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run `scenarios` and collect the report
    pub async fn run(&self, scenarios: &[Scenario]) -> Reporter {
        self.run_with(scenarios, |_| {}).await
    }

    /// Run `scenarios`, calling `on_result` as each run completes. The
    /// report lists runs in `scenarios` order.
    pub async fn run_with<C>(&self, scenarios: &[Scenario], mut on_result: C) -> Reporter
    where
        C: FnMut(&TestResultEntry),
    {
        let mut reporter = Reporter::new();
        reporter.start();
        let workers = self.config.runner.workers.max(1);
        tracing::info!(
            runs = scenarios.len(),
            workers,
            fail_fast = self.config.runner.fail_fast,
            "suite started"
        );

        let stop = AtomicBool::new(false);
        let stop = &stop;
        let mut finished: Vec<(usize, TestResultEntry)> = stream::iter(
            scenarios
                .iter()
                .enumerate()
                .map(|(index, scenario)| async move {
                    if stop.load(Ordering::SeqCst) {
                        tracing::info!(scenario = %scenario, "skipped after earlier failure");
                        return (index, TestResultEntry::skipped(scenario.name.clone()));
                    }
                    let entry = self.run_one(scenario).await;
                    if entry.status.is_failed() && self.config.runner.fail_fast {
                        stop.store(true, Ordering::SeqCst);
                    }
                    (index, entry)
                }),
        )
        .buffer_unordered(workers)
        .inspect(|(_, entry)| on_result(entry))
        .collect()
        .await;

        finished.sort_by_key(|(index, _)| *index);
        for (_, entry) in finished {
            reporter.record(entry);
        }
        tracing::info!(summary = %reporter.summary(), "suite finished");
        reporter
    }

    /// Execute one run in its own session
    pub async fn run_one(&self, scenario: &Scenario) -> TestResultEntry {
        let started = Instant::now();
        tracing::info!(scenario = %scenario, "run started");

        let driver = match self.factory.open().await {
            Ok(driver) => driver,
            Err(error) => {
                tracing::error!(scenario = %scenario, error = %error, "session failed to open");
                return TestResultEntry::failed(
                    scenario.name.clone(),
                    started.elapsed(),
                    &ScenarioPhase::NotStarted,
                    &error,
                );
            }
        };
        let mut session = Session::new(driver, scenario.name.clone(), self.config.timeouts.clone());

        let limit = self.config.timeouts.scenario();
        let outcome = match tokio::time::timeout(limit, scenario.execute(&mut session, &self.config))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(StorecheckError::timeout(
                format!("scenario {scenario} to finish"),
                duration_ms(limit),
            )),
        };

        let entry = match outcome {
            Ok(()) => {
                session.enter(ScenarioPhase::Passed);
                TestResultEntry::passed(scenario.name.clone(), started.elapsed())
            }
            Err(error) => {
                let phase = session.phase().clone();
                session.enter(ScenarioPhase::Failed(error.to_string()));
                tracing::warn!(
                    scenario = %scenario,
                    session = %session.id(),
                    phase = phase.name(),
                    kind = %error.kind(),
                    error = %error,
                    "run failed"
                );
                let mut entry =
                    TestResultEntry::failed(scenario.name.clone(), started.elapsed(), &phase, &error);
                if let Some(dir) = &self.config.runner.artifacts_dir {
                    match save_screenshot(&mut session, dir, scenario).await {
                        Ok(path) => entry = entry.with_screenshot(path),
                        Err(e) => {
                            tracing::warn!(scenario = %scenario, error = %e, "screenshot not saved");
                        }
                    }
                }
                entry
            }
        };

        if let Err(error) = session.close().await {
            tracing::warn!(scenario = %scenario, error = %error, "session did not close cleanly");
        }
        tracing::info!(
            scenario = %scenario,
            status = entry.status.as_str(),
            duration_ms = entry.duration_ms,
            "run finished"
        );
        entry
    }
}

async fn save_screenshot<D: BrowserDriver>(
    session: &mut Session<D>,
    dir: &Path,
    scenario: &Scenario,
) -> StorecheckResult<PathBuf> {
    let png = session.screenshot().await?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("{}.png", scenario.slug()));
    tokio::fs::write(&path, png).await?;
    tracing::debug!(scenario = %scenario, path = %path.display(), "screenshot saved");
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::TimeoutConfig;
    use crate::reporter::TestStatus;
    use crate::result::FailureKind;
    use crate::scenario::ScenarioKind;
    use crate::simulated::{Faults, SimulatedFactory, PNG_SIGNATURE};

    const ROOT: &str = "https://jupiter.example";

    fn config() -> SuiteConfig {
        let mut config = SuiteConfig::default();
        config.site.base_url = ROOT.to_string();
        config.timeouts = TimeoutConfig::simulated();
        config
    }

    #[tokio::test]
    async fn test_passing_run() {
        let runner = ScenarioRunner::new(SimulatedFactory::new(ROOT), config());
        let entry = runner
            .run_one(&Scenario::new(ScenarioKind::ValidationThenCorrection))
            .await;
        assert_eq!(entry.status, TestStatus::Passed, "{:?}", entry.failure);
    }

    #[tokio::test]
    async fn test_failure_saves_screenshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.runner.artifacts_dir = Some(dir.path().join("shots"));
        let faults = Faults {
            never_acknowledge: true,
            ..Faults::default()
        };
        let runner =
            ScenarioRunner::new(SimulatedFactory::new(ROOT).with_faults(faults), config);
        let entry = runner
            .run_one(&Scenario::new(ScenarioKind::SuccessfulSubmission { run: 1 }))
            .await;
        assert_eq!(entry.status, TestStatus::Failed);
        let failure = entry.failure.clone().unwrap();
        assert_eq!(failure.kind, FailureKind::Timeout);
        let path = entry.screenshot.unwrap();
        assert!(path.ends_with("contact_successful-submission_run-1.png"));
        assert_eq!(std::fs::read(path).unwrap(), PNG_SIGNATURE.to_vec());
    }

    #[tokio::test]
    async fn test_fail_fast_skips_remaining() {
        let mut config = config();
        config.runner.fail_fast = true;
        config.runner.submission_runs = 2;
        let faults = Faults {
            sticky_errors: true,
            ..Faults::default()
        };
        let runner =
            ScenarioRunner::new(SimulatedFactory::new(ROOT).with_faults(faults), config);
        let scenarios = Scenario::all(runner.config());
        let mut seen = 0;
        let report = runner.run_with(&scenarios, |_| seen += 1).await;
        assert_eq!(seen, 4);
        let statuses: Vec<TestStatus> = report.results().iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                TestStatus::Failed,
                TestStatus::Skipped,
                TestStatus::Skipped,
                TestStatus::Skipped
            ]
        );
    }

    #[tokio::test]
    async fn test_collects_all_without_fail_fast() {
        let mut config = config();
        config.runner.submission_runs = 2;
        config.runner.workers = 3;
        let faults = Faults {
            sticky_errors: true,
            ..Faults::default()
        };
        let runner =
            ScenarioRunner::new(SimulatedFactory::new(ROOT).with_faults(faults), config);
        let scenarios = Scenario::all(runner.config());
        let report = runner.run(&scenarios).await;
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.passed_count(), 3);
        assert_eq!(report.results()[0].name, "contact/validation-then-correction");
        assert_eq!(report.results()[3].name, "shop/cart-accumulation");
    }

    #[tokio::test]
    async fn test_whole_run_timeout() {
        let mut config = config();
        config.timeouts.scenario_ms = 5;
        config.timeouts.success_notification_ms = 10_000;
        let faults = Faults {
            never_acknowledge: true,
            ..Faults::default()
        };
        let runner =
            ScenarioRunner::new(SimulatedFactory::new(ROOT).with_faults(faults), config);
        let entry = runner
            .run_one(&Scenario::new(ScenarioKind::SuccessfulSubmission { run: 1 }))
            .await;
        let failure = entry.failure.unwrap();
        assert_eq!(failure.kind, FailureKind::Timeout);
        assert!(failure.message.contains("to finish"));
    }
}
