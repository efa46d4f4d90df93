//! Command handlers: load the suite, run it, emit reports

use crate::commands::{ConfigArgs, DriverArg, ListArgs, ReportFormat, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use std::path::Path;
use storecheck::{
    Reporter, Scenario, ScenarioRunner, SessionFactory, SimulatedFactory, SuiteConfig, TimeoutConfig,
};

/// Load the suite file, or the stock suite when no file is given
///
/// # Errors
///
/// Returns error if the file cannot be read or is invalid
pub fn load_suite(path: Option<&Path>) -> CliResult<SuiteConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "loading suite configuration");
            Ok(SuiteConfig::load(path)?)
        }
        None => Ok(SuiteConfig::default()),
    }
}

/// Apply `run` flags on top of the file configuration
///
/// # Errors
///
/// Returns error if the merged configuration is invalid
pub fn apply_overrides(mut suite: SuiteConfig, args: &RunArgs) -> CliResult<SuiteConfig> {
    if let Some(ref url) = args.base_url {
        suite.site.base_url = url.clone();
    }
    if let Some(workers) = args.workers {
        suite.runner.workers = workers;
    }
    if args.fail_fast {
        suite.runner.fail_fast = true;
    }
    if args.headed {
        suite.browser.headless = false;
    }
    if args.no_sandbox {
        suite.browser.sandbox = false;
    }
    if let Some(ref path) = args.chromium_path {
        suite.browser.chromium_path = Some(path.clone());
    }
    if let Some(ref dir) = args.artifacts {
        suite.runner.artifacts_dir = Some(dir.clone());
    }
    suite.validate()?;
    Ok(suite)
}

/// Under the simulated driver, untouched timeouts become the short preset
fn tune_for_driver(mut suite: SuiteConfig, driver: DriverArg) -> SuiteConfig {
    if driver == DriverArg::Simulated && suite.timeouts == TimeoutConfig::default() {
        suite.timeouts = TimeoutConfig::simulated();
    }
    suite
}

/// Executes `storecheck run`
#[derive(Debug)]
pub struct SuiteRunner {
    progress: ProgressReporter,
}

impl SuiteRunner {
    /// Create a runner printing progress per `config`
    #[must_use]
    pub fn new(config: &CliConfig) -> Self {
        Self {
            progress: ProgressReporter::new(
                config.color.should_color(),
                config.verbosity.is_quiet(),
            ),
        }
    }

    /// Run the suite; `Ok(true)` when every run passed
    ///
    /// # Errors
    ///
    /// Returns error on bad configuration, an empty selection, an
    /// unavailable driver or a report that cannot be written. Failing runs
    /// are not errors; they show up in the report and the return value.
    pub async fn run(&mut self, args: &RunArgs) -> CliResult<bool> {
        let suite = tune_for_driver(
            apply_overrides(load_suite(args.config.as_deref())?, args)?,
            args.driver,
        );
        let scenarios = Scenario::filtered(&suite, args.filter.as_deref());
        if scenarios.is_empty() {
            return Err(CliError::invalid_argument(match args.filter {
                Some(ref filter) => format!("no scenario matches filter {filter:?}"),
                None => "no scenarios to run".to_string(),
            }));
        }

        self.progress.info(&format!(
            "{} run(s) against {} ({} worker(s))",
            scenarios.len(),
            suite.site.root_url(),
            suite.runner.workers
        ));

        let report = match args.driver {
            DriverArg::Simulated => {
                let factory = SimulatedFactory::new(suite.site.root_url());
                self.execute(factory, suite, &scenarios).await
            }
            DriverArg::Chromium => self.run_chromium(suite, &scenarios).await?,
        };

        self.progress.summary(
            report.passed_count(),
            report.failed_count(),
            report.skipped_count(),
            report.total_duration(),
        );
        write_report(&report, args.format, args.output.as_deref())?;
        Ok(report.all_passed())
    }

    #[cfg(feature = "browser")]
    async fn run_chromium(
        &mut self,
        suite: SuiteConfig,
        scenarios: &[Scenario],
    ) -> CliResult<Reporter> {
        let factory = storecheck::ChromiumFactory::new(suite.browser.clone());
        Ok(self.execute(factory, suite, scenarios).await)
    }

    #[cfg(not(feature = "browser"))]
    async fn run_chromium(
        &mut self,
        _suite: SuiteConfig,
        _scenarios: &[Scenario],
    ) -> CliResult<Reporter> {
        Err(CliError::invalid_argument(
            "chromium driver not enabled. Rebuild with --features browser or use --driver simulated",
        ))
    }

    async fn execute<F: SessionFactory>(
        &mut self,
        factory: F,
        suite: SuiteConfig,
        scenarios: &[Scenario],
    ) -> Reporter {
        let runner = ScenarioRunner::new(factory, suite);
        self.progress
            .start_progress(scenarios.len() as u64, "running scenarios");
        let progress = &self.progress;
        let report = runner
            .run_with(scenarios, |entry| progress.run_finished(entry))
            .await;
        self.progress.finish();
        report
    }
}

/// Render `report` in `format` to `output`, or stdout when absent
///
/// # Errors
///
/// Returns error if rendering or writing fails
pub fn write_report(report: &Reporter, format: ReportFormat, output: Option<&Path>) -> CliResult<()> {
    let Some(path) = output else {
        let rendered = match format {
            ReportFormat::Text => report.render_text(),
            ReportFormat::Json => report.render_json()?,
            ReportFormat::Junit => report.render_junit(),
        };
        print!("{rendered}");
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let written: storecheck::StorecheckResult<()> = match format {
        ReportFormat::Text => std::fs::write(path, report.render_text()).map_err(Into::into),
        ReportFormat::Json => report.generate_json(path),
        ReportFormat::Junit => report.generate_junit(path),
    };
    written.map_err(|e| CliError::report_generation(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Executes `storecheck list`
///
/// # Errors
///
/// Returns error if the configuration is invalid
pub fn list_scenarios(args: &ListArgs) -> CliResult<()> {
    let suite = load_suite(args.config.as_deref())?;
    let scenarios = Scenario::filtered(&suite, args.filter.as_deref());
    if args.json {
        let json = serde_json::to_string_pretty(&scenarios)
            .map_err(|e| CliError::report_generation(e.to_string()))?;
        println!("{json}");
    } else {
        for scenario in &scenarios {
            println!("{scenario}");
        }
    }
    Ok(())
}

/// Executes `storecheck config`
///
/// # Errors
///
/// Returns error if the configuration is invalid or `--init` would
/// overwrite an existing file
pub fn show_config(config: &CliConfig, args: &ConfigArgs) -> CliResult<()> {
    if let Some(ref path) = args.init {
        if path.exists() {
            return Err(CliError::invalid_argument(format!(
                "{} already exists",
                path.display()
            )));
        }
        std::fs::write(path, SuiteConfig::default().to_yaml()?)?;
        ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet())
            .success(&format!("wrote {}", path.display()));
        return Ok(());
    }

    let suite = load_suite(args.config.as_deref())?;
    print!("{}", suite.to_yaml()?);
    Ok(())
}
