//! Storecheck CLI library
//!
//! Argument parsing, output and command handlers behind the `storecheck`
//! binary.
//!
//! ## Usage
//!
//! ```bash
//! storecheck run                          # Chromium against the demo site
//! storecheck run --filter cart --headed   # one scenario, visible browser
//! storecheck run --format junit -o out/junit.xml
//! storecheck list
//! storecheck config --init storecheck.yaml
//! ```

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, DriverArg, ListArgs, ReportFormat, RunArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
pub use runner::{
    apply_overrides, list_scenarios, load_suite, show_config, write_report, SuiteRunner,
};
