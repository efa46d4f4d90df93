//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Storecheck: browser end-to-end checks for the Jupiter Toys storefront
#[derive(Parser, Debug)]
#[command(name = "storecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the verification scenarios
    Run(RunArgs),

    /// List the scenario runs without executing them
    List(ListArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for `storecheck run`
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Suite configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Storefront root URL
    #[arg(long, env = "STORECHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Only run scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Concurrent sessions
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Stop starting new runs after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Launch Chromium without its sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Chromium executable
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,

    /// Browser driver
    #[arg(long, value_enum, default_value = "chromium")]
    pub driver: DriverArg,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for failure screenshots
    #[arg(long)]
    pub artifacts: Option<PathBuf>,
}

/// Arguments for `storecheck list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Suite configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only list scenarios whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `storecheck config`
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Suite configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a default configuration file to this path
    #[arg(long, value_name = "PATH")]
    pub init: Option<PathBuf>,
}

/// Browser driver selection
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Real Chromium over CDP
    #[default]
    Chromium,
    /// In-process storefront model
    Simulated,
}

/// Report output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON document
    Json,
    /// JUnit XML
    Junit,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
