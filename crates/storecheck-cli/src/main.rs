//! `storecheck`: browser end-to-end checks for the Jupiter Toys storefront

use clap::Parser;
use std::process::ExitCode;
use storecheck_cli::{
    list_scenarios, show_config, Cli, CliConfig, CliResult, ColorChoice, Commands, SuiteRunner,
    Verbosity,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);

    match cli.command {
        Commands::Run(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(SuiteRunner::new(&config).run(&args))
        }
        Commands::List(args) => list_scenarios(&args).map(|()| true),
        Commands::Config(args) => show_config(&config, &args).map(|()| true),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
}

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .try_init();
}
