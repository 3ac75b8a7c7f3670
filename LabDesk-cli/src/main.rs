use std::io::{self, IsTerminal};

use clap::Parser;
use dotenv::dotenv;
use tracing::error;

use lab_desk_cli::cli::{Cli, Command};
use lab_desk_cli::commands::{run_classify, run_patients, run_render};
use lab_desk_cli::config::Settings;
use lab_desk_cli::logging::{init_logging, LogConfig};

/// Entry point for `labdesk`
///
/// Loads `.env`, sets up logging, reads `LABDESK_*` settings and dispatches
/// the subcommand. Exits non-zero on any failure.
fn main() {
    let dotenv_loaded = dotenv().is_ok();

    let cli = Cli::parse();
    let styled = !cli.no_color && io::stdout().is_terminal();
    let log_config = LogConfig {
        filter: cli.log_level.clone(),
        with_ansi: !cli.no_color && io::stderr().is_terminal(),
    };
    if let Err(err) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {err}");
        std::process::exit(1);
    }
    if !dotenv_loaded {
        tracing::debug!(".env file not found - using process environment only.");
    }

    let result = Settings::from_env()
        .map_err(anyhow::Error::from)
        .and_then(|settings| match &cli.command {
            Command::Render(args) => run_render(args, &settings, styled),
            Command::Classify(args) => run_classify(args, &settings),
            Command::Patients(args) => run_patients(args),
        });

    if let Err(err) = result {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
