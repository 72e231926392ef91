mod capture;
mod check;
mod run;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Command;
use tracing_subscriber::EnvFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "vsa";
    pub const DEFAULT_LOG_FILTER: &str = "info";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Regression certifier for the vcfstatsalive reporter: regenerate snapshots and compare them section by section against golden documents.")
        .subcommand_required(false)
        .subcommand(run::cli::create_run_cli())
        .subcommand(capture::cli::create_capture_cli())
        .subcommand(check::cli::create_check_cli())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(consts::DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    init_logging();

    let app = build_parser();
    let matches = app.get_matches();

    let passed = match matches.subcommand() {
        //
        // FULL SUITE
        //
        Some((run::cli::RUN_CMD, matches)) => run::handlers::run_suite(matches)?,

        //
        // SINGLE CAPTURE
        //
        Some((capture::cli::CAPTURE_CMD, matches)) => {
            capture::handlers::run_capture(matches)?;
            true
        }

        //
        // SINGLE COMPARISON
        //
        Some((check::cli::CHECK_CMD, matches)) => check::handlers::run_check(matches)?,

        // no subcommand runs the default suite
        None => {
            let defaults = run::cli::create_run_cli().get_matches_from([run::cli::RUN_CMD]);
            run::handlers::run_suite(&defaults)?
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
