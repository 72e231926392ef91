use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::ArgMatches;

use vsa_capture::{DEFAULT_TIMEOUT, ExitPolicy, Reporter};

pub fn run_capture(matches: &ArgMatches) -> Result<()> {
    let reporter = matches
        .get_one::<String>("reporter")
        .expect("A reporter binary is required.");

    let input = matches
        .get_one::<String>("input")
        .expect("A path to a dataset is required.");

    let output = matches
        .get_one::<String>("output")
        .expect("An artifact path is required.");

    let timeout = match matches.get_one::<u64>("timeout") {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(*secs)),
        None => Some(DEFAULT_TIMEOUT),
    };

    let exit_policy = if matches.get_flag("ignore-exit-status") {
        ExitPolicy::Ignore
    } else {
        ExitPolicy::RequireSuccess
    };

    let args = matches
        .get_many::<String>("reporter_args")
        .unwrap_or_default()
        .cloned();

    Reporter::new(reporter)
        .with_args(args)
        .with_timeout(timeout)
        .with_exit_policy(exit_policy)
        .capture_to(Path::new(input), Path::new(output))?;

    Ok(())
}
