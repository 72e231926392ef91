use std::fs::write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use vsa_suite::{RegressionSuite, SuiteConfig};

use super::cli::DEFAULT_CONFIG_FILE;

///
/// Run the full suite. Returns whether every case passed.
///
pub fn run_suite(matches: &ArgMatches) -> Result<bool> {
    let default_config = DEFAULT_CONFIG_FILE.to_string();
    let config_path = matches.get_one::<String>("config").unwrap_or(&default_config);

    let mut config = SuiteConfig::from_path(Path::new(config_path))
        .with_context(|| format!("Failed to load suite config {}", config_path))?;
    if matches.get_flag("parallel") {
        config.parallel = true;
    }

    let suite = RegressionSuite::new(config)?;
    suite.reset_output_dir()?;

    let pb = ProgressBar::new(suite.config().datasets.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?,
    );
    pb.set_message("Regenerating datasets");

    let regenerated = suite.regenerate_with(|regeneration| {
        pb.set_message(regeneration.dataset.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let report = suite.evaluate(&regenerated);
    println!("{}", report);

    if let Some(path) = matches.get_one::<String>("report") {
        write(path, report.to_json()?).with_context(|| format!("Failed to write report {}", path))?;
        info!("Wrote case report to {}", path);
    }

    Ok(report.is_success())
}
