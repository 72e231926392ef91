use clap::{ArgAction, Command, arg};

pub use vsa_suite::config::DEFAULT_CONFIG_FILE;

pub const RUN_CMD: &str = "run";

pub fn create_run_cli() -> Command {
    Command::new(RUN_CMD)
        .about("Regenerate every registered dataset and compare it against its golden document.")
        .arg(
            arg!(--config <config>)
                .help(format!("Suite config (toml or yaml). Defaults to {}", DEFAULT_CONFIG_FILE)),
        )
        .arg(arg!(--report <report>).help("Also write the case report as JSON to this path"))
        .arg(
            arg!(--parallel)
                .help("Regenerate datasets in parallel, overriding the config")
                .action(ArgAction::SetTrue),
        )
}
