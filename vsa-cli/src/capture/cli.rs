use clap::{Arg, ArgAction, Command, arg, value_parser};

pub const CAPTURE_CMD: &str = "capture";

pub fn create_capture_cli() -> Command {
    Command::new(CAPTURE_CMD)
        .about("Run the reporter on one dataset and store its final snapshot.")
        .arg(arg!(--reporter <reporter>).required(true))
        .arg(arg!(--input <input>).required(true))
        .arg(arg!(--output <output>).required(true))
        .arg(
            arg!(--timeout <secs>)
                .help("Kill the reporter after this many seconds; 0 waits forever")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(--"ignore-exit-status")
                .help("Keep the snapshot even when the reporter exits unsuccessfully")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("reporter_args")
                .help("Extra reporter arguments, after `--`")
                .num_args(0..)
                .last(true),
        )
}
