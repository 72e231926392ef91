use clap::{Command, arg};

pub const CHECK_CMD: &str = "check";

pub fn create_check_cli() -> Command {
    Command::new(CHECK_CMD)
        .about("Compare an existing artifact against a golden document, section by section.")
        .arg(arg!(--expected <expected>).required(true))
        .arg(arg!(--observed <observed>).required(true))
        .arg(
            arg!(--"variant-types" <schema>)
                .help("Variant type schema: classic (SNP, INS, DEL, OTHER) or extended"),
        )
        .arg(arg!(--json).help("Print failures as JSON").action(clap::ArgAction::SetTrue))
}
