use crate::CLAP_STYLING;
use clap::{arg, command};
use std::net::SocketAddr;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("previewgate")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("previewgate")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("serve")
                .about(
                    "Run the draft-mode activator and the preview proxy. Settings are read \
                from the environment.",
                )
                .arg(
                    arg!(-b --"bind" <ADDR>)
                        .required(false)
                        .help("Listen address, overrides PREVIEW_GATE_ADDR")
                        .value_parser(clap::value_parser!(SocketAddr)),
                ),
        )
        .subcommand(
            command!("check")
                .about("Probe the upstream GraphQL endpoint once and report the result")
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Print the result as a JSON object instead of text")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("config").about("Print the resolved configuration with secrets redacted"),
        )
}
