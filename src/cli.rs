use clap::{crate_authors, crate_description, crate_name, crate_version};
use clap::{value_parser, Arg, ArgAction, Command};

use crate::config::{DEFAULT_CONNECT, DEFAULT_LISTEN};

/// The clap command for CLI argument parsing.
pub fn command() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .value_name("ADDRESS")
                .default_value(DEFAULT_LISTEN)
                .help("Address to accept client connections on"),
        )
        .arg(
            Arg::new("connect")
                .short('s')
                .long("connect")
                .value_name("ADDRESS")
                .default_value(DEFAULT_CONNECT)
                .help("Upstream Minecraft server address to relay to"),
        )
        .arg(
            Arg::new("retry-delay")
                .long("retry-delay")
                .value_name("SECONDS")
                .default_value("3")
                .value_parser(value_parser!(u64))
                .help("Delay between upstream connect retries, in seconds"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
}
