//! Runtime configuration, built directly from parsed CLI arguments. There
//! is no config file: every value the proxy needs fits on a command line.

use std::time::Duration;

use clap::ArgMatches;

pub const DEFAULT_LISTEN: &str = "localhost:25565";
pub const DEFAULT_CONNECT: &str = "localhost:14454";
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address to accept client connections on.
    pub listen: String,
    /// Upstream Minecraft server address to relay to.
    pub connect: String,
    /// Delay between upstream connect retries.
    pub retry_delay: Duration,
    /// Number of times `-v` was repeated.
    pub verbosity: u8,
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let retry_delay_secs = matches
            .get_one::<u64>("retry-delay")
            .copied()
            .unwrap_or(DEFAULT_RETRY_DELAY_SECS);

        Self {
            listen: matches
                .get_one::<String>("listen")
                .cloned()
                .unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
            connect: matches
                .get_one::<String>("connect")
                .cloned()
                .unwrap_or_else(|| DEFAULT_CONNECT.to_string()),
            retry_delay: Duration::from_secs(retry_delay_secs),
            verbosity: matches.get_count("verbose"),
        }
    }
}
