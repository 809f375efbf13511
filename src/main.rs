mod cli;
mod config;
mod error;
mod listener;
mod net;
mod proto;
mod relay;
mod session;
mod state;
mod util;

use std::process::ExitCode;

use config::Config;
use util::error::{quit_error, ErrorHints};
use crate::{critical, notice};

mod exit_code {
    pub const OK: u8 = 0;
    pub const INTERRUPTED: u8 = 130;
    pub const UNHANDLED_ERROR: u8 = 70;
    pub const CANCELLATION_ESCAPED: u8 = 76;
}

fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    let config = Config::from_matches(&matches);
    util::logging::init(config.verbosity);

    if config.listen == config.connect {
        fail_before_runtime(format!(
            "--listen and --connect are both {}, refusing to proxy a server to itself",
            config.listen
        ));
    }

    ExitCode::from(run(config))
}

#[tokio::main(flavor = "multi_thread")]
async fn run(config: Config) -> u8 {
    let listen = config.listen.clone();
    let connect = config.connect.clone();
    let retry_delay = config.retry_delay;

    let mut serve_task =
        tokio::spawn(async move { listener::serve(&listen, &connect, retry_delay).await });

    tokio::select! {
        result = &mut serve_task => {
            match result {
                Ok(Ok(())) => exit_code::OK,
                Ok(Err(err)) => {
                    critical!("{err}");
                    exit_code::UNHANDLED_ERROR
                }
                Err(join_err) => {
                    critical!("listener task ended unexpectedly: {join_err}");
                    exit_code::CANCELLATION_ESCAPED
                }
            }
        }
        _ = tokio::signal::ctrl_c() => {
            notice!("received interrupt, shutting down");
            serve_task.abort();
            exit_code::INTERRUPTED
        }
    }
}

fn fail_before_runtime(msg: String) -> ! {
    quit_error(anyhow::anyhow!(msg), ErrorHints::default());
}
