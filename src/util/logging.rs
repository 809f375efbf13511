//! Logging setup. `log`'s five built-in levels fall one short of spec.md
//! §6's six severities; `notice!`/`critical!` make up the difference with a
//! `[NOTICE]`/`[CRITICAL]` prefix over the nearest existing level (`warn`
//! and `error` respectively) rather than a second logging facade.

/// Initialise the global logger. `verbosity` follows the CLI's repeated
/// `-v` flag: 0 = info, 1 = debug, 2+ = trace.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", format!("mcproxy={level}"));
    }
    pretty_env_logger::init();
}

/// Log a notice: above info, below a full error, but not (yet) fatal —
/// e.g. falling back to an unsupported feature gracefully.
#[macro_export]
macro_rules! notice {
    (target: $target:expr, $($arg:tt)+) => {
        ::log::warn!(target: $target, "[NOTICE] {}", format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        ::log::warn!("[NOTICE] {}", format_args!($($arg)+))
    };
}

/// Log a critical error: one that is about to end the process, as opposed
/// to a per-connection error that only ends one session.
#[macro_export]
macro_rules! critical {
    (target: $target:expr, $($arg:tt)+) => {
        ::log::error!(target: $target, "[CRITICAL] {}", format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        ::log::error!("[CRITICAL] {}", format_args!($($arg)+))
    };
}
