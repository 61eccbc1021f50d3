//! Logging Infrastructure
//!
//! Structured logging setup. Only the binary calls into this; library code
//! just emits `tracing` events.

use tracing_subscriber::EnvFilter;

/// File name prefix of the daily-rolling log files
const LOG_FILE_PREFIX: &str = "checkout-engine";

/// Install the global subscriber
///
/// `RUST_LOG` wins over `log_level` when set. With `log_dir` the output goes
/// to a daily-rolling file in that directory (created if missing), otherwise
/// to stdout. A second call leaves the first subscriber in place.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_dir {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => builder
                .with_ansi(false)
                .with_writer(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
                .try_init(),
            Err(e) => {
                eprintln!("log dir {dir} unusable ({e}), logging to stdout");
                builder.try_init()
            }
        },
        None => builder.try_init(),
    };

    // 已经有全局 subscriber 时保留原来的
    if let Err(e) = installed {
        tracing::debug!("Logger already initialized: {e}");
    }
}
