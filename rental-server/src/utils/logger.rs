//! Logging Infrastructure
//!
//! `RUST_LOG` takes precedence; otherwise `LOG_LEVEL` applies to this crate
//! and to request tracing. With a log directory, output goes to a daily
//! rolling file instead of stdout.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rental_server={log_level},tower_http={log_level},security={log_level},warn"
        ))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        match std::fs::create_dir_all(log_path) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(log_path, "rental-server");
                let _ = subscriber
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .try_init();
                return;
            }
            Err(e) => eprintln!("Cannot create log dir {dir}: {e}, logging to stdout"),
        }
    }

    let _ = subscriber.try_init();
}
