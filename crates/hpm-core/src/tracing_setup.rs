use std::fs::OpenOptions;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable naming a file that receives debug-level logs.
pub const LOG_FILE_ENV: &str = "HPM_LOG_FILE";

pub fn init_tracing() {
    init_tracing_with_default("info");
}

pub fn init_tracing_with_default(default_directive: &str) {
    // Check if file logging is enabled via environment variable
    let file_logging = std::env::var(LOG_FILE_ENV).ok();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if let Some(log_path) = file_logging {
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

                let _ = tracing_subscriber::registry().with(file_layer).try_init();
                return;
            }
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", log_path, e);
            }
        }
    }

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}
