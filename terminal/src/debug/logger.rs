//! Console and file logging initialization

use super::config::{DebugConfig, LogFormat};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging system
///
/// Sets up:
/// - Console output, pretty or JSON per `LOG_FORMAT`
/// - Daily rolling `swap-terminal.log` under `LOG_DIR` (non-blocking)
/// - Panic hook that routes panics through `tracing::error!`
///
/// The returned guard flushes the file writer on drop; hold it in `main`.
pub fn init() -> Option<WorkerGuard> {
    let config = DebugConfig::from_env();

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("swap_terminal=info,warn"));

    let console_layer = match config.log_format {
        LogFormat::Json => fmt::layer().json().with_target(true).boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
    };

    let mut guard = None;
    let file_layer = if config.log_to_file {
        match fs::create_dir_all(&config.log_dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(&config.log_dir, "swap-terminal.log");
                let (writer, worker_guard) = tracing_appender::non_blocking(appender);
                guard = Some(worker_guard);
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_ansi(false),
                )
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log directory: {}", e);
                None
            }
        }
    } else {
        None
    };

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        // A subscriber is already installed (tests, embedding)
        return guard;
    }

    tracing::info!(
        log_dir = %config.log_dir.display(),
        log_level = %config.log_level,
        log_to_file = config.log_to_file,
        format = ?config.log_format,
        debug = config.is_debug_enabled(),
        "Logging initialized"
    );

    setup_panic_hook();
    guard
}

/// Set up panic hook to log panics with location and message
fn setup_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic message".to_string()
        };

        tracing::error!(
            location = %location,
            message = %message,
            backtrace = %std::backtrace::Backtrace::force_capture(),
            "Application panic"
        );

        default_panic(panic_info);
    }));
}
