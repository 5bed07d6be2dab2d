//! # Logging and Task Tracing
//!
//! Structured logging for the swap terminal.
//!
//! - **Console logging**: pretty or JSON (`LOG_FORMAT`)
//! - **File logging**: `LOG_DIR/swap-terminal.log` with daily rotation (`LOG_TO_FILE`)
//! - **Task tracking**: [`spawn_tracked`] logs task lifecycles with durations
//!
//! ## Configuration
//!
//! Environment variables:
//! - `LOG_LEVEL`: filter directive (e.g., `swap_terminal=debug,info`)
//! - `LOG_FORMAT`: `pretty` (default) or `json`
//! - `LOG_DIR`: log directory (default: `logs`)
//! - `LOG_TO_FILE`: `false` disables the file layer

pub mod config;
pub mod logger;
pub mod task_tracker;

pub use config::{DebugConfig, LogFormat};
pub use logger::init as init_logger;
pub use task_tracker::{active_task_count, spawn_tracked};

/// Initialize logging. Call at startup, before any other operation, and keep
/// the returned guard alive.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    init_logger()
}
