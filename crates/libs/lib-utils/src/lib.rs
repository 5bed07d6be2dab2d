//! # Utilities Library
//!
//! Shared helpers for environment variables, time, display formatting, and input validation.

pub mod envs;
pub mod format;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::get_env_or;
pub use format::{abbreviate_total, format_number, format_pubkey};
pub use time::{format_date, now_unix_secs, to_unix_secs};
pub use validation::{has_http_scheme, is_pubkey_format, normalize_rpc_url};
