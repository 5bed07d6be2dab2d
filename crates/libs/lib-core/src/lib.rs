//! # Core Library
//!
//! Configuration and the shared error type for the Phoenix swap terminal.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{AppEnv, Config};
pub use error::{AppError, Result};
