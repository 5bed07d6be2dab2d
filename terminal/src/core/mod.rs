//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! - **[`error`]**: Terminal error type (`TerminalError`, `Result<T>`)
//! - **[`service`]**: Service traits for dependency injection (`TransactionSigner`, `GeoLookup`)
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swap_terminal::core::service::GeoLookup;
//! use swap_terminal::services::geo::GeoService;
//!
//! // In production: use real implementations
//! let geo: Arc<dyn GeoLookup> = Arc::new(GeoService::new().unwrap());
//! ```

pub mod error;
pub mod service;

pub use error::{Result, TerminalError};
pub use service::{GeoLookup, TransactionSigner};
