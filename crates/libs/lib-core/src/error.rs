//! # Centralized Error Handling
//!
//! This module defines the error type [`AppError`] shared by the library crates.
//! It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Input Errors** - user-supplied values
//!    - [`InvalidInput`](AppError::InvalidInput), [`NotFound`](AppError::NotFound)
//!
//! 2. **Remote Errors** - RPC nodes and REST services
//!    - [`Rpc`](AppError::Rpc), [`Http`](AppError::Http)
//!
//! 3. **Domain Errors** - on-chain state and transactions
//!    - [`Account`](AppError::Account), [`Transaction`](AppError::Transaction)
//!    - [`Decoding`](AppError::Decoding)
//!
//! 4. **Startup / Internal** - [`Config`](AppError::Config), [`Internal`](AppError::Internal)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn parse_slippage(value: f64) -> Result<f64> {
//!     if !(0.0..1.0).contains(&value) {
//!         return Err(AppError::InvalidInput("Slippage must be between 0 and 1".to_string()));
//!     }
//!     Ok(value)
//! }
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Library-wide error type.
///
/// Each variant includes a descriptive `String` for context.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Solana RPC client error (network, rate limit, node issues).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// REST API error (transport failure or non-success status).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Solana account error (missing account, unexpected layout).
    #[error("Account error: {0}")]
    Account(String),

    /// Transaction error (building, signing, submission, confirmation).
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Data decoding error (account data, JSON payloads).
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid user input validation error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unexpected failures.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Requested resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Get a user-friendly error message.
    ///
    /// Internal errors return a generic message so implementation details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Account(msg) => msg.clone(),
            AppError::Transaction(msg) => msg.clone(),
            AppError::Rpc(_) | AppError::Http(_) => "Service temporarily unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) | AppError::Decoding(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Convert `serde_json::Error` to `AppError`.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

/// Convert `reqwest::Error` to `AppError`.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decoding(format!("Response body: {}", err))
        } else {
            AppError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_details() {
        let err = AppError::Internal("stack trace here".to_string());
        assert_eq!(err.user_message(), "An internal error occurred");

        let err = AppError::InvalidInput("Amount must be positive".to_string());
        assert_eq!(err.user_message(), "Amount must be positive");
    }

    #[test]
    fn test_json_error_converts_to_decoding() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::Decoding(_)));
    }
}
