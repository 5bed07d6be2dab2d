//! # Common Error Types
//!
//! Consolidated error handling for the terminal application.
//!
//! Errors are categorized by their source:
//!
//! - **Api**: Remote communication (RPC, Data API, market registry, geolocation)
//! - **Wallet**: Keypair loading and transaction signing
//! - **State**: Application state that cannot satisfy the request (no market, client loading)
//! - **Validation**: User input (amount, endpoint, quick swap command)
//! - **Settings**: Settings file persistence
//!
//! Library errors ([`lib_core::AppError`]) convert into `Api`, except input
//! errors which stay `Validation`.
//!
//! ```rust
//! use swap_terminal::core::error::TerminalError;
//!
//! let err = TerminalError::Validation("Invalid swap command".to_string());
//! assert_eq!(err.to_string(), "Validation error: Invalid swap command");
//! ```

use lib_core::AppError;
use thiserror::Error;

/// Application-wide error type for the terminal crate.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("API error: {0}")]
    Api(String),

    /// Keypair load failures, signing failures, or a user-cancelled signature.
    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("State error: {0}")]
    State(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Convenience type alias for `Result<T, TerminalError>`.
pub type Result<T> = std::result::Result<T, TerminalError>;

impl TerminalError {
    /// Message suitable for a toast, without the category prefix.
    pub fn user_message(&self) -> String {
        match self {
            TerminalError::Api(msg)
            | TerminalError::Wallet(msg)
            | TerminalError::State(msg)
            | TerminalError::Validation(msg)
            | TerminalError::Settings(msg) => msg.clone(),
        }
    }
}

impl From<AppError> for TerminalError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidInput(msg) => TerminalError::Validation(msg),
            AppError::Transaction(msg) => TerminalError::Api(format!("Transaction failed: {}", msg)),
            other => TerminalError::Api(other.user_message()),
        }
    }
}

impl From<crate::services::wallet::WalletError> for TerminalError {
    fn from(err: crate::services::wallet::WalletError) -> Self {
        TerminalError::Wallet(err.to_string())
    }
}

impl From<std::io::Error> for TerminalError {
    fn from(err: std::io::Error) -> Self {
        TerminalError::Settings(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            TerminalError::Api("timeout".to_string()).to_string(),
            "API error: timeout"
        );
        assert_eq!(
            TerminalError::Wallet("no keypair".to_string()).to_string(),
            "Wallet error: no keypair"
        );
    }

    #[test]
    fn test_invalid_input_stays_validation() {
        let err: TerminalError = AppError::InvalidInput("Swap amount must be positive".to_string()).into();
        assert!(matches!(err, TerminalError::Validation(_)));
        assert_eq!(err.user_message(), "Swap amount must be positive");
    }

    #[test]
    fn test_remote_errors_become_api() {
        let err: TerminalError = AppError::Rpc("connection refused".to_string()).into();
        assert!(matches!(err, TerminalError::Api(_)));
    }
}
