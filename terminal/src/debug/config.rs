//! Logging configuration from environment variables

use lib_utils::get_env_or;
use std::path::PathBuf;

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging system configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Filter directive (e.g., "swap_terminal=debug,lib_solana=info,warn")
    pub log_level: String,
    pub log_format: LogFormat,
    /// Directory for the daily rolling log file
    pub log_dir: PathBuf,
    pub log_to_file: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: default_level().to_string(),
            log_format: LogFormat::Pretty,
            log_dir: PathBuf::from("logs"),
            log_to_file: true,
        }
    }
}

fn default_level() -> &'static str {
    if cfg!(feature = "debug-mode") {
        "swap_terminal=debug,lib_solana=debug,lib_core=info,warn"
    } else {
        "swap_terminal=info,lib_solana=info,lib_core=info,warn"
    }
}

impl DebugConfig {
    /// Load configuration from `LOG_LEVEL`, `LOG_FORMAT`, `LOG_DIR` and `LOG_TO_FILE`.
    pub fn from_env() -> Self {
        Self::from_values(
            &get_env_or("LOG_LEVEL", default_level()),
            &get_env_or("LOG_FORMAT", "pretty"),
            &get_env_or("LOG_DIR", "logs"),
            &get_env_or("LOG_TO_FILE", "true"),
        )
    }

    pub fn from_values(level: &str, format: &str, dir: &str, to_file: &str) -> Self {
        let log_format = match format.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let log_to_file = !matches!(to_file.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off");

        Self {
            log_level: level.to_string(),
            log_format,
            log_dir: PathBuf::from(dir),
            log_to_file,
        }
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        let config = DebugConfig::from_values("debug", "JSON", "/tmp/logs", "off");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.log_to_file);
        assert!(config.is_debug_enabled());
        assert_eq!(config.log_dir, PathBuf::from("/tmp/logs"));
    }

    #[test]
    fn test_unknown_format_falls_back_to_pretty() {
        let config = DebugConfig::from_values("info", "xml", "logs", "true");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_to_file);
        assert!(!config.is_debug_enabled());
    }
}
