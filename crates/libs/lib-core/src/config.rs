//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables
//! (and an optional `.env` file). All configuration is validated on startup to fail
//! fast if misconfigured: a missing Phoenix Data API key, or missing RPC tokens in a
//! development environment, halts initialization before any window opens.
//!
//! ## Global Config Access
//!
//! Use [`core_config()`] to access the global configuration instance:
//!
//! ```rust,no_run
//! use lib_core::config::core_config;
//!
//! let config = core_config();
//! let mainnet = config.default_mainnet_endpoint();
//! ```
//!
//! The config must be initialized once at application startup using [`init_config()`].

use std::path::PathBuf;
use std::sync::OnceLock;

/// Phoenix SDK market/token registry.
pub const DEFAULT_MARKET_CONFIG_URL: &str =
    "https://raw.githubusercontent.com/Ellipsis-Labs/phoenix-sdk/master/master_config.json";

/// Default location of the persisted user settings.
pub const DEFAULT_SETTINGS_PATH: &str = "./phoenix-terminal-settings.json";

const MAINNET_POOL_BASE: &str = "https://ellipsis-main-98a6.mainnet.rpcpool.com/";
const DEVNET_POOL_BASE: &str = "https://ellipsis-develope-cbc0.devnet.rpcpool.com/";
const MAINNET_PUBLIC: &str = "https://api.mainnet-beta.solana.com";
const DEVNET_PUBLIC: &str = "https://api.devnet.solana.com";

/// Deployment environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    /// Local development. Private RPC tokens are mandatory.
    Development,
    /// Release builds. Public RPC endpoints are used when no token is set.
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => Err(format!("APP_ENV must be 'development' or 'production', got '{}'", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: AppEnv,

    /// Key sent as `X-API-Key` to the Phoenix Data API.
    pub data_api_key: String,

    /// rpcpool token for the mainnet endpoint
    pub rpc_token_mainnet: Option<String>,

    /// rpcpool token for the devnet endpoint
    pub rpc_token_devnet: Option<String>,

    pub market_config_url: String,

    /// JSON file backing the settings store
    pub settings_path: PathBuf,

    /// Keypair file loaded into the wallet at startup, if any.
    pub wallet_keypair_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let app_env = match non_empty("APP_ENV") {
            Some(v) => AppEnv::parse(&v)?,
            None => AppEnv::Production,
        };

        let data_api_key = non_empty("PHOENIX_DATA_API_KEY")
            .ok_or("PHOENIX_DATA_API_KEY must be set in environment")?;

        Ok(Self {
            app_env,
            data_api_key,
            rpc_token_mainnet: non_empty("RPC_TOKEN_MAINNET"),
            rpc_token_devnet: non_empty("RPC_TOKEN_DEVNET"),
            market_config_url: non_empty("MARKET_CONFIG_URL")
                .unwrap_or_else(|| DEFAULT_MARKET_CONFIG_URL.to_string()),
            settings_path: non_empty("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH)),
            wallet_keypair_path: non_empty("WALLET_KEYPAIR_PATH").map(PathBuf::from),
        })
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.app_env == AppEnv::Development
            && (self.rpc_token_mainnet.is_none() || self.rpc_token_devnet.is_none())
        {
            return Err(
                "RPC_TOKEN_MAINNET or RPC_TOKEN_DEVNET undefined, please add them to the .env file"
                    .to_string(),
            );
        }

        if !lib_utils::has_http_scheme(&self.market_config_url) {
            return Err("MARKET_CONFIG_URL must be an http(s) URL".to_string());
        }

        Ok(())
    }

    /// Default mainnet RPC endpoint.
    pub fn default_mainnet_endpoint(&self) -> String {
        match &self.rpc_token_mainnet {
            Some(token) => format!("{}{}", MAINNET_POOL_BASE, token),
            None => MAINNET_PUBLIC.to_string(),
        }
    }

    /// Default devnet RPC endpoint.
    pub fn default_devnet_endpoint(&self) -> String {
        match &self.rpc_token_devnet {
            Some(token) => format!("{}{}", DEVNET_POOL_BASE, token),
            None => DEVNET_PUBLIC.to_string(),
        }
    }
}

/// Global configuration instance (initialized once at startup).
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Initialize the global configuration.
///
/// # Errors
///
/// Returns an error if:
/// - Required environment variables are missing or invalid
/// - Configuration validation fails
/// - Config has already been initialized
pub fn init_config() -> Result<(), String> {
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        app_env = ?config.app_env,
        settings_path = %config.settings_path.display(),
        "Configuration loaded"
    );

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())
}

/// Get a reference to the global configuration.
///
/// # Panics
///
/// Panics if [`init_config()`] has not been called yet.
pub fn core_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Config must be initialized with init_config() before use")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.contains("PHOENIX_DATA_API_KEY"));
    }

    #[test]
    fn test_production_defaults_to_public_endpoints() {
        let config = Config::from_lookup(lookup(&[("PHOENIX_DATA_API_KEY", "k")])).unwrap();
        assert_eq!(config.app_env, AppEnv::Production);
        assert!(config.validate().is_ok());
        assert_eq!(config.default_mainnet_endpoint(), "https://api.mainnet-beta.solana.com");
        assert_eq!(config.default_devnet_endpoint(), "https://api.devnet.solana.com");
        assert_eq!(config.settings_path, PathBuf::from(DEFAULT_SETTINGS_PATH));
    }

    #[test]
    fn test_development_requires_rpc_tokens() {
        let config = Config::from_lookup(lookup(&[
            ("PHOENIX_DATA_API_KEY", "k"),
            ("APP_ENV", "development"),
            ("RPC_TOKEN_MAINNET", "main-token"),
        ]))
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tokens_build_pool_endpoints() {
        let config = Config::from_lookup(lookup(&[
            ("PHOENIX_DATA_API_KEY", "k"),
            ("APP_ENV", "development"),
            ("RPC_TOKEN_MAINNET", "main-token"),
            ("RPC_TOKEN_DEVNET", "dev-token"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.default_mainnet_endpoint(),
            "https://ellipsis-main-98a6.mainnet.rpcpool.com/main-token"
        );
        assert!(config.default_devnet_endpoint().contains("devnet"));
    }

    #[test]
    fn test_invalid_app_env() {
        let result = Config::from_lookup(lookup(&[
            ("PHOENIX_DATA_API_KEY", "k"),
            ("APP_ENV", "staging"),
        ]));
        assert!(result.is_err());
    }
}
