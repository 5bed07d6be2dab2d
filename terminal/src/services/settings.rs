//! # Settings Store
//!
//! Persistent key → JSON value map backed by a single JSON file.
//!
//! Reads never fail: an absent or corrupt entry yields the caller's default,
//! which is then written back. Writes persist synchronously and then notify
//! subscribers synchronously. File I/O failures are logged and otherwise
//! ignored; the in-memory value always reflects the last write.
//!
//! [`SettingsService`] layers the four typed preferences on top of the raw
//! store.

use lib_solana::phoenix::DEFAULT_SLIPPAGE;
use lib_solana::Explorer;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

// region: --- Keys and Options

pub const THEME_MODE_KEY: &str = "preferredThemeMode";
pub const RPC_ENDPOINT_KEY: &str = "preferredRpcEndpoint";
pub const EXPLORER_KEY: &str = "preferredExplorer";
pub const SWAP_SETTINGS_KEY: &str = "preferredSwapSettings";

/// Preset slippage fractions shown in the swap settings.
pub const SLIPPAGE_OPTIONS: [f64; 3] = [0.001, DEFAULT_SLIPPAGE, 0.01];

/// Preset priority fees in SOL.
pub const PRIORITY_FEE_OPTIONS: [(&str, f64); 3] =
    [("Normal", 0.0), ("Fast", 0.000005), ("Very Fast", 0.0005)];

// endregion: --- Keys and Options

// region: --- Setting Types

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// `connected` is the live endpoint; `custom` is the last validated custom URL, or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEndpointSetting {
    pub connected: String,
    pub custom: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapSettings {
    /// Fraction, e.g. 0.005 for 0.5%
    pub slippage: f64,
    /// SOL
    pub priority_fee: f64,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            slippage: DEFAULT_SLIPPAGE,
            priority_fee: 0.0,
        }
    }
}

/// Slippage fraction from the custom percent field. Empty or unparsable input
/// resets to the default.
pub fn custom_slippage_from_percent(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(percent) if percent > 0.0 && percent < 100.0 => percent / 100.0,
        _ => DEFAULT_SLIPPAGE,
    }
}

/// Typed snapshot of every preference.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub theme_mode: ThemeMode,
    pub rpc_endpoint: RpcEndpointSetting,
    pub explorer: Explorer,
    pub swap: SwapSettings,
}

// endregion: --- Setting Types

// region: --- Store

type Subscriber = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// JSON file backed key-value store.
pub struct SettingsStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
    subscribers: RwLock<Vec<Subscriber>>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("keys", &self.values.read().len())
            .finish()
    }
}

impl SettingsStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_map(&path);
        debug!(path = %path.display(), keys = values.len(), "Settings store opened");
        Self {
            path,
            values: RwLock::new(values),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored value for `key`, or `default` (persisted) when absent or corrupt.
    pub fn get<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let stored = self.values.read().get(key).cloned();
        if let Some(value) = stored {
            match serde_json::from_value::<T>(value) {
                Ok(parsed) => return parsed,
                Err(e) => warn!(key, error = %e, "Corrupt setting, restoring default"),
            }
        }

        match serde_json::to_value(&default) {
            Ok(value) => {
                self.values.write().insert(key.to_string(), value);
                self.persist();
            }
            Err(e) => warn!(key, error = %e, "Failed to serialize default setting"),
        }
        default
    }

    /// Store `value`, persist, then notify subscribers.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize setting");
                return;
            }
        };

        self.values.write().insert(key.to_string(), value.clone());
        self.persist();

        // Callbacks may subscribe or read the store, so run them unlocked
        let subscribers: Vec<Subscriber> = self.subscribers.read().clone();
        for subscriber in subscribers {
            subscriber(key, &value);
        }
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&str, &Value) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Arc::new(callback));
    }

    fn persist(&self) {
        let snapshot = Value::Object(self.values.read().clone());
        if let Err(e) = write_json(&self.path, &snapshot) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist settings");
        }
    }
}

fn load_map(path: &Path) -> Map<String, Value> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read settings file");
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!(path = %path.display(), "Settings file is not a JSON object, starting empty");
            Map::new()
        }
    }
}

fn write_json(path: &Path, value: &Value) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}

// endregion: --- Store

// region: --- Typed Facade

/// Typed access to the four preferences.
pub struct SettingsService {
    store: Arc<SettingsStore>,
    default_mainnet: String,
}

impl SettingsService {
    pub fn new(store: Arc<SettingsStore>, default_mainnet: impl Into<String>) -> Self {
        Self {
            store,
            default_mainnet: default_mainnet.into(),
        }
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    pub fn default_mainnet(&self) -> &str {
        &self.default_mainnet
    }

    pub fn default_rpc_endpoint(&self) -> RpcEndpointSetting {
        RpcEndpointSetting {
            connected: self.default_mainnet.clone(),
            custom: String::new(),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            theme_mode: self.theme_mode(),
            rpc_endpoint: self.rpc_endpoint(),
            explorer: self.explorer(),
            swap: self.swap_settings(),
        }
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.store.get(THEME_MODE_KEY, ThemeMode::Dark)
    }

    pub fn rpc_endpoint(&self) -> RpcEndpointSetting {
        self.store.get(RPC_ENDPOINT_KEY, self.default_rpc_endpoint())
    }

    pub fn explorer(&self) -> Explorer {
        self.store.get(EXPLORER_KEY, Explorer::default())
    }

    pub fn swap_settings(&self) -> SwapSettings {
        self.store.get(SWAP_SETTINGS_KEY, SwapSettings::default())
    }

    pub fn update_theme_mode(&self, mode: ThemeMode) {
        self.store.set(THEME_MODE_KEY, &mode);
    }

    pub fn update_rpc_endpoint(&self, endpoint: &RpcEndpointSetting) {
        self.store.set(RPC_ENDPOINT_KEY, endpoint);
    }

    pub fn update_explorer(&self, explorer: Explorer) {
        self.store.set(EXPLORER_KEY, &explorer);
    }

    pub fn update_swap_settings(&self, swap: SwapSettings) {
        self.store.set(SWAP_SETTINGS_KEY, &swap);
    }

    pub fn update_slippage(&self, slippage: f64) {
        let swap = SwapSettings {
            slippage,
            ..self.swap_settings()
        };
        self.update_swap_settings(swap);
    }

    pub fn update_priority_fee(&self, priority_fee: f64) {
        let swap = SwapSettings {
            priority_fee,
            ..self.swap_settings()
        };
        self.update_swap_settings(swap);
    }
}

// endregion: --- Typed Facade
