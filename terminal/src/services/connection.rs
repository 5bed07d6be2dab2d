//! # Connectivity Provider
//!
//! Owns the single live RPC connection and the RPC settings flow.
//!
//! The handle is replaced wholesale whenever the endpoint changes. Callers
//! clone the `Arc` out of [`ConnectionProvider::current`], so a request that
//! is already in flight keeps the connection it started with.

use super::poll::PollHandle;
use super::settings::{RpcEndpointSetting, SettingsService};
use lib_solana::client::DEGRADED_TPS_THRESHOLD;
use lib_solana::{validate_rpc_url, Cluster, Connection, RpcValidator};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const TPS_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Live connection plus the cluster its endpoint belongs to.
#[derive(Debug)]
pub struct ConnectionHandle {
    pub cluster: Cluster,
    pub connection: Connection,
}

impl ConnectionHandle {
    fn open(endpoint: &str) -> Self {
        let connection = Connection::new(endpoint);
        Self {
            cluster: connection.cluster(),
            connection,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.connection.endpoint()
    }
}

/// Entries of the RPC settings list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcOption {
    Mainnet,
    Devnet,
    Custom,
}

impl RpcOption {
    pub fn all() -> [RpcOption; 3] {
        [RpcOption::Mainnet, RpcOption::Devnet, RpcOption::Custom]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RpcOption::Mainnet => "mainnet-beta",
            RpcOption::Devnet => "devnet",
            RpcOption::Custom => "custom",
        }
    }
}

/// Result of submitting a custom endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomEndpointOutcome {
    Connected(String),
    /// Validation failed; the endpoint setting fell back to the default mainnet.
    Reset,
}

/// TPS readout for one RPC option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpsReading {
    Unavailable,
    Degraded(u64),
    Healthy(u64),
}

impl From<u64> for TpsReading {
    fn from(tps: u64) -> Self {
        if tps == 0 {
            TpsReading::Unavailable
        } else if tps < DEGRADED_TPS_THRESHOLD {
            TpsReading::Degraded(tps)
        } else {
            TpsReading::Healthy(tps)
        }
    }
}

impl TpsReading {
    pub fn label(&self) -> String {
        match self {
            TpsReading::Unavailable => "N/A".to_string(),
            TpsReading::Degraded(tps) | TpsReading::Healthy(tps) => format!("{} TPS", tps),
        }
    }
}

pub struct ConnectionProvider {
    handle: RwLock<Arc<ConnectionHandle>>,
    settings: Arc<SettingsService>,
    validator: Arc<dyn RpcValidator>,
    devnet_endpoint: String,
    tps: RwLock<HashMap<RpcOption, TpsReading>>,
    // Probe connections reused across TPS ticks, keyed by endpoint
    probes: RwLock<HashMap<String, Connection>>,
}

impl std::fmt::Debug for ConnectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionProvider")
            .field("handle", &*self.handle.read())
            .field("devnet_endpoint", &self.devnet_endpoint)
            .finish()
    }
}

impl ConnectionProvider {
    /// Open a connection to the persisted `connected` endpoint.
    pub fn new(
        settings: Arc<SettingsService>,
        devnet_endpoint: impl Into<String>,
        validator: Arc<dyn RpcValidator>,
    ) -> Self {
        let endpoint = settings.rpc_endpoint().connected;
        Self {
            handle: RwLock::new(Arc::new(ConnectionHandle::open(&endpoint))),
            settings,
            validator,
            devnet_endpoint: devnet_endpoint.into(),
            tps: RwLock::new(HashMap::new()),
            probes: RwLock::new(HashMap::new()),
        }
    }

    pub fn current(&self) -> Arc<ConnectionHandle> {
        self.handle.read().clone()
    }

    pub fn cluster(&self) -> Cluster {
        self.handle.read().cluster
    }

    /// Replace the live connection. Returns `false` when `url` is already live.
    pub fn set_endpoint(&self, url: &str) -> bool {
        let mut handle = self.handle.write();
        if handle.endpoint() == url {
            return false;
        }
        let next = ConnectionHandle::open(url);
        info!(from = %handle.cluster, to = %next.cluster, "RPC endpoint changed");
        *handle = Arc::new(next);
        true
    }

    /// The option matching the live endpoint.
    pub fn active_option(&self) -> RpcOption {
        let setting = self.settings.rpc_endpoint();
        if setting.connected == self.settings.default_mainnet() {
            RpcOption::Mainnet
        } else if setting.connected == self.devnet_endpoint {
            RpcOption::Devnet
        } else {
            RpcOption::Custom
        }
    }

    pub fn endpoint_for(&self, option: RpcOption) -> Option<String> {
        match option {
            RpcOption::Mainnet => Some(self.settings.default_mainnet().to_string()),
            RpcOption::Devnet => Some(self.devnet_endpoint.clone()),
            RpcOption::Custom => {
                let custom = self.settings.rpc_endpoint().custom;
                (!custom.is_empty()).then_some(custom)
            }
        }
    }

    /// Switch to a listed endpoint. `Custom` with no saved custom URL does nothing.
    ///
    /// Returns `true` when the live connection changed.
    pub fn select_endpoint(&self, option: RpcOption) -> bool {
        let Some(url) = self.endpoint_for(option) else {
            debug!("Custom RPC selected with no saved endpoint");
            return false;
        };

        let setting = RpcEndpointSetting {
            connected: url.clone(),
            custom: self.settings.rpc_endpoint().custom,
        };
        self.settings.update_rpc_endpoint(&setting);
        self.set_endpoint(&url)
    }

    /// Normalize and validate a typed endpoint.
    ///
    /// A valid URL becomes both the connected and the saved custom endpoint.
    /// An invalid one resets the setting to the default mainnet endpoint.
    pub async fn submit_custom_endpoint(&self, input: &str) -> CustomEndpointOutcome {
        let url = lib_utils::normalize_rpc_url(input);

        if validate_rpc_url(&url, self.validator.as_ref()).await {
            self.settings.update_rpc_endpoint(&RpcEndpointSetting {
                connected: url.clone(),
                custom: url.clone(),
            });
            self.set_endpoint(&url);
            CustomEndpointOutcome::Connected(url)
        } else {
            warn!("Custom RPC endpoint rejected, resetting to default");
            let fallback = self.settings.default_rpc_endpoint();
            self.settings.update_rpc_endpoint(&fallback);
            self.set_endpoint(&fallback.connected);
            CustomEndpointOutcome::Reset
        }
    }

    // region: --- Network TPS

    pub fn tps(&self, option: RpcOption) -> TpsReading {
        self.tps.read().get(&option).copied().unwrap_or(TpsReading::Unavailable)
    }

    fn probe_for(&self, url: &str) -> Connection {
        if let Some(conn) = self.probes.read().get(url) {
            return conn.clone();
        }
        let conn = Connection::new(url);
        self.probes.write().insert(url.to_string(), conn.clone());
        conn
    }

    /// Sample TPS for every listed endpoint once.
    pub async fn refresh_tps(&self) {
        for option in RpcOption::all() {
            let reading = match self.endpoint_for(option) {
                Some(url) => self.probe_for(&url).average_tps().await.into(),
                None => TpsReading::Unavailable,
            };
            self.tps.write().insert(option, reading);
        }
    }

    /// TPS for every option every [`TPS_POLL_INTERVAL`].
    pub fn start_tps_polling(self: &Arc<Self>) -> PollHandle {
        let mut handle = PollHandle::new();
        let provider = Arc::clone(self);
        handle.every(TPS_POLL_INTERVAL, move || {
            let provider = Arc::clone(&provider);
            async move { provider.refresh_tps().await }
        });
        handle
    }

    // endregion: --- Network TPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::settings::SettingsStore;
    use async_trait::async_trait;
    use lib_core::AppError;

    const MAINNET: &str = "https://api.mainnet-beta.solana.com";
    const DEVNET: &str = "https://api.devnet.solana.com";

    struct StaticValidator(bool);

    #[async_trait]
    impl RpcValidator for StaticValidator {
        async fn probe_version(&self, _url: &str) -> lib_core::Result<String> {
            if self.0 {
                Ok("2.1.0".to_string())
            } else {
                Err(AppError::Rpc("unreachable".to_string()))
            }
        }
    }

    fn provider(valid: bool) -> (tempfile::TempDir, ConnectionProvider) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SettingsStore::open(dir.path().join("settings.json")));
        let settings = Arc::new(SettingsService::new(store, MAINNET));
        let provider = ConnectionProvider::new(settings, DEVNET, Arc::new(StaticValidator(valid)));
        (dir, provider)
    }

    #[test]
    fn test_starts_on_persisted_endpoint() {
        let (_dir, provider) = provider(true);
        assert_eq!(provider.current().endpoint(), MAINNET);
        assert_eq!(provider.cluster(), Cluster::MainnetBeta);
        assert_eq!(provider.active_option(), RpcOption::Mainnet);
    }

    #[test]
    fn test_set_endpoint_replaces_handle_unless_unchanged() {
        let (_dir, provider) = provider(true);
        let before = provider.current();

        assert!(!provider.set_endpoint(MAINNET));
        assert!(Arc::ptr_eq(&before, &provider.current()));

        assert!(provider.set_endpoint(DEVNET));
        let after = provider.current();
        assert_eq!(after.cluster, Cluster::Devnet);
        // Holders of the old handle keep it
        assert_eq!(before.endpoint(), MAINNET);
    }

    #[test]
    fn test_select_custom_without_saved_url_is_noop() {
        let (_dir, provider) = provider(true);
        assert!(!provider.select_endpoint(RpcOption::Custom));
        assert_eq!(provider.current().endpoint(), MAINNET);
    }

    #[test]
    fn test_select_devnet_persists() {
        let (_dir, provider) = provider(true);
        assert!(provider.select_endpoint(RpcOption::Devnet));
        assert_eq!(provider.settings.rpc_endpoint().connected, DEVNET);
        assert_eq!(provider.active_option(), RpcOption::Devnet);
    }

    #[tokio::test]
    async fn test_valid_custom_endpoint_connects() {
        let (_dir, provider) = provider(true);
        let outcome = provider.submit_custom_endpoint("my-node.example.com/rpc").await;
        assert_eq!(
            outcome,
            CustomEndpointOutcome::Connected("https://my-node.example.com/rpc".to_string())
        );
        let setting = provider.settings.rpc_endpoint();
        assert_eq!(setting.connected, "https://my-node.example.com/rpc");
        assert_eq!(setting.custom, setting.connected);
        assert_eq!(provider.active_option(), RpcOption::Custom);
    }

    #[tokio::test]
    async fn test_invalid_custom_endpoint_resets() {
        let (_dir, provider) = provider(false);
        provider.select_endpoint(RpcOption::Devnet);

        let outcome = provider.submit_custom_endpoint("http://dead.example.com").await;
        assert_eq!(outcome, CustomEndpointOutcome::Reset);
        let setting = provider.settings.rpc_endpoint();
        assert_eq!(setting.connected, MAINNET);
        assert!(setting.custom.is_empty());
        assert_eq!(provider.current().endpoint(), MAINNET);
    }

    #[test]
    fn test_tps_classification() {
        assert_eq!(TpsReading::from(0), TpsReading::Unavailable);
        assert_eq!(TpsReading::from(1199), TpsReading::Degraded(1199));
        assert_eq!(TpsReading::from(1200), TpsReading::Healthy(1200));
        assert_eq!(TpsReading::Unavailable.label(), "N/A");
    }
}
