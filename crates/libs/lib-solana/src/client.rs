//! # Solana RPC Connection
//!
//! Provides a thin wrapper around the nonblocking Solana RPC client together with
//! cluster classification and the endpoint checks used by the settings screen.
//!
//! ## Features
//!
//! - **Cluster Classification**: Derive `devnet` / `mainnet-beta` from an endpoint URL
//! - **Endpoint Validation**: Reject non-http URLs locally, then probe `getVersion`
//! - **Account Queries**: Existence checks and raw account data for market decoding
//! - **Network Health**: Average TPS over recent performance samples
//! - **Transaction Submission**: Send without preflight and confirm at `processed`
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_solana::client::{Cluster, Connection};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let connection = Connection::new("https://api.devnet.solana.com");
//! assert_eq!(connection.cluster(), Cluster::Devnet);
//!
//! let tps = connection.average_tps().await;
//! println!("Network TPS: {}", tps);
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use async_trait::async_trait;
use lib_core::{AppError, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::{
    account::Account,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Number of performance samples averaged for the TPS readout.
pub const TPS_SAMPLE_COUNT: usize = 15;

/// TPS below this value is shown as a degraded network.
pub const DEGRADED_TPS_THRESHOLD: u64 = 1200;

const CONFIRM_TIMEOUT: Duration = Duration::from_secs(30);
const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Named Solana network environment.
///
/// Classification is a substring check on the endpoint URL: anything that
/// mentions `devnet` is devnet, everything else is treated as mainnet-beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cluster {
    /// Solana mainnet-beta (production network)
    MainnetBeta,
    /// Solana devnet (test network)
    Devnet,
}

impl Cluster {
    /// Classify an RPC endpoint URL.
    pub fn from_endpoint(url: &str) -> Self {
        if url.contains("devnet") {
            Cluster::Devnet
        } else {
            Cluster::MainnetBeta
        }
    }

    /// Cluster name as used by explorers and the market config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Devnet => "devnet",
        }
    }

    /// Short network name used in Phoenix Data API hostnames.
    pub fn api_network(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "mainnet",
            Cluster::Devnet => "devnet",
        }
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(self, Cluster::MainnetBeta)
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can answer a lightweight version probe.
///
/// Implemented by [`Connection`]; tests substitute an in-memory validator.
#[async_trait]
pub trait RpcValidator: Send + Sync {
    /// Probe `url` with `getVersion`. `Ok` means the endpoint answered.
    async fn probe_version(&self, url: &str) -> Result<String>;
}

/// Default validator: opens a throwaway connection to the candidate URL.
#[derive(Debug, Default, Clone, Copy)]
pub struct VersionProbe;

#[async_trait]
impl RpcValidator for VersionProbe {
    async fn probe_version(&self, url: &str) -> Result<String> {
        Connection::new(url).get_version().await
    }
}

/// Validate an RPC endpoint.
///
/// A URL without `http` is rejected without any network call. Otherwise the
/// endpoint is valid iff the validator's `getVersion` probe succeeds.
pub async fn validate_rpc_url(url: &str, validator: &dyn RpcValidator) -> bool {
    if !lib_utils::has_http_scheme(url) {
        debug!(url = %url, "Rejected RPC URL without http scheme");
        return false;
    }

    match validator.probe_version(url).await {
        Ok(version) => {
            debug!(url = %url, version = %version, "RPC endpoint validated");
            true
        }
        Err(e) => {
            warn!(url = %url, error = %e, "RPC endpoint failed version probe");
            false
        }
    }
}

/// Read access to on-chain accounts.
#[async_trait]
pub trait AccountReader: Send + Sync {
    async fn account_exists(&self, pubkey: &Pubkey) -> Result<bool>;
}

/// Check that a string is a well-formed public key of an existing account.
///
/// Malformed keys and RPC failures both report `false`; this never errors.
pub async fn check_account_pubkey(reader: &dyn AccountReader, value: &str) -> bool {
    let pubkey = match Pubkey::from_str(value.trim()) {
        Ok(pk) => pk,
        Err(_) => return false,
    };

    match reader.account_exists(&pubkey).await {
        Ok(exists) => exists,
        Err(e) => {
            debug!(pubkey = %pubkey, error = %e, "Account lookup failed");
            false
        }
    }
}

/// A single live handle to a Solana RPC endpoint.
///
/// Cloning is cheap: clones share the underlying HTTP client.
#[derive(Clone)]
pub struct Connection {
    rpc: Arc<RpcClient>,
    endpoint: String,
    cluster: Cluster,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("endpoint", &self.endpoint)
            .field("cluster", &self.cluster)
            .finish()
    }
}

impl Connection {
    /// Create a connection at `processed` commitment.
    ///
    /// The connection is lazy: no request is made until a method is called.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let cluster = Cluster::from_endpoint(&endpoint);
        info!(cluster = %cluster, "Opening Solana RPC connection");

        Self {
            rpc: Arc::new(RpcClient::new_with_commitment(
                endpoint.clone(),
                CommitmentConfig::processed(),
            )),
            endpoint,
            cluster,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    /// Underlying RPC client, for calls not wrapped here.
    pub fn rpc(&self) -> &Arc<RpcClient> {
        &self.rpc
    }

    /// Node software version (`getVersion`).
    pub async fn get_version(&self) -> Result<String> {
        let version = self
            .rpc
            .get_version()
            .await
            .map_err(|e| AppError::Rpc(format!("getVersion failed: {}", e)))?;
        Ok(version.solana_core)
    }

    /// Fetch an account, returning `None` when it does not exist.
    pub async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .rpc
            .get_account_with_commitment(pubkey, CommitmentConfig::confirmed())
            .await
            .map_err(|e| AppError::Rpc(format!("getAccountInfo {} failed: {}", pubkey, e)))?;
        Ok(response.value)
    }

    /// Fetch several accounts in one round trip (max 100 per call).
    pub async fn get_multiple_accounts(&self, pubkeys: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        let mut accounts = Vec::with_capacity(pubkeys.len());
        for chunk in pubkeys.chunks(100) {
            let batch = self
                .rpc
                .get_multiple_accounts(chunk)
                .await
                .map_err(|e| AppError::Rpc(format!("getMultipleAccounts failed: {}", e)))?;
            accounts.extend(batch);
        }
        Ok(accounts)
    }

    /// Average transactions per second over the last [`TPS_SAMPLE_COUNT`] samples.
    ///
    /// Returns 0 when the endpoint is unreachable or reports no samples.
    pub async fn average_tps(&self) -> u64 {
        let start = Instant::now();
        let samples = match self
            .rpc
            .get_recent_performance_samples(Some(TPS_SAMPLE_COUNT))
            .await
        {
            Ok(samples) => samples,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Error getting TPS");
                return 0;
            }
        };

        let tps = average_tps_from_samples(
            samples
                .iter()
                .map(|s| (s.num_transactions, s.sample_period_secs as u64)),
        );
        debug!(
            tps = tps,
            samples = samples.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Fetched network TPS"
        );
        tps
    }

    pub async fn latest_blockhash(&self) -> Result<Hash> {
        self.rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| AppError::Rpc(format!("Failed to get latest blockhash: {}", e)))
    }

    /// Submit a signed transaction with preflight simulation disabled.
    pub async fn send_transaction_skip_preflight(&self, transaction: &Transaction) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            ..RpcSendTransactionConfig::default()
        };
        self.rpc
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| AppError::Transaction(format!("Failed to send transaction: {}", e)))
    }

    /// Wait until `signature` reaches `processed`.
    ///
    /// `Ok(None)` means the transaction landed successfully, `Ok(Some(err))` means it
    /// landed and failed on-chain.
    pub async fn confirm_processed(&self, signature: &Signature) -> Result<Option<String>> {
        let deadline = Instant::now() + CONFIRM_TIMEOUT;
        loop {
            let status = self
                .rpc
                .get_signature_status_with_commitment(signature, CommitmentConfig::processed())
                .await
                .map_err(|e| AppError::Rpc(format!("Failed to confirm {}: {}", signature, e)))?;

            if let Some(result) = status {
                return Ok(result.err().map(|e| e.to_string()));
            }

            if Instant::now() >= deadline {
                return Err(AppError::Transaction(format!(
                    "Transaction {} was not confirmed within {}s",
                    signature,
                    CONFIRM_TIMEOUT.as_secs()
                )));
            }
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }

    /// UI balance of `owner`'s associated token account for `mint`; 0 if the account is missing.
    pub async fn token_ui_balance(&self, owner: &Pubkey, mint: &Pubkey) -> Result<f64> {
        let ata = spl_associated_token_account::get_associated_token_address(owner, mint);
        if self.get_account(&ata).await?.is_none() {
            return Ok(0.0);
        }

        let balance = self
            .rpc
            .get_token_account_balance(&ata)
            .await
            .context("getTokenAccountBalance")
            .map_err(|e| AppError::Rpc(format!("{:#}", e)))?;
        Ok(balance
            .ui_amount
            .or_else(|| balance.ui_amount_string.parse().ok())
            .unwrap_or(0.0))
    }
}

#[async_trait]
impl RpcValidator for Connection {
    async fn probe_version(&self, url: &str) -> Result<String> {
        if url == self.endpoint {
            self.get_version().await
        } else {
            Connection::new(url).get_version().await
        }
    }
}

#[async_trait]
impl AccountReader for Connection {
    async fn account_exists(&self, pubkey: &Pubkey) -> Result<bool> {
        Ok(self.get_account(pubkey).await?.is_some())
    }
}

/// Round(mean(num_transactions / sample_period_secs)); 0 for no samples.
pub fn average_tps_from_samples(samples: impl IntoIterator<Item = (u64, u64)>) -> u64 {
    let mut total = 0.0_f64;
    let mut count = 0usize;
    for (num_transactions, period_secs) in samples {
        if period_secs == 0 {
            continue;
        }
        total += num_transactions as f64 / period_secs as f64;
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    (total / count as f64).round() as u64
}
